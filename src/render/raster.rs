//! Raster capture: paints an [`InvoiceView`] into an RGB bitmap.

use super::layout::{self, Color, Corner, DrawOp, GLYPH, PLACEHOLDER, WHITE};
use super::view::{InvoiceView, ViewStyle};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use std::path::Path;

/// Largest bitmap side we agree to allocate.
pub const MAX_RASTER_SIDE: u32 = 16_384;

/// Mutation applied to a copy of the view's style right before painting.
pub type CloneHook = fn(&mut ViewStyle);

#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// Oversampling factor, view pixels → bitmap pixels.
    pub scale: f32,
    pub background: Color,
    /// Load images referenced by the view (the signature). When off they
    /// are painted as grey placeholders.
    pub load_external_assets: bool,
    pub on_clone: Option<CloneHook>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: WHITE,
            load_external_assets: true,
            on_clone: Some(paper_finish),
        }
    }
}

/// Print look: narrower sheet, tight padding, fold marks and shaded edges.
pub fn paper_finish(style: &mut ViewStyle) {
    style.width = 500;
    style.padding = 20;
    style.fold_lines = true;
    style.paper_edges = true;
}

/// Turns a rendered invoice region into a bitmap.
#[async_trait]
pub trait RasterCapture: Send + Sync {
    async fn capture(&self, view: &InvoiceView, options: &CaptureOptions) -> AppResult<RgbImage>;
}

/// Default capture service: lays the view out and paints it with the
/// built-in 8x8 bitmap font on tokio's blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitmapCapture;

#[async_trait]
impl RasterCapture for BitmapCapture {
    async fn capture(&self, view: &InvoiceView, options: &CaptureOptions) -> AppResult<RgbImage> {
        let mut clone = view.clone();
        let options = options.clone();

        tokio::task::spawn_blocking(move || {
            if let Some(hook) = options.on_clone {
                hook(&mut clone.style);
            }
            rasterize(&clone, &options)
        })
        .await
        .map_err(|e| AppError::Capture(format!("capture task aborted: {e}")))?
    }
}

/// Synchronous painter behind [`BitmapCapture`]. The clone hook is not applied here.
pub fn rasterize(view: &InvoiceView, options: &CaptureOptions) -> AppResult<RgbImage> {
    let scale = options.scale;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(AppError::Capture(format!("invalid capture scale {scale}")));
    }

    let layout = layout::layout(view);
    let w = scaled(layout.width, scale);
    let h = scaled(layout.height, scale);

    if w == 0 || h == 0 || w > MAX_RASTER_SIDE || h > MAX_RASTER_SIDE {
        return Err(AppError::Capture(format!(
            "raster of {w}x{h} px is outside the supported range (1..={MAX_RASTER_SIDE})"
        )));
    }

    let mut canvas = Canvas {
        img: RgbImage::from_pixel(w, h, Rgb(options.background)),
        scale,
    };

    for op in &layout.ops {
        canvas.draw(op, options.load_external_assets);
    }

    log::debug!("captured '{}' at {}x{} px", view.id, w, h);
    Ok(canvas.img)
}

fn scaled(v: u32, scale: f32) -> u32 {
    (v as f32 * scale).round() as u32
}

struct Canvas {
    img: RgbImage,
    scale: f32,
}

impl Canvas {
    fn draw(&mut self, op: &DrawOp, load_assets: bool) {
        match op {
            DrawOp::Fill { x, y, w, h, color } => {
                let (px, py) = (scaled(*x, self.scale), scaled(*y, self.scale));
                let pw = scaled(*w, self.scale).max(1);
                let ph = scaled(*h, self.scale).max(1);
                self.fill_px(px, py, pw, ph, *color);
            }
            DrawOp::Frame { x, y, w, h, color } => self.frame(*x, *y, *w, *h, *color),
            DrawOp::Text {
                x,
                y,
                size,
                text,
                color,
            } => self.text(*x, *y, *size, text, *color),
            DrawOp::Triangle {
                corner,
                size,
                color,
            } => self.triangle(*corner, *size, *color),
            DrawOp::Image { x, y, w, h, source } => {
                if load_assets {
                    self.image(*x, *y, *w, *h, source);
                } else {
                    self.draw(
                        &DrawOp::Fill {
                            x: *x,
                            y: *y,
                            w: *w,
                            h: *h,
                            color: PLACEHOLDER,
                        },
                        false,
                    );
                }
            }
        }
    }

    fn fill_px(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        let x1 = x.saturating_add(w).min(self.img.width());
        let y1 = y.saturating_add(h).min(self.img.height());
        for py in y.min(y1)..y1 {
            for px in x.min(x1)..x1 {
                self.img.put_pixel(px, py, Rgb(color));
            }
        }
    }

    fn frame(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        let t = scaled(1, self.scale).max(1);
        let (px, py) = (scaled(x, self.scale), scaled(y, self.scale));
        let (pw, ph) = (scaled(w, self.scale), scaled(h, self.scale));
        self.fill_px(px, py, pw, t, color);
        self.fill_px(px, (py + ph).saturating_sub(t), pw, t, color);
        self.fill_px(px, py, t, ph, color);
        self.fill_px((px + pw).saturating_sub(t), py, t, ph, color);
    }

    fn text(&mut self, x: u32, y: u32, size: u32, text: &str, color: Color) {
        let block = (size as f32 * self.scale).round().max(1.0) as u32;
        let mut pen_x = scaled(x, self.scale);
        let pen_y = scaled(y, self.scale);

        for c in text.chars() {
            let glyph = BASIC_FONTS
                .get(c)
                .or_else(|| LATIN_FONTS.get(c))
                .or_else(|| BASIC_FONTS.get('?'))
                .unwrap_or([0; 8]);

            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH {
                    if *bits & (1u8 << col) != 0 {
                        self.fill_px(
                            pen_x + col * block,
                            pen_y + row as u32 * block,
                            block,
                            block,
                            color,
                        );
                    }
                }
            }
            pen_x += GLYPH * block;
        }
    }

    fn triangle(&mut self, corner: Corner, size: u32, color: Color) {
        let s = scaled(size, self.scale)
            .min(self.img.width())
            .min(self.img.height());
        let (w, h) = (self.img.width(), self.img.height());
        for dy in 0..s {
            for dx in 0..(s - dy) {
                let (px, py) = match corner {
                    Corner::TopLeft => (dx, dy),
                    Corner::BottomRight => (w - 1 - dx, h - 1 - dy),
                };
                self.img.put_pixel(px, py, Rgb(color));
            }
        }
    }

    /// Contain-fit the image into the box and alpha-blend it over the canvas.
    fn image(&mut self, x: u32, y: u32, w: u32, h: u32, source: &Path) {
        let src = match image::open(source) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                log::warn!("image {} skipped: {}", source.display(), e);
                return;
            }
        };
        if src.width() == 0 || src.height() == 0 {
            return;
        }

        let (bw, bh) = (scaled(w, self.scale).max(1), scaled(h, self.scale).max(1));
        let ratio = (bw as f32 / src.width() as f32).min(bh as f32 / src.height() as f32);
        let tw = ((src.width() as f32 * ratio).round() as u32).max(1);
        let th = ((src.height() as f32 * ratio).round() as u32).max(1);
        let fitted = imageops::resize(&src, tw, th, FilterType::Triangle);

        let ox = scaled(x, self.scale) + (bw - tw.min(bw)) / 2;
        let oy = scaled(y, self.scale) + (bh - th.min(bh)) / 2;

        for (sx, sy, px) in fitted.enumerate_pixels() {
            let (dx, dy) = (ox + sx, oy + sy);
            if dx >= self.img.width() || dy >= self.img.height() {
                continue;
            }
            let alpha = px[3] as f32 / 255.0;
            let dst = self.img.get_pixel_mut(dx, dy);
            for c in 0..3 {
                dst[c] = (px[c] as f32 * alpha + dst[c] as f32 * (1.0 - alpha)).round() as u8;
            }
        }
    }
}
