use crate::errors::{AppError, AppResult};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::RgbImage;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, TextStr};
use std::io::Write;

/// Page geometry in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSpec {
    pub width: f32,
    pub height: f32,
    /// Blank band kept above and below the image.
    pub margin: f32,
}

impl PageSpec {
    pub fn a4(margin: f32) -> Self {
        Self {
            width: 595.0,
            height: 842.0,
            margin,
        }
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::a4(40.0)
    }
}

/// Where the snapshot lands on the page (PDF coordinates, origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Scale the image to the page height minus both margins, centred
/// horizontally and hanging from the top margin. Images wider than the
/// page after that are shrunk to the page width instead.
pub fn fit_to_page(image_w: u32, image_h: u32, page: &PageSpec) -> Placement {
    let available_h = (page.height - 2.0 * page.margin).max(1.0);
    let mut ratio = available_h / image_h.max(1) as f32;
    if image_w as f32 * ratio > page.width {
        ratio = page.width / image_w.max(1) as f32;
    }

    let width = image_w as f32 * ratio;
    let height = image_h as f32 * ratio;

    Placement {
        x: (page.width - width) / 2.0,
        y: page.height - page.margin - height,
        width,
        height,
    }
}

/// The finished one-page document built from a raster snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    bytes: Vec<u8>,
    pub placement: Placement,
    pub image_size: (u32, u32),
    pub page: PageSpec,
}

impl ExportArtifact {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Writes a single A4 page carrying one centred image.
pub struct PageComposer {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_id: Ref,
    content_id: Ref,
    image_id: Ref,
    info_id: Ref,
    page: PageSpec,
}

impl PageComposer {
    pub fn new(page: PageSpec) -> Self {
        Self {
            pdf: Pdf::new(),
            catalog_id: Ref::new(1),
            pages_id: Ref::new(2),
            page_id: Ref::new(3),
            content_id: Ref::new(4),
            image_id: Ref::new(5),
            info_id: Ref::new(6),
            page,
        }
    }

    /// Embed `image` as raw RGB samples behind a fast Flate filter.
    pub fn compose(mut self, image: &RgbImage, title: &str) -> AppResult<ExportArtifact> {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Err(AppError::Compose("snapshot is empty".to_string()));
        }

        let samples = deflate_fast(image.as_raw())?;
        let placement = fit_to_page(w, h, &self.page);

        {
            let mut xobject = self.pdf.image_xobject(self.image_id, &samples);
            xobject.filter(Filter::FlateDecode);
            xobject.width(w as i32);
            xobject.height(h as i32);
            xobject.color_space().device_rgb();
            xobject.bits_per_component(8);
        }

        let mut content = Content::new();
        content.save_state();
        content.transform([
            placement.width,
            0.0,
            0.0,
            placement.height,
            placement.x,
            placement.y,
        ]);
        content.x_object(Name(b"Im1"));
        content.restore_state();
        self.pdf.stream(self.content_id, &content.finish());

        {
            let media_box = Rect::new(0.0, 0.0, self.page.width, self.page.height);
            let mut page = self.pdf.page(self.page_id);
            page.parent(self.pages_id)
                .media_box(media_box)
                .contents(self.content_id);
            page.resources()
                .x_objects()
                .pair(Name(b"Im1"), self.image_id);
        }

        self.pdf
            .pages(self.pages_id)
            .kids([self.page_id])
            .count(1);
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.pdf
            .document_info(self.info_id)
            .title(TextStr(title))
            .producer(TextStr(concat!("rinvoice ", env!("CARGO_PKG_VERSION"))));

        Ok(ExportArtifact {
            bytes: self.pdf.finish(),
            placement,
            image_size: (w, h),
            page: self.page,
        })
    }
}

fn deflate_fast(raw: &[u8]) -> AppResult<Vec<u8>> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::fast());
    enc.write_all(raw)
        .map_err(|e| AppError::Compose(format!("image compression failed: {e}")))?;
    enc.finish()
        .map_err(|e| AppError::Compose(format!("image compression failed: {e}")))
}
