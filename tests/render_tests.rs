mod common;
use common::{empty_view, sample_view, scratch};
use image::{Rgb, RgbImage};
use rinvoice::errors::AppError;
use rinvoice::render::layout::{self, ACCENT_PINK, DrawOp, PLACEHOLDER};
use rinvoice::render::raster::rasterize;
use rinvoice::render::{BitmapCapture, CaptureOptions, InvoiceView, RasterCapture, paper_finish};

fn plain() -> CaptureOptions {
    CaptureOptions {
        on_clone: None,
        ..CaptureOptions::default()
    }
}

fn texts(view: &InvoiceView) -> Vec<String> {
    layout::layout(view)
        .ops
        .into_iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text),
            _ => None,
        })
        .collect()
}

fn image_box(view: &InvoiceView) -> (u32, u32, u32, u32) {
    layout::layout(view)
        .ops
        .iter()
        .find_map(|op| match op {
            DrawOp::Image { x, y, w, h, .. } => Some((*x, *y, *w, *h)),
            _ => None,
        })
        .expect("view has an image")
}

#[test]
fn test_layout_shows_items_and_total() {
    let t = texts(&sample_view());
    for expected in [
        "Ali Bin Ahmad",
        "Consulting",
        "Materials",
        "RM200.00",
        "GRAND TOTAL",
        "RM250.00",
        "Thank You",
    ] {
        assert!(t.iter().any(|s| s == expected), "missing {expected:?} in {t:?}");
    }
}

#[test]
fn test_empty_layout_keeps_minimum_height() {
    let view = empty_view();
    let l = layout::layout(&view);
    assert_eq!(l.width, view.style.width);
    assert!(l.height >= view.style.min_height);
    assert!(texts(&view).iter().any(|s| s == "---"));
}

#[test]
fn test_long_description_wraps() {
    let mut view = sample_view();
    view.rows[0].description = "word ".repeat(40);
    let short = layout::layout(&sample_view()).height;
    let long = layout::layout(&view).height;
    assert!(long >= short);
    let lines = texts(&view).iter().filter(|s| s.starts_with("word")).count();
    assert!(lines > 1);
}

#[test]
fn test_fit_truncates() {
    assert_eq!(layout::fit("abcdef", 48, 1), "abcdef");
    assert_eq!(layout::fit("abcdefgh", 48, 1), "abcd..");
}

#[test]
fn test_raster_is_oversampled_on_white() {
    let view = empty_view();
    let l = layout::layout(&view);
    let img = rasterize(&view, &plain()).unwrap();

    assert_eq!(img.width(), l.width * 2);
    assert_eq!(img.height(), l.height * 2);
    // corner accent, then plain background in the middle of the left margin
    assert_eq!(img.get_pixel(0, 0), &Rgb(ACCENT_PINK));
    assert_eq!(img.get_pixel(4, img.height() / 2 + 7), &Rgb([255, 255, 255]));
}

#[test]
fn test_invalid_scale_is_a_capture_error() {
    let opts = CaptureOptions {
        scale: 0.0,
        ..plain()
    };
    assert!(matches!(rasterize(&empty_view(), &opts), Err(AppError::Capture(_))));

    let huge = CaptureOptions {
        scale: 100.0,
        ..plain()
    };
    assert!(matches!(rasterize(&empty_view(), &huge), Err(AppError::Capture(_))));
}

#[test]
fn test_signature_is_drawn_when_assets_load() {
    let dir = scratch();
    let sig = dir.path().join("signature.png");
    RgbImage::from_pixel(4, 2, Rgb([200, 0, 0])).save(&sig).unwrap();

    let mut view = sample_view();
    view.signature = Some(sig);
    let (x, y, w, h) = image_box(&view);
    let (cx, cy) = ((x + w / 2) * 2, (y + h / 2) * 2);

    let img = rasterize(&view, &plain()).unwrap();
    assert_eq!(img.get_pixel(cx, cy), &Rgb([200, 0, 0]));

    let blocked = CaptureOptions {
        load_external_assets: false,
        ..plain()
    };
    let img = rasterize(&view, &blocked).unwrap();
    assert_eq!(img.get_pixel(cx, cy), &Rgb(PLACEHOLDER));
}

#[test]
fn test_missing_signature_file_is_skipped() {
    let mut view = sample_view();
    view.signature = Some("/definitely/not/here.png".into());
    assert!(rasterize(&view, &plain()).is_ok());
}

#[tokio::test]
async fn test_bitmap_capture_applies_clone_hook_to_a_copy() {
    let view = sample_view();
    let opts = CaptureOptions {
        on_clone: Some(paper_finish),
        ..CaptureOptions::default()
    };

    let img = BitmapCapture.capture(&view, &opts).await.unwrap();
    assert_eq!(img.width(), 1000);
    // the caller's view is untouched
    assert_eq!(view.style.width, 595);
    assert!(!view.style.fold_lines);
}
