mod common;
use async_trait::async_trait;
use common::{empty_view, is_pdf, march_17, sample_draft, sample_view, scratch};
use image::{Rgb, RgbImage};
use rinvoice::cli::commands::runtime;
use rinvoice::errors::{AppError, AppResult};
use rinvoice::export::{
    ExportController, ExportSettings, ExportState, GenerateOutcome, PageSpec, SaveMechanism,
    export_file_name, fit_to_page,
};
use rinvoice::render::{BitmapCapture, CaptureOptions, InvoiceView, RasterCapture};
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Notify;

struct FailingCapture;

#[async_trait]
impl RasterCapture for FailingCapture {
    async fn capture(&self, _view: &InvoiceView, _opts: &CaptureOptions) -> AppResult<RgbImage> {
        Err(AppError::Capture("renderer crashed".to_string()))
    }
}

/// Succeeds once, then fails.
struct FlakyCapture {
    calls: AtomicUsize,
}

#[async_trait]
impl RasterCapture for FlakyCapture {
    async fn capture(&self, _view: &InvoiceView, _opts: &CaptureOptions) -> AppResult<RgbImage> {
        match self.calls.fetch_add(1, Ordering::SeqCst) {
            0 => Ok(RgbImage::from_pixel(10, 20, Rgb([255, 255, 255]))),
            _ => Err(AppError::Capture("out of memory".to_string())),
        }
    }
}

/// Holds the capture until the gate is opened.
struct GateCapture {
    gate: Arc<Notify>,
}

#[async_trait]
impl RasterCapture for GateCapture {
    async fn capture(&self, _view: &InvoiceView, _opts: &CaptureOptions) -> AppResult<RgbImage> {
        self.gate.notified().await;
        Ok(RgbImage::from_pixel(10, 20, Rgb([255, 255, 255])))
    }
}

fn controller() -> ExportController {
    ExportController::new(BitmapCapture, ExportSettings::default())
}

fn preview_of(outcome: GenerateOutcome) -> rinvoice::export::PreviewInfo {
    match outcome {
        GenerateOutcome::Previewing(p) => p,
        GenerateOutcome::NoTarget => panic!("expected a preview"),
    }
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

#[test]
fn test_file_name_from_recipient_and_date() {
    assert_eq!(
        export_file_name("Ali Bin Ahmad", march_17()),
        "InvoiceAliBinAhmad_250317.pdf"
    );
    assert_eq!(export_file_name("", march_17()), "InvoiceUntitled_250317.pdf");
    assert!(export_file_name(" \t ", march_17()).starts_with("InvoiceUntitled_"));
}

#[test]
fn test_fit_to_page_uses_height_between_margins() {
    let page = PageSpec::a4(40.0);
    let p = fit_to_page(1000, 2000, &page);
    assert!(close(p.height, 762.0));
    assert!(close(p.width, 381.0));
    assert!(close(p.x, (595.0 - 381.0) / 2.0));
    assert!(close(p.y, 40.0));
}

#[test]
fn test_fit_to_page_never_overflows_width() {
    let page = PageSpec::default();
    let p = fit_to_page(4000, 1000, &page);
    assert!(close(p.width, 595.0));
    assert!(close(p.x, 0.0));
    assert!(close(p.y + p.height, 842.0 - 40.0));
}

#[tokio::test]
async fn test_empty_invoice_exports_a_single_page() {
    let c = controller();
    let p = preview_of(c.generate_export(Some(&empty_view())).await.unwrap());

    assert_eq!(c.state(), ExportState::Previewing);
    assert_eq!(p.zoom_percent, 75);
    let bytes = fs::read(&p.path).unwrap();
    assert!(is_pdf(&bytes));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Count 1"));
    assert!(text.contains("/FlateDecode"));
}

#[tokio::test]
async fn test_missing_region_changes_nothing() {
    let c = controller();
    assert_eq!(c.generate_export(None).await.unwrap(), GenerateOutcome::NoTarget);
    assert_eq!(c.state(), ExportState::Idle);
    assert!(!c.has_artifact());
}

#[tokio::test]
async fn test_confirm_saves_and_releases_preview() {
    let out = scratch();
    let c = controller();
    let p = preview_of(c.generate_export(Some(&sample_view())).await.unwrap());
    assert!(p.path.exists());

    let saved = c
        .confirm_export(&sample_draft().summary(), march_17(), out.path(), false)
        .unwrap()
        .expect("document saved");

    assert_eq!(saved.path, out.path().join("InvoiceAliBinAhmad_250317.pdf"));
    assert_eq!(saved.mechanism, SaveMechanism::Native);
    assert!(is_pdf(&fs::read(&saved.path).unwrap()));
    assert!(!p.path.exists());
    assert_eq!(c.state(), ExportState::Idle);
    assert!(!c.has_artifact());
}

#[test]
fn test_confirm_without_document_is_a_no_op() {
    let out = scratch();
    let c = controller();
    let r = c
        .confirm_export(&sample_draft().summary(), march_17(), out.path(), false)
        .unwrap();
    assert!(r.is_none());
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_cancel_keeps_document_for_reopen() {
    let c = controller();
    let first = preview_of(c.generate_export(Some(&sample_view())).await.unwrap());

    c.cancel_export();
    assert_eq!(c.state(), ExportState::Idle);
    assert!(!first.path.exists());
    assert!(c.has_artifact());

    let again = c.reopen_preview().unwrap().expect("document retained");
    assert_eq!(c.state(), ExportState::Previewing);
    assert!(again.path.exists());
    assert_eq!(again.image_size, first.image_size);
}

#[test]
fn test_reopen_without_document() {
    let c = controller();
    assert!(c.reopen_preview().unwrap().is_none());
    c.cancel_export();
    assert_eq!(c.state(), ExportState::Idle);
}

#[tokio::test]
async fn test_discard_forgets_document() {
    let c = controller();
    c.generate_export(Some(&sample_view())).await.unwrap();
    let path = c.preview_path().unwrap();

    c.discard();
    assert!(!c.has_artifact());
    assert!(!path.exists());
    assert!(c.reopen_preview().unwrap().is_none());
}

#[tokio::test]
async fn test_capture_failure_is_reported() {
    let c = ExportController::new(FailingCapture, ExportSettings::default());
    let r = c.generate_export(Some(&sample_view())).await;

    assert!(matches!(r, Err(AppError::Capture(_))));
    assert_eq!(c.state(), ExportState::Idle);
    assert!(!c.is_capturing());
    assert!(!c.has_artifact());
}

#[tokio::test]
async fn test_failure_drops_previous_document() {
    let c = ExportController::new(
        FlakyCapture {
            calls: AtomicUsize::new(0),
        },
        ExportSettings::default(),
    );
    let p = preview_of(c.generate_export(Some(&sample_view())).await.unwrap());
    assert!(c.has_artifact());

    assert!(c.generate_export(Some(&sample_view())).await.is_err());
    assert!(!c.has_artifact());
    assert!(!p.path.exists());
    assert_eq!(c.state(), ExportState::Idle);
}

#[tokio::test]
async fn test_second_export_rejected_while_capturing() {
    let gate = Arc::new(Notify::new());
    let c = ExportController::new(
        GateCapture { gate: gate.clone() },
        ExportSettings::default(),
    );
    let view = sample_view();

    let (first, second) = tokio::join!(c.generate_export(Some(&view)), async {
        let r = c.generate_export(Some(&view)).await;
        gate.notify_one();
        r
    });

    assert!(matches!(second, Err(AppError::ExportInProgress)));
    assert!(matches!(first, Ok(GenerateOutcome::Previewing(_))));
    assert_eq!(c.state(), ExportState::Previewing);
}

#[tokio::test]
async fn test_preview_release_waits_for_grace_period() {
    let out = scratch();
    let settings = ExportSettings {
        preview_grace: Duration::from_millis(100),
        ..ExportSettings::default()
    };
    let c = ExportController::new(BitmapCapture, settings);
    let p = preview_of(c.generate_export(Some(&sample_view())).await.unwrap());

    c.confirm_export(&sample_draft().summary(), march_17(), out.path(), false)
        .unwrap();
    assert!(p.path.exists());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!p.path.exists());
}

#[test]
fn test_preview_release_runs_between_cli_calls() {
    let rt = runtime().unwrap();
    let out = scratch();
    let settings = ExportSettings {
        preview_grace: Duration::from_millis(100),
        ..ExportSettings::default()
    };
    let c = ExportController::new(BitmapCapture, settings);
    let p = preview_of(rt.block_on(c.generate_export(Some(&sample_view()))).unwrap());

    {
        let _enter = rt.enter();
        c.confirm_export(&sample_draft().summary(), march_17(), out.path(), false)
            .unwrap();
    }
    assert!(p.path.exists());

    // nothing drives the runtime from this thread any more
    std::thread::sleep(Duration::from_millis(600));
    assert!(!p.path.exists());
}

#[test]
fn test_settle_waits_for_grace_before_runtime_drop() {
    let rt = runtime().unwrap();
    let out = scratch();
    let settings = ExportSettings {
        preview_grace: Duration::from_millis(150),
        ..ExportSettings::default()
    };
    let c = ExportController::new(BitmapCapture, settings);

    let path = rt.block_on(async {
        let p = preview_of(c.generate_export(Some(&sample_view())).await.unwrap());
        c.confirm_export(&sample_draft().summary(), march_17(), out.path(), false)
            .unwrap();
        assert!(p.path.exists());

        let started = Instant::now();
        c.settle().await;
        assert!(started.elapsed() >= Duration::from_millis(100));
        p.path
    });
    drop(rt);

    assert!(!path.exists());
}

#[tokio::test]
async fn test_existing_file_needs_force() {
    let out = scratch();
    let c = controller();
    let summary = sample_draft().summary();
    let target = out.path().join(export_file_name(&summary.recipient_name, march_17()));
    fs::write(&target, b"older invoice").unwrap();

    c.generate_export(Some(&sample_view())).await.unwrap();
    let err = c
        .confirm_export(&summary, march_17(), out.path(), false)
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(ref p) if p == &target));
    assert_eq!(fs::read(&target).unwrap(), b"older invoice");
    assert!(c.has_artifact());

    let saved = c
        .confirm_export(&summary, march_17(), out.path(), true)
        .unwrap()
        .expect("document saved");
    assert_eq!(saved.path, target);
    assert!(is_pdf(&fs::read(&target).unwrap()));
}
