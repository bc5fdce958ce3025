// src/export/mod.rs

pub mod controller;
pub mod pdf;
pub mod preview;
pub mod save;
pub mod share;

pub use controller::{
    ExportController, ExportSettings, ExportState, GenerateOutcome, SavedExport, ShareOutcome,
};
pub use pdf::{ExportArtifact, PageComposer, PageSpec, Placement, fit_to_page};
pub use preview::{PreviewHandle, PreviewInfo};
pub use save::{SaveMechanism, export_file_name};
pub use share::{Launcher, SystemLauncher, compose_message, share_url};

use crate::ui::messages::{info, success};

/// Shared completion message for a saved invoice.
pub(crate) fn notify_export_success(saved: &SavedExport) {
    success(format!("Invoice saved: {}", saved.path.display()));
    if saved.mechanism == SaveMechanism::DirectWrite {
        info("Saved with a direct write (no atomic rename available in that directory).");
    }
}

/// Print the preview panel: where the file is and at what zoom it is shown.
pub(crate) fn print_preview(p: &PreviewInfo) {
    crate::ui::messages::header("Preview PDF");
    println!("  File   : {}", p.path.display());
    println!("  Zoom   : {}%", p.zoom_percent);
    println!(
        "  Page   : {:.0} x {:.0} pt (A4), snapshot {} x {} px",
        p.page_size.0, p.page_size.1, p.image_size.0, p.image_size.1
    );
}
