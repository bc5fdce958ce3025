#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use rinvoice::models::InvoiceDraft;
use rinvoice::render::{InvoiceProfile, InvoiceView};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn rinv() -> Command {
    cargo_bin_cmd!("rinvoice")
}

pub fn scratch() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Write a config file that saves invoices into `out_dir`.
pub fn write_config(dir: &Path, out_dir: &Path) -> PathBuf {
    let path = dir.join("rinvoice.conf");
    let yaml = format!(
        "invoice_title: INVOICE TEST\ncurrency: RM\noutput_dir: {}\n",
        out_dir.display()
    );
    fs::write(&path, yaml).expect("write config");
    path
}

pub fn march_17() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 17).expect("valid date")
}

/// Consulting 2 × 100 and Materials 1 × 50, issued to "Ali Bin Ahmad".
pub fn sample_draft() -> InvoiceDraft {
    let mut d = InvoiceDraft::new();
    d.recipient_name = "Ali Bin Ahmad".to_string();
    d.add_item("Consulting", 2.0, 100.0);
    d.add_item("Materials", 1.0, 50.0);
    d
}

pub fn sample_view() -> InvoiceView {
    InvoiceView::build(&sample_draft(), &InvoiceProfile::default(), march_17())
}

pub fn empty_view() -> InvoiceView {
    InvoiceView::build(&InvoiceDraft::new(), &InvoiceProfile::default(), march_17())
}

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-")
}
