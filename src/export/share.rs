use crate::errors::{AppError, AppResult};
use crate::models::InvoiceSummary;
use crate::utils::money;
use std::process::Command;

/// Opens a document or URL outside the program.
pub trait Launcher {
    fn open(&self, target: &str) -> AppResult<()>;
}

/// Hands the target to the desktop's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open(&self, target: &str) -> AppResult<()> {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]);
            c
        } else if cfg!(target_os = "macos") {
            Command::new("open")
        } else {
            Command::new("xdg-open")
        };

        let status = cmd.arg(target).status().map_err(|e| AppError::Launch {
            target: target.to_string(),
            reason: e.to_string(),
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(AppError::Launch {
                target: target.to_string(),
                reason: format!("launcher exited with {status}"),
            })
        }
    }
}

/// Plain-text message for the recipient. It never carries a link to the
/// local preview file, which would be useless on another device.
pub fn compose_message(summary: &InvoiceSummary, currency: &str) -> String {
    format!(
        "Invoice details:\nIssued to: {}\nTotal Amount: {}\n\nThank you for your business!",
        summary.recipient_name,
        money(currency, summary.grand_total)
    )
}

/// `<base>?text=<percent-encoded message>`
pub fn share_url(base: &str, message: &str) -> String {
    format!("{}?text={}", base, urlencoding::encode(message))
}
