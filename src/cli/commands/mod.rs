pub mod config;
pub mod export;
pub mod init;
pub mod share;
pub mod shell;

use crate::cli::parser::DraftArgs;
use crate::core::InvoiceEditor;
use crate::errors::{AppError, AppResult};
use crate::models::InvoiceDraft;
use crate::ui::messages::{confirm, info, warning};
use crate::utils::parse_amount;
use std::path::Path;
use tokio::runtime::Runtime;

/// Runtime driving the export controller. The single worker thread keeps
/// delayed preview deletions running between `block_on` calls.
pub fn runtime() -> AppResult<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .map_err(AppError::from)
}

/// Decide whether `target` may be written.
///
/// - file missing or `force` → Some(force)
/// - file present → asks the user; Some(true) to overwrite, None to cancel.
pub(crate) fn resolve_overwrite(target: &Path, force: bool) -> Option<bool> {
    if force || !target.exists() {
        return Some(force);
    }

    warning(format!("The file '{}' already exists.", target.display()));
    if confirm("Overwrite?", false) {
        info("Existing file will be overwritten.");
        Some(true)
    } else {
        None
    }
}

/// Split "description;qty;price". The description may itself contain ';'.
pub(crate) fn parse_item(raw: &str) -> AppResult<(String, f64, f64)> {
    let mut parts = raw.rsplitn(3, ';');
    let price = parts.next();
    let qty = parts.next();
    let desc = parts.next();

    match (desc, qty, price) {
        (Some(d), Some(q), Some(p)) => Ok((d.trim().to_string(), parse_amount(q), parse_amount(p))),
        _ => Err(AppError::InvalidItem(format!(
            "'{raw}' (expected \"description;qty;price\")"
        ))),
    }
}

/// Build an editor from `--draft`, `--to` and `--item` arguments.
/// Items that the editor rejects are reported and skipped.
pub(crate) fn editor_from_args(args: &DraftArgs) -> AppResult<InvoiceEditor> {
    let draft = match &args.draft {
        Some(path) => InvoiceDraft::load(path)?,
        None => InvoiceDraft::new(),
    };
    let mut editor = InvoiceEditor::with_draft(draft);

    if let Some(to) = &args.to {
        editor.set_recipient(to);
    }

    for raw in &args.items {
        let (desc, qty, price) = parse_item(raw)?;
        if !editor.add_item(&desc, qty, price) {
            warning(format!(
                "Skipped item '{raw}': description, quantity and price are all required"
            ));
        }
    }

    Ok(editor)
}
