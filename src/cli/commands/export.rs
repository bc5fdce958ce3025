use super::{editor_from_args, resolve_overwrite, runtime};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::InvoiceEditor;
use crate::errors::{AppError, AppResult};
use crate::export::{
    ExportController, GenerateOutcome, Launcher, SystemLauncher, export_file_name,
    notify_export_success, print_preview,
};
use crate::ui::messages::{confirm, info, warning};
use crate::utils::date;
use chrono::NaiveDate;
use std::path::Path;

pub struct ExportRequest<'a> {
    pub date: NaiveDate,
    pub dir: &'a Path,
    pub open: bool,
    pub yes: bool,
    pub force: bool,
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        draft,
        out,
        date: date_arg,
        open,
        yes,
        force,
    } = cmd
    {
        let date = match date_arg {
            Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
            None => date::today(),
        };

        let editor = editor_from_args(draft)?;
        if editor.draft().is_empty() {
            warning("The invoice has no items; exporting it anyway.");
        }

        let dir = out.clone().unwrap_or_else(|| cfg.output_dir.clone());
        let req = ExportRequest {
            date,
            dir: &dir,
            open: *open || cfg.open_preview,
            yes: *yes,
            force: *force,
        };

        runtime()?.block_on(run(&editor, cfg, &req))?;
    }
    Ok(())
}

async fn run(editor: &InvoiceEditor, cfg: &Config, req: &ExportRequest<'_>) -> AppResult<()> {
    let controller = ExportController::with_config(cfg);
    let view = editor.render_view(cfg, req.date);

    match controller.generate_export(Some(&view)).await? {
        GenerateOutcome::Previewing(p) => print_preview(&p),
        GenerateOutcome::NoTarget => return Ok(()),
    }

    if req.open {
        if let Some(path) = controller.preview_path() {
            if let Err(e) = SystemLauncher.open(&path.to_string_lossy()) {
                warning(format!("Preview not opened: {e}"));
            }
        }
    }

    if !req.yes && !confirm("Download the PDF?", true) {
        controller.cancel_export();
        info("Export cancelled.");
        return Ok(());
    }

    let summary = editor.summary();
    let target = req.dir.join(export_file_name(&summary.recipient_name, req.date));
    let Some(force) = resolve_overwrite(&target, req.force) else {
        controller.cancel_export();
        info("Export cancelled: existing file not overwritten.");
        return Ok(());
    };

    if let Some(saved) = controller.confirm_export(&summary, req.date, req.dir, force)? {
        notify_export_success(&saved);
    }

    // the runtime goes away with this command
    let grace = controller.settings().preview_grace;
    if !grace.is_zero() {
        info(format!("Keeping the preview for {}s...", grace.as_secs()));
    }
    controller.settle().await;
    Ok(())
}
