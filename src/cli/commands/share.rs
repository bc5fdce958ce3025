use super::{editor_from_args, runtime};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::export::{ExportController, GenerateOutcome, Launcher, ShareOutcome, SystemLauncher};
use crate::ui::messages::{info, success};
use crate::utils::date;

/// Prints the link instead of handing it to the desktop.
struct PrintLauncher;

impl Launcher for PrintLauncher {
    fn open(&self, target: &str) -> AppResult<()> {
        println!("{target}");
        Ok(())
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Share { draft, print_only } = cmd {
        let editor = editor_from_args(draft)?;
        let view = editor.render_view(cfg, date::today());
        let summary = editor.summary();
        let launcher: &dyn Launcher = if *print_only {
            &PrintLauncher
        } else {
            &SystemLauncher
        };

        let controller = ExportController::with_config(cfg);
        let rt = runtime()?;

        // The first call only captures the invoice; the second one shares.
        for _ in 0..2 {
            match rt.block_on(controller.share_via_messaging(Some(&view), &summary, launcher))? {
                ShareOutcome::Captured(GenerateOutcome::Previewing(_)) => {
                    info("Invoice captured, preparing the message…");
                }
                ShareOutcome::Captured(GenerateOutcome::NoTarget) => {
                    return Err(AppError::Other("nothing to share".to_string()));
                }
                ShareOutcome::Opened(url) => {
                    if !*print_only {
                        success(format!("WhatsApp link opened: {url}"));
                    }
                    return Ok(());
                }
            }
        }
    }
    Ok(())
}
