use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `init` command
///
/// Writes a configuration file filled with defaults, at the `--config`
/// location when given, in the platform config directory otherwise.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let force = matches!(cli.command, Commands::Init { force: true });
    let path = cli.config.clone().unwrap_or_else(Config::config_file);

    if path.exists() && !force {
        warning(format!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        ));
        return Ok(());
    }

    Config::default().save_to(&path)?;
    success(format!("Config file: {}", path.display()));
    info("Edit invoice title, payment details and signatory with `rinvoice config --edit`.");
    Ok(())
}
