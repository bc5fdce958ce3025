use crate::errors::{AppError, AppResult};
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tempfile::NamedTempFile;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// `Invoice<RecipientWithoutWhitespace>_<YYMMDD>.pdf`, with "Untitled" for
/// a blank recipient.
pub fn export_file_name(recipient: &str, date: chrono::NaiveDate) -> String {
    let clean = WHITESPACE.replace_all(recipient, "");
    let name = if clean.is_empty() { "Untitled" } else { clean.as_ref() };
    format!("Invoice{}_{}.pdf", name, crate::utils::date::yymmdd(date))
}

/// How a document reaches the destination directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMechanism {
    /// Written to a temp file inside the destination, then renamed into place.
    Native,
    /// Written straight to the final path.
    DirectWrite,
}

/// Checks whether the destination supports the native mechanism by
/// creating the staging file it needs.
fn stage_in(dir: &Path) -> Option<NamedTempFile> {
    match tempfile::Builder::new()
        .prefix(".rinvoice-")
        .suffix(".part")
        .tempfile_in(dir)
    {
        Ok(f) => Some(f),
        Err(e) => {
            log::debug!("no staging file in {}: {}", dir.display(), e);
            None
        }
    }
}

/// Save `bytes` as `dir/file_name` and report which mechanism was used.
///
/// An existing file is only replaced with `force`; asking the user about it
/// is up to the caller.
pub fn save_document(
    dir: &Path,
    file_name: &str,
    bytes: &[u8],
    force: bool,
) -> AppResult<(PathBuf, SaveMechanism)> {
    fs::create_dir_all(dir)?;
    let target = dir.join(file_name);
    if target.exists() && !force {
        return Err(AppError::AlreadyExists(target));
    }

    match stage_in(dir) {
        Some(mut staged) => {
            staged.write_all(bytes)?;
            staged.flush()?;
            staged
                .persist(&target)
                .map_err(|e| AppError::Io(e.error))?;
            Ok((target, SaveMechanism::Native))
        }
        None => {
            fs::write(&target, bytes)?;
            Ok((target, SaveMechanism::DirectWrite))
        }
    }
}
