use super::pdf::ExportArtifact;
use crate::errors::AppResult;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempPath;
use tokio::task::JoinHandle;

/// Revocable local reference to an artifact: a temporary PDF file that is
/// deleted when the handle is revoked or dropped.
#[derive(Debug)]
pub struct PreviewHandle {
    path: TempPath,
}

/// What the preview dialog shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewInfo {
    pub path: PathBuf,
    pub zoom_percent: u8,
    pub image_size: (u32, u32),
    pub page_size: (f32, f32),
}

impl PreviewHandle {
    pub fn create(artifact: &ExportArtifact) -> AppResult<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("invoice-preview-")
            .suffix(".pdf")
            .tempfile()?;
        file.write_all(artifact.bytes())?;
        file.flush()?;

        let path = file.into_temp_path();
        log::debug!("preview written to {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&self, artifact: &ExportArtifact, zoom_percent: u8) -> PreviewInfo {
        PreviewInfo {
            path: self.path.to_path_buf(),
            zoom_percent,
            image_size: artifact.image_size,
            page_size: (artifact.page.width, artifact.page.height),
        }
    }

    /// Delete the preview file now.
    pub fn revoke(self) {
        let shown = self.path.display().to_string();
        if let Err(e) = self.path.close() {
            log::warn!("could not remove preview {}: {}", shown, e);
        }
    }

    /// Delete the preview file once `grace` has elapsed, so a slow viewer
    /// still gets to open it. The returned task must be driven by a runtime
    /// that keeps running (or awaited) for the deletion to happen. Without a
    /// runtime, or with a zero grace period, the file is removed immediately.
    pub fn revoke_after(self, grace: Duration) -> Option<JoinHandle<()>> {
        if grace.is_zero() {
            self.revoke();
            return None;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(rt) => Some(rt.spawn(async move {
                tokio::time::sleep(grace).await;
                self.revoke();
            })),
            Err(_) => {
                self.revoke();
                None
            }
        }
    }
}
