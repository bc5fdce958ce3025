//! Export flow: capture → compose → preview → save or cancel, plus sharing.
//!
//! The controller owns the retained document and its preview file. Its
//! state sits behind a mutex that is never held across an await, so a
//! second export started while a capture is running sees the `Capturing`
//! phase and is turned away.

use super::pdf::{ExportArtifact, PageComposer, PageSpec};
use super::preview::{PreviewHandle, PreviewInfo};
use super::save::{SaveMechanism, export_file_name, save_document};
use super::share::{Launcher, compose_message, share_url};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::InvoiceSummary;
use crate::render::raster::CloneHook;
use crate::render::{BitmapCapture, CaptureOptions, InvoiceView, RasterCapture, paper_finish};
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub capture: CaptureOptions,
    pub page: PageSpec,
    pub preview_zoom: u8,
    pub preview_grace: Duration,
    pub currency: String,
    pub share_base_url: String,
}

impl ExportSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            capture: CaptureOptions {
                scale: cfg.capture.scale,
                on_clone: cfg.capture.paper_finish.then_some(paper_finish as CloneHook),
                ..CaptureOptions::default()
            },
            page: PageSpec::a4(cfg.page_margin),
            preview_zoom: cfg.preview_zoom,
            preview_grace: Duration::from_secs(cfg.preview_grace_secs),
            currency: cfg.currency.clone(),
            share_base_url: cfg.share_base_url.clone(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// What the user can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Previewing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Capturing,
    Previewing,
}

#[derive(Debug)]
struct Slot {
    phase: Phase,
    artifact: Option<ExportArtifact>,
    preview: Option<PreviewHandle>,
    /// Delayed preview deletions still waiting for their grace period.
    pending: Vec<JoinHandle<()>>,
}

impl Slot {
    fn release_preview(&mut self, grace: Duration) {
        self.pending.retain(|task| !task.is_finished());
        if let Some(handle) = self.preview.take() {
            self.pending.extend(handle.revoke_after(grace));
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// No region was handed over; nothing changed.
    NoTarget,
    Previewing(PreviewInfo),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShareOutcome {
    /// There was no document yet, so one was generated instead of sharing.
    /// Call share again once the user has seen it.
    Captured(GenerateOutcome),
    /// The messaging link that was opened.
    Opened(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedExport {
    pub path: PathBuf,
    pub mechanism: SaveMechanism,
}

/// Puts the phase back to idle if a capture future is dropped half-way.
struct CaptureGuard<'a> {
    slot: &'a Mutex<Slot>,
    armed: bool,
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut slot = self.slot.lock();
            if slot.phase == Phase::Capturing {
                slot.phase = Phase::Idle;
            }
        }
    }
}

pub struct ExportController<C: RasterCapture = BitmapCapture> {
    capture: C,
    settings: ExportSettings,
    slot: Mutex<Slot>,
}

impl ExportController<BitmapCapture> {
    pub fn with_config(cfg: &Config) -> Self {
        Self::new(BitmapCapture, ExportSettings::from_config(cfg))
    }
}

impl<C: RasterCapture> ExportController<C> {
    pub fn new(capture: C, settings: ExportSettings) -> Self {
        Self {
            capture,
            settings,
            slot: Mutex::new(Slot {
                phase: Phase::Idle,
                artifact: None,
                preview: None,
                pending: Vec::new(),
            }),
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn state(&self) -> ExportState {
        match self.slot.lock().phase {
            Phase::Previewing => ExportState::Previewing,
            Phase::Idle | Phase::Capturing => ExportState::Idle,
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.slot.lock().phase == Phase::Capturing
    }

    pub fn has_artifact(&self) -> bool {
        self.slot.lock().artifact.is_some()
    }

    pub fn preview_path(&self) -> Option<PathBuf> {
        self.slot
            .lock()
            .preview
            .as_ref()
            .map(|p| p.path().to_path_buf())
    }

    /// Capture `region`, build the one-page PDF and open a preview of it.
    ///
    /// On failure the error is logged and returned; the controller ends up
    /// idle with no document.
    pub async fn generate_export(&self, region: Option<&InvoiceView>) -> AppResult<GenerateOutcome> {
        let Some(view) = region else {
            log::debug!("export requested without an invoice region");
            return Ok(GenerateOutcome::NoTarget);
        };

        {
            let mut slot = self.slot.lock();
            if slot.phase == Phase::Capturing {
                log::warn!("export of '{}' rejected: capture already running", view.id);
                return Err(AppError::ExportInProgress);
            }
            slot.phase = Phase::Capturing;
        }
        let mut guard = CaptureGuard {
            slot: &self.slot,
            armed: true,
        };

        let built = self.build(view).await;
        guard.armed = false;

        let mut slot = self.slot.lock();
        match built {
            Ok((artifact, handle)) => {
                let info = handle.info(&artifact, self.settings.preview_zoom);
                slot.release_preview(Duration::ZERO);
                slot.preview = Some(handle);
                slot.artifact = Some(artifact);
                slot.phase = Phase::Previewing;
                Ok(GenerateOutcome::Previewing(info))
            }
            Err(e) => {
                log::error!("Error generating PDF: {e}");
                slot.release_preview(Duration::ZERO);
                slot.artifact = None;
                slot.phase = Phase::Idle;
                Err(e)
            }
        }
    }

    async fn build(&self, view: &InvoiceView) -> AppResult<(ExportArtifact, PreviewHandle)> {
        let image = self.capture.capture(view, &self.settings.capture).await?;
        let title = format!("Invoice {}", view.invoice_number);
        let artifact = PageComposer::new(self.settings.page).compose(&image, &title)?;
        let handle = PreviewHandle::create(&artifact)?;
        Ok((artifact, handle))
    }

    /// Save the retained document into `dir` and close the preview.
    /// Returns `Ok(None)` when there is nothing to save.
    pub fn confirm_export(
        &self,
        summary: &InvoiceSummary,
        date: NaiveDate,
        dir: &Path,
        force: bool,
    ) -> AppResult<Option<SavedExport>> {
        let mut slot = self.slot.lock();
        if slot.phase == Phase::Capturing {
            return Err(AppError::ExportInProgress);
        }
        let Some(artifact) = slot.artifact.take() else {
            return Ok(None);
        };

        let name = export_file_name(&summary.recipient_name, date);
        match save_document(dir, &name, artifact.bytes(), force) {
            Ok((path, mechanism)) => {
                log::info!("saved {} ({:?})", path.display(), mechanism);
                slot.release_preview(self.settings.preview_grace);
                slot.phase = Phase::Idle;
                Ok(Some(SavedExport { path, mechanism }))
            }
            Err(e) => {
                // keep the document so the user can retry
                slot.artifact = Some(artifact);
                Err(e)
            }
        }
    }

    /// Close the preview. The document is kept for [`Self::reopen_preview`].
    pub fn cancel_export(&self) {
        let mut slot = self.slot.lock();
        slot.release_preview(Duration::ZERO);
        if slot.phase == Phase::Previewing {
            slot.phase = Phase::Idle;
        }
    }

    /// Preview the retained document again without recapturing.
    pub fn reopen_preview(&self) -> AppResult<Option<PreviewInfo>> {
        let mut guard = self.slot.lock();
        let slot = &mut *guard;
        if slot.phase == Phase::Capturing {
            return Err(AppError::ExportInProgress);
        }
        let Some(artifact) = slot.artifact.as_ref() else {
            return Ok(None);
        };

        if slot.preview.is_none() {
            slot.preview = Some(PreviewHandle::create(artifact)?);
        }
        let info = slot
            .preview
            .as_ref()
            .map(|h| h.info(artifact, self.settings.preview_zoom));
        slot.phase = Phase::Previewing;
        Ok(info)
    }

    /// Wait for every delayed preview deletion to finish. A caller about to
    /// drop its runtime calls this first, otherwise the deletions are lost.
    pub async fn settle(&self) {
        let pending = std::mem::take(&mut self.slot.lock().pending);
        for task in pending {
            if let Err(e) = task.await {
                log::warn!("preview release task failed: {e}");
            }
        }
    }

    /// Forget the retained document, e.g. because the draft changed.
    pub fn discard(&self) {
        let mut slot = self.slot.lock();
        slot.release_preview(Duration::ZERO);
        slot.artifact = None;
        if slot.phase == Phase::Previewing {
            slot.phase = Phase::Idle;
        }
    }

    /// Open the messaging link for `summary`, or generate the document first
    /// when none exists yet.
    pub async fn share_via_messaging(
        &self,
        region: Option<&InvoiceView>,
        summary: &InvoiceSummary,
        launcher: &dyn Launcher,
    ) -> AppResult<ShareOutcome> {
        if !self.has_artifact() {
            let outcome = self.generate_export(region).await?;
            return Ok(ShareOutcome::Captured(outcome));
        }

        let message = compose_message(summary, &self.settings.currency);
        let url = share_url(&self.settings.share_base_url, &message);
        launcher.open(&url)?;
        Ok(ShareOutcome::Opened(url))
    }
}
