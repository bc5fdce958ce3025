use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Bank details printed under "Payment Information".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaymentInfo {
    #[serde(default)]
    pub bank: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub holder: String,
}

/// Person signing the invoice, with an optional signature image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Signatory {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub signature: Option<PathBuf>,
}

impl Default for Signatory {
    fn default() -> Self {
        Self {
            name: String::new(),
            role: default_role(),
            signature: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureConfig {
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default = "default_true")]
    pub paper_finish: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            paper_finish: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_title")]
    pub invoice_title: String,
    #[serde(default = "default_invoice_number")]
    pub invoice_number: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub payment: PaymentInfo,
    #[serde(default)]
    pub signatory: Signatory,
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default = "default_page_margin")]
    pub page_margin: f32,
    #[serde(default = "default_preview_zoom")]
    pub preview_zoom: u8,
    #[serde(default)]
    pub preview_grace_secs: u64,
    #[serde(default)]
    pub open_preview: bool,
}

fn default_title() -> String {
    "INVOICE".to_string()
}
fn default_invoice_number() -> String {
    "INV-0001".to_string()
}
fn default_currency() -> String {
    "RM".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_role() -> String {
    "Treasurer".to_string()
}
fn default_share_base_url() -> String {
    "https://wa.me/".to_string()
}
fn default_scale() -> f32 {
    2.0
}
fn default_true() -> bool {
    true
}
fn default_page_margin() -> f32 {
    40.0
}
fn default_preview_zoom() -> u8 {
    75
}

impl Default for Config {
    fn default() -> Self {
        Self {
            invoice_title: default_title(),
            invoice_number: default_invoice_number(),
            currency: default_currency(),
            output_dir: default_output_dir(),
            payment: PaymentInfo::default(),
            signatory: Signatory::default(),
            share_base_url: default_share_base_url(),
            capture: CaptureConfig::default(),
            page_margin: default_page_margin(),
            preview_zoom: default_preview_zoom(),
            preview_grace_secs: 0,
            open_preview: false,
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rinvoice")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rinvoice.conf")
    }

    /// Load configuration from the default location, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    /// Load configuration from an explicit file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write the configuration as YAML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    fn validate(&self) -> AppResult<()> {
        if !(self.capture.scale.is_finite() && self.capture.scale > 0.0) {
            return Err(AppError::Config(format!(
                "capture.scale must be a positive number (got {})",
                self.capture.scale
            )));
        }
        if !(self.page_margin.is_finite() && self.page_margin >= 0.0) {
            return Err(AppError::Config(format!(
                "page_margin must not be negative (got {})",
                self.page_margin
            )));
        }
        Ok(())
    }
}
