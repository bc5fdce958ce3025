//! Unified application error type.
//! Every module (models, core, export, cli) returns AppError so that the
//! CLI can report failures in one place.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Draft file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid line item: {0}")]
    InvalidItem(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Invoice capture failed: {0}")]
    Capture(String),

    #[error("PDF composition failed: {0}")]
    Compose(String),

    #[error("The file '{}' already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("An export is already in progress")]
    ExportInProgress,

    #[error("Unable to open '{target}': {reason}")]
    Launch { target: String, reason: String },

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
