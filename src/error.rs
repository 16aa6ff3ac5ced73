//! Error types for cycle processing
//!
//! Errors are classified by blast radius:
//! - Artifact errors (missing/corrupt workbook, empty revision list) abort
//!   the whole cycle. The workbook on disk is only rewritten at the final
//!   persist step, so an abort leaves the original artifact untouched.
//! - Input shape and per-item errors never reach this enum: they are
//!   recovered locally with defaults or a skip-and-warn.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors for one processing cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("artifact not found: {0}")]
    ArtifactMissing(PathBuf),

    #[error("failed to open artifact {path}: {message}")]
    ArtifactOpen { path: PathBuf, message: String },

    #[error("artifact has no revision sheets")]
    NoRevisions,

    #[error("failed to duplicate revision into {label}: {message}")]
    Duplicate { label: String, message: String },

    #[error("failed to write artifact {path}: {message}")]
    ArtifactWrite { path: PathBuf, message: String },

    #[error("failed to parse meeting data: {0}")]
    Parse(String),

    #[error("artifact download failed: {0}")]
    Download(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
