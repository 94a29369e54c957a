//! Crate-level error types.
//!
//! Only setup paths (options, state snapshots) return these. The per-tick
//! path never fails; collaborator errors are [`HostError`](crate::host::HostError)
//! values that get logged and skipped.

use std::fmt;

/// Errors produced by the splat-gallery crate.
#[derive(Debug)]
pub enum GalleryError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Rotation state snapshot parsing/serialization failure.
    StateParse(serde_json::Error),
}

impl fmt::Display for GalleryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::StateParse(e) => write!(f, "state snapshot error: {e}"),
        }
    }
}

impl std::error::Error for GalleryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::StateParse(e) => Some(e),
            Self::OptionsParse(_) => None,
        }
    }
}

impl From<std::io::Error> for GalleryError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for GalleryError {
    fn from(e: serde_json::Error) -> Self {
        Self::StateParse(e)
    }
}
