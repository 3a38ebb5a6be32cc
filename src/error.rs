use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Errors surfaced by the dashboard engine.
///
/// Only [`DashboardError::DataUnavailable`] is fatal: it is raised while the
/// booking table is loaded at startup. Filter problems are absorbed by the
/// filter layer and empty views are never errors.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The configured source is missing, unreadable or malformed.
    #[error("booking data unavailable at {}: {reason}", .path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    /// A filter parameter did not parse against its column type.
    #[error("invalid value {value:?} for filter '{field}'")]
    InvalidFilterValue { field: &'static str, value: String },

    /// A report name that is not part of the report menu.
    #[error("unknown report '{0}'")]
    UnknownReport(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

impl DashboardError {
    /// Wrap a loader failure, keeping the whole `anyhow` context chain.
    pub fn unavailable(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        DashboardError::DataUnavailable {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }
}
