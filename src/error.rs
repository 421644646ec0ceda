use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort extraction of a single document (or, for selectors, a run).
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("marker {marker:?} not found in any text node")]
    MissingMarker { marker: String },

    #[error("invalid selector for `{field}`: {reason}")]
    InvalidSelector { field: &'static str, reason: String },
}
