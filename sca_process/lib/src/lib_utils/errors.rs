
// error kinds shared by every stage of the pipeline


use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaError {
    /// Malformed or empty alignment, invalid filter parameters
    #[error("Input error: {0}")]
    Input(String),

    /// No usable reference sequence could be resolved
    #[error("Reference resolution failed while {stage}: {reason}")]
    ReferenceResolution {
        stage: &'static str,
        reason: ResolutionFailure,
    },

    /// Mutually exclusive or missing options
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Workspace export error: {0}")]
    Csv(#[from] csv::Error),
}

/// Why a reference strategy failed. Only `NoMatch` is recoverable.
#[derive(Error, Debug)]
pub enum ResolutionFailure {
    #[error("no matching sequence found ({0})")]
    NoMatch(String),
    #[error("structure unavailable ({0})")]
    StructureUnavailable(String),
    #[error("reference index {index} out of range for {count} sequences")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("malformed reference sequence ({0})")]
    MalformedReference(String),
}

impl ScaError {
    pub fn input(message: impl Into<String>) -> Self {
        ScaError::Input(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        ScaError::Configuration(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScaError::Io { path: path.into(), source }
    }

    pub fn reference(stage: &'static str, reason: ResolutionFailure) -> Self {
        ScaError::ReferenceResolution { stage, reason }
    }

    /// True when a reference search simply found nothing, so a wider search may be tried
    pub fn is_no_match(&self) -> bool {
        matches!(
            self,
            ScaError::ReferenceResolution { reason: ResolutionFailure::NoMatch(_), .. }
        )
    }
}

pub type ScaResult<T> = Result<T, ScaError>;
