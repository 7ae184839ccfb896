use std::path::PathBuf;
use thiserror::Error;

/// Error types for the skyfit-rs library.
#[derive(Error, Debug)]
pub enum SkyFitError {
    /// Error indicating a mismatch in array dimensions.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Error for parameter-related problems.
    #[error("Parameter error: {0}")]
    ParameterError(#[from] crate::parameters::ParameterError),

    /// Parameter not found.
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    /// An input file is missing or cannot be read.
    #[error("{kind} {} does not exist or is not readable", path.display())]
    FileNotReadable { kind: &'static str, path: PathBuf },

    /// Invalid plugin configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A full-sky analysis was requested without a region of interest.
    #[error("You have to define a ROI with the set_roi method")]
    MissingRegionOfInterest,

    /// The plugin has not been given a likelihood model yet.
    #[error("Plugin '{0}' has no analysis backend; call set_model first")]
    NotInstanced(String),

    /// Failure reported by the native analysis backend.
    #[error("Analysis backend error: {0}")]
    Backend(String),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<crate::parameters::BoundsError> for SkyFitError {
    fn from(err: crate::parameters::BoundsError) -> Self {
        SkyFitError::ParameterError(err.into())
    }
}

/// Result type alias for skyfit-rs operations.
pub type Result<T> = std::result::Result<T, SkyFitError>;
