use thiserror::Error;
use valuator_core::{ApiError, HttpError, NormalizeError, PipelineError, ValidationError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Transport(#[from] HttpError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl From<PipelineError> for CliError {
    fn from(value: PipelineError) -> Self {
        match value {
            PipelineError::Api(error) => Self::Api(error),
            PipelineError::Normalize(error) => Self::Normalize(error),
        }
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Serialization(_) => 4,
            Self::Api(ApiError::Decode { .. }) => 8,
            Self::Api(_) | Self::Transport(_) => 7,
            Self::Normalize(_) => 9,
        }
    }
}
