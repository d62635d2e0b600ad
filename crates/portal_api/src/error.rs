use shared::error::{ApiError, ErrorCode};
use storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("tracking id '{0}' not found")]
    TrackingNotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("submission cancelled")]
    Cancelled,
    #[error("transport failure: {0}")]
    Transport(String),
}

impl PortalError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PortalError::MissingFields(_) | PortalError::InvalidField { .. } => {
                ErrorCode::Validation
            }
            PortalError::TrackingNotFound(_) => ErrorCode::NotFound,
            PortalError::Store(_) => ErrorCode::Configuration,
            PortalError::Cancelled => ErrorCode::Cancelled,
            PortalError::Transport(_) => ErrorCode::Internal,
        }
    }
}

impl From<PortalError> for ApiError {
    fn from(value: PortalError) -> Self {
        ApiError::new(value.code(), value.to_string())
    }
}

impl From<&PortalError> for ApiError {
    fn from(value: &PortalError) -> Self {
        ApiError::new(value.code(), value.to_string())
    }
}
