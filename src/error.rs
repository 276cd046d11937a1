use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Invalid FHIR Bundle: {message}")]
    InvalidBundle { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntakeError {
    pub fn invalid_bundle(message: impl Into<String>) -> Self {
        Self::InvalidBundle {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IntakeError>;
