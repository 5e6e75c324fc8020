use thiserror::Error;

/// A remote record that cannot be turned into a local row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("invalid value for field '{field}': {message}")]
    InvalidField { field: String, message: String },
}

impl MapError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
