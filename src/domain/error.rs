use thiserror::Error;

/// Errors surfaced by the persistence boundary
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Duplicate key: {message}")]
    DuplicateKey { message: String },

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Storage error: {message}")]
    Unknown { message: String },
}

impl StorageError {
    pub fn duplicate_key(message: impl Into<String>) -> Self {
        Self::DuplicateKey {
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// The bare message, without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            Self::DuplicateKey { message }
            | Self::Connection { message }
            | Self::Unknown { message } => message,
        }
    }

    /// Stable machine-readable code used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateKey { .. } => "duplicate_key",
            Self::Connection { .. } => "connection",
            Self::Unknown { .. } => "storage",
        }
    }

    /// Rebuild an error from a wire code and message
    pub fn from_code(code: Option<&str>, message: impl Into<String>) -> Self {
        match code {
            Some("duplicate_key") => Self::duplicate_key(message),
            Some("connection") => Self::connection(message),
            _ => Self::unknown(message),
        }
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}
