use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Unavailable: {message}")]
    Unavailable { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Blob store error: {message}")]
    Blob { message: String },
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn blob(message: impl Into<String>) -> Self {
        Self::Blob {
            message: message.into(),
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// The human readable message without the category prefix
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput { message }
            | Self::NotFound { message }
            | Self::Unavailable { message }
            | Self::Storage { message }
            | Self::Blob { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Model ID must be provided");
        assert_eq!(error.to_string(), "Not found: Model ID must be provided");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_invalid_input_error() {
        let error = DomainError::invalid_input("A model with name a already exists");
        assert_eq!(
            error.to_string(),
            "Invalid input: A model with name a already exists"
        );
        assert!(error.is_invalid_input());
        assert_eq!(error.message(), "A model with name a already exists");
    }

    #[test]
    fn test_unavailable_error() {
        let error = DomainError::unavailable("Database client not available");
        assert_eq!(
            error.to_string(),
            "Unavailable: Database client not available"
        );
        assert!(error.is_unavailable());
        assert!(!error.is_not_found());
    }
}
