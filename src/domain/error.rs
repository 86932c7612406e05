use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Retrieval error: {message}")]
    Retrieval { message: String },

    #[error("Generation error: {message}")]
    Generation { message: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Link resolution error: {message}")]
    LinkResolution { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval {
            message: message.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn link_resolution(message: impl Into<String>) -> Self {
        Self::LinkResolution {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error aborts the current conversation turn.
    ///
    /// Link resolution failures only degrade citation rendering.
    pub fn is_fatal_to_turn(&self) -> bool {
        !matches!(self, Self::LinkResolution { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_error_display() {
        let error = DomainError::retrieval("knowledge base unavailable");
        assert_eq!(
            error.to_string(),
            "Retrieval error: knowledge base unavailable"
        );
        assert!(error.is_fatal_to_turn());
    }

    #[test]
    fn test_generation_error_display() {
        let error = DomainError::generation("model timed out");
        assert_eq!(error.to_string(), "Generation error: model timed out");
        assert!(error.is_fatal_to_turn());
    }

    #[test]
    fn test_link_resolution_is_not_fatal() {
        let error = DomainError::link_resolution("credentials missing");
        assert!(!error.is_fatal_to_turn());
    }

    #[test]
    fn test_validation_error_display() {
        let error = DomainError::validation("question must not be empty");
        assert_eq!(
            error.to_string(),
            "Validation error: question must not be empty"
        );
    }
}
