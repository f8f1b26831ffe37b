use thiserror::Error;

/// Unified error type for bump-version operations
#[derive(Error, Debug)]
pub enum BumpError {
    #[error("Malformed version tag '{tag}': {reason}")]
    MalformedInput { tag: String, reason: String },

    #[error("{0:?} is not a valid strategy")]
    InvalidStrategy(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("{operation} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Output error: {0}")]
    Output(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in bump-version
pub type Result<T> = std::result::Result<T, BumpError>;

impl BumpError {
    /// Create a malformed-input error for a tag that failed to parse
    pub fn malformed(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        BumpError::MalformedInput {
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        BumpError::Version(msg.into())
    }

    /// Create an output error with context
    pub fn output(msg: impl Into<String>) -> Self {
        BumpError::Output(msg.into())
    }

    /// Whether retrying the failed operation may succeed.
    ///
    /// Only network-level git failures qualify. A bad tag, a bad strategy or
    /// a missing remote will fail the same way on every attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            BumpError::Git(e) => matches!(
                e.class(),
                git2::ErrorClass::Net | git2::ErrorClass::Http | git2::ErrorClass::Ssh
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BumpError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_malformed_input_display() {
        let err = BumpError::malformed("vX.Y", "unexpected character");
        let msg = err.to_string();
        assert!(msg.starts_with("Malformed version tag"));
        assert!(msg.contains("vX.Y"));
        assert!(msg.contains("unexpected character"));
    }

    #[test]
    fn test_invalid_strategy_display() {
        let err = BumpError::InvalidStrategy("bump_everything".to_string());
        assert_eq!(
            err.to_string(),
            "\"bump_everything\" is not a valid strategy"
        );
    }

    #[test]
    fn test_retries_exhausted_display() {
        let err = BumpError::RetriesExhausted {
            operation: "fetch tags from origin".to_string(),
            attempts: 3,
            last_error: "connection reset".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "fetch tags from origin failed after 3 attempts: connection reset"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BumpError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_transient_classification() {
        let net = git2::Error::new(
            git2::ErrorCode::GenericError,
            git2::ErrorClass::Net,
            "connection reset",
        );
        assert!(BumpError::Git(net).is_transient());

        let reference = git2::Error::new(
            git2::ErrorCode::NotFound,
            git2::ErrorClass::Reference,
            "no such ref",
        );
        assert!(!BumpError::Git(reference).is_transient());

        assert!(!BumpError::malformed("x", "y").is_transient());
        assert!(!BumpError::config("x").is_transient());
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (BumpError::config("x"), "Configuration error"),
            (BumpError::version("x"), "Version error"),
            (BumpError::output("x"), "Output error"),
            (BumpError::malformed("x", "y"), "Malformed version tag"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
