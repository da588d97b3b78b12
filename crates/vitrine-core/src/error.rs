use thiserror::Error;

/// Top-level error type for the Vitrine storefront client.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From` conversions so that the `?`
/// operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VitrineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("Cart error: {0}")]
    Cart(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for VitrineError {
    fn from(err: toml::de::Error) -> Self {
        VitrineError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for VitrineError {
    fn from(err: toml::ser::Error) -> Self {
        VitrineError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for VitrineError {
    fn from(err: serde_json::Error) -> Self {
        VitrineError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Vitrine operations.
pub type Result<T> = std::result::Result<T, VitrineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VitrineError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");

        let err = VitrineError::Backend("connection refused".to_string());
        assert_eq!(err.to_string(), "Backend error: connection refused");

        let err = VitrineError::Chat("session vanished".to_string());
        assert_eq!(err.to_string(), "Chat error: session vanished");

        let err = VitrineError::Cart("stock fetch failed".to_string());
        assert_eq!(err.to_string(), "Cart error: stock fetch failed");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: VitrineError = io_err.into();
        assert!(matches!(err, VitrineError::Io(_)));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_err = toml::from_str::<toml::Value>("not = = valid").unwrap_err();
        let err: VitrineError = toml_err.into();
        assert!(matches!(err, VitrineError::Config(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{broken").unwrap_err();
        let err: VitrineError = json_err.into();
        assert!(matches!(err, VitrineError::Serialization(_)));
    }
}
