//! Error types for the conversation engine.

use vitrine_backend::BackendError;
use vitrine_core::VitrineError;

/// Errors from the conversation engine.
///
/// Backend failures during a send are deliberately NOT surfaced through this
/// type: the orchestrator converts them into in-conversation error content so
/// the exchange stays usable. What remains here are programming-level
/// failures and operations where propagation is the right call.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("store lock poisoned: {0}")]
    StoreLock(String),
}

impl From<ChatError> for VitrineError {
    fn from(err: ChatError) -> Self {
        VitrineError::Chat(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::MessageTooLong(2000);
        assert_eq!(
            err.to_string(),
            "message exceeds maximum length of 2000 characters"
        );

        let err = ChatError::StoreLock("poisoned".to_string());
        assert_eq!(err.to_string(), "store lock poisoned: poisoned");
    }

    #[test]
    fn test_from_backend_error() {
        let err: ChatError = BackendError::MissingData.into();
        assert!(matches!(err, ChatError::Backend(_)));
        assert!(err.to_string().contains("no data"));
    }

    #[test]
    fn test_into_vitrine_error() {
        let err: VitrineError = ChatError::MessageTooLong(10).into();
        assert!(matches!(err, VitrineError::Chat(_)));
    }
}
