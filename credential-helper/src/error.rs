//! Helper error types.

use thiserror::Error;

/// Boxed backend error, as carried by [`HelperError::Backend`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by [`run_helper`](crate::run_helper).
///
/// Nothing here adds context: every variant displays exactly as its source.
#[derive(Debug, Error)]
pub enum HelperError {
    #[error(transparent)]
    Protocol(#[from] credential_protocol::ProtocolError),

    #[error("invalid command specified: {0}")]
    UnsupportedCommand(String),

    #[error(transparent)]
    Backend(BoxError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HelperError {
    /// Wraps a backend error without altering it.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HelperError::Backend(Box::new(err))
    }

    /// Returns the backend error as its concrete type, if it is one.
    pub fn backend_error<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            HelperError::Backend(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credential_protocol::ProtocolError;

    #[derive(Debug, Error, PartialEq)]
    #[error("host not found")]
    struct NotFound;

    #[test]
    fn test_display_is_verbatim() {
        let err = HelperError::from(ProtocolError::UnknownKey("bogus".to_string()));
        assert_eq!(err.to_string(), "invalid credential key: bogus");

        let err = HelperError::backend(NotFound);
        assert_eq!(err.to_string(), "host not found");

        let err = HelperError::UnsupportedCommand("list".to_string());
        assert_eq!(err.to_string(), "invalid command specified: list");
    }

    #[test]
    fn test_backend_error_downcast() {
        let err = HelperError::backend(NotFound);
        assert_eq!(err.backend_error::<NotFound>(), Some(&NotFound));
        assert!(err.backend_error::<std::io::Error>().is_none());

        let err = HelperError::UnsupportedCommand("list".to_string());
        assert!(err.backend_error::<NotFound>().is_none());
    }
}
