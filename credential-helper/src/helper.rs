//! The credential backend interface.

use async_trait::async_trait;
use credential_protocol::Message;
use std::convert::Infallible;

/// A credential backend.
///
/// Dropping a returned future cancels the operation; implementations that
/// block on I/O should enforce their own timeouts and report expiry through
/// [`Helper::Error`].
#[async_trait]
pub trait Helper: Send + Sync {
    /// Error reported by this backend. Passed to the caller unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Looks up the credential for a partially filled request.
    ///
    /// Must fail, rather than return an incomplete message, when no
    /// credential matches.
    async fn retrieve(&self, input: Message) -> Result<Message, Self::Error>;

    /// Records that a credential was accepted.
    async fn store(&self, input: Message) -> Result<(), Self::Error>;

    /// Records that a credential was rejected and should be forgotten.
    async fn erase(&self, input: Message) -> Result<(), Self::Error>;
}

/// A backend that does nothing.
///
/// `retrieve` echoes the request and `store`/`erase` succeed without effect,
/// which makes it a valid stand-in for any backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHelper;

#[async_trait]
impl Helper for NullHelper {
    type Error = Infallible;

    async fn retrieve(&self, input: Message) -> Result<Message, Self::Error> {
        Ok(input)
    }

    async fn store(&self, _input: Message) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn erase(&self, _input: Message) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[async_trait]
impl<H: Helper + ?Sized> Helper for std::sync::Arc<H> {
    type Error = H::Error;

    async fn retrieve(&self, input: Message) -> Result<Message, Self::Error> {
        (**self).retrieve(input).await
    }

    async fn store(&self, input: Message) -> Result<(), Self::Error> {
        (**self).store(input).await
    }

    async fn erase(&self, input: Message) -> Result<(), Self::Error> {
        (**self).erase(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credential_protocol::Field;
    use std::sync::Arc;

    fn request() -> Message {
        Message::new()
            .with(Field::Protocol, "https")
            .with(Field::Host, "example.com")
            .with(Field::Path, "org/repo.git")
    }

    #[tokio::test]
    async fn test_null_retrieve_is_identity() {
        let helper = NullHelper;
        assert_eq!(helper.retrieve(request()).await.unwrap(), request());
        assert_eq!(helper.retrieve(Message::new()).await.unwrap(), Message::new());
    }

    #[tokio::test]
    async fn test_null_store_and_erase_succeed() {
        let helper = NullHelper;
        assert!(helper.store(request()).await.is_ok());
        assert!(helper.erase(request()).await.is_ok());
    }

    #[tokio::test]
    async fn test_shared_helper() {
        let helper = Arc::new(NullHelper);
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let helper = helper.clone();
                tokio::spawn(async move {
                    let msg = Message::new().with(Field::Host, format!("host-{}", i));
                    helper.retrieve(msg).await.unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.unwrap().host, format!("host-{}", i));
        }
    }
}
