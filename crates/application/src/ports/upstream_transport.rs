use async_trait::async_trait;
use ferrous_named_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;

#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    /// Opens the outbound channel used for every attempt of one referral.
    async fn open_session(&self) -> Result<Box<dyn UpstreamSession>, DomainError>;
}

/// One outbound socket. Dropping the session closes it.
#[async_trait]
pub trait UpstreamSession: Send {
    /// Sends `query` to `server` and waits up to `timeout` for a reply.
    ///
    /// A reply to an earlier exchange on the same session that arrives late
    /// is an acceptable answer.
    async fn exchange(
        &mut self,
        server: SocketAddr,
        query: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError>;
}
