//! UDP transport for referred queries (RFC 1035 §4.2.1)
//!
//! One ephemeral socket per referral, reused across every retry so that a
//! reply arriving after its own attempt timed out can still be accepted.

use async_trait::async_trait;
use ferrous_named_application::ports::{UpstreamSession, UpstreamTransport};
use ferrous_named_domain::dns_protocol::MAX_PACKET_SIZE;
use ferrous_named_domain::DomainError;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Receive buffer; larger than any accepted reply so oversize is detectable.
const RECV_BUFFER_SIZE: usize = 4096;

pub struct UdpTransport {
    bind_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new() -> Self {
        Self::with_bind_addr(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)))
    }

    pub fn with_bind_addr(bind_addr: SocketAddr) -> Self {
        Self { bind_addr }
    }
}

impl Default for UdpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamTransport for UdpTransport {
    async fn open_session(&self) -> Result<Box<dyn UpstreamSession>, DomainError> {
        let socket = UdpSocket::bind(self.bind_addr)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {}", e)))?;
        Ok(Box::new(UdpSession { socket }))
    }
}

pub struct UdpSession {
    socket: UdpSocket,
}

impl UdpSession {
    pub fn local_addr(&self) -> Result<SocketAddr, DomainError> {
        self.socket
            .local_addr()
            .map_err(|e| DomainError::IoError(e.to_string()))
    }
}

#[async_trait]
impl UpstreamSession for UdpSession {
    async fn exchange(
        &mut self,
        server: SocketAddr,
        query: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        let bytes_sent = self
            .socket
            .send_to(query, server)
            .await
            .map_err(|e| DomainError::TransportError {
                server: server.to_string(),
                reason: e.to_string(),
            })?;

        debug!(server = %server, bytes_sent = bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; RECV_BUFFER_SIZE];
        let (bytes_received, from_addr) =
            tokio::time::timeout(timeout, self.socket.recv_from(&mut recv_buf))
                .await
                .map_err(|_| DomainError::TransportTimeout {
                    server: server.to_string(),
                })?
                .map_err(|e| DomainError::TransportError {
                    server: server.to_string(),
                    reason: e.to_string(),
                })?;

        if from_addr.ip() != server.ip() {
            warn!(
                expected = %server,
                received_from = %from_addr,
                "UDP response from unexpected source"
            );
        }

        if bytes_received > MAX_PACKET_SIZE {
            return Err(DomainError::TransportError {
                server: server.to_string(),
                reason: format!("oversized reply of {} bytes", bytes_received),
            });
        }

        recv_buf.truncate(bytes_received);

        debug!(
            server = %server,
            bytes_received = bytes_received,
            "UDP response received"
        );

        Ok(recv_buf)
    }
}
