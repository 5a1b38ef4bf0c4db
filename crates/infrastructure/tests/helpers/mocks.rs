#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_named_application::ports::{InterfaceMonitor, UpstreamSession, UpstreamTransport};
use ferrous_named_domain::DomainError;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Upstream that answers every exchange with a fixed reply, or times out
/// immediately when none is set.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    reply: Arc<Mutex<Option<Vec<u8>>>>,
    sent: Arc<Mutex<Vec<(SocketAddr, Vec<u8>)>>>,
}

impl ScriptedTransport {
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn answering(reply: &[u8]) -> Self {
        let transport = Self::default();
        *transport.reply.lock().unwrap() = Some(reply.to_vec());
        transport
    }

    pub fn sent(&self) -> Vec<(SocketAddr, Vec<u8>)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamTransport for ScriptedTransport {
    async fn open_session(&self) -> Result<Box<dyn UpstreamSession>, DomainError> {
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl UpstreamSession for ScriptedTransport {
    async fn exchange(
        &mut self,
        server: SocketAddr,
        query: &[u8],
        _timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        self.sent.lock().unwrap().push((server, query.to_vec()));
        self.reply
            .lock()
            .unwrap()
            .clone()
            .ok_or(DomainError::TransportTimeout {
                server: server.to_string(),
            })
    }
}

pub struct DownInterfaceMonitor;

impl InterfaceMonitor for DownInterfaceMonitor {
    fn interface_address(&self, _name: &str) -> Result<Option<Ipv4Addr>, DomainError> {
        Ok(None)
    }
}
