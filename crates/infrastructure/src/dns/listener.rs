use crate::dns::server::QueryDispatcher;
use ferrous_named_domain::dns_protocol::MAX_PACKET_SIZE;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

/// Larger than any accepted query so oversized datagrams can be spotted.
pub const RECV_BUFFER_SIZE: usize = 4096;

/// Receive loop of the server.
///
/// Each datagram gets a fresh buffer and its own task; the loop never waits
/// on a worker. Cancelling the token stops admission, after which the
/// loop waits for the tasks already running to send their replies.
pub struct UdpListener {
    socket: Arc<UdpSocket>,
    dispatcher: Arc<QueryDispatcher>,
    shutdown: CancellationToken,
    tracker: TaskTracker,
}

impl UdpListener {
    pub fn new(
        socket: UdpSocket,
        dispatcher: Arc<QueryDispatcher>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            socket: Arc::new(socket),
            dispatcher,
            shutdown,
            tracker: TaskTracker::new(),
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub async fn run(self) {
        match self.socket.local_addr() {
            Ok(addr) => info!(bind_address = %addr, "DNS listener ready"),
            Err(e) => warn!(error = %e, "DNS listener ready on unknown address"),
        }

        loop {
            let mut buf = vec![0u8; RECV_BUFFER_SIZE];

            let (len, from) = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown requested, no longer accepting queries");
                    break;
                }
                result = self.socket.recv_from(&mut buf) => match result {
                    Ok(received) => received,
                    Err(e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
                        ) =>
                    {
                        continue
                    }
                    Err(e) => {
                        error!(error = %e, "UDP recv error");
                        continue;
                    }
                },
            };

            if len > MAX_PACKET_SIZE {
                warn!(client = %from, bytes = len, "Dropping oversized datagram");
                continue;
            }
            buf.truncate(len);

            let dispatcher = self.dispatcher.clone();
            let socket = self.socket.clone();
            let shutdown = self.shutdown.clone();
            self.tracker.spawn(async move {
                let Some(reply) = dispatcher.handle(&buf, from).await else {
                    return;
                };
                match socket.send_to(&reply, from).await {
                    Ok(_) if shutdown.is_cancelled() => {
                        debug!(client = %from, "Reply sent during shutdown");
                    }
                    Ok(_) => {}
                    Err(e) => warn!(client = %from, error = %e, "Failed to send reply"),
                }
            });
        }

        self.tracker.close();
        if !self.tracker.is_empty() {
            info!(in_flight = self.tracker.len(), "Waiting for in-flight queries");
        }
        self.tracker.wait().await;
        info!("DNS listener stopped");
    }
}
