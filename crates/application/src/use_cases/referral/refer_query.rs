use super::retry_schedule::RetrySchedule;
use crate::ports::{InterfaceMonitor, UpstreamTransport};
use ferrous_named_domain::{Configuration, DomainError, ServerGroup};
use std::sync::Arc;
use tracing::{debug, warn};

/// Use case: relay a query to the upstream group selected by the referral
/// interface's current address and return the first reply verbatim.
pub struct ReferQueryUseCase {
    transport: Arc<dyn UpstreamTransport>,
    interfaces: Arc<dyn InterfaceMonitor>,
    config: Arc<Configuration>,
    schedule: RetrySchedule,
}

impl ReferQueryUseCase {
    pub fn new(
        transport: Arc<dyn UpstreamTransport>,
        interfaces: Arc<dyn InterfaceMonitor>,
        config: Arc<Configuration>,
    ) -> Self {
        Self {
            transport,
            interfaces,
            config,
            schedule: RetrySchedule::default(),
        }
    }

    pub fn with_schedule(mut self, schedule: RetrySchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Server group for the interface's current address.
    ///
    /// Fails when the interface has no usable address or cannot be inspected.
    pub fn select_group(&self) -> Result<&ServerGroup, DomainError> {
        let interface = &self.config.referral_interface;
        let addr = match self.interfaces.interface_address(interface) {
            Ok(Some(addr)) => addr,
            Ok(None) => {
                debug!(interface = %interface, "Referral interface is down");
                return Err(DomainError::ReferralInterfaceDown(interface.clone()));
            }
            Err(e) => {
                warn!(interface = %interface, error = %e, "Cannot inspect referral interface");
                return Err(DomainError::ReferralInterfaceDown(interface.clone()));
            }
        };

        self.config
            .server_groups
            .select(addr)
            .ok_or(DomainError::ReferralExhausted)
    }

    pub async fn execute(&self, query: &[u8]) -> Result<Vec<u8>, DomainError> {
        let group = self.select_group()?;
        if group.is_empty() {
            warn!(
                if_addr = %group.if_addr,
                if_mask = %group.if_mask,
                "Selected server group has no servers"
            );
            return Err(DomainError::ReferralExhausted);
        }

        let mut session = self.transport.open_session().await.map_err(|e| {
            warn!(error = %e, "Failed to open referral socket");
            e
        })?;

        for attempt in self.schedule.attempts(group.servers.len()) {
            let server = self.config.upstream_addr(group.servers[attempt.server_index]);
            debug!(
                server = %server,
                round = attempt.round,
                timeout_ms = attempt.timeout.as_millis() as u64,
                "Referring query upstream"
            );

            match session.exchange(server, query, attempt.timeout).await {
                Ok(reply) => {
                    debug!(server = %server, bytes = reply.len(), "Referral answered");
                    return Ok(reply);
                }
                Err(DomainError::TransportTimeout { .. }) => {
                    debug!(server = %server, round = attempt.round, "Referral attempt timed out");
                }
                Err(e) => {
                    warn!(
                        server = %server,
                        round = attempt.round,
                        error = %e,
                        "Referral attempt failed"
                    );
                }
            }
        }

        warn!(
            servers = group.servers.len(),
            rounds = self.schedule.rounds(),
            "No upstream server answered referral"
        );
        Err(DomainError::ReferralExhausted)
    }
}
