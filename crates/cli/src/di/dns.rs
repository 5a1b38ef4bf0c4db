use ferrous_named_application::ports::InterfaceMonitor;
use ferrous_named_application::services::RecordStore;
use ferrous_named_application::use_cases::ReferQueryUseCase;
use ferrous_named_domain::{Config, Configuration};
use ferrous_named_infrastructure::dns::{QueryDispatcher, UdpTransport};
use ferrous_named_infrastructure::system::{StaticInterfaceMonitor, SystemInterfaceMonitor};
use std::sync::Arc;
use tracing::info;

pub struct DnsServices {
    pub dispatcher: Arc<QueryDispatcher>,
}

impl DnsServices {
    pub fn new(config: &Config, runtime: Arc<Configuration>, records: RecordStore) -> Self {
        let interfaces = Self::setup_interface_monitor(config);
        let referral = Arc::new(ReferQueryUseCase::new(
            Arc::new(UdpTransport::new()),
            interfaces,
            runtime.clone(),
        ));
        let dispatcher = Arc::new(QueryDispatcher::new(Arc::new(records), referral, runtime));

        Self { dispatcher }
    }

    fn setup_interface_monitor(config: &Config) -> Arc<dyn InterfaceMonitor> {
        match config.referral.assume_interface_address {
            Some(address) => {
                info!(
                    interface = %config.referral.interface,
                    address = %address,
                    "Assuming referral interface is up"
                );
                Arc::new(StaticInterfaceMonitor::new(address))
            }
            None => Arc::new(SystemInterfaceMonitor::new()),
        }
    }
}
