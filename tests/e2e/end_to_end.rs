//! Config file and hosts file in, UDP queries out: the same wiring the
//! binary performs, against upstream resolvers on loopback.

use ferrous_named_application::services::RecordStore;
use ferrous_named_application::use_cases::{ReferQueryUseCase, RetrySchedule};
use ferrous_named_domain::{Config, Configuration, ResponseCode, ServerGroupConfig, ServerGroups};
use ferrous_named_infrastructure::dns::codec::{
    decode_name, decode_question, DnsHeader, PacketReader,
};
use ferrous_named_infrastructure::dns::{QueryDispatcher, UdpListener, UdpTransport};
use ferrous_named_infrastructure::system::{HostsFileReader, StaticInterfaceMonitor};
use std::io::Write;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const HOSTS: &str = "\
192.168.1.1   ns
192.168.1.10  nas files
192.168.1.20  printer
";

/// Upstream on `ip`:`port` that answers with `reply_address` and counts
/// what it receives.
struct Upstream {
    queries: Arc<AtomicUsize>,
    shutdown: CancellationToken,
}

impl Upstream {
    async fn start(ip: Ipv4Addr, port: u16, reply_address: Ipv4Addr) -> (Self, u16) {
        let socket = UdpSocket::bind(SocketAddr::from((ip, port))).await.unwrap();
        let port = socket.local_addr().unwrap().port();
        let queries = Arc::new(AtomicUsize::new(0));
        let shutdown = CancellationToken::new();

        let counter = queries.clone();
        let token = shutdown.clone();
        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];
            loop {
                let (len, peer) = tokio::select! {
                    _ = token.cancelled() => break,
                    result = socket.recv_from(&mut buf) => match result {
                        Ok(received) => received,
                        Err(_) => break,
                    },
                };
                counter.fetch_add(1, Ordering::SeqCst);

                let mut reply = buf[..len].to_vec();
                reply[2] |= 0x80;
                reply[7] = 1;
                reply.extend_from_slice(&[0xC0, 0x0C, 0, 1, 0, 1, 0, 0, 0, 60, 0, 4]);
                reply.extend_from_slice(&reply_address.octets());
                let _ = socket.send_to(&reply, peer).await;
            }
        });

        (Self { queries, shutdown }, port)
    }

    fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Drop for Upstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

struct Server {
    addr: SocketAddr,
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
    _hosts: NamedTempFile,
}

impl Server {
    /// Builds and starts the server from TOML text; `{hosts}` is replaced
    /// with the path of a hosts file holding [`HOSTS`].
    async fn start(toml: &str) -> Self {
        let mut hosts = NamedTempFile::new().unwrap();
        hosts.write_all(HOSTS.as_bytes()).unwrap();
        let toml = toml.replace("{hosts}", &hosts.path().display().to_string());

        let config = Config::from_toml(&toml).unwrap();
        config.validate().unwrap();

        let domain = config.authority.domain.clone().unwrap();
        let runtime = Arc::new(Configuration {
            port: config.server.dns_port,
            upstream_port: config.referral.upstream_port,
            authority_network: config.authority.network,
            authority_netmask: config.authority.netmask,
            own_hostname: config.authority.hostname.clone().unwrap(),
            authority_domain: domain.clone(),
            referral_interface: config.referral.interface.clone(),
            server_groups: ServerGroups::new(
                config
                    .referral
                    .groups
                    .iter()
                    .map(ServerGroupConfig::to_group)
                    .collect(),
                vec![],
            ),
        });

        let entries = HostsFileReader::new(config.hosts.path.as_str(), domain)
            .read_entries()
            .await
            .unwrap();
        let records = Arc::new(RecordStore::from_entries(entries));

        let interface = config.referral.assume_interface_address.unwrap();
        let referral = ReferQueryUseCase::new(
            Arc::new(UdpTransport::with_bind_addr(SocketAddr::from(([127, 0, 0, 1], 0)))),
            Arc::new(StaticInterfaceMonitor::new(interface)),
            runtime.clone(),
        )
        .with_schedule(RetrySchedule::new(2, Duration::from_millis(200)));
        let dispatcher = QueryDispatcher::new(records, Arc::new(referral), runtime);

        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let shutdown = CancellationToken::new();
        let listener = UdpListener::new(socket, Arc::new(dispatcher), shutdown.clone());
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(listener.run());

        Self {
            addr,
            shutdown,
            handle,
            _hosts: hosts,
        }
    }

    async fn query(&self, id: u16, name: &str, qtype: u16) -> Vec<u8> {
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let mut query = DnsHeader::query(id).to_bytes().to_vec();
        for label in name.split('.') {
            query.push(label.len() as u8);
            query.extend_from_slice(label.as_bytes());
        }
        query.extend_from_slice(&[0, (qtype >> 8) as u8, qtype as u8, 0, 1]);
        client.send_to(&query, self.addr).await.unwrap();

        let mut buf = vec![0u8; 512];
        let (len, _) = tokio::time::timeout(Duration::from_secs(5), client.recv_from(&mut buf))
            .await
            .unwrap()
            .unwrap();
        buf.truncate(len);
        buf
    }

    async fn stop(self) {
        self.shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .unwrap()
            .unwrap();
    }
}

fn config_toml(upstream_port: u16, interface_address: &str, groups: &str) -> String {
    format!(
        r#"
[server]
dns_port = 5353

[authority]
network = "192.168.1.0"
netmask = "255.255.255.0"
domain = "home.lan"
hostname = "ns.home.lan"

[referral]
interface = "wan0"
upstream_port = {upstream_port}
use_system_resolvers = false
assume_interface_address = "{interface_address}"

{groups}

[hosts]
path = "{{hosts}}"
"#
    )
}

/// First answer's rdata: an IPv4 address or a decoded name.
fn first_answer(reply: &[u8]) -> (DnsHeader, Option<String>) {
    let header = DnsHeader::parse(reply).unwrap();
    let mut reader = PacketReader::new(reply);
    reader.seek(12);
    for _ in 0..header.qdcount {
        decode_question(&mut reader).unwrap();
    }
    if header.ancount == 0 {
        return (header, None);
    }

    decode_name(&mut reader).unwrap();
    let rtype = reader.read_u16().unwrap();
    reader.read_slice(6).unwrap();
    let rdlength = reader.read_u16().unwrap();
    let data = match rtype {
        1 => {
            let o = reader.read_slice(rdlength as usize).unwrap();
            Ipv4Addr::new(o[0], o[1], o[2], o[3]).to_string()
        }
        _ => decode_name(&mut reader).unwrap(),
    };
    (header, Some(data))
}

#[tokio::test]
async fn test_local_zone_and_referral() {
    let (upstream, port) =
        Upstream::start(Ipv4Addr::LOCALHOST, 0, Ipv4Addr::new(93, 184, 216, 34)).await;
    let groups = r#"
[[referral.groups]]
interface_address = "10.0.0.0"
interface_mask = "255.0.0.0"
servers = ["127.0.0.1"]
"#;
    let server = Server::start(&config_toml(port, "10.1.1.1", groups)).await;

    let (header, answer) = first_answer(&server.query(2, "printer.home.lan", 1).await);
    assert!(header.aa);
    assert_eq!(answer.as_deref(), Some("192.168.1.20"));

    let (header, answer) = first_answer(&server.query(3, "files.home.lan", 1).await);
    assert_eq!(header.ancount, 2);
    assert_eq!(answer.as_deref(), Some("nas.home.lan"));

    let (header, answer) = first_answer(&server.query(4, "10.1.168.192.in-addr.arpa", 12).await);
    assert!(header.aa);
    assert_eq!(answer.as_deref(), Some("nas.home.lan"));

    let (header, answer) = first_answer(&server.query(5, "example.com", 1).await);
    assert!(!header.aa);
    assert_eq!(header.id, 5);
    assert_eq!(answer.as_deref(), Some("93.184.216.34"));
    assert_eq!(upstream.queries(), 1);

    server.stop().await;
}

#[tokio::test]
async fn test_interface_address_selects_group() {
    let (first, port) =
        Upstream::start(Ipv4Addr::LOCALHOST, 0, Ipv4Addr::new(10, 10, 10, 10)).await;
    let (second, _) =
        Upstream::start(Ipv4Addr::new(127, 0, 0, 2), port, Ipv4Addr::new(20, 20, 20, 20)).await;
    let groups = r#"
[[referral.groups]]
interface_address = "10.0.0.0"
interface_mask = "255.0.0.0"
servers = ["127.0.0.1"]

[[referral.groups]]
interface_address = "172.16.0.0"
interface_mask = "255.240.0.0"
servers = ["127.0.0.2"]
"#;
    let server = Server::start(&config_toml(port, "172.16.5.5", groups)).await;

    let (_, answer) = first_answer(&server.query(6, "example.org", 1).await);

    assert_eq!(answer.as_deref(), Some("20.20.20.20"));
    assert_eq!(first.queries(), 0);
    assert_eq!(second.queries(), 1);

    server.stop().await;
}

#[tokio::test]
async fn test_unreachable_upstream_gives_nxdomain() {
    let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = silent.local_addr().unwrap().port();
    let groups = r#"
[[referral.groups]]
interface_address = "10.0.0.0"
interface_mask = "255.0.0.0"
servers = ["127.0.0.1"]
"#;
    let server = Server::start(&config_toml(port, "10.1.1.1", groups)).await;

    let reply = server.query(7, "example.net", 1).await;
    let header = DnsHeader::parse(&reply).unwrap();

    assert_eq!(header.rcode, ResponseCode::NxDomain);
    assert_eq!(header.ancount, 0);

    server.stop().await;
}
