pub mod codec;
pub mod listener;
pub mod server;
pub mod transport;

pub use listener::UdpListener;
pub use server::QueryDispatcher;
pub use transport::UdpTransport;
