//! DNS message codec: header, names with compression, questions and
//! size-limited reply assembly.

mod buffer;
mod header;
mod name;
mod question;
mod response;

pub use buffer::{PacketReader, PacketWriter};
pub use header::DnsHeader;
pub use name::{decode_name, NameCompressor};
pub use question::{decode_question, Question};
pub use response::{RData, ResourceRecord, ResponseBuilder, Section};
