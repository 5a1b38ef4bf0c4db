pub mod host_record;
pub mod record_type;

pub use host_record::{HostEntry, HostRecord, RecordId, RecordKind};
pub use record_type::RecordType;
