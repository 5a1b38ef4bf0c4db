use super::buffer::PacketReader;
use super::name::decode_name;
use ferrous_named_domain::{DomainError, RecordType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Lowercased, without trailing dot.
    pub name: String,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u16(self.qtype)
    }

    /// Label for logs: the type mnemonic, or `TYPE<n>` when unknown.
    pub fn type_label(&self) -> String {
        self.record_type()
            .map(|t| t.as_str().to_string())
            .unwrap_or_else(|| format!("TYPE{}", self.qtype))
    }
}

/// Decodes one question entry and leaves the reader just past it.
pub fn decode_question(reader: &mut PacketReader<'_>) -> Result<Question, DomainError> {
    let name = decode_name(reader)?;
    let qtype = reader.read_u16()?;
    let qclass = reader.read_u16()?;
    Ok(Question {
        name,
        qtype,
        qclass,
    })
}
