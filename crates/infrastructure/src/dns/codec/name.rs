//! Domain name decoding and compression (RFC 1035 §4.1.4).

use super::buffer::{PacketReader, PacketWriter};
use ferrous_named_domain::dns_protocol::{MAX_COMPRESSION_POINTERS, MAX_POINTER_HOPS};
use ferrous_named_domain::DomainError;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 255;
const POINTER_TAG: u8 = 0xC0;
const MAX_POINTER_OFFSET: usize = 0x3FFF;

/// Reads a possibly compressed name at the reader's position.
///
/// The result is lowercased and dot-separated without a trailing dot; the
/// root name decodes to an empty string. The reader ends up just past the
/// name as it appears at the starting position, i.e. after the first
/// pointer if one was followed.
///
/// Fails on truncated labels, reserved label types, labels holding a dot,
/// names longer than 255 bytes and more than `MAX_POINTER_HOPS` pointers.
pub fn decode_name(reader: &mut PacketReader<'_>) -> Result<String, DomainError> {
    let buf = reader.buffer();
    let mut pos = reader.position();
    let mut resume_at = None;
    let mut hops = 0usize;
    let mut name = String::new();
    let mut wire_len = 1usize;

    loop {
        let len_byte = *buf
            .get(pos)
            .ok_or_else(|| malformed("name runs past end of packet"))?;

        match len_byte & POINTER_TAG {
            0x00 => {
                let len = len_byte as usize;
                if len == 0 {
                    pos += 1;
                    break;
                }

                let label = buf
                    .get(pos + 1..pos + 1 + len)
                    .ok_or_else(|| malformed("label runs past end of packet"))?;

                wire_len += len + 1;
                if wire_len > MAX_NAME_LEN {
                    return Err(malformed("name longer than 255 bytes"));
                }
                if label.contains(&b'.') {
                    return Err(malformed("label contains a dot"));
                }

                if !name.is_empty() {
                    name.push('.');
                }
                name.extend(label.iter().map(|b| char::from(b.to_ascii_lowercase())));
                pos += len + 1;
            }
            POINTER_TAG => {
                let low = *buf
                    .get(pos + 1)
                    .ok_or_else(|| malformed("pointer runs past end of packet"))?;

                hops += 1;
                if hops > MAX_POINTER_HOPS {
                    return Err(malformed("too many compression pointers"));
                }
                if resume_at.is_none() {
                    resume_at = Some(pos + 2);
                }
                pos = (((len_byte & !POINTER_TAG) as usize) << 8) | low as usize;
            }
            _ => return Err(malformed("reserved label type")),
        }
    }

    reader.seek(resume_at.unwrap_or(pos));
    Ok(name)
}

fn malformed(reason: &str) -> DomainError {
    DomainError::InvalidDnsMessage(reason.to_string())
}

/// Splits a presentation name into wire labels, validating lengths.
fn wire_labels(name: &str) -> Result<Vec<Vec<u8>>, DomainError> {
    let name = name.trim_end_matches('.');
    if name.is_empty() {
        return Ok(Vec::new());
    }

    let mut total = 1usize;
    let mut labels = Vec::new();
    for label in name.split('.') {
        if label.is_empty() || label.chars().count() > MAX_LABEL_LEN {
            return Err(DomainError::InvalidDomainName(name.to_string()));
        }
        let bytes = label
            .chars()
            .map(|c| u8::try_from(u32::from(c)))
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|_| DomainError::InvalidDomainName(name.to_string()))?;
        total += bytes.len() + 1;
        labels.push(bytes);
    }

    if total > MAX_NAME_LEN {
        return Err(DomainError::InvalidDomainName(name.to_string()));
    }
    Ok(labels)
}

/// Pointer table for one outgoing message.
///
/// Remembers where name suffixes were written so later names can end in a
/// pointer to them. Holds at most `MAX_COMPRESSION_POINTERS` entries; once
/// full, new suffixes are written but no longer remembered. Suffixes are
/// compared case-insensitively.
#[derive(Debug, Clone)]
pub struct NameCompressor {
    entries: Vec<(usize, String)>,
    capacity: usize,
}

impl NameCompressor {
    pub fn new() -> Self {
        Self::with_capacity(MAX_COMPRESSION_POINTERS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets every entry recorded after the table held `len` entries.
    pub fn rollback(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// Writes `name`, reusing the longest suffix already in the table.
    ///
    /// On failure neither the writer nor the table is modified. Running out
    /// of room yields [`DomainError::ResponseTruncated`].
    pub fn compress(&mut self, writer: &mut PacketWriter, name: &str) -> Result<(), DomainError> {
        let labels = wire_labels(name)?;
        let mark = writer.mark();
        let table_len = self.entries.len();

        let result = self.write_labels(writer, &labels);
        if result.is_err() {
            writer.rollback(mark);
            self.rollback(table_len);
        }
        result
    }

    fn write_labels(
        &mut self,
        writer: &mut PacketWriter,
        labels: &[Vec<u8>],
    ) -> Result<(), DomainError> {
        for index in 0..labels.len() {
            let suffix = suffix_key(&labels[index..]);
            if let Some((offset, _)) = self.entries.iter().find(|(_, known)| *known == suffix) {
                return writer.write_u16(0xC000 | *offset as u16);
            }

            let offset = writer.len();
            writer.write_u8(labels[index].len() as u8)?;
            writer.write_bytes(&labels[index])?;

            if offset <= MAX_POINTER_OFFSET && self.entries.len() < self.capacity {
                self.entries.push((offset, suffix));
            }
        }
        writer.write_u8(0)
    }
}

impl Default for NameCompressor {
    fn default() -> Self {
        Self::new()
    }
}

fn suffix_key(labels: &[Vec<u8>]) -> String {
    labels
        .iter()
        .map(|label| {
            label
                .iter()
                .map(|b| char::from(b.to_ascii_lowercase()))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(".")
}
