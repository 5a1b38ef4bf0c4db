//! Bounds-checked cursors over a DNS message.

use ferrous_named_domain::DomainError;

/// Read cursor over a received packet. Reading past the end fails instead
/// of panicking.
#[derive(Debug, Clone)]
pub struct PacketReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn read_u8(&mut self) -> Result<u8, DomainError> {
        let byte = *self.buf.get(self.pos).ok_or_else(|| past_end(self.pos))?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_u16(&mut self) -> Result<u16, DomainError> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, DomainError> {
        let bytes = self.read_slice(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], DomainError> {
        let end = self.pos.checked_add(len).ok_or_else(|| past_end(self.pos))?;
        let slice = self.buf.get(self.pos..end).ok_or_else(|| past_end(self.pos))?;
        self.pos = end;
        Ok(slice)
    }
}

fn past_end(pos: usize) -> DomainError {
    DomainError::InvalidDnsMessage(format!("read past end of packet at offset {}", pos))
}

/// Write cursor with a hard size limit.
///
/// Every write checks the remaining room first and fails with
/// [`DomainError::ResponseTruncated`] without touching the buffer.
#[derive(Debug, Clone)]
pub struct PacketWriter {
    buf: Vec<u8>,
    limit: usize,
}

impl PacketWriter {
    pub fn new(limit: usize) -> Self {
        Self {
            buf: Vec::with_capacity(limit),
            limit,
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.buf.len())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), DomainError> {
        self.write_bytes(&[value])
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), DomainError> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), DomainError> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), DomainError> {
        if bytes.len() > self.remaining() {
            return Err(DomainError::ResponseTruncated);
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Overwrites already written bytes starting at `pos`.
    pub fn overwrite(&mut self, pos: usize, bytes: &[u8]) -> Result<(), DomainError> {
        let end = pos.checked_add(bytes.len()).ok_or(DomainError::ResponseTruncated)?;
        let slot = self
            .buf
            .get_mut(pos..end)
            .ok_or(DomainError::ResponseTruncated)?;
        slot.copy_from_slice(bytes);
        Ok(())
    }

    pub fn set_u16_at(&mut self, pos: usize, value: u16) -> Result<(), DomainError> {
        self.overwrite(pos, &value.to_be_bytes())
    }

    pub fn mark(&self) -> usize {
        self.buf.len()
    }

    /// Drops everything written after `mark`.
    pub fn rollback(&mut self, mark: usize) {
        self.buf.truncate(mark);
    }
}
