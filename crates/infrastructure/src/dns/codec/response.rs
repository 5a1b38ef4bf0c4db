use super::buffer::PacketWriter;
use super::header::DnsHeader;
use super::name::NameCompressor;
use ferrous_named_domain::dns_protocol::{CLASS_IN, LOCAL_TTL, MAX_PACKET_SIZE};
use ferrous_named_domain::{DomainError, RecordType, ResponseCode};
use std::net::Ipv4Addr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Answer,
    Authority,
    Additional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RData<'a> {
    A(Ipv4Addr),
    Cname(&'a str),
    Ns(&'a str),
    Ptr(&'a str),
}

impl RData<'_> {
    pub fn record_type(&self) -> RecordType {
        match self {
            RData::A(_) => RecordType::A,
            RData::Cname(_) => RecordType::CNAME,
            RData::Ns(_) => RecordType::NS,
            RData::Ptr(_) => RecordType::PTR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRecord<'a> {
    pub name: &'a str,
    pub ttl: u32,
    pub data: RData<'a>,
}

impl<'a> ResourceRecord<'a> {
    /// Class IN record carrying the local TTL.
    pub fn new(name: &'a str, data: RData<'a>) -> Self {
        Self {
            name,
            ttl: LOCAL_TTL,
            data,
        }
    }
}

/// Reply assembled behind a copy of the query's header and question
/// section.
///
/// Records are appended atomically: one that does not fit in 512 bytes is
/// rolled back, TC is set and every later append is refused, so the
/// section counts always match what was written.
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    header: DnsHeader,
    writer: PacketWriter,
    compressor: NameCompressor,
}

impl ResponseBuilder {
    /// Starts a reply from `query[..question_end]` with `qr` and `ra` set.
    ///
    /// The question names are not entered into the compression table.
    pub fn from_query(query: &[u8], question_end: usize) -> Result<Self, DomainError> {
        let mut header = DnsHeader::parse(query)?;
        header.qr = true;
        header.ra = true;
        header.ancount = 0;
        header.nscount = 0;
        header.arcount = 0;

        let end = question_end.min(query.len());
        let mut writer = PacketWriter::new(MAX_PACKET_SIZE);
        writer.write_bytes(&query[..end])?;

        Ok(Self {
            header,
            writer,
            compressor: NameCompressor::new(),
        })
    }

    /// The query echoed back with only `rcode`, `qr` and `ra` changed.
    pub fn error_reply(query: &[u8], rcode: ResponseCode) -> Result<Vec<u8>, DomainError> {
        let mut builder = Self::from_query(query, query.len())?;
        let original = DnsHeader::parse(query)?;
        builder.header.ancount = original.ancount;
        builder.header.nscount = original.nscount;
        builder.header.arcount = original.arcount;
        builder.set_rcode(rcode);
        Ok(builder.finish())
    }

    pub fn header(&self) -> &DnsHeader {
        &self.header
    }

    pub fn set_rcode(&mut self, rcode: ResponseCode) {
        self.header.rcode = rcode;
    }

    pub fn set_authoritative(&mut self) {
        self.header.aa = true;
    }

    pub fn is_truncated(&self) -> bool {
        self.header.tc
    }

    pub fn len(&self) -> usize {
        self.writer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writer.is_empty()
    }

    /// Appends `record` to `section`.
    ///
    /// Returns `Ok(false)` when the message is (or just became) truncated.
    /// Names that cannot be encoded are reported as errors and leave the
    /// message unchanged.
    pub fn append(
        &mut self,
        section: Section,
        record: &ResourceRecord<'_>,
    ) -> Result<bool, DomainError> {
        if self.header.tc {
            return Ok(false);
        }

        let mark = self.writer.mark();
        let table_len = self.compressor.len();

        match self.write_record(record) {
            Ok(()) => {
                let count = match section {
                    Section::Answer => &mut self.header.ancount,
                    Section::Authority => &mut self.header.nscount,
                    Section::Additional => &mut self.header.arcount,
                };
                *count += 1;
                Ok(true)
            }
            Err(e) => {
                self.writer.rollback(mark);
                self.compressor.rollback(table_len);
                if e == DomainError::ResponseTruncated {
                    self.header.tc = true;
                    Ok(false)
                } else {
                    Err(e)
                }
            }
        }
    }

    fn write_record(&mut self, record: &ResourceRecord<'_>) -> Result<(), DomainError> {
        self.compressor.compress(&mut self.writer, record.name)?;
        self.writer.write_u16(record.data.record_type().to_u16())?;
        self.writer.write_u16(CLASS_IN)?;
        self.writer.write_u32(record.ttl)?;

        let rdlength_at = self.writer.mark();
        self.writer.write_u16(0)?;
        let rdata_start = self.writer.len();

        match record.data {
            RData::A(address) => self.writer.write_bytes(&address.octets())?,
            RData::Cname(target) | RData::Ns(target) | RData::Ptr(target) => {
                self.compressor.compress(&mut self.writer, target)?
            }
        }

        let rdlength = (self.writer.len() - rdata_start) as u16;
        self.writer.set_u16_at(rdlength_at, rdlength)
    }

    pub fn finish(mut self) -> Vec<u8> {
        let header = self.header.to_bytes();
        // The writer always holds at least the query header.
        let _ = self.writer.overwrite(0, &header);
        self.writer.into_bytes()
    }
}
