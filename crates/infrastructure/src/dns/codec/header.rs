use ferrous_named_domain::dns_protocol::HEADER_SIZE;
use ferrous_named_domain::{DomainError, Opcode, ResponseCode};

const QR: u8 = 0x80;
const OPCODE_MASK: u8 = 0x78;
const AA: u8 = 0x04;
const TC: u8 = 0x02;
const RD: u8 = 0x01;
const RA: u8 = 0x80;
const Z_MASK: u8 = 0x70;
const RCODE_MASK: u8 = 0x0F;

/// Fixed 12-byte message header (RFC 1035 §4.1.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsHeader {
    pub id: u16,
    pub qr: bool,
    pub opcode: Opcode,
    pub aa: bool,
    pub tc: bool,
    pub rd: bool,
    pub ra: bool,
    pub z: u8,
    pub rcode: ResponseCode,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl DnsHeader {
    pub fn query(id: u16) -> Self {
        Self {
            id,
            qr: false,
            opcode: Opcode::Query,
            aa: false,
            tc: false,
            rd: true,
            ra: false,
            z: 0,
            rcode: ResponseCode::NoError,
            qdcount: 1,
            ancount: 0,
            nscount: 0,
            arcount: 0,
        }
    }

    pub fn parse(buf: &[u8]) -> Result<Self, DomainError> {
        if buf.len() < HEADER_SIZE {
            return Err(DomainError::InvalidDnsMessage(format!(
                "packet of {} bytes is shorter than a header",
                buf.len()
            )));
        }

        let flags = buf[2];
        let flags2 = buf[3];
        Ok(Self {
            id: u16::from_be_bytes([buf[0], buf[1]]),
            qr: flags & QR != 0,
            opcode: Opcode::from((flags & OPCODE_MASK) >> 3),
            aa: flags & AA != 0,
            tc: flags & TC != 0,
            rd: flags & RD != 0,
            ra: flags2 & RA != 0,
            z: (flags2 & Z_MASK) >> 4,
            rcode: ResponseCode::from(flags2 & RCODE_MASK),
            qdcount: u16::from_be_bytes([buf[4], buf[5]]),
            ancount: u16::from_be_bytes([buf[6], buf[7]]),
            nscount: u16::from_be_bytes([buf[8], buf[9]]),
            arcount: u16::from_be_bytes([buf[10], buf[11]]),
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut flags = (u8::from(self.opcode) << 3) & OPCODE_MASK;
        if self.qr {
            flags |= QR;
        }
        if self.aa {
            flags |= AA;
        }
        if self.tc {
            flags |= TC;
        }
        if self.rd {
            flags |= RD;
        }

        let mut flags2 = ((self.z << 4) & Z_MASK) | (u8::from(self.rcode) & RCODE_MASK);
        if self.ra {
            flags2 |= RA;
        }

        let mut out = [0u8; HEADER_SIZE];
        out[0..2].copy_from_slice(&self.id.to_be_bytes());
        out[2] = flags;
        out[3] = flags2;
        out[4..6].copy_from_slice(&self.qdcount.to_be_bytes());
        out[6..8].copy_from_slice(&self.ancount.to_be_bytes());
        out[8..10].copy_from_slice(&self.nscount.to_be_bytes());
        out[10..12].copy_from_slice(&self.arcount.to_be_bytes());
        out
    }
}
