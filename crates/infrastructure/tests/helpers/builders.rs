#![allow(dead_code)]

use ferrous_named_infrastructure::dns::codec::{
    decode_name, decode_question, DnsHeader, PacketReader, Question,
};
use std::net::Ipv4Addr;

/// Uncompressed wire form of `name`.
pub fn encode_name(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for label in name.trim_end_matches('.').split('.').filter(|l| !l.is_empty()) {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out
}

pub fn build_query(id: u16, name: &str, qtype: u16) -> Vec<u8> {
    build_query_with(DnsHeader::query(id), &[(name, qtype)])
}

/// Query with the given header; `qdcount` is taken from `questions`.
pub fn build_query_with(mut header: DnsHeader, questions: &[(&str, u16)]) -> Vec<u8> {
    header.qdcount = questions.len() as u16;
    let mut out = header.to_bytes().to_vec();
    for (name, qtype) in questions {
        out.extend_from_slice(&encode_name(name));
        out.extend_from_slice(&qtype.to_be_bytes());
        out.extend_from_slice(&1u16.to_be_bytes());
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    Name(String),
    Raw(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub name: String,
    pub rtype: u16,
    pub class: u16,
    pub ttl: u32,
    pub data: RecordData,
}

#[derive(Debug, Clone)]
pub struct ParsedMessage {
    pub header: DnsHeader,
    pub questions: Vec<Question>,
    pub answers: Vec<ParsedRecord>,
    pub authority: Vec<ParsedRecord>,
    pub additional: Vec<ParsedRecord>,
    /// Bytes left over after the last counted record.
    pub trailing: usize,
}

/// Parses a whole message, panicking on anything malformed.
pub fn parse_message(bytes: &[u8]) -> ParsedMessage {
    let header = DnsHeader::parse(bytes).expect("header");
    let mut reader = PacketReader::new(bytes);
    reader.seek(12);

    let questions = (0..header.qdcount)
        .map(|_| decode_question(&mut reader).expect("question"))
        .collect();
    let answers = parse_records(&mut reader, header.ancount);
    let authority = parse_records(&mut reader, header.nscount);
    let additional = parse_records(&mut reader, header.arcount);

    ParsedMessage {
        header,
        questions,
        answers,
        authority,
        additional,
        trailing: reader.remaining(),
    }
}

fn parse_records(reader: &mut PacketReader<'_>, count: u16) -> Vec<ParsedRecord> {
    (0..count)
        .map(|_| {
            let name = decode_name(reader).expect("owner name");
            let rtype = reader.read_u16().expect("type");
            let class = reader.read_u16().expect("class");
            let ttl = reader.read_u32().expect("ttl");
            let rdlength = reader.read_u16().expect("rdlength") as usize;
            let rdata_start = reader.position();

            let data = match rtype {
                1 => {
                    let octets = reader.read_slice(4).expect("address");
                    RecordData::A(Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]))
                }
                2 | 5 | 12 => RecordData::Name(decode_name(reader).expect("rdata name")),
                _ => RecordData::Raw(reader.read_slice(rdlength).expect("rdata").to_vec()),
            };
            assert_eq!(reader.position() - rdata_start, rdlength, "rdlength mismatch");

            ParsedRecord {
                name,
                rtype,
                class,
                ttl,
                data,
            }
        })
        .collect()
}
