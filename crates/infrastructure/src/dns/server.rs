use crate::dns::codec::{
    decode_question, DnsHeader, PacketReader, Question, RData, ResourceRecord, ResponseBuilder,
    Section,
};
use ferrous_named_application::services::RecordStore;
use ferrous_named_application::use_cases::ReferQueryUseCase;
use ferrous_named_domain::dns_protocol::HEADER_SIZE;
use ferrous_named_domain::{
    parse_reverse_name, Configuration, DomainError, HostRecord, Opcode, RecordType, ResponseCode,
};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Where a question left the reply.
#[derive(Debug)]
enum Outcome {
    /// Records (possibly none, if truncated) were added; keep going.
    Answered,
    /// The upstream reply replaces the whole message.
    Referred(Vec<u8>),
    /// Stop processing and send the reply with this rcode.
    Failed(ResponseCode),
}

/// Turns one received datagram into at most one reply.
///
/// `A` and `PTR` questions are answered from the local records with an NS
/// authority record and the server's own address as additional data;
/// anything the local zone does not hold is referred upstream.
pub struct QueryDispatcher {
    records: Arc<RecordStore>,
    referral: Arc<ReferQueryUseCase>,
    config: Arc<Configuration>,
    reverse_zone: String,
}

impl QueryDispatcher {
    pub fn new(
        records: Arc<RecordStore>,
        referral: Arc<ReferQueryUseCase>,
        config: Arc<Configuration>,
    ) -> Self {
        let reverse_zone = config.reverse_zone();
        Self {
            records,
            referral,
            config,
            reverse_zone,
        }
    }

    /// Returns `None` when the datagram should be dropped without a reply.
    pub async fn handle(&self, packet: &[u8], client: SocketAddr) -> Option<Vec<u8>> {
        if packet.len() < HEADER_SIZE {
            debug!(client = %client, bytes = packet.len(), "Dropping runt datagram");
            return None;
        }

        let header = match DnsHeader::parse(packet) {
            Ok(header) => header,
            Err(e) => {
                debug!(client = %client, error = %e, "Dropping unparsable datagram");
                return None;
            }
        };

        if header.ancount != 0 || header.nscount != 0 || header.arcount != 0 {
            debug!(client = %client, "Dropping datagram that is not a plain query");
            return None;
        }

        let mut reader = PacketReader::new(packet);
        reader.seek(HEADER_SIZE);
        let mut questions = Vec::new();
        for _ in 0..header.qdcount {
            match decode_question(&mut reader) {
                Ok(question) => questions.push(question),
                Err(e) => {
                    debug!(client = %client, error = %e, "Malformed question");
                    return self.error_reply(packet, ResponseCode::FormatError);
                }
            }
        }

        let mut response = match ResponseBuilder::from_query(packet, reader.position()) {
            Ok(response) => response,
            Err(e) => {
                warn!(client = %client, error = %e, "Cannot start reply");
                return None;
            }
        };

        for question in &questions {
            info!(
                domain = %question.name,
                record_type = %question.type_label(),
                client = %client,
                "DNS query received"
            );

            let outcome = if header.opcode == Opcode::Query {
                self.answer(question, packet, &mut response).await
            } else {
                debug!(opcode = ?header.opcode, "Unsupported opcode");
                Outcome::Failed(ResponseCode::NotImplemented)
            };

            match outcome {
                Outcome::Answered => {}
                Outcome::Referred(reply) => return Some(reply),
                Outcome::Failed(rcode) => {
                    response.set_rcode(rcode);
                    break;
                }
            }
        }

        if response.is_truncated() {
            debug!(client = %client, "Reply truncated");
        }
        Some(response.finish())
    }

    async fn answer(
        &self,
        question: &Question,
        packet: &[u8],
        response: &mut ResponseBuilder,
    ) -> Outcome {
        let result = match question.record_type() {
            Some(RecordType::A) => self.answer_address(question, packet, response).await,
            Some(RecordType::PTR) => self.answer_pointer(question, packet, response).await,
            _ => {
                debug!(record_type = %question.type_label(), "Unsupported record type");
                Ok(Outcome::Failed(ResponseCode::NotImplemented))
            }
        };

        match result {
            Ok(outcome) => outcome,
            Err(DomainError::InvalidPtrName(name)) => {
                debug!(domain = %name, "Malformed reverse lookup name");
                Outcome::Failed(ResponseCode::FormatError)
            }
            Err(DomainError::OwnRecordMissing(hostname)) => {
                error!(hostname = %hostname, "Cannot find own host record");
                Outcome::Failed(ResponseCode::ServerFailure)
            }
            Err(e) => {
                warn!(domain = %question.name, error = %e, "Failed to build answer");
                Outcome::Failed(ResponseCode::ServerFailure)
            }
        }
    }

    async fn answer_address(
        &self,
        question: &Question,
        packet: &[u8],
        response: &mut ResponseBuilder,
    ) -> Result<Outcome, DomainError> {
        let Some(found) = self.records.find_by_name(&question.name) else {
            debug!(domain = %question.name, "Not in local zone, referring");
            return Ok(self.refer(packet).await);
        };

        let record = if found.is_alias() {
            let primary = self.primary(found)?;
            let cname = ResourceRecord::new(&question.name, RData::Cname(&primary.name));
            if !response.append(Section::Answer, &cname)? {
                return Ok(Outcome::Answered);
            }
            primary
        } else {
            found
        };

        let address = Self::address_of(record)?;
        let answer = ResourceRecord::new(&record.name, RData::A(address));
        if !response.append(Section::Answer, &answer)? {
            return Ok(Outcome::Answered);
        }
        response.set_authoritative();

        let authority = ResourceRecord::new(
            &self.config.authority_domain,
            RData::Ns(&self.config.own_hostname),
        );
        if !response.append(Section::Authority, &authority)? {
            return Ok(Outcome::Answered);
        }

        let (own_name, own_address) = self
            .own_record()?
            .ok_or_else(|| DomainError::OwnRecordMissing(self.config.own_hostname.clone()))?;
        let additional = ResourceRecord::new(&own_name, RData::A(own_address));
        response.append(Section::Additional, &additional)?;

        Ok(Outcome::Answered)
    }

    async fn answer_pointer(
        &self,
        question: &Question,
        packet: &[u8],
        response: &mut ResponseBuilder,
    ) -> Result<Outcome, DomainError> {
        let address = parse_reverse_name(&question.name)?;

        if !self.config.in_authority(address) {
            debug!(address = %address, "Reverse lookup outside authority, referring");
            return Ok(self.refer(packet).await);
        }

        let Some(record) = self.records.find_by_address(address) else {
            debug!(address = %address, "Address not in local zone, referring");
            return Ok(self.refer(packet).await);
        };

        let answer = ResourceRecord::new(&question.name, RData::Ptr(&record.name));
        if !response.append(Section::Answer, &answer)? {
            return Ok(Outcome::Answered);
        }
        response.set_authoritative();

        let authority =
            ResourceRecord::new(&self.reverse_zone, RData::Ns(&self.config.own_hostname));
        if !response.append(Section::Authority, &authority)? {
            return Ok(Outcome::Answered);
        }

        match self.own_record()? {
            Some((own_name, own_address)) => {
                let additional = ResourceRecord::new(&own_name, RData::A(own_address));
                response.append(Section::Additional, &additional)?;
            }
            None => {
                warn!(
                    hostname = %self.config.own_hostname,
                    "Own host record missing, omitting additional address"
                );
            }
        }

        Ok(Outcome::Answered)
    }

    async fn refer(&self, packet: &[u8]) -> Outcome {
        match self.referral.execute(packet).await {
            Ok(reply) => Outcome::Referred(reply),
            Err(e) => {
                debug!(error = %e, "Referral failed");
                Outcome::Failed(ResponseCode::NxDomain)
            }
        }
    }

    /// Own host name and address, following an alias to its primary.
    fn own_record(&self) -> Result<Option<(String, Ipv4Addr)>, DomainError> {
        let Some(record) = self.records.find_by_name(&self.config.own_hostname) else {
            return Ok(None);
        };
        let primary = self.primary(record)?;
        Ok(Some((record.name.to_string(), Self::address_of(primary)?)))
    }

    fn primary<'a>(&'a self, record: &'a HostRecord) -> Result<&'a HostRecord, DomainError> {
        self.records.primary_of(record).ok_or_else(|| {
            DomainError::InvalidHostsEntry(format!("dangling alias {}", record.name))
        })
    }

    fn address_of(record: &HostRecord) -> Result<Ipv4Addr, DomainError> {
        record.address().ok_or_else(|| {
            DomainError::InvalidHostsEntry(format!("{} has no address", record.name))
        })
    }

    fn error_reply(&self, packet: &[u8], rcode: ResponseCode) -> Option<Vec<u8>> {
        match ResponseBuilder::error_reply(packet, rcode) {
            Ok(reply) => Some(reply),
            Err(e) => {
                warn!(error = %e, "Cannot build error reply");
                None
            }
        }
    }
}
