use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid DNS message: {0}")]
    InvalidDnsMessage(String),

    #[error("Response exceeds the packet size limit")]
    ResponseTruncated,

    #[error("Invalid PTR query name: {0}")]
    InvalidPtrName(String),

    #[error("Invalid hosts entry: {0}")]
    InvalidHostsEntry(String),

    #[error("Own host record not found: {0}")]
    OwnRecordMissing(String),

    #[error("Referral interface {0} is down")]
    ReferralInterfaceDown(String),

    #[error("No upstream server answered the referral")]
    ReferralExhausted,

    #[error("Transport timeout to {server}")]
    TransportTimeout { server: String },

    #[error("Transport error to {server}: {reason}")]
    TransportError { server: String, reason: String },

    #[error("I/O error: {0}")]
    IoError(String),
}
