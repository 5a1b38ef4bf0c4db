//! `in-addr.arpa` name handling for PTR lookups.

use std::net::Ipv4Addr;

use crate::errors::DomainError;

pub const REVERSE_SUFFIX: &str = ".in-addr.arpa";

/// Parses `d.c.b.a.in-addr.arpa` into `a.b.c.d`.
///
/// The suffix is matched case-insensitively. Anything other than four
/// decimal octets before the suffix is rejected.
pub fn parse_reverse_name(name: &str) -> Result<Ipv4Addr, DomainError> {
    let lower = name.to_ascii_lowercase();
    let dotted = lower
        .strip_suffix(REVERSE_SUFFIX)
        .ok_or_else(|| DomainError::InvalidPtrName(name.to_string()))?;

    let mut octets = [0u8; 4];
    let mut count = 0;
    for label in dotted.split('.') {
        if count == 4 || label.is_empty() || !label.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidPtrName(name.to_string()));
        }
        octets[count] = label
            .parse::<u8>()
            .map_err(|_| DomainError::InvalidPtrName(name.to_string()))?;
        count += 1;
    }
    if count != 4 {
        return Err(DomainError::InvalidPtrName(name.to_string()));
    }

    octets.reverse();
    Ok(Ipv4Addr::from(octets))
}

/// Reverse zone of a network: the octets of `network & netmask` in reverse
/// order with leading zero octets dropped, e.g. `192.168.1.0/24` gives
/// `1.168.192.in-addr.arpa`.
pub fn reverse_zone_name(network: Ipv4Addr, netmask: Ipv4Addr) -> String {
    let masked = Ipv4Addr::from(u32::from(network) & u32::from(netmask));
    let labels: Vec<String> = masked
        .octets()
        .iter()
        .rev()
        .skip_while(|octet| **octet == 0)
        .map(|octet| octet.to_string())
        .collect();

    if labels.is_empty() {
        REVERSE_SUFFIX.trim_start_matches('.').to_string()
    } else {
        format!("{}{}", labels.join("."), REVERSE_SUFFIX)
    }
}
