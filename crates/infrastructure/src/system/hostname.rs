use ferrous_named_domain::{qualify_host_name, DomainError};

/// Name this server announces in NS and additional records.
///
/// Uses `configured` when given, otherwise the system host name; either is
/// qualified with `domain` when it has no dot.
pub fn own_hostname(configured: Option<&str>, domain: &str) -> Result<String, DomainError> {
    let raw = match configured {
        Some(name) => name.to_string(),
        None => hostname::get()
            .map_err(|e| DomainError::IoError(format!("Failed to read host name: {}", e)))?
            .to_string_lossy()
            .into_owned(),
    };

    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidDomainName(
            "own host name is empty".to_string(),
        ));
    }
    Ok(qualify_host_name(name, domain))
}
