/// Longest name accepted by a lookup, in bytes (RFC 1035 presentation form).
pub const MAX_DOMAIN_NAME_LEN: usize = 253;

pub fn validate_domain_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("domain name cannot be empty".to_string());
    }
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    if trimmed.len() > MAX_DOMAIN_NAME_LEN {
        return Err(format!(
            "domain name cannot exceed {MAX_DOMAIN_NAME_LEN} characters"
        ));
    }
    if trimmed.split('.').any(|label| label.is_empty() || label.len() > 63) {
        return Err("domain name labels must be between 1 and 63 characters".to_string());
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err("domain name cannot contain whitespace".to_string());
    }
    Ok(())
}
