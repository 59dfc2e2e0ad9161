use std::sync::OnceLock;

use regex::Regex;

/// Validate a trimmed string length within [min, max]. Returns the trimmed
/// value so callers store a canonical form.
pub fn validate_bounded_string(
    value: &str,
    field: &str,
    min: usize,
    max: usize,
) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.len() < min {
        return Err(format!("{field} must be at least {min} characters"));
    }
    if trimmed.len() > max {
        return Err(format!("{field} must be at most {max} characters"));
    }
    Ok(trimmed.to_string())
}

/// Validate that a value is one of an allowed set.
pub fn validate_enum_string(value: &str, field: &str, allowed: &[&str]) -> Result<(), String> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(format!(
        "{field} must be one of: {}",
        allowed.join(", ")
    ))
}

/// Validate an opaque entity id: uuid-ish slugs only, no path or SQL noise.
pub fn validate_id_slug(value: &str, field: &str) -> Result<(), String> {
    static ID_RE: OnceLock<Regex> = OnceLock::new();
    let re = ID_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,127}$").expect("id regex"));
    if re.is_match(value) {
        Ok(())
    } else {
        Err(format!("{field} is not a valid identifier"))
    }
}

/// Validate a YYYY-MM-DD date string.
pub fn validate_yyyy_mm_dd(value: &str, field: &str) -> Result<(), String> {
    if chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
        Ok(())
    } else {
        Err(format!("{field} must be a YYYY-MM-DD date"))
    }
}

/// Validate an RFC 3339 timestamp (booking payloads carry these).
pub fn validate_rfc3339(value: &str, field: &str) -> Result<(), String> {
    if chrono::DateTime::parse_from_rfc3339(value).is_ok() {
        Ok(())
    } else {
        Err(format!("{field} must be an RFC 3339 timestamp"))
    }
}

/// Display name used in task titles when the lead's name is blank.
pub const FALLBACK_DISPLAY_NAME: &str = "Client";

/// Trimmed display name with the blank fallback applied.
pub fn display_name_or_fallback(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        FALLBACK_DISPLAY_NAME
    } else {
        trimmed
    }
}

/// Convert a display name to a URL-safe kebab-case slug.
///
/// Example: "Acme Corp" -> "acme-corp"
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
