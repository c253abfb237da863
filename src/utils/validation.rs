use crate::utils::error::{LocatorError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> LocatorError {
    LocatorError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Only http(s) endpoints can be queried.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

/// A CSV location is either an http(s) URL or a local file path.
pub fn validate_csv_location(field_name: &str, location: &str) -> Result<()> {
    if is_remote(location) {
        return validate_url(field_name, location);
    }
    validate_path(field_name, location)
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    match path {
        "" => Err(invalid(field_name, path, "Path cannot be empty")),
        p if p.contains('\0') => Err(invalid(field_name, path, "Path contains null bytes")),
        _ => Ok(()),
    }
}

/// Limits and page sizes must be at least `min_value`.
pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

/// CKAN expects `filters` to be a JSON object of column -> value(s).
pub fn validate_filters(field_name: &str, filters: &serde_json::Value) -> Result<()> {
    if !filters.is_object() {
        return Err(invalid(field_name, filters, "Filters must be a JSON object"));
    }
    Ok(())
}
