use crate::utils::error::{Result, StoreError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(StoreError::config(field_name, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(StoreError::config(
                field_name,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(StoreError::config(
            field_name,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StoreError::config(
            field_name,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(StoreError::config(
            field_name,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

/// GCP 專案 ID：小寫字母、數字、連字號，長度 6–30。
/// 模擬器可接受任意名稱，所以只在連正式服務時檢查格式。
pub fn validate_project_id(field_name: &str, project_id: &str) -> Result<()> {
    validate_non_empty_string(field_name, project_id)?;

    let valid_chars = project_id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    let starts_with_letter = project_id
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase());

    if !valid_chars || !starts_with_letter || !(6..=30).contains(&project_id.len()) {
        return Err(StoreError::config(
            field_name,
            format!(
                "'{}' is not a valid project id (6-30 chars, lowercase letters, digits, hyphens)",
                project_id
            ),
        ));
    }
    Ok(())
}

pub fn validate_host_port(field_name: &str, value: &str) -> Result<()> {
    let Some((host, port)) = value.rsplit_once(':') else {
        return Err(StoreError::config(
            field_name,
            format!("'{}' must be in host:port form", value),
        ));
    };
    if host.is_empty() || port.parse::<u16>().is_err() {
        return Err(StoreError::config(
            field_name,
            format!("'{}' must be in host:port form", value),
        ));
    }
    Ok(())
}
