use crate::utils::error::{AppError, Result};
use regex::Regex;
use url::Url;

/// `${VAR}` references substituted from the environment when a config file is loaded.
pub const ENV_PLACEHOLDER_PATTERN: &str = r"\$\{([^}]+)\}";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AppError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_contains(field_name: &str, value: &str, needle: &str) -> Result<()> {
    if !value.contains(needle) {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must contain the '{}' placeholder", needle),
        });
    }
    Ok(())
}

/// Rejects values that still carry a `${VAR}` reference whose variable was not set.
pub fn validate_resolved(field_name: &str, value: &str) -> Result<()> {
    let re = Regex::new(ENV_PLACEHOLDER_PATTERN).map_err(|e| AppError::ConfigValidationError {
        field: field_name.to_string(),
        message: format!("invalid substitution pattern: {}", e),
    })?;

    match re.captures(value) {
        Some(caps) => Err(AppError::MissingConfigError {
            field: format!("{} (environment variable {} is not set)", field_name, &caps[1]),
        }),
        None => Ok(()),
    }
}
