use crate::utils::error::{AppError, Result};
use url::Url;

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

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
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

/// Token must be present, non-blank, and not a leftover `${VAR}` placeholder.
pub fn validate_access_token<'a>(field_name: &str, token: Option<&'a str>) -> Result<&'a str> {
    match token {
        Some(t) if t.starts_with("${") => {
            tracing::warn!("⚠️ {} refers to an unset variable: {}", field_name, t);
            Err(AppError::MissingConfigError {
                field: field_name.to_string(),
            })
        }
        Some(t) => {
            validate_non_empty_string(field_name, t)?;
            Ok(t)
        }
        None => Err(AppError::MissingConfigError {
            field: field_name.to_string(),
        }),
    }
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Valid values: {}", allowed.join(", ")),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("base_url", "https://api.mapbox.com").is_ok());
        assert!(validate_url("base_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("base_url", "").is_err());
        assert!(validate_url("base_url", "invalid-url").is_err());
        assert!(validate_url("base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timeout_seconds", 10, 1, 120).is_ok());
        assert!(validate_range("timeout_seconds", 0, 1, 120).is_err());
        assert!(validate_range("retry_attempts", 11u32, 0, 10).is_err());
    }

    #[test]
    fn test_validate_access_token() {
        assert_eq!(validate_access_token("access_token", Some("pk.abc")).unwrap(), "pk.abc");
        assert!(matches!(
            validate_access_token("access_token", None),
            Err(AppError::MissingConfigError { .. })
        ));
        assert!(matches!(
            validate_access_token("access_token", Some("${MAPBOX_ACCESS_TOKEN}")),
            Err(AppError::MissingConfigError { .. })
        ));
        assert!(matches!(
            validate_access_token("access_token", Some("   ")),
            Err(AppError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_validate_one_of_and_path() {
        assert!(validate_one_of("geometries", "polyline6", &["polyline", "polyline6"]).is_ok());
        assert!(validate_one_of("geometries", "geojson", &["polyline", "polyline6"]).is_err());
        assert!(validate_path("output", "route.json").is_ok());
        assert!(validate_path("output", "").is_err());
    }
}
