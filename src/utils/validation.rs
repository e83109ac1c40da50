use crate::utils::error::{EstimateError, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use url::Url;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(EstimateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(EstimateError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(EstimateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EstimateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EstimateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        match std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            Some(extension) if allowed_set.contains(extension) => {}
            Some(extension) => {
                return Err(EstimateError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
            None => {
                return Err(EstimateError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: "File has no extension or invalid filename".to_string(),
                });
            }
        }
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
        return Err(EstimateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 必填欄位，去除前後空白後不可為空
pub fn require_non_blank<'a>(field_name: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EstimateError::MissingField {
            field: field_name.to_string(),
        });
    }
    Ok(trimmed)
}

/// 解析物品數量 (非負整數)
pub fn parse_count(field_name: &str, value: &str) -> Result<u32> {
    let trimmed = require_non_blank(field_name, value)?;
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(EstimateError::invalid_input(
            field_name,
            trimmed,
            "must be a non-negative integer",
        ));
    }
    trimmed
        .parse::<u32>()
        .map_err(|e| EstimateError::invalid_input(field_name, trimmed, &e.to_string()))
}

pub fn parse_moving_date(field_name: &str, value: &str) -> Result<NaiveDate> {
    let trimmed = require_non_blank(field_name, value)?;
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        EstimateError::invalid_input(field_name, trimmed, "expected a calendar date (YYYY-MM-DD)")
    })
}

/// 只允許數字的欄位 (郵遞區號、都道府縣代碼)
pub fn validate_numeric(field_name: &str, value: &str) -> Result<()> {
    let trimmed = require_non_blank(field_name, value)?;
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(EstimateError::invalid_input(
            field_name,
            trimmed,
            "must contain digits only",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("postal.endpoint", "https://example.com").is_ok());
        assert!(validate_url("postal.endpoint", "http://example.com").is_ok());
        assert!(validate_url("postal.endpoint", "").is_err());
        assert!(validate_url("postal.endpoint", "invalid-url").is_err());
        assert!(validate_url("postal.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = vec!["distances.csv".to_string()];
        assert!(validate_file_extensions("distance_table.csv", &files, &["csv"]).is_ok());

        let invalid_files = vec!["distances.txt".to_string()];
        assert!(validate_file_extensions("distance_table.csv", &invalid_files, &["csv"]).is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("box", "12").unwrap(), 12);
        assert_eq!(parse_count("box", " 0 ").unwrap(), 0);
        assert!(matches!(
            parse_count("box", ""),
            Err(EstimateError::MissingField { .. })
        ));
        assert!(matches!(
            parse_count("box", "-1"),
            Err(EstimateError::InvalidInput { .. })
        ));
        assert!(parse_count("box", "1.5").is_err());
        assert!(parse_count("box", "99999999999").is_err());
    }

    #[test]
    fn test_parse_moving_date() {
        let date = parse_moving_date("moving_date", "2026-03-28").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 3, 28).unwrap());
        assert!(parse_moving_date("moving_date", "2026-02-30").is_err());
        assert!(parse_moving_date("moving_date", "28/03/2026").is_err());
    }
}
