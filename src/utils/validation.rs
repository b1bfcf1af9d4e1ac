use crate::utils::error::{ContactError, Result, Violation};
use regex::Regex;
use std::net::SocketAddr;
use std::sync::LazyLock;
use url::Url;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern must compile")
});

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// `local@domain.tld`
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// 收集欄位錯誤而不是在第一個錯誤就中斷
#[derive(Debug, Default)]
pub struct Violations {
    items: Vec<Violation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_non_blank(&mut self, field: &str, value: &str) -> &mut Self {
        if is_blank(value) {
            self.items
                .push(Violation::new(field, format!("{} is required", field)));
        }
        self
    }

    pub fn require_email(&mut self, field: &str, value: &str) -> &mut Self {
        if is_blank(value) {
            self.items
                .push(Violation::new(field, format!("{} is required", field)));
        } else if !is_valid_email(value) {
            self.items
                .push(Violation::new(field, format!("{} has an invalid format", field)));
        }
        self
    }

    /// 長度以字元計算
    pub fn require_max_len(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.items.push(Violation::new(
                field,
                format!("{} must be at most {} characters", field, max),
            ));
        }
        self
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.items
    }

    pub fn into_result(self) -> Result<()> {
        if self.items.is_empty() {
            Ok(())
        } else {
            Err(ContactError::validation(self.items))
        }
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ContactError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_socket_addr(field_name: &str, value: &str) -> Result<()> {
    value
        .parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|e| ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_route_prefix(field_name: &str, value: &str) -> Result<()> {
    if !value.starts_with('/') {
        return Err(ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Route prefix must start with '/'".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| ContactError::MissingConfigError {
            field: field_name.to_string(),
        })
}
