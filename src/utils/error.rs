use serde::Serialize;
use thiserror::Error;

/// 單一欄位的驗證錯誤
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("Validation failed: {}", format_violations(.violations))]
    ValidationError { violations: Vec<Violation> },

    #[error("Contact not found: {email}")]
    NotFoundError { email: String },

    #[error("Address lookup failed, {message}")]
    InvalidPostalCodeError { message: String },

    #[error("Unknown contact field: {field}")]
    UnknownFieldError { field: String },

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidFieldValueError { field: String, reason: String },

    #[error("Address lookup request failed: {0}")]
    LookupError(#[from] reqwest::Error),

    #[error("Address lookup returned an unreadable response: {message}")]
    LookupResponseError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
}

impl ContactError {
    pub fn not_found(email: impl Into<String>) -> Self {
        Self::NotFoundError {
            email: email.into(),
        }
    }

    pub fn invalid_postal_code(message: impl Into<String>) -> Self {
        Self::InvalidPostalCodeError {
            message: message.into(),
        }
    }

    pub fn validation(violations: Vec<Violation>) -> Self {
        Self::ValidationError { violations }
    }

    /// 對應到 HTTP 回應的狀態碼
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ValidationError { .. }
            | Self::InvalidPostalCodeError { .. }
            | Self::InvalidFieldValueError { .. } => 400,
            Self::NotFoundError { .. } => 404,
            Self::LookupError(_) | Self::LookupResponseError { .. } => 502,
            Self::UnknownFieldError { .. }
            | Self::IoError(_)
            | Self::SerializationError(_)
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigParseError { .. } => 500,
        }
    }

    /// 錯誤種類，用於回應內容與日誌
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => "validation_error",
            Self::NotFoundError { .. } => "not_found",
            Self::InvalidPostalCodeError { .. } => "invalid_postal_code",
            Self::UnknownFieldError { .. } => "unknown_field",
            Self::InvalidFieldValueError { .. } => "invalid_field_value",
            Self::LookupError(_) => "lookup_unavailable",
            Self::LookupResponseError { .. } => "lookup_invalid_response",
            Self::IoError(_) | Self::SerializationError(_) => "storage_error",
            Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigParseError { .. } => "config_error",
        }
    }

    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            Self::ValidationError { violations } => Some(violations),
            _ => None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ContactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ContactError::not_found("a@b.com").status_code(), 404);
        assert_eq!(ContactError::invalid_postal_code("invalid postal code").status_code(), 400);
        assert_eq!(
            ContactError::UnknownFieldError {
                field: "nickname".to_string()
            }
            .status_code(),
            500
        );
        assert!(ContactError::validation(vec![]).is_client_error());
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let err = ContactError::validation(vec![
            Violation::new("name", "name is required"),
            Violation::new("phone", "phone is required"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: name: name is required; phone: phone is required"
        );
    }
}
