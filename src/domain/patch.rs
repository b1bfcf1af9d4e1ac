//! Partial updates: every patchable attribute of [`Contact`] is a variant of
//! [`ContactField`], so an unrecognized name fails before any field is touched.

use crate::domain::model::{parse_timestamp, Contact};
use crate::utils::error::{ContactError, Result};
use serde_json::{Map, Value};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Email,
    Name,
    Phone,
    PostalCode,
    Address,
    City,
    State,
    RegisteredAt,
}

impl ContactField {
    pub const ALL: [ContactField; 8] = [
        ContactField::Email,
        ContactField::Name,
        ContactField::Phone,
        ContactField::PostalCode,
        ContactField::Address,
        ContactField::City,
        ContactField::State,
        ContactField::RegisteredAt,
    ];

    /// 與 JSON 欄位名稱一致
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactField::Email => "email",
            ContactField::Name => "name",
            ContactField::Phone => "phone",
            ContactField::PostalCode => "postalCode",
            ContactField::Address => "address",
            ContactField::City => "city",
            ContactField::State => "state",
            ContactField::RegisteredAt => "registeredAt",
        }
    }

    pub fn apply(&self, contact: &mut Contact, value: &Value) -> Result<()> {
        match self {
            ContactField::Email => contact.email = self.required_string(value)?,
            ContactField::Name => contact.name = self.required_string(value)?,
            ContactField::Phone => contact.phone = self.required_string(value)?,
            ContactField::PostalCode => contact.postal_code = self.required_string(value)?,
            ContactField::Address => contact.address = self.optional_string(value)?,
            ContactField::City => contact.city = self.optional_string(value)?,
            ContactField::State => contact.state = self.optional_string(value)?,
            ContactField::RegisteredAt => {
                contact.registered_at = match self.optional_string(value)? {
                    Some(raw) => Some(parse_timestamp(&raw).map_err(|e| {
                        self.invalid_value(format!("expected dd/MM/yyyy HH:mm:ss ({})", e))
                    })?),
                    None => None,
                }
            }
        }
        Ok(())
    }

    fn required_string(&self, value: &Value) -> Result<String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Null => Err(self.invalid_value("field cannot be null")),
            other => Err(self.invalid_value(format!("expected a string, got {}", other))),
        }
    }

    fn optional_string(&self, value: &Value) -> Result<Option<String>> {
        match value {
            Value::String(s) => Ok(Some(s.clone())),
            Value::Null => Ok(None),
            other => Err(self.invalid_value(format!("expected a string or null, got {}", other))),
        }
    }

    fn invalid_value(&self, reason: impl Into<String>) -> ContactError {
        ContactError::InvalidFieldValueError {
            field: self.as_str().to_string(),
            reason: reason.into(),
        }
    }
}

impl FromStr for ContactField {
    type Err = ContactError;

    fn from_str(name: &str) -> Result<Self> {
        ContactField::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| ContactError::UnknownFieldError {
                field: name.to_string(),
            })
    }
}

/// Parses every field name first, then applies the values in order.
/// Nothing on `contact` changes if any name or value is rejected.
pub fn apply_patch(contact: &mut Contact, fields: &Map<String, Value>) -> Result<()> {
    let resolved = fields
        .iter()
        .map(|(name, value)| name.parse::<ContactField>().map(|field| (field, value)))
        .collect::<Result<Vec<_>>>()?;

    let mut patched = contact.clone();
    for (field, value) in resolved {
        field.apply(&mut patched, value)?;
    }

    *contact = patched;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Contact {
        let mut contact = Contact::new("a@b.com", "A", "123", "79050190");
        contact.city = Some("Campo Grande".to_string());
        contact
    }

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in ContactField::ALL {
            assert_eq!(field.as_str().parse::<ContactField>().unwrap(), field);
        }
    }

    #[test]
    fn test_patch_changes_only_named_fields() {
        let mut contact = sample();
        apply_patch(&mut contact, &as_map(json!({"name": "B", "postalCode": "01001000"}))).unwrap();

        assert_eq!(contact.name, "B");
        assert_eq!(contact.postal_code, "01001000");
        assert_eq!(contact.phone, "123");
        assert_eq!(contact.city.as_deref(), Some("Campo Grande"));
    }

    #[test]
    fn test_unknown_field_fails_without_touching_contact() {
        let mut contact = sample();
        let err = apply_patch(&mut contact, &as_map(json!({"name": "B", "nickname": "x"})))
            .unwrap_err();

        assert!(matches!(err, ContactError::UnknownFieldError { ref field } if field == "nickname"));
        assert_eq!(contact, sample());
    }

    #[test]
    fn test_wrong_value_type_is_rejected() {
        let mut contact = sample();
        let err = apply_patch(&mut contact, &as_map(json!({"phone": 55}))).unwrap_err();
        assert!(matches!(err, ContactError::InvalidFieldValueError { ref field, .. } if field == "phone"));

        let err = apply_patch(&mut contact, &as_map(json!({"name": null}))).unwrap_err();
        assert!(matches!(err, ContactError::InvalidFieldValueError { .. }));
        assert_eq!(contact, sample());
    }

    #[test]
    fn test_null_clears_optional_fields() {
        let mut contact = sample();
        apply_patch(&mut contact, &as_map(json!({"city": null}))).unwrap();
        assert!(contact.city.is_none());
    }

    #[test]
    fn test_registered_at_uses_display_format() {
        let mut contact = sample();
        apply_patch(
            &mut contact,
            &as_map(json!({"registeredAt": "05/03/2024 10:00:00"})),
        )
        .unwrap();
        assert!(contact.registered_at.is_some());

        let err = apply_patch(&mut contact, &as_map(json!({"registeredAt": "yesterday"})))
            .unwrap_err();
        assert!(matches!(err, ContactError::InvalidFieldValueError { .. }));
    }
}
