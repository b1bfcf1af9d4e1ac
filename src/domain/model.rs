use crate::utils::error::Result;
use crate::utils::validation::{Validate, Violations};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const EMAIL_MAX_LEN: usize = 100;
pub const NAME_MAX_LEN: usize = 150;
pub const PHONE_MAX_LEN: usize = 15;
pub const POSTAL_CODE_MAX_LEN: usize = 9;

/// 對外的時間格式，例如 `19/10/2026 14:05:00`
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, with = "registered_at_format")]
    pub registered_at: Option<DateTime<Utc>>,
}

impl Contact {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        phone: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            phone: phone.into(),
            postal_code: postal_code.into(),
            ..Default::default()
        }
    }

    /// 以查詢結果覆蓋地址欄位
    pub fn apply_address(&mut self, address: &Address) {
        self.address = Some(address.street_line());
        self.city = Some(address.localidade.clone());
        self.state = Some(address.uf.clone());
    }

    pub fn violations(&self) -> Violations {
        let mut violations = Violations::new();
        violations
            .require_email("email", &self.email)
            .require_non_blank("name", &self.name)
            .require_non_blank("phone", &self.phone)
            .require_non_blank("postalCode", &self.postal_code)
            .require_max_len("email", &self.email, EMAIL_MAX_LEN)
            .require_max_len("name", &self.name, NAME_MAX_LEN)
            .require_max_len("phone", &self.phone, PHONE_MAX_LEN)
            .require_max_len("postalCode", &self.postal_code, POSTAL_CODE_MAX_LEN);
        violations
    }
}

impl Validate for Contact {
    fn validate(&self) -> Result<()> {
        self.violations().into_result()
    }
}

/// ViaCEP 回傳的地址，只保留會用到的欄位
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub localidade: String,
    #[serde(default)]
    pub uf: String,
}

impl Address {
    pub fn street_line(&self) -> String {
        format!("{}, {}", self.logradouro, self.bairro)
    }

    /// 查無資料時 ViaCEP 不會回傳 cep
    pub fn is_resolved(&self) -> bool {
        self.cep.as_deref().is_some_and(|cep| !cep.trim().is_empty())
    }
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    chrono::NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map(|naive| naive.and_utc())
}

mod registered_at_format {
    use super::{format_timestamp, parse_timestamp};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&format_timestamp(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| parse_timestamp(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
