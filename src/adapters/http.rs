use crate::domain::{Address, AddressLookup};
use crate::utils::error::{ContactError, Result};
use crate::utils::validation::is_blank;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_VIACEP_URL: &str = "https://viacep.com.br";

/// ViaCEP 郵遞區號查詢：`GET {base}/ws/{cep}/json/`
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: Client,
    base_url: Url,
}

impl ViaCepClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ContactError::InvalidConfigValueError {
            field: "lookup.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ContactError::InvalidConfigValueError {
                field: "lookup.base_url".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn lookup_url(&self, postal_code: &str) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base 已在建構時排除
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["ws", postal_code, "json", ""]);
        }
        url
    }
}

#[async_trait]
impl AddressLookup for ViaCepClient {
    #[tracing::instrument(skip(self))]
    async fn lookup(&self, postal_code: &str) -> Result<Address> {
        if is_blank(postal_code) {
            return Err(ContactError::invalid_postal_code("postal code must be filled"));
        }

        let url = self.lookup_url(postal_code);
        tracing::debug!("Requesting address from: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Lookup response status: {}", status);

        // ViaCEP 對格式錯誤的 CEP 回傳 400
        if status.is_client_error() {
            return Err(ContactError::invalid_postal_code("invalid postal code"));
        }
        let response = response.error_for_status()?;

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ContactError::invalid_postal_code("invalid postal code"));
        }

        let address: Option<Address> =
            serde_json::from_slice(&body).map_err(|e| ContactError::LookupResponseError {
                message: e.to_string(),
            })?;
        match address {
            Some(address) if address.is_resolved() => Ok(address),
            _ => Err(ContactError::invalid_postal_code("invalid postal code")),
        }
    }
}
