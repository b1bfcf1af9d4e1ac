use crate::domain::{apply_patch, AddressLookup, Contact, ContactRepository};
use crate::utils::error::{ContactError, Result, Violation};
use crate::utils::validation::{is_blank, Validate};
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Contact business rules. Every write re-derives the address fields from a
/// fresh lookup of the contact's postal code before it reaches the store.
#[derive(Clone)]
pub struct ContactService {
    repository: Arc<dyn ContactRepository>,
    lookup: Arc<dyn AddressLookup>,
}

impl ContactService {
    pub fn new(repository: Arc<dyn ContactRepository>, lookup: Arc<dyn AddressLookup>) -> Self {
        Self { repository, lookup }
    }

    #[instrument(skip(self, contact), fields(email = %contact.email))]
    pub async fn create(&self, contact: Contact) -> Result<Contact> {
        self.enrich_and_save(contact).await
    }

    pub async fn list_all(&self) -> Result<Vec<Contact>> {
        let contacts = self.repository.find_all().await?;
        debug!("Listed {} contacts", contacts.len());
        Ok(contacts)
    }

    #[instrument(skip(self))]
    pub async fn get_by_email(&self, email: &str) -> Result<Contact> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| ContactError::not_found(email))
    }

    #[instrument(skip(self))]
    pub async fn delete_by_email(&self, email: &str) -> Result<Contact> {
        let existing = self.get_by_email(email).await?;
        // 兩次查詢之間可能已被其他請求刪除
        let removed = self
            .repository
            .delete_by_email(&existing.email)
            .await?
            .ok_or_else(|| ContactError::not_found(email))?;

        info!("Deleted contact");
        Ok(removed)
    }

    /// Replaces the stored record; the key from `email` wins over `new_data.email`.
    #[instrument(skip(self, new_data))]
    pub async fn replace(&self, email: &str, mut new_data: Contact) -> Result<Contact> {
        let existing = self.get_by_email(email).await?;
        new_data.email = existing.email;
        self.enrich_and_save(new_data).await
    }

    #[instrument(skip(self, fields))]
    pub async fn patch(&self, email: &str, fields: &Map<String, Value>) -> Result<Contact> {
        let mut contact = self.get_by_email(email).await?;
        let original_email = contact.email.clone();

        apply_patch(&mut contact, fields)?;
        debug!("Applied {} patched fields", fields.len());

        if contact.email != original_email {
            return Err(ContactError::validation(vec![Violation::new(
                "email",
                "email identifies the contact and cannot be changed",
            )]));
        }
        contact.validate()?;

        self.enrich_and_save(contact).await
    }

    async fn enrich_and_save(&self, mut contact: Contact) -> Result<Contact> {
        if !is_blank(&contact.email) {
            let address = self.lookup.lookup(&contact.postal_code).await?;
            contact.apply_address(&address);

            if contact.registered_at.is_none() {
                contact.registered_at = Some(Utc::now());
            }
        }

        let saved = self.repository.save(contact).await?;
        info!(
            city = saved.city.as_deref().unwrap_or_default(),
            state = saved.state.as_deref().unwrap_or_default(),
            "Saved contact"
        );
        Ok(saved)
    }
}
