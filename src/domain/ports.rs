use crate::domain::model::{Address, Contact};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 原始位元組的讀寫，檔案型儲存用來保存快照
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Contact>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Contact>>;
    /// Inserts or fully replaces the record keyed by `contact.email`.
    async fn save(&self, contact: Contact) -> Result<Contact>;
    async fn delete_by_email(&self, email: &str) -> Result<Option<Contact>>;
}

#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn lookup(&self, postal_code: &str) -> Result<Address>;
}
