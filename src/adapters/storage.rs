use crate::domain::{Contact, ContactRepository, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let full_path = Path::new(&self.base_path).join(path);
        match fs::read(full_path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // 先寫暫存檔再改名，避免留下寫一半的快照
        let tmp_path = full_path.with_extension("json.tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(tmp_path, full_path)?;
        Ok(())
    }
}

/// 以 email 為鍵的記憶體儲存
#[derive(Debug, Default)]
pub struct InMemoryContactRepository {
    contacts: RwLock<BTreeMap<String, Contact>>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contacts(contacts: impl IntoIterator<Item = Contact>) -> Self {
        let map = contacts
            .into_iter()
            .map(|c| (c.email.clone(), c))
            .collect();
        Self {
            contacts: RwLock::new(map),
        }
    }

    pub fn len(&self) -> usize {
        self.contacts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.read().is_empty()
    }

    fn snapshot(&self) -> Vec<Contact> {
        self.contacts.read().values().cloned().collect()
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn find_all(&self) -> Result<Vec<Contact>> {
        Ok(self.snapshot())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Contact>> {
        Ok(self.contacts.read().get(email).cloned())
    }

    async fn save(&self, contact: Contact) -> Result<Contact> {
        self.contacts
            .write()
            .insert(contact.email.clone(), contact.clone());
        Ok(contact)
    }

    async fn delete_by_email(&self, email: &str) -> Result<Option<Contact>> {
        Ok(self.contacts.write().remove(email))
    }
}

/// 記憶體儲存加上 JSON 快照，每次寫入後整份寫回檔案
///
/// Writes hold `write_lock` while building the next map, persisting it and
/// swapping it in, so the file never lags a newer in-memory state and a
/// failed write leaves the map untouched.
pub struct FileContactRepository<S: Storage> {
    inner: InMemoryContactRepository,
    write_lock: Mutex<()>,
    storage: S,
    file_name: String,
}

impl<S: Storage> FileContactRepository<S> {
    /// Loads the existing snapshot, if any, from `file_name` inside `storage`.
    pub async fn open(storage: S, file_name: impl Into<String>) -> Result<Self> {
        let file_name = file_name.into();
        let contacts: Vec<Contact> = match storage.read_file(&file_name).await? {
            Some(data) if !data.is_empty() => serde_json::from_slice(&data)?,
            _ => Vec::new(),
        };
        tracing::info!("Loaded {} contacts from {}", contacts.len(), file_name);

        Ok(Self {
            inner: InMemoryContactRepository::with_contacts(contacts),
            write_lock: Mutex::new(()),
            storage,
            file_name,
        })
    }

    async fn persist(&self, contacts: &BTreeMap<String, Contact>) -> Result<()> {
        let data = serde_json::to_vec_pretty(&contacts.values().collect::<Vec<_>>())?;
        self.storage.write_file(&self.file_name, &data).await?;
        tracing::debug!("Wrote {} contacts to {}", contacts.len(), self.file_name);
        Ok(())
    }
}

impl FileContactRepository<LocalStorage> {
    /// 拆成目錄與檔名後交給 `LocalStorage`
    pub async fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path: PathBuf = path.into();
        let base = path
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "contacts.json".to_string());
        Self::open(LocalStorage::new(base), file_name).await
    }
}

#[async_trait]
impl<S: Storage> ContactRepository for FileContactRepository<S> {
    async fn find_all(&self) -> Result<Vec<Contact>> {
        self.inner.find_all().await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Contact>> {
        self.inner.find_by_email(email).await
    }

    async fn save(&self, contact: Contact) -> Result<Contact> {
        let _guard = self.write_lock.lock().await;

        let mut next = self.inner.contacts.read().clone();
        next.insert(contact.email.clone(), contact.clone());
        // 檔案寫入成功後才更新記憶體
        self.persist(&next).await?;
        *self.inner.contacts.write() = next;

        Ok(contact)
    }

    async fn delete_by_email(&self, email: &str) -> Result<Option<Contact>> {
        let _guard = self.write_lock.lock().await;

        let mut next = self.inner.contacts.read().clone();
        let Some(removed) = next.remove(email) else {
            return Ok(None);
        };
        self.persist(&next).await?;
        *self.inner.contacts.write() = next;

        Ok(Some(removed))
    }
}
