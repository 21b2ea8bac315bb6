//! Durable key-value backends for the credential store.

use std::collections::{BTreeMap, HashMap};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use keyring::credential::CredentialBuilder;
use keyring::Entry;
use tracing::{debug, warn};

use super::StorageError;

/// Application name used for the data directory and keychain service
const APP_NAME: &str = "instaai";

/// Credential file name in the data directory
const CREDENTIALS_FILE: &str = "credentials.json";

/// Durable string storage. Removing a key that is not present succeeds.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// ============================================================================
// File
// ============================================================================

/// All keys in a single JSON object on disk.
///
/// Every write replaces the file through a temp file and a rename, so a crash
/// mid-write leaves the previous contents intact.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.local/share/instaai/credentials.json` or the platform equivalent
    pub fn default_location() -> Result<Self, StorageError> {
        let data_dir = dirs::data_dir().ok_or(StorageError::NoDataDir)?;
        Ok(Self::new(data_dir.join(APP_NAME).join(CREDENTIALS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load the map for modification. A corrupt file is replaced rather than
    /// blocking every future write.
    fn read_map_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_map() {
            Err(StorageError::Serialize(e)) => {
                warn!(path = %self.path.display(), error = %e, "Credential file is corrupt, starting fresh");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        let mut file = open_private(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Open `path` for writing, owner-only before any byte lands on disk.
#[cfg(unix)]
fn open_private(path: &Path) -> Result<File, StorageError> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation; a leftover temp file keeps its bits
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> Result<File, StorageError> {
    Ok(OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?)
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.read_map_for_write()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut map = self.read_map_for_write()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

// ============================================================================
// OS keychain
// ============================================================================

/// One keychain entry per key, under a shared service name.
///
/// Entries are created once per key and reused, so every read and write for
/// a key goes through the same credential handle.
pub struct KeyringStore {
    service: String,
    builder: Option<Box<CredentialBuilder>>,
    entries: Mutex<HashMap<String, Arc<Entry>>>,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self::with_service(APP_NAME)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            builder: None,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Use `builder` instead of the platform keychain (e.g. keyring's mock store)
    pub fn with_credential_builder(
        service: impl Into<String>,
        builder: Box<CredentialBuilder>,
    ) -> Self {
        Self {
            builder: Some(builder),
            ..Self::with_service(service)
        }
    }

    fn entry(&self, key: &str) -> Result<Arc<Entry>, StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get(key) {
            return Ok(Arc::clone(entry));
        }

        let entry = match self.builder {
            Some(ref builder) => {
                Entry::new_with_credential(builder.build(None, &self.service, key)?)
            }
            None => Entry::new(&self.service, key)?,
        };
        let entry = Arc::new(entry);
        entries.insert(key.to_string(), Arc::clone(&entry));
        Ok(entry)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entry(key)?.set_password(value)?;
        debug!(service = %self.service, key, "Stored keychain entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Memory
// ============================================================================

/// Process-local storage; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}
