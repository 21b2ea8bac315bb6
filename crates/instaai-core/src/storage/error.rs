use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access credential file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode stored value: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Could not find a data directory for credential storage")]
    NoDataDir,
}
