use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("No development access token configured")]
    MissingDevToken,

    #[error("No login redirect URL configured")]
    MissingLoginUrl,

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, GatewayError>;
