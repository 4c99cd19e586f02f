use thiserror::Error;

/// Failures of the local key-value store backing profiles and history.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Stored value for key '{key}' is not valid JSON: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Store lock was poisoned")]
    Poisoned,
}

/// Problems with a question catalog's shape. Raised only while building a
/// catalog, never during selection.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("Catalog has no '{0}' mode")]
    MissingMode(String),
    #[error("Mode '{0}' has no 'default' question pool")]
    MissingDefaultPool(String),
    #[error("Pool '{mode}/{industry}' is empty")]
    EmptyPool { mode: String, industry: String },
}

/// A device channel failure. These are surfaced as short inline messages
/// next to the affected channel and never end a session.
#[derive(Debug, Clone, Error, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ChannelError {
    #[error("{0} access denied")]
    PermissionDenied(String),
    #[error("No {0} device found")]
    DeviceNotFound(String),
    #[error("{0} is not supported on this device")]
    Unsupported(String),
    #[error("{0}")]
    Failed(String),
}
