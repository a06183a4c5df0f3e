//! Persisted session key/value store.
//!
//! The controller and the auth flows only ever see the [`SessionStore`] trait,
//! so tests run against [`MemoryStore`] while the CLI persists to a JSON file
//! through [`FileStore`].

pub mod file;
pub mod memory;

use async_trait::async_trait;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Bearer credential issued after OTP verification.
pub const TOKEN_KEY: &str = "liveCustomerToken";
/// Written once (as `"false"`) after the first bootstrap of an install.
pub const FIRST_LAUNCH_KEY: &str = "isFirstLaunch";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("session store at {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String-keyed, string-valued store that survives process restarts.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Drops every key, including the first-launch flag.
    async fn clear(&self) -> Result<(), StoreError>;
}

/// Shortens a token for log output.
pub fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    if token.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{prefix}****")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_token_keeps_only_prefix() {
        assert_eq!(mask_token("abcdefgh"), "abcd****");
        assert_eq!(mask_token("abc"), "****");
        assert_eq!(mask_token(""), "****");
    }
}
