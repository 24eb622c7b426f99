use crate::error::{RelayError, Result};
use async_trait::async_trait;

/// Outbound HTTP seam used by the relay.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Posts `body` as JSON to `url` and returns the response status.
    ///
    /// Any received response, 2xx or not, is `Ok`. `Err` means no response
    /// was obtained and must be a `RelayError::TransportError`.
    async fn post_json(&self, url: &str, body: String) -> std::result::Result<u16, RelayError>;
}

/// Operator-controlled dev/prod toggle.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn is_production(&self) -> Result<bool>;
    async fn set_production(&self, is_production: bool) -> Result<()>;
}

pub type TransportBox = Box<dyn Transport>;
pub type SettingsStoreBox = Box<dyn SettingsStore>;
