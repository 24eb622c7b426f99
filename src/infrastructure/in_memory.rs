use crate::domain::ports::SettingsStore;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Operator settings shared by every settings store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub is_production: bool,
}

/// A thread-safe in-memory settings store.
///
/// Uses `Arc<RwLock<Settings>>` so clones share the same toggle. Readers
/// always see a whole `Settings` value, never a partial update.
#[derive(Default, Clone)]
pub struct InMemorySettingsStore {
    settings: Arc<RwLock<Settings>>,
}

impl InMemorySettingsStore {
    /// Creates a store starting in the dev environment.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
        }
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn is_production(&self) -> Result<bool> {
        let settings = self.settings.read().await;
        Ok(settings.is_production)
    }

    async fn set_production(&self, is_production: bool) -> Result<()> {
        let mut settings = self.settings.write().await;
        settings.is_production = is_production;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_to_dev() {
        let store = InMemorySettingsStore::new();
        assert!(!store.is_production().await.unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_toggle() {
        let store = InMemorySettingsStore::new();
        let other = store.clone();

        store.set_production(true).await.unwrap();
        assert!(other.is_production().await.unwrap());

        other.set_production(false).await.unwrap();
        assert!(!store.is_production().await.unwrap());
    }

    #[tokio::test]
    async fn test_with_settings() {
        let store = InMemorySettingsStore::with_settings(Settings {
            is_production: true,
        });
        assert!(store.is_production().await.unwrap());
    }
}
