use super::in_memory::Settings;
use crate::domain::ports::SettingsStore;
use crate::error::Result;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Settings persisted as a small JSON document, e.g. `{"is_production":true}`.
///
/// The file is read on every call so an operator toggle made by another
/// process is picked up by the next event. A missing file means defaults.
#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn load(&self) -> Result<Settings> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Settings::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, settings: Settings) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write then rename so readers never observe a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec(&settings)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn is_production(&self) -> Result<bool> {
        Ok(self.load().await?.is_production)
    }

    async fn set_production(&self, is_production: bool) -> Result<()> {
        let mut settings = self.load().await?;
        settings.is_production = is_production;
        self.save(settings).await?;
        tracing::debug!(path = %self.path.display(), is_production, "Settings saved");
        Ok(())
    }
}
