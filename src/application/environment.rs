use crate::domain::config::{Deployment, EnvironmentConfig};
use crate::domain::ports::{SettingsStore, SettingsStoreBox};
use crate::error::Result;

/// Combines the fixed deployment values with the operator toggle.
///
/// Nothing is cached: every `snapshot` reads the toggle again, so a switch
/// takes effect on the next event.
pub struct EnvironmentSource {
    deployment: Deployment,
    settings: SettingsStoreBox,
}

impl EnvironmentSource {
    pub fn new(deployment: Deployment, settings: SettingsStoreBox) -> Self {
        Self {
            deployment,
            settings,
        }
    }

    pub async fn snapshot(&self) -> Result<EnvironmentConfig> {
        let is_production = self.settings.is_production().await?;
        Ok(self.deployment.snapshot(is_production))
    }
}
