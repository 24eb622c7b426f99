use serde::{Deserialize, Serialize};
use std::fmt;

/// Which backend a relay attempt targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

impl Environment {
    pub fn from_production_flag(is_production: bool) -> Self {
        if is_production { Self::Prod } else { Self::Dev }
    }

    pub fn is_production(self) -> bool {
        self == Self::Prod
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dev => f.write_str("dev"),
            Self::Prod => f.write_str("prod"),
        }
    }
}

/// Deploy-time values: both backend hosts and the shared signing secret.
///
/// These never change while the process runs; only the dev/prod toggle does.
#[derive(Clone, PartialEq, Eq)]
pub struct Deployment {
    pub dev_host: String,
    pub prod_host: String,
    pub secret_key: String,
}

impl Deployment {
    pub fn new(
        dev_host: impl Into<String>,
        prod_host: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            dev_host: dev_host.into(),
            prod_host: prod_host.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Builds an owned snapshot for one relay attempt.
    pub fn snapshot(&self, is_production: bool) -> EnvironmentConfig {
        EnvironmentConfig {
            is_production,
            dev_host: self.dev_host.clone(),
            prod_host: self.prod_host.clone(),
            secret_key: self.secret_key.clone(),
        }
    }
}

impl fmt::Debug for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deployment")
            .field("dev_host", &self.dev_host)
            .field("prod_host", &self.prod_host)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Everything a single relay attempt needs to pick a host and sign.
#[derive(Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    pub is_production: bool,
    pub dev_host: String,
    pub prod_host: String,
    pub secret_key: String,
}

impl EnvironmentConfig {
    pub fn environment(&self) -> Environment {
        Environment::from_production_flag(self.is_production)
    }

    pub fn host(&self) -> &str {
        if self.is_production {
            &self.prod_host
        } else {
            &self.dev_host
        }
    }

    /// `{host}/payment`, concatenated as-is.
    pub fn payment_url(&self) -> String {
        format!("{}/payment", self.host())
    }
}

impl fmt::Debug for EnvironmentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentConfig")
            .field("is_production", &self.is_production)
            .field("dev_host", &self.dev_host)
            .field("prod_host", &self.prod_host)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
