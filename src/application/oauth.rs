//! OAuth provider credentials derived from the configuration cache.
//!
//! Credentials live in config rows and may change at runtime; instead
//! of mutating process-global configuration, callers take a snapshot
//! from the cached mapping whenever they need one.

use serde::Serialize;

use crate::domain::view_data::ConfigMap;

/// Client credentials for a single OAuth provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OauthClient {
    pub client_id: String,
    pub client_secret: String,
}

impl OauthClient {
    fn from_config(config: &ConfigMap, id_key: &str, secret_key: &str) -> Self {
        Self {
            client_id: config.get(id_key).to_string(),
            client_secret: config.get(secret_key).to_string(),
        }
    }

    /// True when both halves of the credential are present.
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

/// Snapshot of the three third-party sign-in integrations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OauthProviders {
    pub github: OauthClient,
    pub qq: OauthClient,
    pub weibo: OauthClient,
}

impl OauthProviders {
    /// Build a snapshot from the config mapping. Missing rows resolve
    /// to empty credentials; no error is raised.
    pub fn from_config(config: &ConfigMap) -> Self {
        Self {
            github: OauthClient::from_config(config, "GITHUB_CLIENT_ID", "GITHUB_CLIENT_SECRET"),
            qq: OauthClient::from_config(config, "QQ_APP_ID", "QQ_APP_KEY"),
            weibo: OauthClient::from_config(config, "SINA_API_KEY", "SINA_SECRET"),
        }
    }
}
