use std::collections::HashMap;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::api::{Configuration, HttpOptions};

const CLIENT_NAME: &str = "fuse-plaid";
const CONFIG_NAME: &str = "config.toml";

/// Credential and environment settings, loaded from `FUSE_*` environment
/// variables layered over an optional TOML file.
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Plaid-style base path the caller already configures against.
    pub base_path: String,
    pub fuse: Credentials,
    /// Extra credential headers for the underlying aggregators, keyed by
    /// header name (e.g. `plaid-client-id`, `mx-api-key`).
    #[serde(default)]
    pub aggregators: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub client_id: String,
}

impl Settings {
    pub fn new(config_path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut s = Config::builder().add_source(Environment::with_prefix("FUSE"));

        if let Some(path) = config_path {
            s = s.add_source(File::with_name(path));
        } else {
            s = s.add_source(File::with_name(&default_config_path()).required(false));
        }

        s.build()?.try_deserialize()
    }

    /// Flattens the credential set into the header map the backend client
    /// attaches to every request.
    pub fn into_configuration(self) -> Configuration {
        let mut headers = HashMap::new();
        headers.insert(fuse_client::API_KEY_HEADER.to_string(), self.fuse.api_key);
        headers.insert(
            fuse_client::CLIENT_ID_HEADER.to_string(),
            self.fuse.client_id,
        );
        for (name, value) in self.aggregators {
            headers.insert(name.to_lowercase(), value);
        }

        Configuration {
            base_path: self.base_path,
            base_options: HttpOptions { headers },
        }
    }
}

fn default_config_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| std::env::current_dir().expect("read current working dir"))
        .join(CLIENT_NAME)
        .join(CONFIG_NAME)
        .display()
        .to_string()
}
