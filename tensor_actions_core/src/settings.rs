use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub solana_rpc_url: String,
    #[serde(default = "default_tensor_api_url")]
    pub tensor_api_url: String,
    pub tensor_api_key: String,
    #[serde(default = "default_image_service_url")]
    pub image_service_url: String,
    /// Public base URL this service is reachable at; used to build the
    /// actions.json rule mapping.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    #[serde(default = "default_api_host")]
    pub api_host: String,
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

impl Settings {
    pub fn from_file(path: &str) -> Result<Self, CoreError> {
        let builder = config::Config::builder().add_source(config::File::with_name(path));
        let cfg = builder.build()?;
        Ok(cfg.try_deserialize()?)
    }

    /// Validate settings ranges and constraints
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.solana_rpc_url.is_empty() {
            return Err(CoreError::Validation(
                "solana_rpc_url must be set".to_string(),
            ));
        }
        if self.tensor_api_key.is_empty() {
            return Err(CoreError::Validation(
                "tensor_api_key must be set".to_string(),
            ));
        }
        if self.api_port == 0 {
            return Err(CoreError::Validation("api_port must be > 0".to_string()));
        }
        for (name, value) in [
            ("solana_rpc_url", &self.solana_rpc_url),
            ("tensor_api_url", &self.tensor_api_url),
            ("image_service_url", &self.image_service_url),
            ("public_base_url", &self.public_base_url),
        ] {
            Url::parse(value)
                .map_err(|e| CoreError::Validation(format!("{} is not a valid URL: {}", name, e)))?;
        }
        Ok(())
    }
}

fn default_tensor_api_url() -> String {
    "https://api.mainnet.tensordev.io".to_string()
}
fn default_image_service_url() -> String {
    "https://image-generator-seven-gray.vercel.app/api/generate-photo.ts".to_string()
}
fn default_public_base_url() -> String {
    "https://tensorexplore.qseckn.workers.dev".to_string()
}
fn default_api_host() -> String {
    "0.0.0.0".to_string()
}
fn default_api_port() -> u16 {
    8080
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.example.toml");

    #[test]
    fn load_example_config() {
        // Validates that `Settings::from_file` can load the example config
        // and that defaulted fields come back with their expected values.
        let s = Settings::from_file(EXAMPLE_CONFIG).unwrap();
        assert_eq!(s.api_host, "0.0.0.0");
        assert_eq!(s.api_port, 8080);
        assert_eq!(s.tensor_api_url, "https://api.mainnet.tensordev.io");
        s.validate().unwrap();
    }

    #[test]
    fn rejects_empty_api_key() {
        let mut s = Settings::from_file(EXAMPLE_CONFIG).unwrap();
        s.tensor_api_key = String::new();
        assert!(s.validate().is_err());
    }

    #[test]
    fn rejects_malformed_urls() {
        let mut s = Settings::from_file(EXAMPLE_CONFIG).unwrap();
        s.public_base_url = "not a url".to_string();
        assert!(s.validate().is_err());
    }
}
