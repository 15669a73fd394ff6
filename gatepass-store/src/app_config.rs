use serde::Deserialize;
use std::env;

use gatepass_checkout::fees::FeeConfig;
use gatepass_core::payment::BankDetails;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    #[serde(default)]
    pub banking: BankingConfig,
    #[serde(default)]
    pub fees: FeeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

fn default_storage_dir() -> String {
    ".gatepass".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

/// Hosted-gateway and manual-transfer settings. The gateway public key has
/// no committed default; it must come from the environment or a local
/// config file.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PaymentConfig {
    #[serde(default)]
    pub gateway_public_key: Option<String>,
    #[serde(default)]
    pub manual_transfer: Option<BankDetails>,
}

/// Bank-verification providers. Keys are optional; verification is simply
/// unavailable without them.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct BankingConfig {
    #[serde(default)]
    pub fincra_base_url: Option<String>,
    #[serde(default)]
    pub fincra_api_key: Option<String>,
    #[serde(default)]
    pub nubadi_base_url: Option<String>,
    #[serde(default)]
    pub nubadi_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            storage: StorageConfig::default(),
            payment: PaymentConfig::default(),
            banking: BankingConfig::default(),
            fees: FeeConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            // Environment-specific file, selected by RUN_MODE
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `GATEPASS_BACKEND__BASE_URL=https://api.gatepass.app`
            .add_source(config::Environment::with_prefix("GATEPASS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.backend.timeout_seconds, 30);
        assert_eq!(config.storage.dir, ".gatepass");
        assert!(config.payment.gateway_public_key.is_none());
        assert_eq!(config.fees.platform_flat, 80.0);
    }

    #[test]
    fn test_full_deserialization_from_json() {
        let raw = serde_json::json!({
            "backend": {"base_url": "https://api.example.com", "timeout_seconds": 10},
            "storage": {"dir": "/tmp/gp"},
            "payment": {
                "gateway_public_key": "pk_test_x",
                "manual_transfer": {
                    "bank_name": "First Bank",
                    "account_number": "0123456789",
                    "account_name": "Gatepass Ltd"
                }
            },
            "banking": {"fincra_base_url": "https://fincra.example"},
            "fees": {
                "gateway_rate": 0.015,
                "surcharge_threshold": 2500.0,
                "surcharge": 100.0,
                "gateway_cap": 2000.0,
                "platform_flat": 80.0
            }
        });

        let config: Config = serde_json::from_value(raw).unwrap();
        assert_eq!(config.backend.base_url, "https://api.example.com");
        assert_eq!(
            config.payment.manual_transfer.unwrap().bank_name,
            "First Bank"
        );
        assert_eq!(config.banking.fincra_base_url.as_deref(), Some("https://fincra.example"));
    }
}
