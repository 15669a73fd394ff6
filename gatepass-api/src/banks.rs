use serde::Deserialize;
use serde_json::json;

use gatepass_shared::{Bank, BankAccount};
use gatepass_store::app_config::BankingConfig;

use crate::error::ApiError;

/// Provider responses wrap the account under a `data` envelope
#[derive(Debug, Deserialize)]
struct ProviderEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ProviderAccount {
    account_name: String,
    account_number: String,
    #[serde(default)]
    bank_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderBank {
    name: String,
    code: String,
}

/// Thin client over the bank-verification providers, normalizing every
/// response to `BankAccount`. The providers hold the API keys; nothing
/// here is business logic.
pub struct BankService {
    http: reqwest::Client,
    config: BankingConfig,
}

impl BankService {
    pub fn new(config: BankingConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn provider(
        &self,
        base_url: &Option<String>,
        api_key: &Option<String>,
    ) -> Result<(String, String), ApiError> {
        match (base_url, api_key) {
            (Some(url), Some(key)) => Ok((url.clone(), key.clone())),
            _ => Err(ApiError::Config(
                "Bank verification is not configured".to_string(),
            )),
        }
    }

    /// Resolve an account name via the primary provider
    pub async fn verify_account(
        &self,
        account_number: &str,
        bank_code: &str,
    ) -> Result<BankAccount, ApiError> {
        let (base_url, api_key) =
            self.provider(&self.config.fincra_base_url, &self.config.fincra_api_key)?;

        let response = self
            .http
            .post(format!("{}/core/accounts/resolve", base_url))
            .header("api-key", api_key)
            .json(&json!({
                "accountNumber": account_number,
                "bankCode": bank_code,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Api {
                status: response.status().as_u16(),
                message: "Account verification failed".to_string(),
            });
        }

        let envelope: ProviderEnvelope<ProviderAccount> = response.json().await?;
        Ok(normalize(envelope.data, bank_code))
    }

    /// List supported banks from the primary provider
    pub async fn list_banks(&self) -> Result<Vec<Bank>, ApiError> {
        let (base_url, api_key) =
            self.provider(&self.config.fincra_base_url, &self.config.fincra_api_key)?;

        let response = self
            .http
            .get(format!("{}/core/banks", base_url))
            .header("api-key", api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Api {
                status: response.status().as_u16(),
                message: "Failed to load bank list".to_string(),
            });
        }

        let envelope: ProviderEnvelope<Vec<ProviderBank>> = response.json().await?;
        Ok(envelope
            .data
            .into_iter()
            .map(|b| Bank {
                name: b.name,
                code: b.code,
            })
            .collect())
    }

    /// Resolve an account name via the fallback provider
    pub async fn verify_account_fallback(
        &self,
        account_number: &str,
        bank_code: &str,
    ) -> Result<BankAccount, ApiError> {
        let (base_url, api_key) =
            self.provider(&self.config.nubadi_base_url, &self.config.nubadi_api_key)?;

        let response = self
            .http
            .post(format!("{}/verify", base_url))
            .bearer_auth(api_key)
            .json(&json!({
                "account_number": account_number,
                "bank_code": bank_code,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Api {
                status: response.status().as_u16(),
                message: "Account verification failed".to_string(),
            });
        }

        let envelope: ProviderEnvelope<ProviderAccount> = response.json().await?;
        Ok(normalize(envelope.data, bank_code))
    }
}

fn normalize(account: ProviderAccount, requested_bank_code: &str) -> BankAccount {
    BankAccount {
        account_name: account.account_name,
        account_number: account.account_number,
        bank_code: account
            .bank_code
            .unwrap_or_else(|| requested_bank_code.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_backfills_bank_code() {
        let account = ProviderAccount {
            account_name: "ADA OBI".to_string(),
            account_number: "0123456789".to_string(),
            bank_code: None,
        };
        let normalized = normalize(account, "058");
        assert_eq!(
            normalized,
            BankAccount {
                account_name: "ADA OBI".to_string(),
                account_number: "0123456789".to_string(),
                bank_code: "058".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_a_config_error() {
        let service = BankService::new(BankingConfig::default());
        let err = service.verify_account("0123456789", "058").await.unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
