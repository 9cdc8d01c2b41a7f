use std::env;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub merchant_id: String,
    pub secret_key: String,
    pub hosted_page_url: Url,
    pub currency: String,
    /// Reject webhook callbacks without a valid `X-Signature` header.
    pub verify_webhooks: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_pool_size: u32,
    pub host: String,
    pub port: u16,
    pub base_url: Url,
    pub payment: PaymentConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let or_default = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let port = or_default("PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?;
        let database_pool_size = or_default("DATABASE_POOL_SIZE", "10")
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ConfigError::Invalid {
                name: "DATABASE_POOL_SIZE",
                reason: "expected a positive integer".to_string(),
            })?;
        let verify_webhooks = or_default("PAYMENT_VERIFY_WEBHOOKS", "true")
            .parse::<bool>()
            .map_err(|e| ConfigError::Invalid {
                name: "PAYMENT_VERIFY_WEBHOOKS",
                reason: e.to_string(),
            })?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_pool_size,
            host: or_default("HOST", "0.0.0.0"),
            port,
            base_url: parse_url("BASE_URL", &or_default("BASE_URL", "http://localhost:8080"))?,
            payment: PaymentConfig {
                merchant_id: required("PAYMENT_MERCHANT_ID")?,
                secret_key: required("PAYMENT_SECRET_KEY")?,
                hosted_page_url: parse_url("PAYMENT_HOSTED_URL", &required("PAYMENT_HOSTED_URL")?)?,
                currency: or_default("PAYMENT_CURRENCY", "PKR"),
                verify_webhooks,
            },
        })
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/ezichoice"),
        ("PAYMENT_MERCHANT_ID", "EZC001"),
        ("PAYMENT_SECRET_KEY", "secret"),
        ("PAYMENT_HOSTED_URL", "https://pay.example.com/checkout"),
    ];

    #[test]
    fn defaults_apply_when_optional_vars_missing() {
        let config = AppConfig::from_lookup(lookup(BASE)).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_pool_size, 10);
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.payment.currency, "PKR");
        assert!(config.payment.verify_webhooks);
    }

    #[test]
    fn missing_database_url_is_reported() {
        let err = AppConfig::from_lookup(lookup(&BASE[1..])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
        assert_eq!(err.to_string(), "DATABASE_URL must be set");
    }

    #[test]
    fn invalid_port_is_reported() {
        let mut vars = BASE.to_vec();
        vars.push(("PORT", "eighty"));
        let err = AppConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn hosted_url_must_be_absolute() {
        let mut vars = BASE[..3].to_vec();
        vars.push(("PAYMENT_HOSTED_URL", "/pay"));
        assert!(AppConfig::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn webhook_verification_can_be_disabled() {
        let mut vars = BASE.to_vec();
        vars.push(("PAYMENT_VERIFY_WEBHOOKS", "false"));
        let config = AppConfig::from_lookup(lookup(&vars)).unwrap();
        assert!(!config.payment.verify_webhooks);
    }
}
