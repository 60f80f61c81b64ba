use std::env;

use anyhow::anyhow;
use rocket::figment::providers::Env;
use rocket::figment::Figment;
use serde::{Deserialize, Serialize};

use crate::store::wire::WireFormat;

/// Figment table holding the message store settings.
pub const CONFIG_KEY: &str = "flash_scope";

/// Environment variable with the bearer token for the message store.
pub const TOKEN_ENV: &str = "JWT_TOKEN";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5770/api/v1/user/message";

pub trait Configurable {
    /// Check that configuration is complete.
    /// This function shall be used at start up to detect misconfiguration as soon as possible.
    fn check_conf() -> anyhow::Result<()>;
}

/// Check that an environment variable exists and is not empty.
pub fn env_exists_and_not_empty(env: &str) -> anyhow::Result<()> {
    match env::var(env) {
        Ok(value) if !value.is_empty() => Ok(()),
        _ => Err(anyhow!("Missing {} env variable", env)),
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct FlashScopeConfig {
    /// Message store endpoint, used for both GET and POST.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer token sent with every call.
    ///
    /// _Default:_ the `JWT_TOKEN` environment variable.
    pub token: String,
    /// Body layout spoken by the store.
    ///
    /// _Default:_ `plain`.
    #[serde(default)]
    pub wire_format: WireFormat,
    /// Number of seconds to wait for the store before giving up.
    ///
    /// _Default:_ `10`.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Configurable for FlashScopeConfig {
    fn check_conf() -> anyhow::Result<()> {
        env_exists_and_not_empty(TOKEN_ENV)
    }
}

impl FlashScopeConfig {
    pub fn extract(figment: &Figment) -> anyhow::Result<Self> {
        let config: FlashScopeConfig = figment
            .extract_inner(CONFIG_KEY)
            .map_err(|e| anyhow!("invalid [{}] configuration: {}", CONFIG_KEY, e))?;
        if config.token.is_empty() {
            return Err(anyhow!("{}.token is empty", CONFIG_KEY));
        }
        Ok(config)
    }
}

/// Rocket's default figment, with the raw `JWT_TOKEN` variable mapped onto
/// `flash_scope.token`.
pub fn figment() -> Figment {
    rocket::Config::figment().merge(
        Env::raw()
            .only(&[TOKEN_ENV])
            .map(|_| format!("{}.token", CONFIG_KEY).into()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let figment = Figment::new().merge(("flash_scope.token", "secret"));
        let config = FlashScopeConfig::extract(&figment).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.wire_format, WireFormat::Plain);
        assert_eq!(config.timeout, 10);
    }

    #[test]
    fn missing_token_is_rejected() {
        let figment = Figment::new().merge(("flash_scope.api_url", "http://localhost/x"));
        assert!(FlashScopeConfig::extract(&figment).is_err());

        let figment = Figment::new().merge(("flash_scope.token", ""));
        assert!(FlashScopeConfig::extract(&figment).is_err());
    }

    // The only test touching JWT_TOKEN; nothing else in this binary reads it.
    #[test]
    fn check_conf_requires_a_non_empty_token() {
        env::remove_var(TOKEN_ENV);
        let err = FlashScopeConfig::check_conf().unwrap_err();
        assert_eq!(err.to_string(), "Missing JWT_TOKEN env variable");

        env::set_var(TOKEN_ENV, "");
        assert!(FlashScopeConfig::check_conf().is_err());

        env::set_var(TOKEN_ENV, "a.b.c");
        assert!(FlashScopeConfig::check_conf().is_ok());
        env::remove_var(TOKEN_ENV);
    }

    #[test]
    fn envelope_format_is_read() {
        let figment = Figment::new()
            .merge(("flash_scope.token", "secret"))
            .merge(("flash_scope.wire_format", "envelope"));
        let config = FlashScopeConfig::extract(&figment).unwrap();
        assert_eq!(config.wire_format, WireFormat::Envelope);
    }
}
