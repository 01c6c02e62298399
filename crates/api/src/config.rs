//! Environment-driven service configuration.

use std::net::SocketAddr;

use anyhow::{Context, bail};

use bankledger_observability::LogFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Create the `alice`/`bob` bootstrap accounts at start-up.
    pub seed_accounts: bool,
    pub log_format: LogFormat,
}

impl ApiConfig {
    pub const BIND_ADDR_VAR: &'static str = "BANKLEDGER_BIND_ADDR";
    pub const SEED_ACCOUNTS_VAR: &'static str = "BANKLEDGER_SEED_ACCOUNTS";
    pub const LOG_FORMAT_VAR: &'static str = "BANKLEDGER_LOG_FORMAT";

    pub const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:8080";

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys take defaults; set but
    /// malformed keys are errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup(Self::BIND_ADDR_VAR)
            .unwrap_or_else(|| Self::DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("{} is not a socket address: {bind_addr}", Self::BIND_ADDR_VAR))?;

        let seed_accounts = match lookup(Self::SEED_ACCOUNTS_VAR) {
            None => true,
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("invalid {}", Self::SEED_ACCOUNTS_VAR))?,
        };

        let log_format = match lookup(Self::LOG_FORMAT_VAR) {
            None => LogFormat::default(),
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid {}", Self::LOG_FORMAT_VAR))?,
        };

        Ok(Self {
            bind_addr,
            seed_accounts,
            log_format,
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            seed_accounts: true,
            log_format: LogFormat::default(),
        }
    }
}

fn parse_bool(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got '{other}'"),
    }
}
