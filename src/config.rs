//! Environment-driven configuration.

use std::env;
use std::time::Duration;

use chrono::FixedOffset;
use thiserror::Error;

use crate::core::scheduler::ScheduleEntry;
use crate::models::instrument::AssetClass;
use crate::notify::format::FxConversion;
use crate::screening::orchestrator::DEFAULT_SIGNALS_PER_CYCLE;
use crate::services::alpha_vantage::DEFAULT_REQUEST_SPACING;
use crate::services::http::DEFAULT_TIMEOUT;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 7;
pub const DEFAULT_FX_RATE: f64 = 15_800.0;
pub const DEFAULT_FX_SYMBOL: &str = "Rp";
pub const DEFAULT_EQUITY_SCHEDULE: &str = "08:55=PRE-MARKET,10:30=SESSION 1,15:30=CLOSING";
pub const DEFAULT_CRYPTO_SCHEDULE: &str = "12:00=MIDDAY,16:30=AFTERNOON";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid schedule entry {entry:?}: {reason}")]
    InvalidSchedule { entry: String, reason: String },
}

/// `APP_ENV`, defaulting to `sandbox`.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub port: u16,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub sectors_api_key: Option<String>,
    pub alpha_vantage_api_key: Option<String>,
    pub alpha_vantage_spacing: Duration,
    pub http_timeout: Duration,
    pub utc_offset: FixedOffset,
    pub scheduler_enabled: bool,
    pub demo_fallback: bool,
    pub signals_per_cycle: usize,
    /// `None` when `CRYPTO_FX_RATE=0`.
    pub crypto_fx: Option<FxConversion>,
    pub equity_schedule: Vec<ScheduleEntry>,
    pub crypto_schedule: Vec<ScheduleEntry>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let offset_hours: i32 =
            parse_or(get("SCHEDULE_UTC_OFFSET_HOURS"), "SCHEDULE_UTC_OFFSET_HOURS", DEFAULT_UTC_OFFSET_HOURS)?;
        let utc_offset = FixedOffset::east_opt(offset_hours * 3600).ok_or_else(|| {
            ConfigError::InvalidValue {
                key: "SCHEDULE_UTC_OFFSET_HOURS",
                value: offset_hours.to_string(),
                reason: "offset must be within +/-23 hours".to_string(),
            }
        })?;

        let fx_rate: f64 = parse_or(get("CRYPTO_FX_RATE"), "CRYPTO_FX_RATE", DEFAULT_FX_RATE)?;
        if !fx_rate.is_finite() || fx_rate < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "CRYPTO_FX_RATE",
                value: fx_rate.to_string(),
                reason: "must be a non-negative number".to_string(),
            });
        }
        let crypto_fx = (fx_rate > 0.0).then(|| {
            FxConversion::new(
                fx_rate,
                get("CRYPTO_FX_SYMBOL").unwrap_or_else(|| DEFAULT_FX_SYMBOL.to_string()),
            )
        });

        let signals_per_cycle: usize =
            parse_or(get("SIGNALS_PER_CYCLE"), "SIGNALS_PER_CYCLE", DEFAULT_SIGNALS_PER_CYCLE)?;
        if signals_per_cycle == 0 {
            return Err(ConfigError::InvalidValue {
                key: "SIGNALS_PER_CYCLE",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let timeout_secs: u64 = parse_or(
            get("HTTP_TIMEOUT_SECONDS"),
            "HTTP_TIMEOUT_SECONDS",
            DEFAULT_TIMEOUT.as_secs(),
        )?;
        let spacing_secs: u64 = parse_or(
            get("ALPHA_VANTAGE_SPACING_SECONDS"),
            "ALPHA_VANTAGE_SPACING_SECONDS",
            DEFAULT_REQUEST_SPACING.as_secs(),
        )?;

        Ok(Self {
            environment: get("APP_ENV").unwrap_or_else(|| "sandbox".to_string()),
            port: parse_or(get("PORT"), "PORT", DEFAULT_PORT)?,
            telegram_bot_token: get("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: get("TELEGRAM_CHAT_ID"),
            sectors_api_key: get("SECTORS_API_KEY"),
            alpha_vantage_api_key: get("ALPHA_VANTAGE_API_KEY"),
            alpha_vantage_spacing: Duration::from_secs(spacing_secs),
            http_timeout: Duration::from_secs(timeout_secs.max(1)),
            utc_offset,
            scheduler_enabled: parse_flag(get("SCHEDULER_ENABLED"), "SCHEDULER_ENABLED", true)?,
            demo_fallback: parse_flag(get("DEMO_FALLBACK"), "DEMO_FALLBACK", false)?,
            signals_per_cycle,
            crypto_fx,
            equity_schedule: parse_schedule(
                AssetClass::Equities,
                get("EQUITY_SCHEDULE").as_deref().unwrap_or(DEFAULT_EQUITY_SCHEDULE),
            )?,
            crypto_schedule: parse_schedule(
                AssetClass::Crypto,
                get("CRYPTO_SCHEDULE").as_deref().unwrap_or(DEFAULT_CRYPTO_SCHEDULE),
            )?,
        })
    }

    /// Equity entries followed by crypto entries.
    pub fn schedule(&self) -> Vec<ScheduleEntry> {
        self.equity_schedule
            .iter()
            .chain(self.crypto_schedule.iter())
            .cloned()
            .collect()
    }
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

fn parse_flag(raw: Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = raw else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value,
            reason: "expected true or false".to_string(),
        }),
    }
}

/// Parse `HH:MM=LABEL,HH:MM=LABEL`. An empty string disables the class.
pub fn parse_schedule(asset_class: AssetClass, raw: &str) -> Result<Vec<ScheduleEntry>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| ScheduleEntry::parse(asset_class, part))
        .collect()
}
