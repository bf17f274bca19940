use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_HTTP_PORT: &str = "8080";
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";
pub const DEFAULT_CHECK_INTERVAL_SECS: &str = "30";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub data_dir: PathBuf,
    pub http_port: u16,
    pub default_timezone: Tz,
    pub reminder_check_interval: Duration,
}

/// `DATA_DIR`, or the default when unset or blank.
pub fn data_dir_from_env() -> PathBuf {
    match env::var("DATA_DIR") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
        _ => PathBuf::from(DEFAULT_DATA_DIR),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .or_else(|_| env::var("BOT_TOKEN"))
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let port_str = env::var("HTTP_PORT").unwrap_or_else(|_| DEFAULT_HTTP_PORT.to_string());
        let http_port = port_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let tz_name = env::var("DEFAULT_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string());
        let default_timezone = tz_name
            .trim()
            .parse::<Tz>()
            .map_err(|_| anyhow!("Invalid DEFAULT_TIMEZONE: {}", tz_name.trim()))?;

        let interval_str = env::var("REMINDER_CHECK_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_CHECK_INTERVAL_SECS.to_string());
        let interval_secs: u64 = interval_str
            .trim()
            .parse()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| anyhow!("Invalid REMINDER_CHECK_INTERVAL_SECS"))?;

        Ok(Config {
            telegram_bot_token: token,
            data_dir: data_dir_from_env(),
            http_port,
            default_timezone,
            reminder_check_interval: Duration::from_secs(interval_secs),
        })
    }
}
