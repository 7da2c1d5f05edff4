// src/core/config.rs
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use log::LevelFilter;
use thiserror::Error;

use crate::utils::MIB;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL for {key}: '{value}' ({reason})")]
    InvalidUrl {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

// Configuration for the audit client
#[derive(Debug, Clone)]
pub struct Config {
    // Backend endpoints
    pub analyse_url: String,
    pub passphrase_url: String,
    pub insights_url: String,
    pub bulk_url: String,
    pub bulk_pii_url: String,

    // Timeouts
    pub request_timeout: Duration,
    pub upload_timeout: Duration,

    // Retry policy
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub upload_retry_delay: Duration,

    // Client-side validation
    pub max_upload_size: u64,
    pub min_password_length: usize,

    // Reports
    pub download_directory: PathBuf,

    // Logging
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Backend endpoints
            analyse_url: "http://127.0.0.1:5002/analyse".to_string(),
            passphrase_url: "http://127.0.0.1:5001/generate-passphrase".to_string(),
            insights_url: "http://127.0.0.1:5003/generate_insights".to_string(),
            bulk_url: "http://127.0.0.1:5000/bulk".to_string(),
            bulk_pii_url: "http://127.0.0.1:5006/bulk_pii".to_string(),

            // Timeouts
            request_timeout: Duration::from_secs(15),
            upload_timeout: Duration::from_secs(30),

            // Retry policy
            max_retries: 3,
            retry_delay: Duration::from_millis(1500),
            upload_retry_delay: Duration::from_millis(2000),

            // Client-side validation
            max_upload_size: 10 * MIB,
            min_password_length: 7,

            // Reports
            download_directory: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),

            // Logging
            log_level: LevelFilter::Info,
            log_file: PathBuf::from("logs/passaudit.log"),
        }
    }
}

impl Config {
    // Load configuration from environment variables.
    //
    // Runs before the logger exists, so rejected values come back as
    // warnings for the caller to log once logging is up.
    pub fn load() -> (Self, Vec<String>) {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Build a configuration from any key lookup, starting from the defaults
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<String>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let mut warnings = Vec::new();

        // Backend endpoints
        if let Some(url) = lookup("ANALYSE_URL") {
            config.analyse_url = url;
        }

        if let Some(url) = lookup("PASSPHRASE_URL") {
            config.passphrase_url = url;
        }

        if let Some(url) = lookup("INSIGHTS_URL") {
            config.insights_url = url;
        }

        if let Some(url) = lookup("BULK_URL") {
            config.bulk_url = url;
        }

        if let Some(url) = lookup("BULK_PII_URL") {
            config.bulk_pii_url = url;
        }

        // Timeouts
        if let Some(secs) = parse_var::<u64>(&lookup, &mut warnings, "REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(secs) = parse_var::<u64>(&lookup, &mut warnings, "UPLOAD_TIMEOUT_SECS") {
            config.upload_timeout = Duration::from_secs(secs);
        }

        // Retry policy
        if let Some(retries) = parse_var(&lookup, &mut warnings, "MAX_RETRIES") {
            config.max_retries = retries;
        }

        if let Some(ms) = parse_var::<u64>(&lookup, &mut warnings, "RETRY_DELAY_MS") {
            config.retry_delay = Duration::from_millis(ms);
        }

        if let Some(ms) = parse_var::<u64>(&lookup, &mut warnings, "UPLOAD_RETRY_DELAY_MS") {
            config.upload_retry_delay = Duration::from_millis(ms);
        }

        // Client-side validation
        if let Some(mb) = parse_var::<u64>(&lookup, &mut warnings, "MAX_UPLOAD_SIZE_MB") {
            match mb.checked_mul(MIB) {
                Some(bytes) => config.max_upload_size = bytes,
                None => warnings.push(format!("Ignoring out of range value '{}' for MAX_UPLOAD_SIZE_MB", mb)),
            }
        }

        if let Some(length) = parse_var(&lookup, &mut warnings, "MIN_PASSWORD_LENGTH") {
            config.min_password_length = length;
        }

        // Reports
        if let Some(dir) = lookup("DOWNLOAD_DIRECTORY") {
            config.download_directory = PathBuf::from(dir);
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            match level.to_lowercase().as_str() {
                "error" => config.log_level = LevelFilter::Error,
                "warn" => config.log_level = LevelFilter::Warn,
                "info" => config.log_level = LevelFilter::Info,
                "debug" => config.log_level = LevelFilter::Debug,
                "trace" => config.log_level = LevelFilter::Trace,
                _ => warnings.push(format!("Unknown log level '{}', using {}", level, config.log_level)),
            }
        }

        if let Some(file) = lookup("LOG_FILE") {
            config.log_file = PathBuf::from(file);
        }

        (config, warnings)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    warnings: &mut Vec<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warnings.push(format!("Ignoring invalid value '{}' for {}", raw, key));
            None
        }
    }
}
