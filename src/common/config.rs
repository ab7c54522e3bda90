// Bot configuration loaded from environment variables

use std::env;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Minutes before an issued verification code expires.
    pub verification_ttl_minutes: i64,
    /// Currency paid per 100,000 views.
    pub payout_rate: f64,
    /// Maximum confirm attempts per issued code.
    pub max_attempts: u32,
    pub sweep_interval_minutes: u64,
    pub analytics_interval_hours: u64,
    /// When set and reachable, the SQL backend is used; otherwise the flat file.
    pub database_url: Option<String>,
    pub data_file: String,
    pub port: u16,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            verification_ttl_minutes: 15,
            payout_rate: 20.0, // $20 per 100K views
            max_attempts: 3,
            sweep_interval_minutes: 30,
            analytics_interval_hours: 24,
            database_url: None,
            data_file: "data.json".to_string(),
            port: 8080,
        }
    }
}

impl BotConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(ttl) = env::var("VERIFICATION_TTL_MINUTES") {
            if let Ok(val) = ttl.parse::<i64>() {
                config.verification_ttl_minutes = val;
            }
        }

        if let Ok(rate) = env::var("PAYOUT_RATE") {
            if let Ok(val) = rate.parse::<f64>() {
                config.payout_rate = val;
            }
        }

        if let Ok(attempts) = env::var("MAX_VERIFICATION_ATTEMPTS") {
            if let Ok(val) = attempts.parse::<u32>() {
                config.max_attempts = val;
            }
        }

        if let Ok(interval) = env::var("SWEEP_INTERVAL_MINUTES") {
            if let Ok(val) = interval.parse::<u64>() {
                config.sweep_interval_minutes = val;
            }
        }

        if let Ok(interval) = env::var("ANALYTICS_INTERVAL_HOURS") {
            if let Ok(val) = interval.parse::<u64>() {
                config.analytics_interval_hours = val;
            }
        }

        if let Ok(url) = env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                config.database_url = Some(url);
            }
        }

        if let Ok(file) = env::var("DATA_FILE") {
            if !file.trim().is_empty() {
                config.data_file = file;
            }
        }

        if let Ok(port) = env::var("PORT") {
            if let Ok(val) = port.parse::<u16>() {
                config.port = val;
            }
        }

        config
    }
}
