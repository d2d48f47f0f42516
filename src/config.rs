use std::env;

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration loaded from environment variables. Every variable has a
/// default, so an empty environment yields a working mainnet setup.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub api_base_url: String,
    pub http_timeout_secs: u64,
    pub default_record_budget: usize,
    pub default_min_tez: f64,
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url =
            env::var("TZKT_API_URL").unwrap_or_else(|_| "https://api.tzkt.io".to_string());

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "TZKT_API_URL must start with http:// or https://".to_string(),
            ));
        }

        let http_timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .unwrap_or(10);

        let default_record_budget = env::var("RECORD_BUDGET")
            .unwrap_or_else(|_| "10000".to_string())
            .parse::<usize>()
            .unwrap_or(10_000);

        let default_min_tez = env::var("MIN_TEZ")
            .unwrap_or_else(|_| "0".to_string())
            .parse::<f64>()
            .unwrap_or(0.0);

        Ok(Self {
            api_base_url,
            http_timeout_secs,
            default_record_budget,
            default_min_tez,
        })
    }
}
