use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_timeout_secs: u64,
    pub emailjs_access_token: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", "5000"),
            database_url: try_load("DATABASE_URL", "postgresql://localhost:5432/slang"),
            gemini_api_key: read_secret("GEMINI_API_KEY"),
            gemini_model: try_load("GEMINI_MODEL", "gemini-1.5-flash"),
            gemini_timeout_secs: try_load("GEMINI_TIMEOUT_SECS", "30"),
            emailjs_access_token: try_read_secret("EMAILJS_ACCESS_TOKEN"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn read_secret(secret_name: &str) -> String {
    try_read_secret(secret_name).expect("Secrets misconfigured!")
}

// Docker secret file first, plain environment variable as the local fallback.
fn try_read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    match read_to_string(&path) {
        Ok(s) => Some(s.trim().to_string()),
        Err(e) => {
            warn!("Failed to read {secret_name} from file: {e}");

            env::var(secret_name).ok().map(|s| s.trim().to_string())
        }
    }
}
