use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.company-information.service.gov.uk";

// The registry caps advanced-search pages at 5,000 results; there are only
// around 4,500 active PLCs, so a single page covers the whole population.
const DEFAULT_SEARCH_PAGE_SIZE: u32 = 5000;

// The registry quota resets on a short fixed window, so throttled calls wait
// a flat interval rather than backing off exponentially.
const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 50;
const DEFAULT_RETRY_DELAY_SECS: u64 = 30;

/// Top-level configuration for the monitor.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub registry: RegistryConfig,
    pub storage: StorageConfig,
    pub issuers: IssuerConfig,
    pub delivery: DeliveryConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("CH_API_KEY")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = env::var("CH_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let search_page_size =
            numeric_var("CH_SEARCH_PAGE_SIZE", DEFAULT_SEARCH_PAGE_SIZE)?;
        let retry_max_attempts =
            numeric_var("CH_RETRY_MAX_ATTEMPTS", DEFAULT_RETRY_MAX_ATTEMPTS)?;
        let retry_delay_secs =
            numeric_var("CH_RETRY_DELAY_SECS", DEFAULT_RETRY_DELAY_SECS)?;

        let data_dir =
            PathBuf::from(env::var("APP_DATA_DIR").unwrap_or_else(|_| ".".to_string()));
        let descriptor_path = PathBuf::from(
            env::var("APP_ISSUER_SOURCES").unwrap_or_else(|_| "issuer_sources.json".to_string()),
        );

        let upload_destination = env::var("APP_UPLOAD_DEST")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            registry: RegistryConfig {
                api_key,
                base_url,
                search_page_size,
                retry_max_attempts,
                retry_delay: Duration::from_secs(retry_delay_secs),
            },
            storage: StorageConfig { data_dir },
            issuers: IssuerConfig { descriptor_path },
            delivery: DeliveryConfig { upload_destination },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Credentials and limits for talking to the Companies House API.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub api_key: String,
    pub base_url: String,
    pub search_page_size: u32,
    pub retry_max_attempts: u32,
    pub retry_delay: Duration,
}

/// Where checkpoints and rendered reports live.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

/// Location of the issuer-source descriptor file.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    pub descriptor_path: PathBuf,
}

/// Optional remote destination for rendered reports.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    pub upload_destination: Option<String>,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn numeric_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingApiKey,
    InvalidValue { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingApiKey => {
                write!(f, "CH_API_KEY must be set to a Companies House API key")
            }
            ConfigError::InvalidValue { name } => {
                write!(f, "{name} must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
