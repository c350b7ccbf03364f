mod retry;
mod types;

pub use retry::RetryPolicy;
pub use types::{AccountsSchedule, CompanyProfile, CompanySummary, FilingDeadline};

use std::fmt;
use std::time::Duration;

use reqwest::header::ACCEPT;
use tokio::runtime::Runtime;
use tracing::{error, info};

use crate::config::RegistryConfig;
use types::CompanySearchPage;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry throttled the request (HTTP {status})")]
    Throttled { status: u16 },
    #[error("unexpected profile shape for company {company_number}: {body}")]
    UnexpectedShape { company_number: String, body: String },
    #[error("registry returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("could not decode registry response for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("request to the registry failed: {0}")]
    Transport(String),
    #[error("gave up on company {context} after {attempts} throttled attempts")]
    RetriesExhausted { context: String, attempts: u32 },
    #[error("blocking runtime unavailable: {0}")]
    Runtime(String),
}

/// Boundary to the Companies House API so the pipeline can be exercised
/// against fakes.
pub trait RegistryGateway: fmt::Debug {
    /// Every active PLC the registry knows about, in registry order.
    fn active_companies(&self) -> Result<Vec<CompanySummary>, RegistryError>;

    /// The filing profile for one company, retrying through throttling.
    fn company_profile(&self, company_number: &str) -> Result<CompanyProfile, RegistryError>;
}

/// Blocking wrapper around the async reqwest client so the sequential
/// pipeline never sees async details. Authentication is HTTP basic with the
/// API key as username and an empty password.
pub struct HttpRegistryClient {
    http: reqwest::Client,
    runtime: Runtime,
    base_url: String,
    api_key: String,
    search_page_size: u32,
    retry: RetryPolicy,
}

impl HttpRegistryClient {
    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|err| RegistryError::Transport(err.to_string()))?;
        let runtime = Runtime::new().map_err(|err| RegistryError::Runtime(err.to_string()))?;

        Ok(Self {
            http,
            runtime,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            search_page_size: config.search_page_size,
            retry: RetryPolicy {
                max_attempts: config.retry_max_attempts,
                delay: config.retry_delay,
            },
        })
    }

    fn get(&self, url: &str) -> Result<(u16, String), RegistryError> {
        self.runtime
            .block_on(async {
                let response = self
                    .http
                    .get(url)
                    .basic_auth(&self.api_key, Some(""))
                    .header(ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status().as_u16();
                let body = response.text().await?;
                Ok::<_, reqwest::Error>((status, body))
            })
            .map_err(|err| RegistryError::Transport(err.to_string()))
    }
}

impl fmt::Debug for HttpRegistryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRegistryClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RegistryGateway for HttpRegistryClient {
    fn active_companies(&self) -> Result<Vec<CompanySummary>, RegistryError> {
        let url = format!(
            "{}/advanced-search/companies?company_status=active&company_type=plc&size={}",
            self.base_url, self.search_page_size
        );

        let (status, body) = self.get(&url)?;
        if status != 200 {
            error!(status, %body, "company search failed");
            return Err(RegistryError::Http { status, body });
        }

        let page: CompanySearchPage =
            serde_json::from_str(&body).map_err(|source| RegistryError::Decode {
                context: "advanced search".to_string(),
                source,
            })?;
        info!(count = page.items.len(), "downloaded active PLC register");
        Ok(page.items)
    }

    fn company_profile(&self, company_number: &str) -> Result<CompanyProfile, RegistryError> {
        let url = format!("{}/company/{}", self.base_url, company_number);

        retry::run_with_retry(self.retry, company_number, || {
            let (status, body) = self.get(&url)?;
            match status {
                200 => match serde_json::from_str::<CompanyProfile>(&body) {
                    Ok(profile) => Ok(profile),
                    Err(_) => {
                        // A 200 without filing data cannot be fixed by
                        // retrying; the caller aborts the run.
                        error!(company_number, %body, "profile response missing filing data");
                        Err(RegistryError::UnexpectedShape {
                            company_number: company_number.to_string(),
                            body,
                        })
                    }
                },
                429 | 502 => Err(RegistryError::Throttled { status }),
                _ => {
                    error!(company_number, status, %body, "profile request failed");
                    Err(RegistryError::Http { status, body })
                }
            }
        })
    }
}
