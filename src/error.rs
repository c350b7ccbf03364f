use std::fmt;

use crate::config::ConfigError;
use crate::delivery::DeliveryError;
use crate::issuers::IssuerListError;
use crate::pipeline::PipelineError;
use crate::registry::RegistryError;
use crate::telemetry::TelemetryError;

/// Everything that can abort a run. `main` is the single place that decides
/// what a failure means (log and exit non-zero); the modules only detect
/// and describe.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Registry(RegistryError),
    Pipeline(PipelineError),
    Issuers(IssuerListError),
    Delivery(DeliveryError),
    Io(std::io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Registry(err) => write!(f, "registry error: {err}"),
            AppError::Pipeline(err) => write!(f, "pipeline error: {err}"),
            AppError::Issuers(err) => write!(f, "issuer list error: {err}"),
            AppError::Delivery(err) => write!(f, "delivery error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Registry(err) => Some(err),
            AppError::Pipeline(err) => Some(err),
            AppError::Issuers(err) => Some(err),
            AppError::Delivery(err) => Some(err),
            AppError::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<RegistryError> for AppError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<PipelineError> for AppError {
    fn from(value: PipelineError) -> Self {
        Self::Pipeline(value)
    }
}

impl From<IssuerListError> for AppError {
    fn from(value: IssuerListError) -> Self {
        Self::Issuers(value)
    }
}

impl From<DeliveryError> for AppError {
    fn from(value: DeliveryError) -> Self {
        Self::Delivery(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
