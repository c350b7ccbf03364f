use std::fmt::Debug;
use std::path::Path;
use std::process::{Command, ExitStatus};

use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("could not run scp for {document}: {source}")]
    Spawn {
        document: String,
        source: std::io::Error,
    },
    #[error("scp failed for {document} ({status})")]
    Failed { document: String, status: ExitStatus },
}

/// Outbound boundary for rendered reports, mockable in tests.
pub trait DeliveryGateway: Debug {
    fn deliver(&self, document: &Path) -> Result<(), DeliveryError>;
}

/// Pushes a rendered report to a remote destination over scp. Engaged only
/// when an upload destination is configured.
#[derive(Debug)]
pub struct ScpDelivery {
    destination: String,
}

impl ScpDelivery {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
        }
    }
}

impl DeliveryGateway for ScpDelivery {
    fn deliver(&self, document: &Path) -> Result<(), DeliveryError> {
        info!(
            document = %document.display(),
            destination = %self.destination,
            "uploading report"
        );

        let status = Command::new("scp")
            .arg(document)
            .arg(&self.destination)
            .status()
            .map_err(|source| DeliveryError::Spawn {
                document: document.display().to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(DeliveryError::Failed {
                document: document.display().to_string(),
                status,
            })
        }
    }
}
