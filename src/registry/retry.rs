use std::time::Duration;

use tracing::warn;

use super::RegistryError;

/// Fixed-delay retry policy for throttled registry calls. The registry
/// signals throttling with 429/502 and lifts it on a short fixed quota
/// window, so every wait is the same length and the total attempt count is
/// bounded.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            delay: Duration::from_secs(30),
        }
    }
}

/// Runs `attempt` until it yields something other than a throttling error,
/// sleeping the policy delay between tries. Exhausting the bound escalates
/// to `RetriesExhausted`; every other error passes straight through.
pub(crate) fn run_with_retry<T, F>(
    policy: RetryPolicy,
    context: &str,
    mut attempt: F,
) -> Result<T, RegistryError>
where
    F: FnMut() -> Result<T, RegistryError>,
{
    let mut tries = 0;
    loop {
        tries += 1;
        match attempt() {
            Err(RegistryError::Throttled { status }) => {
                if tries >= policy.max_attempts {
                    return Err(RegistryError::RetriesExhausted {
                        context: context.to_string(),
                        attempts: tries,
                    });
                }
                warn!(
                    status,
                    attempt = tries,
                    max_attempts = policy.max_attempts,
                    wait_secs = policy.delay.as_secs(),
                    "{context}: throttled, retrying"
                );
                std::thread::sleep(policy.delay);
            }
            other => return other,
        }
    }
}
