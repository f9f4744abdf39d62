//! Bounded retry driver.
//!
//! Runs an operation under an elapsed-time budget. Operational failures
//! return immediately; transient failures retry with exponential backoff
//! until the budget is spent, after which the last error is surfaced as
//! `Error::BudgetExhausted`. The budget bounds worst-case latency against a
//! permanently failing registry.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use weft_registry_client::{RegistryError, RegistryResult};

use crate::classify::{classify, ErrorClass};
use crate::error::{Error, Result};

/// Delay before the first retry.
const INITIAL_BACKOFF: Duration = Duration::from_millis(50);
/// Backoff ceiling.
const MAX_BACKOFF: Duration = Duration::from_secs(1);

/// Clamp a retry budget to a caller-supplied deadline.
///
/// A deadline can only shorten the budget, never extend it.
pub fn clamp_budget(budget: Duration, deadline: Option<Duration>) -> Duration {
    match deadline {
        Some(d) if d < budget => d,
        _ => budget,
    }
}

/// Run `op` until it succeeds, fails operationally, or the budget is spent.
pub async fn with_retry<T, F, Fut>(budget: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = RegistryResult<T>>,
{
    let started = Instant::now();
    let mut backoff = INITIAL_BACKOFF;

    loop {
        let err: RegistryError = match op().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        match classify(&err) {
            ErrorClass::Operational => return Err(Error::Registry(err)),
            ErrorClass::Transient => {
                let elapsed = started.elapsed();
                if elapsed >= budget {
                    warn!(elapsed_ms = elapsed.as_millis() as u64, error = %err, "retry budget exhausted");
                    return Err(Error::BudgetExhausted {
                        elapsed_ms: elapsed.as_millis() as u64,
                        source: err,
                    });
                }

                // Never sleep past the budget edge; the final attempt runs
                // right at it.
                let delay = backoff.min(budget - elapsed);
                debug!(delay_ms = delay.as_millis() as u64, error = %err, "transient registry failure, backing off");
                sleep(delay).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        }
    }
}
