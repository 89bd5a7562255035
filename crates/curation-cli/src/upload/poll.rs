//! Waiting on long-running Genomics operations

use crate::api::types::{Operation, OperationHandle, OperationStatus};
use crate::api::GenomicsApi;
use crate::error::{CliError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Source of delays between polls and retries
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real time, backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Capped exponential backoff for a single status query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Delay after the given failed attempt (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }
}

/// Terminal state of an operation
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    Succeeded(Operation),
    Failed(Operation),
}

impl OperationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    pub fn operation(&self) -> &Operation {
        match self {
            Self::Succeeded(op) | Self::Failed(op) => op,
        }
    }
}

/// Polls an operation until it completes
pub struct OperationPoller<'a> {
    api: &'a dyn GenomicsApi,
    clock: &'a dyn Clock,
    interval: Duration,
    retry: RetryPolicy,
}

impl<'a> OperationPoller<'a> {
    pub fn new(api: &'a dyn GenomicsApi, clock: &'a dyn Clock, interval: Duration) -> Self {
        Self {
            api,
            clock,
            interval,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Block until the operation is done.
    ///
    /// A completed-but-failed operation is returned as
    /// [`OperationOutcome::Failed`], not as an error; only a status query that
    /// keeps failing past the retry budget is an `Err`.
    pub async fn wait(&self, handle: &OperationHandle) -> Result<OperationOutcome> {
        let mut polls: u64 = 0;

        loop {
            let operation = self.query(handle).await?;
            polls += 1;

            match operation.status() {
                OperationStatus::Pending => {
                    debug!(operation = %handle, polls, "Operation still running");
                    self.clock.sleep(self.interval).await;
                }
                OperationStatus::Succeeded => {
                    info!(operation = %handle, polls, "Operation succeeded");
                    return Ok(OperationOutcome::Succeeded(operation));
                }
                OperationStatus::Failed => {
                    warn!(
                        operation = %handle,
                        error = operation.error_message().as_deref().unwrap_or("no result returned"),
                        "Operation failed"
                    );
                    return Ok(OperationOutcome::Failed(operation));
                }
            }
        }
    }

    async fn query(&self, handle: &OperationHandle) -> Result<Operation> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.api.get_operation(handle).await {
                Ok(operation) => return Ok(operation),
                Err(e) if attempt >= max_attempts => {
                    return Err(CliError::RetriesExhausted {
                        operation: handle.to_string(),
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    let delay = self.retry.backoff(attempt);
                    warn!(
                        operation = %handle,
                        attempt,
                        retry_in_secs = delay.as_secs(),
                        error = %e,
                        "Status query failed, retrying"
                    );
                    self.clock.sleep(delay).await;
                }
            }
        }
    }
}
