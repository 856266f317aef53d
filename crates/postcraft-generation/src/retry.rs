//! Retry decorator for generation clients

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use postcraft_core::traits::{Generation, GenerationClient, GenerationOptions};
use postcraft_core::DomainError;

use crate::openai::BACKEND_STATUS_PREFIX;

/// Exponential backoff settings
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Backoff ceiling before the given retry (1-based)
    ///
    /// A multiplier below 1.0, or NaN, is treated as 1.0.
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(32) as i32;
        let multiplier = self.multiplier.max(1.0);
        let ceiling = self.max_backoff.as_secs_f64();
        let scaled = self.initial_backoff.as_secs_f64() * multiplier.powi(exponent);
        if scaled.is_finite() {
            Duration::from_secs_f64(scaled.min(ceiling))
        } else {
            self.max_backoff
        }
    }

    /// Jittered delay somewhere in the upper half of the backoff ceiling
    fn delay(&self, retry: u32) -> Duration {
        let ceiling = self.backoff(retry);
        let factor = rand::thread_rng().gen_range(0.5..=1.0);
        ceiling.mul_f64(factor)
    }
}

/// Whether a generation failure is worth another attempt
///
/// Transport failures, 429 and 5xx statuses are transient. Any other status
/// (bad request, auth) fails the same way on every attempt.
fn is_transient(cause: &str) -> bool {
    let Some(status) = cause.strip_prefix(BACKEND_STATUS_PREFIX) else {
        return true;
    };
    match status.get(..3).and_then(|code| code.parse::<u16>().ok()) {
        Some(code) => code == 429 || (500..600).contains(&code),
        None => true,
    }
}

/// Retries transient failures of the wrapped client
///
/// Only a transient [`DomainError::GenerationFailed`] is retried; anything
/// else is returned as is.
pub struct RetryingClient<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: GenerationClient> RetryingClient<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: GenerationClient> GenerationClient for RetryingClient<C> {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Generation, DomainError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.inner.generate(prompt, options).await {
                Err(DomainError::GenerationFailed(cause))
                    if attempt < max_attempts && is_transient(&cause) =>
                {
                    let delay = self.policy.delay(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %cause,
                        "Generation failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
