use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::server::error::AppResult;

/// a fixed number of extra attempts with the same pause between each, no jitter, no growth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, backoff: Duration) -> Self {
        Self { retries, backoff }
    }
}

pub async fn retry_fixed<T, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut operation: F,
) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.retries => {
                attempt += 1;
                warn!(
                    "{} failed ({}), retry {}/{} in {}ms",
                    label,
                    err,
                    attempt,
                    policy.retries,
                    policy.backoff.as_millis()
                );
                tokio::time::sleep(policy.backoff).await;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::server::error::Error;

    #[tokio::test]
    async fn test_gives_up_after_configured_retries() {
        let calls = AtomicU32::new(0);

        let result: AppResult<()> = retry_fixed(RetryPolicy::new(2, Duration::ZERO), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::Upstream("down".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_stops_on_first_success() {
        let calls = AtomicU32::new(0);

        let result = retry_fixed(RetryPolicy::new(5, Duration::ZERO), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(Error::Upstream("blip".to_string()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
