//! Shared plumbing for the external API adapters.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Where a response actually came from. The UI renders api and fallback data
/// identically; tests and logs care about the difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Api,
    Cache,
    Fallback,
}

/// Retry an async operation a fixed number of times with no backoff.
pub async fn with_retry<T, F, Fut>(attempts: u32, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::debug!("attempt {}/{} failed: {}", attempt, attempts, e);
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("no attempts made")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_succeeds_first_try() {
        let calls = AtomicU32::new(0);
        let result = with_retry(2, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(7u32) }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result = with_retry(3, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    anyhow::bail!("transient")
                } else {
                    Ok(9u32)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 9);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exhausts_attempts() {
        let result: Result<u32> = with_retry(2, || async { anyhow::bail!("down") }).await;
        assert!(result.is_err());
    }
}
