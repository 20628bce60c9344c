//! Deadline and cancellation shared by the fetches of one request.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;

/// The deadline and cancellation token an upstream fetch runs under.
///
/// Cloning a scope shares the same token, so cancelling any clone (or the
/// token it was built from) stops every fetch in the request.
#[derive(Debug, Clone)]
pub struct FetchScope {
    deadline: Instant,
    cancel: CancellationToken,
}

impl FetchScope {
    pub fn new(deadline: Instant, cancel: CancellationToken) -> Self {
        Self { deadline, cancel }
    }

    /// A scope with a fresh token and a deadline `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(Instant::now() + timeout, CancellationToken::new())
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Runs `fetch` until it settles, the deadline passes, or the token fires.
    ///
    /// Cancellation wins over a simultaneously ready result. When the deadline
    /// or the token wins, `fetch` is dropped, which releases whatever
    /// connection it was holding.
    pub async fn guard<T, F>(&self, fetch: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(FetchError::Cancelled),
            result = tokio::time::timeout_at(self.deadline, fetch) => {
                result.unwrap_or(Err(FetchError::Timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_guard_passes_through_result() {
        let scope = FetchScope::with_timeout(Duration::from_secs(1));
        let result = scope.guard(async { Ok::<_, FetchError>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_guard_times_out_at_deadline() {
        let scope = FetchScope::with_timeout(Duration::from_millis(50));
        let result = scope
            .guard(async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok::<_, FetchError>(())
            })
            .await;
        assert_eq!(result, Err(FetchError::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn test_guard_returns_cancelled_when_token_fires() {
        let scope = FetchScope::with_timeout(Duration::from_secs(10));
        let token = scope.cancel_token().clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1)).await;
            token.cancel();
        });

        let result = scope
            .guard(async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, FetchError>(())
            })
            .await;
        assert_eq!(result, Err(FetchError::Cancelled));
    }

    #[tokio::test]
    async fn test_already_cancelled_scope_wins_over_ready_result() {
        let scope = FetchScope::with_timeout(Duration::from_secs(1));
        scope.cancel_token().cancel();
        let result = scope.guard(async { Ok::<_, FetchError>(1) }).await;
        assert_eq!(result, Err(FetchError::Cancelled));
        assert!(scope.is_cancelled());
    }
}
