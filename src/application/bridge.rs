use crate::domain::outcome::{CheckoutOutcome, ErrorCategory};
use crate::domain::ports::CheckoutClientRef;
use crate::error::DropInError;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Bridges the external redirect flow back into the host.
///
/// Polled once per entry into the resumed state. Hands at most one outcome
/// to its callback per poll and at most one outcome over its whole life, so
/// repeated polls after a delivery yield `None`.
pub struct ResultBridge {
    client: CheckoutClientRef,
    delivered: AtomicBool,
}

impl ResultBridge {
    pub fn new(client: CheckoutClientRef) -> Self {
        Self {
            client,
            delivered: AtomicBool::new(false),
        }
    }

    /// Resolves any pending redirect and passes the result to `on_result`.
    ///
    /// `on_result` runs exactly once, with `None` when nothing is pending.
    /// Resolution failures arrive as [`CheckoutOutcome::Failure`] and are not retried.
    pub async fn check_for_pending_result<F>(&self, on_result: F)
    where
        F: FnOnce(Option<CheckoutOutcome>),
    {
        let outcome = self.poll().await;
        on_result(outcome);
    }

    async fn poll(&self) -> Option<CheckoutOutcome> {
        if self.delivered.load(Ordering::SeqCst) {
            return None;
        }

        let outcome = match self.client.resolve_pending_redirect().await {
            Ok(None) => return None,
            Ok(Some(response)) => response.into_outcome().unwrap_or_else(resolution_failure),
            Err(e) => resolution_failure(e),
        };

        // A concurrent poll may have delivered while we were resolving.
        if self
            .delivered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }
        Some(outcome)
    }
}

fn resolution_failure(error: DropInError) -> CheckoutOutcome {
    warn!(error = %error, "failed to resolve pending redirect");
    let message = match error {
        DropInError::RedirectResolution(message) => message,
        other => other.to_string(),
    };
    CheckoutOutcome::failure(ErrorCategory::RedirectResolution, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::redirect::RedirectResponse;
    use crate::infrastructure::in_memory::InMemoryCheckoutClient;
    use std::sync::Arc;

    async fn poll_once(bridge: &ResultBridge) -> Option<CheckoutOutcome> {
        let mut seen = None;
        let mut calls = 0;
        bridge
            .check_for_pending_result(|outcome| {
                calls += 1;
                seen = outcome;
            })
            .await;
        assert_eq!(calls, 1);
        seen
    }

    #[tokio::test]
    async fn test_nothing_pending_yields_none_repeatedly() {
        let bridge = ResultBridge::new(Arc::new(InMemoryCheckoutClient::new()));

        assert_eq!(poll_once(&bridge).await, None);
        assert_eq!(poll_once(&bridge).await, None);
    }

    #[tokio::test]
    async fn test_pending_success_is_delivered_once() {
        let client = InMemoryCheckoutClient::new();
        client
            .stage_redirect(RedirectResponse::success(
                r#"{"nonce":"abc123","deviceData":"dd1"}"#,
            ))
            .await;
        let bridge = ResultBridge::new(Arc::new(client.clone()));

        assert_eq!(
            poll_once(&bridge).await,
            Some(CheckoutOutcome::success("abc123", Some("dd1".to_string())))
        );
        assert_eq!(poll_once(&bridge).await, None);
    }

    #[tokio::test]
    async fn test_stale_redirect_is_not_redelivered() {
        let client = InMemoryCheckoutClient::new();
        client.stage_redirect(RedirectResponse::canceled()).await;
        let bridge = ResultBridge::new(Arc::new(client.clone()));
        assert_eq!(poll_once(&bridge).await, Some(CheckoutOutcome::UserCanceled));

        // A client that hands out a second response must not reach the host again.
        client.stage_redirect(RedirectResponse::canceled()).await;
        assert_eq!(poll_once(&bridge).await, None);
    }

    #[tokio::test]
    async fn test_malformed_response_becomes_failure() {
        let client = InMemoryCheckoutClient::new();
        client.stage_redirect(RedirectResponse::success("{oops")).await;
        let bridge = ResultBridge::new(Arc::new(client));

        match poll_once(&bridge).await {
            Some(CheckoutOutcome::Failure { error }) => {
                assert_eq!(error.category, ErrorCategory::RedirectResolution);
                assert!(error.message.contains("malformed redirect payload"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_client_error_becomes_failure_without_retry() {
        let client = InMemoryCheckoutClient::new();
        client.stage_unreadable_redirect("truncated deep link").await;
        let bridge = ResultBridge::new(Arc::new(client));

        assert_eq!(
            poll_once(&bridge).await,
            Some(CheckoutOutcome::failure(
                ErrorCategory::RedirectResolution,
                "truncated deep link"
            ))
        );
        assert_eq!(poll_once(&bridge).await, None);
    }
}
