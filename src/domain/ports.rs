use super::outcome::CheckoutResult;
use super::redirect::RedirectResponse;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// The external checkout client shared by the result bridge and the
/// analytics dispatcher. Its lifecycle belongs to the host, not the core.
#[async_trait]
pub trait CheckoutClient: Send + Sync {
    /// Resolves and consumes the pending redirect, if any.
    ///
    /// Once a response has been returned it must not be returned again.
    async fn resolve_pending_redirect(&self) -> Result<Option<RedirectResponse>>;

    /// Gives back a response that was resolved but never delivered, so the
    /// next host instance's resolution returns it. A response that arrived
    /// in the meantime takes precedence.
    async fn restore_pending_redirect(&self, response: RedirectResponse);

    /// Fire-and-forget. Implementations swallow their own failures.
    fn send_analytics_event(&self, name: &str);

    async fn collect_device_data(&self) -> Result<String>;
}

/// Receives the host's single completion signal.
pub trait HostCompletion: Send + Sync {
    fn complete(&self, result: CheckoutResult);
}

pub type CheckoutClientRef = Arc<dyn CheckoutClient>;
pub type HostCompletionRef = Arc<dyn HostCompletion>;
