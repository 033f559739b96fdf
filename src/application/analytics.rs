use crate::domain::ports::CheckoutClientRef;
use tracing::debug;

/// Forwards analytics event names to the checkout client.
///
/// Stateless and fire-and-forget: nothing is returned and collaborator
/// failures never reach the caller.
#[derive(Clone)]
pub struct AnalyticsDispatcher {
    client: CheckoutClientRef,
}

impl AnalyticsDispatcher {
    pub fn new(client: CheckoutClientRef) -> Self {
        Self { client }
    }

    pub fn dispatch(&self, name: &str) {
        debug!(event = name, "dispatching analytics event");
        self.client.send_analytics_event(name);
    }
}
