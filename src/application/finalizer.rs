use super::analytics::AnalyticsDispatcher;
use crate::domain::outcome::{CheckoutOutcome, CheckoutResult, Disposition};
use crate::domain::ports::HostCompletionRef;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Result of handing an outcome to the finalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finalization {
    Accepted(Disposition),
    /// The host was already finalized; the outcome was discarded.
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizerState<'a> {
    Awaiting,
    Finalized(&'a CheckoutResult),
}

/// Turns the first outcome it receives into the host's completion signal.
///
/// `Awaiting` moves to `Finalized` exactly once. The latch is a [`OnceLock`],
/// so the first writer wins even when outcomes race in from different
/// threads, and every later outcome is dropped without signalling the host.
pub struct ActivityFinalizer {
    result: OnceLock<CheckoutResult>,
    device_data: OnceLock<String>,
    analytics: AnalyticsDispatcher,
    completion: HostCompletionRef,
}

impl ActivityFinalizer {
    pub fn new(analytics: AnalyticsDispatcher, completion: HostCompletionRef) -> Self {
        Self {
            result: OnceLock::new(),
            device_data: OnceLock::new(),
            analytics,
            completion,
        }
    }

    /// Remembers device data for successful outcomes that carry none. First value wins.
    pub fn attach_device_data(&self, device_data: String) {
        let _ = self.device_data.set(device_data);
    }

    pub fn finalize(&self, outcome: CheckoutOutcome) -> Finalization {
        if self.result.get().is_some() {
            debug!(disposition = outcome.disposition().as_str(), "already finalized, discarding outcome");
            return Finalization::Suppressed;
        }

        let exit_event = outcome.exit_event();
        let result = CheckoutResult::from_outcome(outcome, self.device_data.get().cloned());
        let disposition = result.disposition;
        if self.result.set(result.clone()).is_err() {
            debug!(disposition = disposition.as_str(), "lost finalization race, discarding outcome");
            return Finalization::Suppressed;
        }

        info!(
            disposition = disposition.as_str(),
            result_code = disposition.result_code(),
            "finalizing host"
        );
        self.analytics.dispatch(&exit_event);
        self.completion.complete(result);
        Finalization::Accepted(disposition)
    }

    pub fn state(&self) -> FinalizerState<'_> {
        match self.result.get() {
            Some(result) => FinalizerState::Finalized(result),
            None => FinalizerState::Awaiting,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.result.get().is_some()
    }

    pub fn result(&self) -> Option<&CheckoutResult> {
        self.result.get()
    }
}
