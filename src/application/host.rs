use super::analytics::AnalyticsDispatcher;
use super::bridge::ResultBridge;
use super::channel::{EventChannel, SubscriptionId};
use super::finalizer::{ActivityFinalizer, Finalization};
use super::gate::{GateTransition, LifecycleGate};
use crate::domain::event::{ChannelKey, CheckoutEvent};
use crate::domain::lifecycle::HostState;
use crate::domain::outcome::{CheckoutOutcome, CheckoutResult};
use crate::domain::redirect::RedirectResponse;
use crate::domain::ports::{CheckoutClientRef, HostCompletionRef};
use crate::domain::request::{CheckoutRequest, LaunchExtras};
use crate::error::Result;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Analytics event sent the first time a host instance becomes visible.
pub const APPEARED_EVENT: &str = "appeared";

/// Orchestrates the completion of one host instance.
///
/// Owns the lifecycle gate, the result bridge and the finalizer, and attaches
/// to the shared [`EventChannel`] while resumed. Both completion sources end
/// in the same finalizer, so whichever outcome arrives first decides the
/// host's result.
pub struct DropInHost {
    request: CheckoutRequest,
    client: CheckoutClientRef,
    gate: Arc<LifecycleGate>,
    bridge: ResultBridge,
    channel: EventChannel,
    analytics: AnalyticsDispatcher,
    finalizer: Arc<ActivityFinalizer>,
    subscription: Mutex<Option<SubscriptionId>>,
    deferred: Mutex<Option<CheckoutOutcome>>,
}

impl DropInHost {
    /// Builds a host from its launch extras.
    ///
    /// Fails with a configuration error when the extras carry no valid
    /// checkout request.
    pub fn new(
        extras: &LaunchExtras,
        client: CheckoutClientRef,
        completion: HostCompletionRef,
        channel: EventChannel,
    ) -> Result<Self> {
        let request = CheckoutRequest::from_extras(extras)?;
        let analytics = AnalyticsDispatcher::new(Arc::clone(&client));

        Ok(Self {
            request,
            bridge: ResultBridge::new(Arc::clone(&client)),
            client,
            gate: Arc::new(LifecycleGate::new()),
            channel,
            finalizer: Arc::new(ActivityFinalizer::new(analytics.clone(), completion)),
            analytics,
            subscription: Mutex::new(None),
            deferred: Mutex::new(None),
        })
    }

    pub fn request(&self) -> &CheckoutRequest {
        &self.request
    }

    pub fn state(&self) -> HostState {
        self.gate.state()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalizer.is_finalized()
    }

    pub fn result(&self) -> Option<&CheckoutResult> {
        self.finalizer.result()
    }

    /// Handle onto the channel child components publish to.
    pub fn channel(&self) -> &EventChannel {
        &self.channel
    }

    /// Feeds a lifecycle transition reported by the UI container.
    pub async fn on_state_changed(&self, next: HostState) {
        match self.gate.transition(next) {
            GateTransition::EnteredResumed { first } => self.on_resume(first).await,
            GateTransition::LeftResumed => self.on_leave_resumed(next),
            GateTransition::Unchanged => {}
        }

        if self.gate.is_destroyed() {
            self.hand_back_deferred().await;
        }
    }

    async fn on_resume(&self, first: bool) {
        info!(first, "host resumed");
        self.attach_channel();

        if let Some(outcome) = self.take_deferred() {
            debug!("finalizing redirect outcome resolved while paused");
            self.finalizer.finalize(outcome);
        }

        if first {
            self.analytics.dispatch(APPEARED_EVENT);
            if self.request.collect_device_data {
                self.collect_device_data().await;
            }
        }

        self.bridge
            .check_for_pending_result(|outcome| {
                if let Some(outcome) = outcome {
                    self.accept_redirect_outcome(outcome);
                }
            })
            .await;

        // Destroyed while the redirect was resolving.
        if self.gate.is_destroyed() {
            self.hand_back_deferred().await;
        }
    }

    fn on_leave_resumed(&self, next: HostState) {
        debug!(state = ?next, "host left resumed state");
        let id = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(id) = id {
            self.channel.unsubscribe(ChannelKey::DROP_IN_EVENT, id);
        }
    }

    fn attach_channel(&self) {
        let gate = Arc::clone(&self.gate);
        let analytics = self.analytics.clone();
        let finalizer = Arc::clone(&self.finalizer);

        let id = self.channel.subscribe(ChannelKey::DROP_IN_EVENT, move |event| {
            let handled = gate.run_if_resumed(|| match event {
                CheckoutEvent::Analytics { name } => analytics.dispatch(&name),
                CheckoutEvent::Outcome { outcome } => {
                    finalizer.finalize(outcome);
                }
            });
            if handled.is_none() {
                debug!("event arrived outside resumed state, dropping");
            }
        });

        *self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(id);
    }

    fn accept_redirect_outcome(&self, outcome: CheckoutOutcome) {
        if self.gate.is_resumed() {
            if self.finalizer.finalize(outcome) == Finalization::Suppressed {
                debug!("redirect outcome arrived after finalization");
            }
        } else {
            debug!("redirect resolved outside resumed state, deferring outcome");
            *self.deferred.lock().unwrap_or_else(PoisonError::into_inner) = Some(outcome);
        }
    }

    fn take_deferred(&self) -> Option<CheckoutOutcome> {
        self.deferred
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Returns an undelivered redirect outcome to the checkout client so the
    /// next host instance resolves it again.
    async fn hand_back_deferred(&self) {
        let Some(outcome) = self.take_deferred() else {
            return;
        };
        match RedirectResponse::from_outcome(&outcome) {
            Ok(response) => {
                info!(
                    disposition = outcome.disposition().as_str(),
                    "host destroyed, returning undelivered redirect outcome to client"
                );
                self.client.restore_pending_redirect(response).await;
            }
            Err(e) => warn!(error = %e, "could not return undelivered redirect outcome"),
        }
    }

    async fn collect_device_data(&self) {
        match self.client.collect_device_data().await {
            Ok(device_data) => self.finalizer.attach_device_data(device_data),
            Err(e) => warn!(error = %e, "device data collection failed"),
        }
    }
}
