use crate::domain::outcome::CheckoutResult;
use crate::domain::ports::{CheckoutClient, HostCompletion};
use crate::domain::redirect::RedirectResponse;
use crate::error::{DropInError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, RwLock};

#[derive(Debug, Clone)]
enum PendingRedirect {
    Response(RedirectResponse),
    Unreadable(String),
}

/// A checkout client backed by memory.
///
/// A redirect result can be staged before the host resumes, and resolution
/// can be held back to simulate a slow external process. Analytics events
/// are recorded in send order.
#[derive(Default, Clone)]
pub struct InMemoryCheckoutClient {
    pending: Arc<RwLock<Option<PendingRedirect>>>,
    analytics: Arc<Mutex<Vec<String>>>,
    device_data: Option<String>,
    held: Arc<AtomicBool>,
    release: Arc<Notify>,
}

impl InMemoryCheckoutClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device_data(mut self, device_data: impl Into<String>) -> Self {
        self.device_data = Some(device_data.into());
        self
    }

    /// Makes a redirect result available to the next resolution.
    pub async fn stage_redirect(&self, response: RedirectResponse) {
        *self.pending.write().await = Some(PendingRedirect::Response(response));
    }

    /// Makes the next resolution fail as if the external process answered garbage.
    pub async fn stage_unreadable_redirect(&self, reason: impl Into<String>) {
        *self.pending.write().await = Some(PendingRedirect::Unreadable(reason.into()));
    }

    /// Blocks resolutions until [`release_resolution`](Self::release_resolution) is called.
    pub fn hold_resolution(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    pub fn release_resolution(&self) {
        self.held.store(false, Ordering::SeqCst);
        self.release.notify_one();
    }

    pub async fn has_pending_redirect(&self) -> bool {
        self.pending.read().await.is_some()
    }

    pub fn analytics_events(&self) -> Vec<String> {
        self.analytics
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CheckoutClient for InMemoryCheckoutClient {
    async fn resolve_pending_redirect(&self) -> Result<Option<RedirectResponse>> {
        if self.held.load(Ordering::SeqCst) {
            self.release.notified().await;
        }

        match self.pending.write().await.take() {
            None => Ok(None),
            Some(PendingRedirect::Response(response)) => Ok(Some(response)),
            Some(PendingRedirect::Unreadable(reason)) => {
                Err(DropInError::RedirectResolution(reason))
            }
        }
    }

    async fn restore_pending_redirect(&self, response: RedirectResponse) {
        let mut pending = self.pending.write().await;
        if pending.is_none() {
            *pending = Some(PendingRedirect::Response(response));
        }
    }

    fn send_analytics_event(&self, name: &str) {
        if let Ok(mut events) = self.analytics.lock() {
            events.push(name.to_string());
        }
    }

    async fn collect_device_data(&self) -> Result<String> {
        self.device_data.clone().ok_or_else(|| {
            DropInError::Configuration("device data collection is not available".into())
        })
    }
}

/// Host completion sink that records every signal it receives.
#[derive(Default, Clone)]
pub struct RecordingHost {
    results: Arc<Mutex<Vec<CheckoutResult>>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> Vec<CheckoutResult> {
        self.results
            .lock()
            .map(|results| results.clone())
            .unwrap_or_default()
    }

    pub fn last_result(&self) -> Option<CheckoutResult> {
        self.results().pop()
    }

    pub fn completion_count(&self) -> usize {
        self.results().len()
    }
}

impl HostCompletion for RecordingHost {
    fn complete(&self, result: CheckoutResult) {
        if let Ok(mut results) = self.results.lock() {
            results.push(result);
        }
    }
}
