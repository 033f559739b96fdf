#![allow(dead_code)]

use dropin::application::channel::EventChannel;
use dropin::application::host::DropInHost;
use dropin::domain::lifecycle::HostState;
use dropin::domain::request::{CheckoutRequest, LaunchExtras};
use dropin::infrastructure::in_memory::{InMemoryCheckoutClient, RecordingHost};
use std::sync::Arc;

pub struct Harness {
    pub host: DropInHost,
    pub client: InMemoryCheckoutClient,
    pub completion: RecordingHost,
    pub channel: EventChannel,
}

pub fn harness() -> Harness {
    harness_with(CheckoutRequest::default(), InMemoryCheckoutClient::new(), EventChannel::new())
}

pub fn harness_with(
    request: CheckoutRequest,
    client: InMemoryCheckoutClient,
    channel: EventChannel,
) -> Harness {
    let completion = RecordingHost::new();
    let extras = LaunchExtras::new().with_request(&request).unwrap();
    let host = DropInHost::new(
        &extras,
        Arc::new(client.clone()),
        Arc::new(completion.clone()),
        channel.clone(),
    )
    .unwrap();

    Harness {
        host,
        client,
        completion,
        channel,
    }
}

/// Fake lifecycle driver: walks the host through `states` in order.
pub async fn drive(host: &DropInHost, states: &[HostState]) {
    for state in states {
        host.on_state_changed(*state).await;
    }
}

pub const TO_RESUMED: &[HostState] = &[HostState::Created, HostState::Started, HostState::Resumed];
pub const TO_STOPPED: &[HostState] = &[HostState::Paused, HostState::Stopped];
pub const TO_DESTROYED: &[HostState] = &[HostState::Paused, HostState::Stopped, HostState::Destroyed];

pub fn exit_events(client: &InMemoryCheckoutClient) -> Vec<String> {
    client
        .analytics_events()
        .into_iter()
        .filter(|name| name.starts_with("sdk.exit."))
        .collect()
}
