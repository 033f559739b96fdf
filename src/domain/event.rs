use super::outcome::CheckoutOutcome;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an in-process event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelKey(&'static str);

impl ChannelKey {
    /// The channel child components publish checkout events to.
    pub const DROP_IN_EVENT: Self = Self("DROP_IN_EVENT_REQUEST_KEY");

    pub const fn new(key: &'static str) -> Self {
        Self(key)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Message posted by a child component to the host.
///
/// Analytics events are side effects; outcome events end the checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CheckoutEvent {
    Analytics { name: String },
    Outcome { outcome: CheckoutOutcome },
}

impl CheckoutEvent {
    pub fn analytics(name: impl Into<String>) -> Self {
        Self::Analytics { name: name.into() }
    }

    pub fn outcome(outcome: CheckoutOutcome) -> Self {
        Self::Outcome { outcome }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}
