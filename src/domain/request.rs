use crate::error::{DropInError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Key under which the checkout request travels in the host's launch extras.
pub const EXTRA_CHECKOUT_REQUEST: &str = "dropin.EXTRA_CHECKOUT_REQUEST";

/// Immutable description of the checkout the host was launched for.
///
/// Built by the caller before the host exists and owned by the host for its
/// whole lifetime. Nothing in the orchestration core mutates it.
///
/// The amount and the payment-method flags configure the child components
/// that render the flow; the core itself only reads `collect_device_data`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutRequest {
    /// Amount shown to the user and forwarded to verification flows.
    pub amount: Option<Decimal>,
    /// Whether a 3D Secure challenge should be requested for eligible cards.
    pub request_three_d_secure_verification: bool,
    /// Whether device data should be collected and attached to a successful result.
    pub collect_device_data: bool,
    pub card_disabled: bool,
    pub pay_pal_disabled: bool,
    pub venmo_disabled: bool,
    pub google_pay_disabled: bool,
    pub vault_manager_enabled: bool,
}

impl CheckoutRequest {
    /// Extracts the request from launch extras.
    ///
    /// A missing or undecodable entry is a fatal configuration error.
    pub fn from_extras(extras: &LaunchExtras) -> Result<Self> {
        let value = extras.get(EXTRA_CHECKOUT_REQUEST).ok_or_else(|| {
            DropInError::Configuration(format!(
                "launch extras do not contain {EXTRA_CHECKOUT_REQUEST}"
            ))
        })?;

        serde_json::from_value(value.clone()).map_err(|e| {
            DropInError::Configuration(format!("invalid checkout request: {e}"))
        })
    }
}

/// Keyed construction parameters handed to the host at launch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchExtras {
    values: HashMap<String, Value>,
}

impl LaunchExtras {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts the serialized request under [`EXTRA_CHECKOUT_REQUEST`].
    pub fn with_request(mut self, request: &CheckoutRequest) -> Result<Self> {
        self.values.insert(
            EXTRA_CHECKOUT_REQUEST.to_string(),
            serde_json::to_value(request)?,
        );
        Ok(self)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}
