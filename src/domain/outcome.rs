use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad classification of a failed checkout, used for exit analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    Authentication,
    Authorization,
    UpgradeRequired,
    Configuration,
    Server,
    Unexpected,
    DownForMaintenance,
    RedirectResolution,
    Sdk,
}

impl ErrorCategory {
    /// Suffix of the `sdk.exit.*` analytics event sent when a checkout fails.
    pub fn exit_reason(self) -> &'static str {
        match self {
            Self::Authentication | Self::Authorization | Self::UpgradeRequired => {
                "developer-error"
            }
            Self::Configuration => "configuration-exception",
            Self::Server | Self::Unexpected => "server-error",
            Self::DownForMaintenance => "server-unavailable",
            Self::RedirectResolution | Self::Sdk => "sdk-error",
        }
    }
}

/// Error carried by a failed checkout outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutError {
    pub category: ErrorCategory,
    pub message: String,
}

impl CheckoutError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

impl fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.category, self.message)
    }
}

/// Terminal result of a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CheckoutOutcome {
    #[serde(rename_all = "camelCase")]
    Success {
        payment_method_nonce: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        device_data: Option<String>,
    },
    #[serde(rename = "canceled")]
    UserCanceled,
    Failure { error: CheckoutError },
}

impl CheckoutOutcome {
    pub fn success(nonce: impl Into<String>, device_data: Option<String>) -> Self {
        Self::Success {
            payment_method_nonce: nonce.into(),
            device_data,
        }
    }

    pub fn failure(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self::Failure {
            error: CheckoutError::new(category, message),
        }
    }

    pub fn disposition(&self) -> Disposition {
        match self {
            Self::Success { .. } => Disposition::Success,
            Self::UserCanceled => Disposition::Canceled,
            Self::Failure { .. } => Disposition::Failure,
        }
    }

    /// Name of the analytics event recorded when this outcome ends the checkout.
    pub fn exit_event(&self) -> String {
        match self {
            Self::Success { .. } => "sdk.exit.success".to_string(),
            Self::UserCanceled => "sdk.exit.canceled".to_string(),
            Self::Failure { error } => format!("sdk.exit.{}", error.category.exit_reason()),
        }
    }
}

/// Final classification of a checkout attempt, reported to the host's caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    Success,
    Canceled,
    Failure,
}

impl Disposition {
    pub const RESULT_OK: i32 = -1;
    pub const RESULT_CANCELED: i32 = 0;
    pub const RESULT_FIRST_USER: i32 = 1;

    pub fn result_code(self) -> i32 {
        match self {
            Self::Success => Self::RESULT_OK,
            Self::Canceled => Self::RESULT_CANCELED,
            Self::Failure => Self::RESULT_FIRST_USER,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Canceled => "canceled",
            Self::Failure => "failure",
        }
    }
}

/// Payload the host completes with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResult {
    pub disposition: Disposition,
    pub payment_method_nonce: Option<String>,
    pub device_data: Option<String>,
    pub error: Option<CheckoutError>,
}

impl CheckoutResult {
    /// Builds the payload, falling back to `collected_device_data` when a
    /// successful outcome carries none of its own.
    pub fn from_outcome(outcome: CheckoutOutcome, collected_device_data: Option<String>) -> Self {
        match outcome {
            CheckoutOutcome::Success {
                payment_method_nonce,
                device_data,
            } => Self {
                disposition: Disposition::Success,
                payment_method_nonce: Some(payment_method_nonce),
                device_data: device_data.or(collected_device_data),
                error: None,
            },
            CheckoutOutcome::UserCanceled => Self {
                disposition: Disposition::Canceled,
                payment_method_nonce: None,
                device_data: None,
                error: None,
            },
            CheckoutOutcome::Failure { error } => Self {
                disposition: Disposition::Failure,
                payment_method_nonce: None,
                device_data: None,
                error: Some(error),
            },
        }
    }

    pub fn result_code(&self) -> i32 {
        self.disposition.result_code()
    }
}
