use super::outcome::{CheckoutError, CheckoutOutcome};
use crate::error::{DropInError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectStatus {
    Success,
    Canceled,
    /// The external flow ended in an error; the payload is a serialized [`CheckoutError`].
    Failed,
}

/// Raw response returned by the external authentication process when it
/// hands control back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectResponse {
    pub status: RedirectStatus,
    /// JSON document carried by the return URL; required on success and failure.
    pub payload: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RedirectPayload {
    nonce: String,
    device_data: Option<String>,
}

impl RedirectResponse {
    pub fn success(payload: impl Into<String>) -> Self {
        Self {
            status: RedirectStatus::Success,
            payload: Some(payload.into()),
        }
    }

    pub fn canceled() -> Self {
        Self {
            status: RedirectStatus::Canceled,
            payload: None,
        }
    }

    /// Re-encodes an outcome that was resolved but never delivered, so it can
    /// be handed back to the checkout client.
    pub fn from_outcome(outcome: &CheckoutOutcome) -> Result<Self> {
        match outcome {
            CheckoutOutcome::Success {
                payment_method_nonce,
                device_data,
            } => {
                let payload = serde_json::json!({
                    "nonce": payment_method_nonce,
                    "deviceData": device_data,
                });
                Ok(Self::success(payload.to_string()))
            }
            CheckoutOutcome::UserCanceled => Ok(Self::canceled()),
            CheckoutOutcome::Failure { error } => Ok(Self {
                status: RedirectStatus::Failed,
                payload: Some(serde_json::to_string(error)?),
            }),
        }
    }

    /// Interprets the response as a checkout outcome.
    pub fn into_outcome(self) -> Result<CheckoutOutcome> {
        match self.status {
            RedirectStatus::Canceled => Ok(CheckoutOutcome::UserCanceled),
            RedirectStatus::Success => {
                let raw = self.payload.ok_or_else(|| {
                    DropInError::RedirectResolution("redirect succeeded without a payload".into())
                })?;
                let payload: RedirectPayload = serde_json::from_str(&raw).map_err(|e| {
                    DropInError::RedirectResolution(format!("malformed redirect payload: {e}"))
                })?;
                if payload.nonce.is_empty() {
                    return Err(DropInError::RedirectResolution(
                        "redirect payload carries an empty nonce".into(),
                    ));
                }
                Ok(CheckoutOutcome::success(payload.nonce, payload.device_data))
            }
            RedirectStatus::Failed => {
                let raw = self.payload.ok_or_else(|| {
                    DropInError::RedirectResolution("redirect failed without an error".into())
                })?;
                let error: CheckoutError = serde_json::from_str(&raw).map_err(|e| {
                    DropInError::RedirectResolution(format!("malformed redirect error: {e}"))
                })?;
                Ok(CheckoutOutcome::Failure { error })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::outcome::ErrorCategory;

    #[test]
    fn test_success_payload_becomes_outcome() {
        let response = RedirectResponse::success(r#"{"nonce":"abc123","deviceData":"dd1"}"#);
        assert_eq!(
            response.into_outcome().unwrap(),
            CheckoutOutcome::success("abc123", Some("dd1".to_string()))
        );
    }

    #[test]
    fn test_canceled_ignores_payload() {
        let response = RedirectResponse {
            status: RedirectStatus::Canceled,
            payload: Some("garbage".to_string()),
        };
        assert_eq!(response.into_outcome().unwrap(), CheckoutOutcome::UserCanceled);
    }

    #[test]
    fn test_undelivered_outcomes_survive_re_encoding() {
        let outcomes = [
            CheckoutOutcome::success("abc123", Some("dd1".to_string())),
            CheckoutOutcome::success("abc123", None),
            CheckoutOutcome::UserCanceled,
            CheckoutOutcome::failure(ErrorCategory::Server, "bad gateway"),
        ];

        for outcome in outcomes {
            let response = RedirectResponse::from_outcome(&outcome).unwrap();
            assert_eq!(response.into_outcome().unwrap(), outcome);
        }
    }

    #[test]
    fn test_malformed_payload_is_resolution_error() {
        let cases = [
            RedirectResponse::success("not json"),
            RedirectResponse::success(r#"{"deviceData":"dd1"}"#),
            RedirectResponse::success(r#"{"nonce":""}"#),
            RedirectResponse {
                status: RedirectStatus::Failed,
                payload: Some("{}".to_string()),
            },
            RedirectResponse {
                status: RedirectStatus::Success,
                payload: None,
            },
        ];

        for response in cases {
            assert!(matches!(
                response.into_outcome(),
                Err(DropInError::RedirectResolution(_))
            ));
        }
    }
}
