use crate::domain::event::CheckoutEvent;
use crate::domain::lifecycle::HostState;
use crate::domain::outcome::{CheckoutOutcome, ErrorCategory};
use crate::domain::redirect::RedirectResponse;
use crate::error::{DropInError, Result};
use serde::Deserialize;
use std::io::Read;

/// One scripted step replayed against a host.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioStep {
    Lifecycle(HostState),
    Publish(CheckoutEvent),
    /// Raw wire payload, published undecoded.
    PublishPayload(String),
    StageRedirect(RedirectResponse),
    StageUnreadableRedirect(String),
}

#[derive(Debug, Deserialize)]
struct ScenarioRecord {
    action: String,
    kind: String,
    value: Option<String>,
    extra: Option<String>,
}

impl ScenarioRecord {
    fn required_value(&self) -> Result<String> {
        self.value.clone().ok_or_else(|| {
            DropInError::Scenario(format!("{} {} requires a value", self.action, self.kind))
        })
    }

    fn outcome(&self) -> Result<CheckoutOutcome> {
        match self.kind.as_str() {
            "success" => Ok(CheckoutOutcome::success(self.required_value()?, self.extra.clone())),
            "canceled" => Ok(CheckoutOutcome::UserCanceled),
            "failure" => {
                let category: ErrorCategory =
                    serde_json::from_value(serde_json::Value::String(self.required_value()?))
                        .map_err(|e| DropInError::Scenario(format!("unknown error category: {e}")))?;
                Ok(CheckoutOutcome::failure(
                    category,
                    self.extra.clone().unwrap_or_default(),
                ))
            }
            other => Err(DropInError::Scenario(format!("unknown outcome '{other}'"))),
        }
    }
}

impl TryFrom<ScenarioRecord> for ScenarioStep {
    type Error = DropInError;

    fn try_from(record: ScenarioRecord) -> Result<Self> {
        match (record.action.as_str(), record.kind.as_str()) {
            ("lifecycle", state) => state
                .parse()
                .map(ScenarioStep::Lifecycle)
                .map_err(DropInError::Scenario),
            ("publish", "analytics") => Ok(ScenarioStep::Publish(CheckoutEvent::analytics(
                record.required_value()?,
            ))),
            ("publish", "payload") => Ok(ScenarioStep::PublishPayload(record.required_value()?)),
            ("publish", _) => Ok(ScenarioStep::Publish(CheckoutEvent::outcome(record.outcome()?))),
            ("redirect", "success") => {
                let payload = serde_json::json!({
                    "nonce": record.required_value()?,
                    "deviceData": record.extra,
                });
                Ok(ScenarioStep::StageRedirect(RedirectResponse::success(
                    payload.to_string(),
                )))
            }
            ("redirect", "canceled") => Ok(ScenarioStep::StageRedirect(RedirectResponse::canceled())),
            ("redirect", "malformed") => Ok(ScenarioStep::StageRedirect(RedirectResponse::success(
                record.value.unwrap_or_default(),
            ))),
            ("redirect", "unreadable") => Ok(ScenarioStep::StageUnreadableRedirect(
                record.value.unwrap_or_else(|| "unreadable redirect".to_string()),
            )),
            (action, kind) => Err(DropInError::Scenario(format!(
                "unknown step '{action},{kind}'"
            ))),
        }
    }
}

/// Reads scenario steps from a CSV source with an `action,kind,value,extra` header.
pub struct ScenarioReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ScenarioReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily yields steps; a bad row yields an error without ending the stream.
    pub fn steps(self) -> impl Iterator<Item = Result<ScenarioStep>> {
        self.reader.into_deserialize().map(|record| {
            let record: ScenarioRecord = record?;
            ScenarioStep::try_from(record)
        })
    }
}
