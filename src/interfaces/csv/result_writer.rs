use crate::domain::outcome::CheckoutResult;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct ResultRecord<'a> {
    disposition: &'a str,
    result_code: Option<i32>,
    payment_method_nonce: Option<&'a str>,
    device_data: Option<&'a str>,
    error: Option<String>,
    analytics: String,
}

/// Writes the host's final result as a single CSV record.
///
/// A host that never finalized is reported with disposition `awaiting`.
/// Analytics events are joined with `;` in send order.
pub struct ResultWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ResultWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_result(&mut self, result: Option<&CheckoutResult>, analytics: &[String]) -> Result<()> {
        let record = ResultRecord {
            disposition: result.map_or("awaiting", |r| r.disposition.as_str()),
            result_code: result.map(CheckoutResult::result_code),
            payment_method_nonce: result.and_then(|r| r.payment_method_nonce.as_deref()),
            device_data: result.and_then(|r| r.device_data.as_deref()),
            error: result.and_then(|r| r.error.as_ref()).map(ToString::to_string),
            analytics: analytics.join(";"),
        };
        self.writer.serialize(record)?;
        self.writer.flush()?;
        Ok(())
    }
}
