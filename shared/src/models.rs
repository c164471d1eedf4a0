//! Appointment request payload and its validation.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::{Error, Result};

/// Appointment booking payload as sent by the client.
#[derive(Debug, Deserialize, Validate)]
pub struct AppointmentPayload {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = 0, max = 150))]
    pub age: i32,
    #[validate(length(min = 1, max = 255))]
    pub hospital: String,
    #[validate(length(min = 1))]
    pub date: String,
}

/// A validated appointment, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentRequest {
    pub name: String,
    pub age: i32,
    pub hospital: String,
    /// Stored exactly as received.
    pub date: String,
}

impl AppointmentPayload {
    /// Validate the payload into an `AppointmentRequest`.
    ///
    /// Values are checked but never rewritten.
    pub fn into_request(self) -> Result<AppointmentRequest> {
        self.validate()
            .map_err(|e| Error::MalformedInput(e.to_string()))?;

        for (field, value) in [("name", &self.name), ("hospital", &self.hospital)] {
            if value.trim().is_empty() {
                return Err(Error::MalformedInput(format!("{}: must not be blank", field)));
            }
        }

        check_date(&self.date)?;

        Ok(AppointmentRequest {
            name: self.name,
            age: self.age,
            hospital: self.hospital,
            date: self.date,
        })
    }
}

/// Accept only `YYYY-MM-DD`; chrono alone tolerates short fields and signs.
fn check_date(date: &str) -> Result<()> {
    let invalid = |reason: String| {
        Error::MalformedInput(format!("date: expected YYYY-MM-DD, got {:?} ({})", date, reason))
    };

    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| invalid(e.to_string()))?;
    if parsed.format("%Y-%m-%d").to_string() != date {
        return Err(invalid("not zero-padded".to_string()));
    }

    Ok(())
}

/// Parse and validate a JSON request body.
pub fn parse_appointment(body: &str) -> Result<AppointmentRequest> {
    let payload: AppointmentPayload = serde_json::from_str(body)
        .map_err(|e| Error::MalformedInput(format!("Invalid request body: {}", e)))?;

    payload.into_request()
}
