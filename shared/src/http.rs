//! Lambda proxy event and response shapes.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Body returned for every successful booking.
pub const SUCCESS_BODY: &str = r#"{"message": "Appointment booked successfully!"}"#;

/// Inbound event. Only the body matters; other proxy fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeEvent {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl IntakeEvent {
    /// Return the request body as text, decoding base64 when flagged.
    pub fn body_text(&self) -> Result<String> {
        let body = self
            .body
            .as_deref()
            .ok_or_else(|| Error::MalformedInput("Missing request body".to_string()))?;

        if !self.is_base64_encoded {
            return Ok(body.to_string());
        }

        let bytes = STANDARD
            .decode(body)
            .map_err(|e| Error::MalformedInput(format!("Invalid base64 body: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| Error::MalformedInput(format!("Body is not UTF-8: {}", e)))
    }
}

/// Proxy integration response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Error body returned for failed bookings.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    error: &'a str,
}

/// Create a JSON response with the given status code and pre-encoded body.
pub fn json_response(status: u16, body: impl Into<String>) -> IntakeResponse {
    IntakeResponse {
        status_code: status,
        headers: HashMap::from([(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )]),
        body: body.into(),
    }
}

/// The 200 response for a booked appointment.
pub fn success_response() -> IntakeResponse {
    json_response(200, SUCCESS_BODY)
}

/// Create an error response describing `err`.
pub fn error_response(err: &Error) -> IntakeResponse {
    let message = err.public_message();
    let body = serde_json::to_string(&ErrorBody {
        message: &message,
        error: err.kind(),
    })
    .unwrap_or_else(|_| r#"{"message": "Internal error"}"#.to_string());

    json_response(err.status_code(), body)
}
