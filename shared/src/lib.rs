//! Shared library for the appointment intake Lambda.
//!
//! This crate provides configuration, the error taxonomy, request models and the
//! database connector used by the `book_appointment` function.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;

pub use config::Config;
pub use db::{store_appointment, AppointmentConnection, Connector, MySqlConnector};
pub use error::{Error, Result};
pub use http::{error_response, success_response, IntakeEvent, IntakeResponse, SUCCESS_BODY};
pub use models::{parse_appointment, AppointmentPayload, AppointmentRequest};
