//! Book Appointment Lambda - Stores appointment requests.
//!
//! Receives a proxy event whose body is a JSON appointment
//! (`name`, `age`, `hospital`, `date`), validates it, inserts one row into the
//! `appointments` table over a connection opened for this invocation only,
//! and answers with a JSON message.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use shared::{
    error_response, parse_appointment, store_appointment, success_response, AppointmentRequest,
    Config, Connector, IntakeEvent, IntakeResponse, MySqlConnector,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Application state shared across invocations.
struct AppState<C> {
    connector: C,
}

impl AppState<MySqlConnector> {
    fn new(config: &Config) -> Self {
        Self {
            connector: MySqlConnector::new(config),
        }
    }
}

/// Validate the event body and store it as one appointment row.
///
/// Nothing touches the database until the body has been validated.
async fn book_appointment<C: Connector>(
    connector: &C,
    event: &IntakeEvent,
) -> shared::Result<AppointmentRequest> {
    let body = event.body_text()?;
    let appointment = parse_appointment(&body)?;

    store_appointment(connector, &appointment).await?;

    Ok(appointment)
}

async fn handler<C: Connector>(
    state: Arc<AppState<C>>,
    event: LambdaEvent<IntakeEvent>,
) -> Result<IntakeResponse, Error> {
    let request_id = event.context.request_id.clone();

    match book_appointment(&state.connector, &event.payload).await {
        Ok(appointment) => {
            info!(
                request_id = %request_id,
                hospital = %appointment.hospital,
                date = %appointment.date,
                "Appointment booked"
            );
            Ok(success_response())
        }
        Err(e) => {
            if e.status_code() >= 500 {
                error!(request_id = %request_id, kind = e.kind(), "Booking failed: {}", e);
            } else {
                warn!(request_id = %request_id, kind = e.kind(), "Booking rejected: {}", e);
            }
            Ok(error_response(&e))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;
    info!(
        db_host = %config.db_host,
        db_name = %config.db_name,
        "Starting book_appointment"
    );

    let state = Arc::new(AppState::new(&config));

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
