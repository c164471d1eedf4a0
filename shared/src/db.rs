//! Database connection management.
//!
//! Every invocation opens its own connection through a [`Connector`], runs a
//! single insert inside a transaction and closes the connection again. The
//! traits exist so the intake flow can run against an in-memory double in
//! tests.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

use crate::models::AppointmentRequest;
use crate::{Config, Error, Result};

const INSERT_APPOINTMENT: &str =
    "INSERT INTO appointments (name, age, hospital, date) VALUES (?, ?, ?, ?)";

/// Opens connections able to store appointments.
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: AppointmentConnection;

    /// Open a fresh connection owned by the caller.
    async fn connect(&self) -> Result<Self::Connection>;
}

/// A single open database connection.
#[async_trait]
pub trait AppointmentConnection: Send {
    /// Insert one appointment row and commit it.
    async fn insert(&mut self, appointment: &AppointmentRequest) -> Result<()>;

    /// Close the connection.
    async fn close(self) -> Result<()>;
}

/// Connector for the MySQL `appointments` table.
#[derive(Debug, Clone)]
pub struct MySqlConnector {
    options: MySqlConnectOptions,
    timeout: Duration,
}

impl MySqlConnector {
    pub fn new(config: &Config) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.db_host)
            .port(config.db_port)
            .username(&config.db_user)
            .password(&config.db_password)
            .database(&config.db_name);

        Self {
            options,
            timeout: config.db_timeout,
        }
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    type Connection = MySqlAppointmentConnection;

    async fn connect(&self) -> Result<Self::Connection> {
        let conn = timeout(self.timeout, MySqlConnection::connect_with(&self.options))
            .await
            .map_err(|_| Error::Timeout("connecting"))?
            .map_err(Error::Connection)?;

        Ok(MySqlAppointmentConnection {
            conn,
            timeout: self.timeout,
        })
    }
}

/// An open MySQL connection.
pub struct MySqlAppointmentConnection {
    conn: MySqlConnection,
    timeout: Duration,
}

impl MySqlAppointmentConnection {
    async fn insert_in_transaction(&mut self, appointment: &AppointmentRequest) -> Result<()> {
        let mut tx = self.conn.begin().await.map_err(Error::Storage)?;

        sqlx::query(INSERT_APPOINTMENT)
            .bind(&appointment.name)
            .bind(appointment.age)
            .bind(&appointment.hospital)
            .bind(&appointment.date)
            .execute(&mut *tx)
            .await
            .map_err(Error::Storage)?;

        // Dropping `tx` without committing rolls the insert back.
        tx.commit().await.map_err(Error::Storage)
    }
}

#[async_trait]
impl AppointmentConnection for MySqlAppointmentConnection {
    async fn insert(&mut self, appointment: &AppointmentRequest) -> Result<()> {
        let limit = self.timeout;
        timeout(limit, self.insert_in_transaction(appointment))
            .await
            .map_err(|_| Error::Timeout("inserting"))?
    }

    async fn close(self) -> Result<()> {
        self.conn.close().await.map_err(Error::Connection)
    }
}

/// Open a connection, store `appointment`, and close the connection again.
///
/// The connection is closed whether or not the insert succeeds. Once the
/// insert has committed, a failure to close is only logged.
pub async fn store_appointment<C: Connector>(
    connector: &C,
    appointment: &AppointmentRequest,
) -> Result<()> {
    let mut conn = connector.connect().await?;
    let inserted = conn.insert(appointment).await;

    if let Err(e) = conn.close().await {
        warn!("Connection close failed after insert: {}", e);
    }

    inserted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_options_from_config() {
        let config = Config {
            db_host: "db.internal".to_string(),
            db_port: 3307,
            db_user: "intake".to_string(),
            db_password: "p@ss:/word".to_string(),
            db_name: "clinic".to_string(),
            db_timeout: Duration::from_secs(1),
        };

        let connector = MySqlConnector::new(&config);
        assert_eq!(connector.options.get_host(), "db.internal");
        assert_eq!(connector.options.get_port(), 3307);
        assert_eq!(connector.options.get_username(), "intake");
        assert_eq!(connector.options.get_database(), Some("clinic"));
        assert_eq!(connector.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_insert_is_parameterized() {
        assert_eq!(INSERT_APPOINTMENT.matches('?').count(), 4);
        assert!(INSERT_APPOINTMENT.starts_with("INSERT INTO appointments (name, age, hospital, date)"));
    }
}
