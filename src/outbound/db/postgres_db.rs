use crate::configuration::{ConfigurationError, ConnectionStrings, CITY_INFO_DB_KEY};
use secrecy::ExposeSecret;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;

mod city_info_repo;

/// Handle on the City Info database.
///
/// Cloning is cheap: every clone shares the same connection pool, which is
/// what lets the repository be handed out once per request.
#[derive(Clone, Debug)]
pub struct PostgresDb {
    pool: PgPool,
}

impl PostgresDb {
    /// Builds a lazily connecting pool from `DbConnectionString:CityInfoDb`.
    ///
    /// Fails when the connection string is missing, blank or cannot be parsed.
    pub fn new(connection_strings: &ConnectionStrings) -> Result<PostgresDb, ConfigurationError> {
        let connection_string = connection_strings.city_info_db()?;
        let options = PgConnectOptions::from_str(connection_string.expose_secret()).map_err(
            |source| ConfigurationError::InvalidConnectionString {
                key: CITY_INFO_DB_KEY,
                source,
            },
        )?;

        Ok(PostgresDb {
            pool: PgPoolOptions::new()
                .acquire_timeout(std::time::Duration::from_secs(2))
                .connect_lazy_with(options),
        })
    }
}
