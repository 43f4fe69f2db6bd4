//! Subcommand implementations.

pub mod catalog;
pub mod orders;
pub mod reports;

use secrecy::ExposeSecret;
use thiserror::Error;

use webshop_client::{
    ClientConfig, ClientError, ConfigError, Credentials, HttpStoreApi, StoreClient,
};

use crate::Connection;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Client action failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A command-line value is unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Environment configuration with command-line overrides applied.
pub fn load_config(connection: &Connection) -> Result<ClientConfig, CommandError> {
    let mut config = ClientConfig::from_env()?;

    if let Some(url) = &connection.api_url {
        config.api_url = ClientConfig::with_api_url(url)?.api_url;
    }

    match (&connection.username, &connection.password) {
        (Some(username), Some(password)) => {
            config.credentials = Some(Credentials::new(username, password));
        }
        (None, None) => {}
        _ => {
            return Err(CommandError::InvalidArgument(
                "--username and --password must be given together".to_string(),
            ));
        }
    }

    Ok(config)
}

/// Anonymous client for public reads.
pub fn connect(connection: &Connection) -> Result<(StoreClient<HttpStoreApi>, ClientConfig), CommandError> {
    let config = load_config(connection)?;
    let api = HttpStoreApi::new(&config)?;
    tracing::debug!(api_url = %config.base(), "Client ready");
    Ok((StoreClient::new(api), config))
}

/// Client logged in with the configured credentials.
pub async fn connect_authenticated(
    connection: &Connection,
) -> Result<StoreClient<HttpStoreApi>, CommandError> {
    let (mut client, config) = connect(connection)?;
    let credentials = config.require_credentials()?;

    client
        .login(&credentials.username, credentials.password.expose_secret())
        .await?;

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_credentials_rejected() {
        let connection = Connection {
            api_url: None,
            username: Some("alice".to_string()),
            password: None,
        };
        assert!(matches!(
            load_config(&connection),
            Err(CommandError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_flags_override_environment() {
        let connection = Connection {
            api_url: Some("http://shop.test:8080/api/".to_string()),
            username: Some("alice".to_string()),
            password: Some("pw".to_string()),
        };
        let config = load_config(&connection).expect("config");
        assert_eq!(config.base(), "http://shop.test:8080/api");
        assert_eq!(config.require_credentials().expect("creds").username, "alice");
    }

    #[test]
    fn test_bad_url_flag_rejected() {
        let connection = Connection {
            api_url: Some("ftp://shop.test".to_string()),
            ..Connection::default()
        };
        assert!(matches!(
            load_config(&connection),
            Err(CommandError::Config(_))
        ));
    }
}
