use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

/// OAuth 1.0a credential set for the upstream API.
///
/// The consumer pair identifies the application, the access pair identifies
/// the acting user. All four values are held as secrets and never logged or
/// serialized in the clear.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub consumer_key: Secret<String>,
    pub consumer_secret: Secret<String>,
    pub access_token: Secret<String>,
    pub token_secret: Secret<String>,
    pub base_url: Option<String>,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for GatewayConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("GatewayConfig", 5)?;
        state.serialize_field("consumer_key", "[REDACTED]")?;
        state.serialize_field("consumer_secret", "[REDACTED]")?;
        state.serialize_field("access_token", "[REDACTED]")?;
        state.serialize_field("token_secret", "[REDACTED]")?;
        state.serialize_field("base_url", &self.base_url)?;
        state.end()
    }
}

// Custom Deserialize implementation
impl<'de> Deserialize<'de> for GatewayConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct GatewayConfigHelper {
            consumer_key: String,
            consumer_secret: String,
            access_token: String,
            token_secret: String,
            base_url: Option<String>,
        }

        let helper = GatewayConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            consumer_key: Secret::new(helper.consumer_key),
            consumer_secret: Secret::new(helper.consumer_secret),
            access_token: Secret::new(helper.access_token),
            token_secret: Secret::new(helper.token_secret),
            base_url: helper.base_url,
        })
    }
}

impl GatewayConfig {
    /// Create a new configuration with the full credential set
    #[must_use]
    pub fn new(
        consumer_key: String,
        consumer_secret: String,
        access_token: String,
        token_secret: String,
    ) -> Self {
        Self {
            consumer_key: Secret::new(consumer_key),
            consumer_secret: Secret::new(consumer_secret),
            access_token: Secret::new(access_token),
            token_secret: Secret::new(token_secret),
            base_url: None,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_CONSUMER_KEY`
    /// - `{PREFIX}_CONSUMER_SECRET`
    /// - `{PREFIX}_ACCESS_TOKEN`
    /// - `{PREFIX}_TOKEN_SECRET`
    /// - `{PREFIX}_BASE_URL` (optional)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let read = |suffix: &str| -> Result<String, ConfigError> {
            let var = format!("{}_{}", prefix, suffix);
            env::var(&var).map_err(|_| ConfigError::MissingEnvironmentVariable(var))
        };

        let consumer_key = read("CONSUMER_KEY")?;
        let consumer_secret = read("CONSUMER_SECRET")?;
        let access_token = read("ACCESS_TOKEN")?;
        let token_secret = read("TOKEN_SECRET")?;
        let base_url = env::var(format!("{}_BASE_URL", prefix)).ok();

        Ok(Self {
            consumer_key: Secret::new(consumer_key),
            consumer_secret: Secret::new(consumer_secret),
            access_token: Secret::new(access_token),
            token_secret: Secret::new(token_secret),
            base_url,
        })
    }

    /// Create configuration from a .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    /// Add .env to your .gitignore file.
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(_) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // .env file doesn't exist, continue with system env vars
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Check whether all four credential strings are present
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.consumer_key.expose_secret().is_empty()
            && !self.consumer_secret.expose_secret().is_empty()
            && !self.access_token.expose_secret().is_empty()
            && !self.token_secret.expose_secret().is_empty()
    }

    /// Set custom base URL for the upstream API
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Get consumer key (use carefully - exposes secret)
    pub fn consumer_key(&self) -> &str {
        self.consumer_key.expose_secret()
    }

    /// Get consumer secret (use carefully - exposes secret)
    pub fn consumer_secret(&self) -> &str {
        self.consumer_secret.expose_secret()
    }

    /// Get access token (use carefully - exposes secret)
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// Get token secret (use carefully - exposes secret)
    pub fn token_secret(&self) -> &str {
        self.token_secret.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
