use std::env;
use std::fmt;

pub const DEFAULT_MONGODB_HOST: &str = "semflo-network.i1wmr6y.mongodb.net";
pub const DEFAULT_MONGODB_DATABASE: &str = "SEMFLO-NETWORK";

/// Service configuration, read from the process environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` when neither MONGODB_URI nor DB_USER_PASS is set
    pub database_uri: Option<String>,
    pub database_name: String,
    pub client_url: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort(port) => write!(f, "invalid PORT: {}", port),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't touch the real environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port_raw = lookup("PORT").unwrap_or_else(|| "5000".to_string());
        let port = port_raw
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(port_raw.clone()))?;

        let database_name =
            lookup("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_MONGODB_DATABASE.to_string());

        let database_uri = lookup("MONGODB_URI").or_else(|| {
            let credentials = lookup("DB_USER_PASS")?;
            let cluster = lookup("MONGODB_HOST").unwrap_or_else(|| DEFAULT_MONGODB_HOST.to_string());
            Some(cluster_uri(&credentials, &cluster, &database_name))
        });

        Ok(Self {
            host,
            port,
            database_uri,
            database_name,
            client_url: lookup("CLIENT_URL").filter(|url| !url.is_empty()),
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

/// `mongodb+srv://<user:pass>@<cluster>/<database>`
pub fn cluster_uri(credentials: &str, cluster: &str, database: &str) -> String {
    format!("mongodb+srv://{}@{}/{}", credentials, cluster, database)
}

/// Connection URI with the credential part masked, for logging
pub fn redact_uri(uri: &str) -> String {
    match (uri.find("://"), uri.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &uri[..scheme_end], &uri[at..])
        }
        _ => uri.to_string(),
    }
}
