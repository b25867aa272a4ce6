use std::env;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_CLUSTER_HOST: &str = "cluster0.sq2afw1.mongodb.net";
const DEFAULT_DATABASE: &str = "mobile-sebaa";
const DEFAULT_USERS_SORT_FIELD: &str = "id";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    /// Field the user listing is sorted by.
    pub users_sort_field: String,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match var("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let mongodb_uri = match var("MONGODB_URI") {
            Some(uri) => uri,
            None => {
                let user = var("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?;
                let password = var("DB_PASSWORD").ok_or(ConfigError::Missing("DB_PASSWORD"))?;
                let cluster = var("MONGODB_CLUSTER_HOST").unwrap_or_else(|| DEFAULT_CLUSTER_HOST.to_string());
                atlas_uri(&user, &password, &cluster)
            }
        };

        let database_name = var("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        let users_sort_field =
            var("USERS_SORT_FIELD").unwrap_or_else(|| DEFAULT_USERS_SORT_FIELD.to_string());

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            mongodb_uri,
            database_name,
            users_sort_field,
            cors_allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// SRV connection string for the Atlas cluster. Credentials are percent-encoded.
pub fn atlas_uri(user: &str, password: &str, cluster_host: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority&appName=Cluster0",
        urlencoding::encode(user),
        urlencoding::encode(password),
        cluster_host
    )
}

/// Connection string with the password masked, for logging.
pub fn redact_uri(uri: &str) -> String {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_string();
    };

    match rest.rsplit_once('@') {
        Some((credentials, host)) => {
            let user = credentials.split(':').next().unwrap_or_default();
            format!("{}://{}:****@{}", scheme, user, host)
        }
        None => uri.to_string(),
    }
}
