//! Configuration for the backend connection, query cache and map provider

use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Environment variable holding the Supabase project URL
pub const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
/// Environment variable holding the Supabase anonymous key
pub const SUPABASE_ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";
/// Environment variables checked, in order, for the map provider token
pub const MAP_TOKEN_VARS: [&str; 2] = ["MAPBOX_API_TOKEN", "VITE_MAPBOX_API_TOKEN"];

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: Url,
    pub anon_key: String,
}

impl SupabaseConfig {
    /// Creates a new configuration, validating the URL.
    pub fn new(url_str: &str, anon_key: String) -> Result<Self> {
        let url = Url::parse(url_str)?;
        if anon_key.trim().is_empty() {
            return Err(Error::config("anon_key cannot be empty"));
        }
        Ok(Self { url, anon_key })
    }

    /// Reads `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    pub fn from_env() -> Result<Self> {
        let url_str = std::env::var(SUPABASE_URL_VAR).map_err(|_| {
            Error::config(format!("{} environment variable not found", SUPABASE_URL_VAR))
        })?;
        let anon_key = std::env::var(SUPABASE_ANON_KEY_VAR).map_err(|_| {
            Error::config(format!(
                "{} environment variable not found",
                SUPABASE_ANON_KEY_VAR
            ))
        })?;
        Self::new(&url_str, anon_key)
    }

    /// Base URL without the trailing slash `Url` adds to bare hosts.
    pub fn base_url(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }
}

/// Tuning for the HTTP client and the list cache
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// The database schema
    pub db_schema: String,

    /// How long a successful list read is served from cache.
    /// `None` keeps it until a mutation invalidates it.
    pub stale_time: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            db_schema: "public".to_string(),
            stale_time: None,
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the database schema
    pub fn with_db_schema(mut self, value: &str) -> Self {
        self.db_schema = value.to_string();
        self
    }

    /// Set the list cache lifetime
    pub fn with_stale_time(mut self, value: Option<Duration>) -> Self {
        self.stale_time = value;
        self
    }
}

/// Availability of the map provider access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapToken {
    Configured(String),
    /// No token in the environment; the user has to enter one.
    NeedsEntry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapConfig {
    pub token: MapToken,
}

impl MapConfig {
    /// Reads the first non-blank token from [`MAP_TOKEN_VARS`].
    /// A missing token is not an error.
    pub fn from_env() -> Self {
        let token = MAP_TOKEN_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty());

        match token {
            Some(token) => Self {
                token: MapToken::Configured(token),
            },
            None => {
                tracing::info!("map provider token not configured, token entry required");
                Self {
                    token: MapToken::NeedsEntry,
                }
            }
        }
    }

    /// Accepts a token typed in by the user.
    pub fn enter_token(&mut self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::invalid_input(
                "Por favor, introduce un token válido de Mapbox",
            ));
        }
        self.token = MapToken::Configured(token.to_string());
        Ok(())
    }

    pub fn access_token(&self) -> Option<&str> {
        match &self.token {
            MapToken::Configured(token) => Some(token),
            MapToken::NeedsEntry => None,
        }
    }
}
