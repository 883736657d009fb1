//! Entry point to the hosted backend

use reqwest::Client;

use crate::config::{ClientOptions, SupabaseConfig};
use crate::error::Result;
use crate::postgrest::PostgrestClient;

/// Connection to a Supabase project, handing out table-scoped clients
#[derive(Debug, Clone)]
pub struct Supabase {
    /// The base URL for the Supabase project
    pub url: String,
    /// The anonymous API key for the Supabase project
    pub key: String,
    /// HTTP client shared by every table client
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
}

impl Supabase {
    /// Create a new client with default options
    pub fn new(config: &SupabaseConfig) -> Result<Self> {
        Self::new_with_options(config, ClientOptions::default())
    }

    /// Create a new client with custom options
    pub fn new_with_options(config: &SupabaseConfig, options: ClientOptions) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        tracing::info!(url = %config.base_url(), schema = %options.db_schema, "Supabase client initialized");

        Ok(Self {
            url: config.base_url().to_string(),
            key: config.anon_key.clone(),
            http_client,
            options,
        })
    }

    /// Create a PostgrestClient for a table or view
    pub fn from(&self, table: &str) -> PostgrestClient {
        PostgrestClient::new(&self.url, &self.key, table, self.http_client.clone())
            .with_schema(&self.options.db_schema)
    }
}
