//! Table operations through the PostgREST API
//!
//! `PostgrestClient` is a by-value builder: start from [`crate::Supabase::from`],
//! chain `select`/`eq`/`order`/`single`, then finish with `execute`,
//! `insert`, `update` or `delete`.

mod filter;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use url::Url;

use crate::error::{Error, Result};

pub use filter::*;

const CLIENT_INFO: &str = concat!("hielo-polar-admin/", env!("CARGO_PKG_VERSION"));
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Error body returned by PostgREST
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PostgrestApiErrorDetails {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl fmt::Display for PostgrestApiErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            ("Code", &self.code),
            ("Message", &self.message),
            ("Details", &self.details),
            ("Hint", &self.hint),
        ]
        .iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}: {}", label, v)))
        .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Request builder scoped to one table
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    base_url: String,
    api_key: String,
    table: String,
    http_client: Client,
    bearer: Option<String>,
    schema: Option<String>,
    query_params: Vec<(String, String)>,
    single: bool,
}

impl PostgrestClient {
    pub fn new(base_url: &str, api_key: &str, table: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            table: table.to_string(),
            http_client,
            bearer: None,
            schema: None,
            query_params: Vec::new(),
            single: false,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Use a user access token instead of the anonymous key as bearer
    pub fn with_auth(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    /// Target a schema other than `public`
    pub fn with_schema(mut self, schema: &str) -> Self {
        if schema != "public" {
            self.schema = Some(schema.to_string());
        }
        self
    }

    /// Columns to return
    pub fn select(self, columns: &str) -> Self {
        self.param("select", columns)
    }

    /// Equality filter
    pub fn eq(self, column: &str, value: &str) -> Self {
        self.filter(&Filter::eq(column, value))
    }

    pub fn filter(self, filter: &Filter) -> Self {
        let value = filter.to_param();
        self.param(&filter.column, &value)
    }

    pub fn order(self, column: &str, order: SortOrder) -> Self {
        let value = format!("{}.{}", column, order.as_str());
        self.param("order", &value)
    }

    pub fn limit(self, count: usize) -> Self {
        self.param("limit", &count.to_string())
    }

    /// Require exactly one row in the response; PostgREST answers with an
    /// object instead of an array and rejects zero or several rows.
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    fn param(mut self, key: &str, value: &str) -> Self {
        self.query_params.retain(|(k, _)| k != key);
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Read rows
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let body = self.send(self.http_client.get(self.build_url()?)).await?;
        let value = parse_body(&body)?;
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(_) => Ok(serde_json::from_value(value)?),
            object => Ok(vec![serde_json::from_value(object)?]),
        }
    }

    /// Insert one row or a batch (pass a slice or `Vec` for bulk inserts)
    pub async fn insert<T: Serialize + ?Sized>(&self, values: &T) -> Result<Value> {
        let request = self
            .http_client
            .post(self.build_url()?)
            .header("Prefer", "return=representation")
            .json(values);
        parse_body(&self.send(request).await?)
    }

    /// Patch rows matched by the current filters
    pub async fn update<T: Serialize + ?Sized>(&self, values: &T) -> Result<Value> {
        self.ensure_filtered("update")?;
        let request = self
            .http_client
            .patch(self.build_url()?)
            .header("Prefer", "return=representation")
            .json(values);
        parse_body(&self.send(request).await?)
    }

    /// Delete rows matched by the current filters
    pub async fn delete(&self) -> Result<Value> {
        self.ensure_filtered("delete")?;
        let request = self
            .http_client
            .delete(self.build_url()?)
            .header("Prefer", "return=representation");
        parse_body(&self.send(request).await?)
    }

    // An unfiltered PATCH/DELETE would touch the whole table.
    fn ensure_filtered(&self, operation: &str) -> Result<()> {
        let filtered = self
            .query_params
            .iter()
            .any(|(k, _)| !matches!(k.as_str(), "select" | "order" | "limit"));
        if filtered {
            Ok(())
        } else {
            Err(Error::invalid_input(format!(
                "refusing unfiltered {} on {}",
                operation, self.table
            )))
        }
    }

    fn build_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/rest/v1/{}", self.base_url, self.table))?;
        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(&self.api_key)?);
        let bearer = self.bearer.as_deref().unwrap_or(&self.api_key);
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", bearer))?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("x-client-info"),
            HeaderValue::from_static(CLIENT_INFO),
        );
        if self.single {
            headers.insert(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT));
        }
        if let Some(schema) = &self.schema {
            let value = header_value(schema)?;
            headers.insert(HeaderName::from_static("accept-profile"), value.clone());
            headers.insert(HeaderName::from_static("content-profile"), value);
        }
        Ok(headers)
    }

    async fn send(&self, request: RequestBuilder) -> Result<String> {
        let response = request.headers(self.headers()?).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(text);
        }

        tracing::debug!(table = %self.table, %status, body = %text, "PostgREST request rejected");
        match serde_json::from_str::<PostgrestApiErrorDetails>(&text) {
            Ok(details) => Err(Error::Api { details, status }),
            Err(_) => Err(Error::UnparsedApi {
                message: text,
                status,
            }),
        }
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::invalid_input(format!("Invalid header value: {}", value)))
}

// 201/204 responses may come back without a body.
fn parse_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        Ok(Value::Null)
    } else {
        Ok(serde_json::from_str(body)?)
    }
}
