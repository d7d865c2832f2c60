//! Meridian HTTP client with builder pattern.
//!
//! Thin REST wrapper over the portal's server endpoints: schema
//! discovery, SQL execution, log retrieval, and reducer invocation. No
//! retry or backoff; one request per call, with failures surfaced to the
//! caller.

use async_trait::async_trait;
use log::debug;
use serde_json::Value as JsonValue;
use std::time::Duration;

use crate::error::{MeridianLinkError, Result};
use crate::models::schema::{QueryResult, SchemaDocument, SqlRequest};
use crate::models::table::TableDescriptor;
use crate::cache::SchemaDiscovery;
use crate::resolver;

/// Authentication for the Meridian server.
///
/// The portal authenticates with a single bearer token; the provider
/// attaches the Authorization header when one is configured.
#[derive(Debug, Clone, Default)]
pub enum AuthProvider {
    /// Bearer token authentication.
    Token(String),

    /// No authentication (localhost bypass).
    #[default]
    None,
}

impl AuthProvider {
    fn apply_to_request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::Token(token) => builder.bearer_auth(token),
            Self::None => builder,
        }
    }
}

/// Meridian HTTP client.
///
/// Use [`MeridianClient::builder`] to construct instances.
///
/// # Examples
///
/// ```rust,no_run
/// use meridian_link::MeridianClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MeridianClient::builder()
///     .base_url("http://localhost:3000")
///     .token("eyJhbGc...")
///     .build()?;
///
/// let schema = client.schema().await?;
/// println!("{} tables", schema.tables.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MeridianClient {
    base_url: String,
    http_client: reqwest::Client,
    auth: AuthProvider,
}

impl MeridianClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> MeridianClientBuilder {
        MeridianClientBuilder::new()
    }

    /// Fetch the full schema document.
    pub async fn schema(&self) -> Result<SchemaDocument> {
        let url = format!("{}/v1/database/schema", self.base_url);
        debug!("[LINK_HTTP] GET {}", url);
        let request = self.auth.apply_to_request(self.http_client.get(&url));
        let response = request.send().await?;
        Self::check_status(&url, response).await?.json().await.map_err(Into::into)
    }

    /// Execute SQL; each statement yields a schema fragment plus raw
    /// positional rows, decodable with [`crate::decode::decode_query_result`].
    pub async fn sql(&self, query: &str) -> Result<Vec<QueryResult>> {
        let url = format!("{}/v1/database/sql", self.base_url);
        let preview: String = query.chars().take(80).collect();
        debug!("[LINK_SQL] POST {} query=\"{}\"", url, preview.replace('\n', " "));
        let request = self
            .auth
            .apply_to_request(self.http_client.post(&url))
            .json(&SqlRequest {
                query: query.to_string(),
            });
        let response = request.send().await?;
        Self::check_status(&url, response).await?.json().await.map_err(Into::into)
    }

    /// Fetch the trailing server log lines.
    pub async fn logs(&self, num_lines: Option<u32>) -> Result<String> {
        let mut url = format!("{}/v1/database/logs", self.base_url);
        if let Some(lines) = num_lines {
            url = format!("{url}?num_lines={lines}");
        }
        debug!("[LINK_HTTP] GET {}", url);
        let request = self.auth.apply_to_request(self.http_client.get(&url));
        let response = request.send().await?;
        Self::check_status(&url, response).await?.text().await.map_err(Into::into)
    }

    /// Invoke a reducer with positional JSON arguments.
    pub async fn call_reducer(&self, name: &str, args: Vec<JsonValue>) -> Result<()> {
        let url = format!("{}/v1/database/call/{}", self.base_url, name);
        debug!("[LINK_HTTP] POST {}", url);
        let request = self
            .auth
            .apply_to_request(self.http_client.post(&url))
            .json(&args);
        let response = request.send().await?;
        Self::check_status(&url, response).await?;
        Ok(())
    }

    async fn check_status(url: &str, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        debug!("[LINK_HTTP] {} failed with status {}", url, status);
        let mut message = response.text().await.unwrap_or_default();
        if message.is_empty() {
            message = status
                .canonical_reason()
                .unwrap_or("unexpected server response")
                .to_string();
        }
        Err(MeridianLinkError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

/// Schema discovery over the live server: the schema document is fetched
/// and descriptors are projected through the resolver.
#[async_trait]
impl SchemaDiscovery for MeridianClient {
    async fn list_table_names(&self) -> Result<Vec<String>> {
        let doc = self.schema().await?;
        Ok(doc.tables.into_iter().map(|t| t.name).collect())
    }

    async fn table_schema(&self, table: &str) -> Result<TableDescriptor> {
        let doc = self.schema().await?;
        let entry = doc
            .tables
            .iter()
            .find(|t| t.name == table)
            .ok_or_else(|| MeridianLinkError::Discovery(format!("unknown table '{table}'")))?;
        resolver::table_descriptor(&doc, entry).map_err(Into::into)
    }
}

/// Builder for [`MeridianClient`].
#[derive(Debug, Clone, Default)]
pub struct MeridianClientBuilder {
    base_url: Option<String>,
    auth: AuthProvider,
    timeout: Option<Duration>,
}

impl MeridianClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Server base URL, e.g. `http://localhost:3000`. Required.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Bearer token for authenticated deployments.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthProvider::Token(token.into());
        self
    }

    /// Request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<MeridianClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| MeridianLinkError::Configuration("base_url is required".to_string()))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let http_client = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(Duration::from_secs(30)))
            .build()?;

        Ok(MeridianClient {
            base_url,
            http_client,
            auth: self.auth,
        })
    }
}
