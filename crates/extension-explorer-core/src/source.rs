//! Remote data sources
//!
//! `ExtensionSource` is the narrow capability the index and aggregator fetch
//! through. `HttpSource` talks to the JetBrains Marketplace; tests swap in
//! canned implementations.

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::RegistryConfig;
use crate::error::{ExplorerError, Result};
use crate::types::{IndexRecord, PluginRecord, SortKey};

/// Fetch capability behind the extension index and usage aggregator
pub trait ExtensionSource {
    /// Fetch every record of the extension point registry
    fn fetch_index(&self) -> Result<Vec<IndexRecord>>;

    /// Fetch one page of plugins declaring `extension_point`, sorted by `sort`
    fn fetch_usages(&self, extension_point: &str, sort: SortKey) -> Result<Vec<PluginRecord>>;
}

/// GraphQL search response: `{ "data": { "plugins": { "total": n, "plugins": [..] } } }`
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<SearchData>,
    #[serde(default)]
    errors: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(default)]
    plugins: Option<SearchPage>,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    plugins: Option<Vec<PluginRecord>>,
}

/// Marketplace-backed source using blocking HTTP
#[derive(Debug, Clone, Default)]
pub struct HttpSource {
    config: RegistryConfig,
}

impl HttpSource {
    pub fn new(config: RegistryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// A fresh client per call; nothing outlives the request
    fn client(&self) -> Result<Client> {
        let client = Client::builder()
            .connect_timeout(self.config.connect_timeout())
            .timeout(self.config.request_timeout())
            .user_agent(concat!("extension-explorer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }

    /// Build the GraphQL document for one usage query
    pub fn usage_query(&self, extension_point: &str, sort: SortKey) -> String {
        format!(
            "{{ plugins(search: {{ max: {max}, offset: 0, filters: [ \
             {{ field: \"fields.extensionPoints\", value: {ep} }}, \
             {{ field: \"hasSource\", value: \"true\" }}, \
             {{ field: \"family\", value: {family} }} \
             ], sortBy: {sort} }}) {{ total, plugins {{ \
             id, name, downloads, sourceCodeUrl, lastUpdateDate, \
             organization {{ id, verified }} }} }} }}",
            max = self.config.page_size,
            ep = graphql_string(extension_point),
            family = graphql_string(&self.config.family),
            sort = sort.as_query_literal(),
        )
    }

    fn ensure_success(url: &str, status: reqwest::StatusCode) -> Result<()> {
        if status.is_success() {
            return Ok(());
        }

        Err(ExplorerError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

/// GraphQL string literal; JSON string escaping is a valid subset
fn graphql_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Pull index records out of the registry's JSON array.
///
/// Array elements that are not objects, or whose name is not a string, are
/// skipped rather than failing the whole snapshot.
pub fn parse_index(body: &str) -> Result<Vec<IndexRecord>> {
    let json: serde_json::Value = serde_json::from_str(body)?;

    let entries = json.as_array().ok_or_else(|| ExplorerError::Shape {
        message: "extension point index is not a JSON array".to_string(),
    })?;

    Ok(entries
        .iter()
        .filter_map(|entry| {
            let name = entry.get("implementationName")?.as_str()?;
            Some(IndexRecord::new(name))
        })
        .collect())
}

/// Pull plugin records out of a GraphQL search response
pub fn parse_usages(body: &str) -> Result<Vec<PluginRecord>> {
    let response: SearchResponse = serde_json::from_str(body)?;

    if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
        tracing::warn!(count = errors.len(), first = %errors[0], "marketplace search returned errors");
    }

    let page = match response.data.and_then(|d| d.plugins) {
        Some(page) => page,
        None => return Ok(Vec::new()),
    };

    tracing::debug!(total = page.total.unwrap_or(0), "marketplace search page");

    Ok(page.plugins.unwrap_or_default())
}

impl ExtensionSource for HttpSource {
    fn fetch_index(&self) -> Result<Vec<IndexRecord>> {
        let url = &self.config.index_url;
        tracing::debug!(url = %url, "fetching extension point index");

        let response = self.client()?.get(url).send()?;
        Self::ensure_success(url, response.status())?;

        parse_index(&response.text()?)
    }

    fn fetch_usages(&self, extension_point: &str, sort: SortKey) -> Result<Vec<PluginRecord>> {
        let url = &self.config.usage_search_url;
        let body = serde_json::json!({ "query": self.usage_query(extension_point, sort) });
        tracing::debug!(url = %url, extension_point, sort = %sort, "searching plugin usages");

        let response = self.client()?.post(url).json(&body).send()?;
        Self::ensure_success(url, response.status())?;

        parse_usages(&response.text()?)
    }
}
