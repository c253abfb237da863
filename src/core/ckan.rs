use crate::core::normalize::is_truthy;
use crate::core::{Field, Record, RecordSource, Result, SearchQuery, SearchResult};
use crate::utils::error::LocatorError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// DataVic `datastore_search` action.
pub const CKAN_BASE: &str = "https://discover.data.vic.gov.au/api/3/action/datastore_search";

/// Victorian playgrounds dataset.
pub const DEFAULT_RESOURCE_ID: &str = "e8dc7da3-c352-4b10-b4a7-ff202b7368d9";

/// Overrides [`DEFAULT_RESOURCE_ID`] when set and non-empty.
pub const RESOURCE_ID_ENV: &str = "DVIC_PLAYGROUNDS_RESOURCE_ID";

pub fn default_resource_id() -> String {
    std::env::var(RESOURCE_ID_ENV)
        .ok()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_RESOURCE_ID.to_string())
}

#[derive(Debug, Deserialize)]
struct CkanResponse {
    #[serde(default)]
    success: Value,
    #[serde(default)]
    result: Option<CkanResult>,
}

#[derive(Debug, Default, Deserialize)]
struct CkanResult {
    #[serde(default)]
    records: Option<Vec<Record>>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    fields: Option<Vec<Field>>,
}

#[derive(Debug, Clone)]
pub struct CkanClient {
    client: Client,
    endpoint: String,
}

impl Default for CkanClient {
    fn default() -> Self {
        Self::new(CKAN_BASE)
    }
}

impl CkanClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query string for a search. `q` and `filters` are only sent when set.
    pub fn query_params(query: &SearchQuery) -> Result<Vec<(&'static str, String)>> {
        let mut params = vec![
            ("resource_id", query.resource_id.clone()),
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
        ];
        if !query.q.is_empty() {
            params.push(("q", query.q.clone()));
        }
        if let Some(filters) = &query.filters {
            params.push(("filters", serde_json::to_string(filters)?));
        }
        Ok(params)
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let params = Self::query_params(query)?;

        tracing::debug!(
            "CKAN search on {} (resource_id={}, q='{}', limit={}, offset={})",
            self.endpoint,
            query.resource_id,
            query.q,
            query.limit,
            query.offset
        );
        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("CKAN response status: {}", status);
        if !status.is_success() {
            return Err(LocatorError::CkanStatusError {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: CkanResponse = serde_json::from_str(&body)?;
        if !is_truthy(&parsed.success) {
            return Err(LocatorError::CkanUnsuccessful);
        }

        let result = parsed.result.unwrap_or_default();
        let records = result.records.unwrap_or_default();
        tracing::info!("CKAN returned {} records", records.len());

        Ok(SearchResult {
            records,
            total: result.total.unwrap_or(0),
            fields: result.fields.unwrap_or_default(),
        })
    }
}

/// Query the default DataVic endpoint.
pub async fn search_ckan(query: &SearchQuery) -> Result<SearchResult> {
    CkanClient::default().search(query).await
}

#[async_trait]
impl RecordSource for CkanClient {
    fn name(&self) -> &str {
        "ckan"
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<SearchResult> {
        self.search(query).await
    }
}
