use crate::domain::model::{SearchQuery, SearchResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn ckan_endpoint(&self) -> &str;
    /// Location of the CSV fallback, if one is configured.
    fn csv_location(&self) -> Option<&str>;
    fn csv_limit(&self) -> usize;
}

/// Anything that can answer a playground query with a page of records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self, query: &SearchQuery) -> Result<SearchResult>;
}
