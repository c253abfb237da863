use crate::core::ckan::CkanClient;
use crate::core::csv_source::CsvSource;
use crate::core::normalize::to_playground;
use crate::core::{ConfigProvider, Field, Playground, RecordSource, Result, SearchQuery, SearchResult};

/// Normalized outcome of one lookup.
#[derive(Debug, Clone)]
pub struct LocatedPlaygrounds {
    /// Name of the source that answered.
    pub source: String,
    pub used_fallback: bool,
    pub total: u64,
    pub fields: Vec<Field>,
    pub playgrounds: Vec<Playground>,
}

impl LocatedPlaygrounds {
    pub fn from_result(source: impl Into<String>, used_fallback: bool, result: SearchResult) -> Self {
        Self {
            source: source.into(),
            used_fallback,
            total: result.total,
            fields: result.fields,
            playgrounds: result.records.into_iter().map(to_playground).collect(),
        }
    }

    /// Playgrounds that can be placed on the map.
    pub fn mappable(&self) -> impl Iterator<Item = &Playground> {
        self.playgrounds.iter().filter(|p| p.coords.is_some())
    }
}

/// Queries a primary source and, when it fails, an optional fallback.
pub struct PlaygroundLocator {
    primary: Box<dyn RecordSource>,
    fallback: Option<Box<dyn RecordSource>>,
}

impl PlaygroundLocator {
    pub fn new(primary: Box<dyn RecordSource>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Box<dyn RecordSource>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// CKAN as the primary source, the configured CSV export as the fallback.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        let locator = Self::new(Box::new(CkanClient::new(config.ckan_endpoint())));
        match config.csv_location() {
            Some(location) => {
                locator.with_fallback(Box::new(CsvSource::new(location, config.csv_limit())))
            }
            None => locator,
        }
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub async fn fetch(&self, query: &SearchQuery) -> Result<LocatedPlaygrounds> {
        let primary_error = match self.primary.fetch(query).await {
            Ok(result) => {
                return Ok(LocatedPlaygrounds::from_result(
                    self.primary.name(),
                    false,
                    result,
                ))
            }
            Err(e) => e,
        };

        let Some(fallback) = &self.fallback else {
            return Err(primary_error);
        };

        tracing::warn!(
            "{} source failed ({}), falling back to {}",
            self.primary.name(),
            primary_error,
            fallback.name()
        );
        let result = fallback.fetch(query).await?;
        Ok(LocatedPlaygrounds::from_result(fallback.name(), true, result))
    }
}
