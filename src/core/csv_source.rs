use crate::core::{Field, Record, RecordSource, Result, SearchQuery, SearchResult};
use crate::utils::error::LocatorError;
use crate::utils::validation::is_remote;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

pub const DEFAULT_CSV_LOCATION: &str = "data/playgrounds.csv";
pub const DEFAULT_CSV_LIMIT: usize = 5000;

/// Split CSV text into rows of raw cells.
///
/// A `"` opens or closes quoting anywhere in a field; inside quotes `""` is a
/// literal quote and commas and line breaks are kept. `\r` outside quotes is
/// dropped. Malformed input never fails. The final field and row are always
/// emitted, so text ending in a newline yields a trailing `[""]` row.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    row.push(field);
    rows.push(row);
    rows
}

/// Turn CSV text into records keyed by the (trimmed) header row.
///
/// Blank rows are dropped before the header is picked. At most `limit` data
/// rows are kept; missing trailing cells become empty strings.
pub fn records_from_csv(text: &str, limit: usize) -> SearchResult {
    let mut rows = parse_csv(text)
        .into_iter()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()));

    let Some(header_row) = rows.next() else {
        return SearchResult::default();
    };
    let headers: Vec<String> = header_row.iter().map(|h| h.trim().to_string()).collect();

    let records: Vec<Record> = rows
        .take(limit)
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let cell = cells.get(i).map(|c| c.trim()).unwrap_or("");
                    (header.clone(), Value::String(cell.to_string()))
                })
                .collect::<Record>()
        })
        .collect();

    SearchResult {
        total: records.len() as u64,
        fields: headers.into_iter().map(Field::named).collect(),
        records,
    }
}

/// Load a CSV export from an http(s) URL or a local file.
pub async fn load_csv(client: &Client, location: &str, limit: usize) -> Result<SearchResult> {
    let bytes = if is_remote(location) {
        tracing::debug!("Fetching CSV from {}", location);
        let response = client.get(location).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LocatorError::CsvFetchError {
                status: status.as_u16(),
            });
        }
        response.bytes().await?.to_vec()
    } else {
        tracing::debug!("Reading CSV file {}", location);
        tokio::fs::read(location).await?
    };

    // Council exports are not always UTF-8; keep the rows and replace bad bytes.
    let text = String::from_utf8_lossy(&bytes);
    let result = records_from_csv(&text, limit);
    tracing::info!(
        "Loaded {} records ({} columns) from {}",
        result.records.len(),
        result.fields.len(),
        location
    );
    Ok(result)
}

/// Fixed CSV export used as the offline fallback. Query text, filters and
/// paging do not apply; it always yields the first `limit` rows.
#[derive(Debug, Clone)]
pub struct CsvSource {
    client: Client,
    location: String,
    limit: usize,
}

impl CsvSource {
    pub fn new(location: impl Into<String>, limit: usize) -> Self {
        Self {
            client: Client::new(),
            location: location.into(),
            limit,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub async fn load(&self) -> Result<SearchResult> {
        load_csv(&self.client, &self.location, self.limit).await
    }
}

#[async_trait]
impl RecordSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch(&self, _query: &SearchQuery) -> Result<SearchResult> {
        self.load().await
    }
}
