use crate::core::{Playground, Result, Storage};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            OutputFormat::Json => "playgrounds.json",
            OutputFormat::Csv => "playgrounds.csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Csv => f.write_str("csv"),
        }
    }
}

pub fn render_json(playgrounds: &[Playground]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(playgrounds)?)
}

/// One row per playground: title, subtitle, lat, lon. Unlocated rows keep empty coordinates.
pub fn render_csv(playgrounds: &[Playground]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["title", "subtitle", "lat", "lon"])?;
    for playground in playgrounds {
        let (lat, lon) = match playground.coords {
            Some(c) => (c.lat.to_string(), c.lon.to_string()),
            None => (String::new(), String::new()),
        };
        writer.write_record([
            playground.title.as_str(),
            playground.subtitle.as_str(),
            lat.as_str(),
            lon.as_str(),
        ])?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Write the playgrounds to storage and return the output path.
pub async fn export<S: Storage>(
    storage: &S,
    output_path: &str,
    playgrounds: &[Playground],
    format: OutputFormat,
) -> Result<String> {
    let data = match format {
        OutputFormat::Json => render_json(playgrounds)?,
        OutputFormat::Csv => render_csv(playgrounds)?,
    };

    tracing::debug!(
        "Writing {} playgrounds ({} bytes) as {}",
        playgrounds.len(),
        data.len(),
        format
    );
    storage.write_file(format.file_name(), &data).await?;

    Ok(format!(
        "{}/{}",
        output_path.trim_end_matches('/'),
        format.file_name()
    ))
}
