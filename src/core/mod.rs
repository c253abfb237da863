pub mod ckan;
pub mod csv_source;
pub mod export;
pub mod locator;
pub mod normalize;
pub mod router;

pub use crate::domain::model::{
    Coordinates, Field, Playground, Record, SearchQuery, SearchResult,
};
pub use crate::domain::ports::{ConfigProvider, RecordSource, Storage};
pub use crate::utils::error::Result;
