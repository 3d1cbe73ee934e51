use thiserror::Error;

use crate::config::ConfigError;
use crate::model::InvalidInterval;
use crate::range::RangeError;
use crate::source::SourceError;

/// Any failure surfaced by `daylens-core`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInterval),
    #[error("calendar source: {0}")]
    Source(#[from] SourceError),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("date range: {0}")]
    Range(#[from] RangeError),
}
