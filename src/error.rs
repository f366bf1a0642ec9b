use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the case table or the boundary file.
///
/// All of these are fatal at startup; nothing at render time produces one.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] simd_json::Error),

    #[error("malformed GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("boundary file must be a FeatureCollection")]
    NotFeatureCollection,

    #[error("missing column `{0}`")]
    MissingColumn(String),

    #[error("invalid case count {value:?} for {department} in {year}")]
    InvalidCount {
        department: String,
        year: u16,
        value: String,
    },

    #[error("unsupported year `{0}` (expected 2019-2024)")]
    UnsupportedYear(String),
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
