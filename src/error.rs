//! Error type shared by the loaders, the config layer and the leverage composer.

use std::path::PathBuf;

/// Errors produced by this crate.
///
/// Degenerate statistics and unmapped labels are not errors; they resolve to
/// neutral values inside the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A source file does not exist.
    #[error("source file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A source file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV source or sink is malformed or could not be written.
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A JSON source is malformed.
    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Sectors of the end year found no partner in the start year while the
    /// vintage policy is strict.
    #[error(
        "{} sector(s) of {end_year} could not be reconciled with {start_year}: {}",
        sectors.len(),
        sectors.join(", ")
    )]
    UnreconciledSectors {
        start_year: i32,
        end_year: i32,
        sectors: Vec<String>,
    },

    /// Calibration values that cannot produce a meaningful score.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_path() {
        let err = Error::NotFound {
            path: PathBuf::from("data/strikes.json"),
        };
        assert_eq!(err.to_string(), "source file not found: data/strikes.json");
    }

    #[test]
    fn test_unreconciled_message_lists_sectors() {
        let err = Error::UnreconciledSectors {
            start_year: 2003,
            end_year: 2023,
            sectors: vec!["Metal Products".into(), "Manufacture of Food".into()],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 sector(s) of 2023"));
        assert!(msg.contains("Metal Products, Manufacture of Food"));
    }
}
