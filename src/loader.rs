//! Readers for the input tables.
//!
//! A missing file is reported as [`Error::NotFound`] before any parsing is
//! attempted.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::records::{
    GdpRecord, IndustryRecord, SectorIndicators, SectorPanel, StrikeRecord, WageRecord,
};

fn open(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }
    File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Deserializes a whole JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Deserializes every row of a headed CSV file.
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = open(path)?;
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: T = result.map_err(|source| Error::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(record);
    }

    debug!(path = %path.display(), rows = rows.len(), "CSV loaded");
    Ok(rows)
}

#[derive(Deserialize)]
struct StrikeDocument {
    chinese_strikes: Vec<StrikeRecord>,
}

/// Loads strike records from a `{"chinese_strikes": [...]}` JSON document.
pub fn load_strikes(path: impl AsRef<Path>) -> Result<Vec<StrikeRecord>> {
    let path = path.as_ref();
    let doc: StrikeDocument = read_json(path)?;

    let undated = doc
        .chinese_strikes
        .iter()
        .filter(|r| r.start_date.is_none())
        .count();
    info!(
        path = %path.display(),
        records = doc.chinese_strikes.len(),
        undated,
        "Strike records loaded"
    );
    if undated > 0 {
        warn!(undated, "Strike records without a usable start date");
    }

    Ok(doc.chinese_strikes)
}

pub fn load_industry_records(path: impl AsRef<Path>) -> Result<Vec<IndustryRecord>> {
    read_csv(path.as_ref())
}

/// Loads one year's sector snapshot.
pub fn load_sector_panel(path: impl AsRef<Path>, year: i32) -> Result<SectorPanel> {
    let sectors: Vec<SectorIndicators> = read_csv(path.as_ref())?;
    Ok(SectorPanel::new(year, sectors))
}

pub fn load_gdp(path: impl AsRef<Path>) -> Result<Vec<GdpRecord>> {
    read_csv(path.as_ref())
}

pub fn load_wages(path: impl AsRef<Path>) -> Result<Vec<WageRecord>> {
    read_csv(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let path = temp_path("strike_leverage_does_not_exist.json");
        let _ = fs::remove_file(&path);

        let err = load_strikes(&path).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_load_sector_panel_trims_headers() {
        let path = temp_path("strike_leverage_test_panel.csv");
        fs::write(
            &path,
            "Sector, Enterprises, Output Value, Business Revenue, Total Profits, Employed Persons\n\
             Textile Industry, 1643, 2456.08, 2375.58, 140.31, 43.76\n",
        )
        .unwrap();

        let panel = load_sector_panel(&path, 2013).unwrap();
        assert_eq!(panel.year, 2013);
        assert_eq!(panel.sectors.len(), 1);
        assert_eq!(panel.sectors[0].sector, "Textile Industry");
        assert_eq!(panel.sectors[0].employed_persons, 43.76);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_malformed_csv_is_csv_error() {
        let path = temp_path("strike_leverage_test_bad.csv");
        fs::write(&path, "Year,Average Wage\n2020,lots\n").unwrap();

        let err = load_wages(&path).unwrap_err();
        assert!(matches!(err, Error::Csv { .. }));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_strikes_document() {
        let path = temp_path("strike_leverage_test_strikes.json");
        fs::write(
            &path,
            r#"{"chinese_strikes":[
                {"State":"Guangdong","City":"Shenzhen","Start_Date":"2020-05-01"},
                {"State":"Jiangsu","Start_Date":""}
            ]}"#,
        )
        .unwrap();

        let records = load_strikes(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].year(), Some(2020));
        assert_eq!(records[1].year(), None);

        fs::remove_file(&path).unwrap();
    }
}
