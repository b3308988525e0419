//! Typed rows for the input tables.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Persons represented by one reported employment unit (source tables report
/// employment in tens of thousands of persons).
pub const WORKERS_UNIT: f64 = 10_000.0;

/// Currency units represented by one reported profit or output unit (source
/// tables report money in hundreds of millions).
pub const PROFIT_UNIT: f64 = 100_000_000.0;

/// One strike or protest.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StrikeRecord {
    #[serde(rename = "State", default)]
    pub state: Option<String>,
    #[serde(rename = "City", default)]
    pub city: Option<String>,
    #[serde(rename = "Industry", default)]
    pub industry: Option<String>,
    #[serde(rename = "subIndustry_name", default)]
    pub sub_industry: Option<String>,
    /// `/`-separated list of demands.
    #[serde(rename = "Worker_Demands", default)]
    pub demands: Option<String>,
    /// `/`-separated list of authority responses.
    #[serde(rename = "Action_Response", default)]
    pub response: Option<String>,
    /// `/`-separated list of action types, e.g. `Strike/Protest`.
    #[serde(rename = "Strike_or_Protest", default)]
    pub action_type: Option<String>,
    /// Employee-count range label such as `100-999`.
    #[serde(rename = "Range_Number_of_Employees", default)]
    pub employee_range: Option<String>,
    #[serde(
        rename = "Start_Date",
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<NaiveDate>,
}

impl StrikeRecord {
    pub fn year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.start_date.map(|d| d.year())
    }
}

/// Parses a date, coercing anything unparsable to `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

/// Industry economic indicators for one year, as reported in one
/// classification vintage.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndustryRecord {
    pub industry: String,
    /// Profit, in [`PROFIT_UNIT`]s.
    pub profit: f64,
    /// Gross output, in [`PROFIT_UNIT`]s.
    pub total_output: f64,
    pub enterprises: f64,
    /// Employment, in [`WORKERS_UNIT`]s.
    pub workers: f64,
    pub year: i32,
}

/// One sector's indicators in a single year snapshot.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SectorIndicators {
    #[serde(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "Enterprises")]
    pub enterprises: f64,
    #[serde(rename = "Output Value")]
    pub output_value: f64,
    #[serde(rename = "Business Revenue")]
    pub business_revenue: f64,
    /// In [`PROFIT_UNIT`]s.
    #[serde(rename = "Total Profits")]
    pub total_profits: f64,
    /// In [`WORKERS_UNIT`]s.
    #[serde(rename = "Employed Persons")]
    pub employed_persons: f64,
}

/// All sectors of one year.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorPanel {
    pub year: i32,
    pub sectors: Vec<SectorIndicators>,
}

impl SectorPanel {
    pub fn new(year: i32, sectors: Vec<SectorIndicators>) -> Self {
        Self { year, sectors }
    }
}

/// Annual expenditure-side GDP totals.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GdpRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "GDP")]
    pub gdp: f64,
    #[serde(rename = "Final Consumption")]
    pub final_consumption: f64,
    #[serde(rename = "Gross Capital Formation")]
    pub gross_capital_formation: f64,
    #[serde(rename = "Net Exports")]
    pub net_exports: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WageRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Average Wage")]
    pub average_wage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 4);
        assert_eq!(parse_date("2021-03-04"), expected);
        assert_eq!(parse_date("2021/03/04"), expected);
        assert_eq!(parse_date("2021-03-04 10:30:00"), expected);
        assert_eq!(parse_date("2021-03-04T10:30:00+08:00"), expected);
    }

    #[test]
    fn test_parse_date_coerces_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("unknown"), None);
        assert_eq!(parse_date("2021-13-45"), None);
    }

    #[test]
    fn test_strike_record_deserializes_with_missing_fields() {
        let json = r#"{"State":"Guangdong","Start_Date":"not a date","Worker_Demands":null}"#;
        let record: StrikeRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.state.as_deref(), Some("Guangdong"));
        assert!(record.start_date.is_none());
        assert!(record.demands.is_none());
        assert!(record.city.is_none());
        assert_eq!(record.year(), None);
    }

    #[test]
    fn test_strike_record_year() {
        let json = r#"{"Start_Date":"2019-11-02"}"#;
        let record: StrikeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.year(), Some(2019));
    }
}
