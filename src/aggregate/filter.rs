//! Row predicates applied before grouping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::records::StrikeRecord;

/// Selects strike records by date window, location, industry and action type.
///
/// Unset criteria match everything. A record without a parseable start date
/// fails any date criterion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrikeFilter {
    /// Inclusive lower bound.
    pub from: Option<NaiveDate>,
    /// Exclusive upper bound.
    pub until: Option<NaiveDate>,
    pub state: Option<String>,
    pub industry: Option<String>,
    pub sub_industry: Option<String>,
    /// Substring that must appear in the action type, e.g. `"Strike"`.
    pub action_pattern: Option<String>,
}

impl StrikeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to start dates in `[start_year, end_year)`.
    pub fn years(self, start_year: i32, end_year: i32) -> Self {
        Self {
            from: NaiveDate::from_ymd_opt(start_year, 1, 1),
            until: NaiveDate::from_ymd_opt(end_year, 1, 1),
            ..self
        }
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn sub_industry(mut self, sub_industry: impl Into<String>) -> Self {
        self.sub_industry = Some(sub_industry.into());
        self
    }

    pub fn action_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.action_pattern = Some(pattern.into());
        self
    }

    pub fn matches(&self, record: &StrikeRecord) -> bool {
        if self.from.is_some() || self.until.is_some() {
            let Some(date) = record.start_date else {
                return false;
            };
            if self.from.is_some_and(|from| date < from) {
                return false;
            }
            if self.until.is_some_and(|until| date >= until) {
                return false;
            }
        }

        field_matches(&self.state, &record.state)
            && field_matches(&self.industry, &record.industry)
            && field_matches(&self.sub_industry, &record.sub_industry)
            && match &self.action_pattern {
                None => true,
                Some(p) => record.action_type.as_deref().is_some_and(|a| a.contains(p.as_str())),
            }
    }

    pub fn apply<'a>(&self, records: &'a [StrikeRecord]) -> Vec<&'a StrikeRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

fn field_matches(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match wanted {
        None => true,
        Some(w) => actual.as_deref() == Some(w.as_str()),
    }
}

/// Excludes an industry (by canonical label) from `from_year` onward.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IndustryCutoff {
    pub industry: String,
    pub from_year: i32,
}

/// Row exclusions for economic indicator aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorFilter {
    pub excluded_years: Vec<i32>,
    pub cutoffs: Vec<IndustryCutoff>,
}

impl Default for IndicatorFilter {
    /// The 2023 vintage is not comparable with earlier tables, and the
    /// transport category was split into finer sectors from 2012.
    fn default() -> Self {
        Self {
            excluded_years: vec![2023],
            cutoffs: vec![IndustryCutoff {
                industry: "Transport Equipment".into(),
                from_year: 2012,
            }],
        }
    }
}

impl IndicatorFilter {
    /// A filter that keeps every row.
    pub fn none() -> Self {
        Self {
            excluded_years: Vec::new(),
            cutoffs: Vec::new(),
        }
    }

    /// Whether a row with this canonical industry and year is kept.
    pub fn keeps(&self, canonical_industry: &str, year: i32) -> bool {
        !self.excluded_years.contains(&year)
            && !self
                .cutoffs
                .iter()
                .any(|c| c.industry == canonical_industry && year >= c.from_year)
    }
}
