//! Result rows produced by the aggregation pipeline.

use serde::Serialize;

/// Indicators of one canonical industry in one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryYearSummary {
    pub industry: String,
    pub year: i32,
    /// Mean of per-record profit per worker, in currency units per person.
    pub profit_per_worker: Option<f64>,
    /// Summed profit, in source units.
    pub profit: f64,
    /// Summed employment, in persons.
    pub workers: f64,
    pub total_output: f64,
    pub enterprises: f64,
    /// Mean of per-record workers per enterprise.
    pub workers_per_enterprise: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

impl CategoryCount {
    pub fn new(category: impl Into<String>, count: usize) -> Self {
        Self {
            category: category.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateCategoryCount {
    pub state: String,
    pub category: String,
    pub count: usize,
}

/// Strike count for one (industry, sub-industry) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubindustryCount {
    pub industry: String,
    pub sub_industry: Option<String>,
    pub count: usize,
}

/// An industry and its sub-industries after long-tail bucketing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndustryBreakdown {
    pub industry: String,
    /// Descending by count; may include an `"Other"` bucket.
    pub subindustries: Vec<CategoryCount>,
}

impl IndustryBreakdown {
    pub fn total(&self) -> usize {
        self.subindustries.iter().map(|s| s.count).sum()
    }

    /// One flat row per sub-industry, for tabular sinks.
    pub fn flatten(breakdowns: &[IndustryBreakdown]) -> Vec<SubindustryCount> {
        breakdowns
            .iter()
            .flat_map(|b| {
                b.subindustries.iter().map(|s| SubindustryCount {
                    industry: b.industry.clone(),
                    sub_industry: Some(s.category.clone()),
                    count: s.count,
                })
            })
            .collect()
    }
}

/// Year-by-category count matrix with zero-filled cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountPivot {
    /// Column labels, ascending.
    pub columns: Vec<String>,
    /// One row per year, ascending.
    pub rows: Vec<PivotRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotRow {
    pub year: i32,
    /// Aligned with [`CountPivot::columns`].
    pub counts: Vec<usize>,
}

impl CountPivot {
    pub fn get(&self, year: i32, column: &str) -> usize {
        let Some(col) = self.columns.iter().position(|c| c == column) else {
            return 0;
        };
        self.rows
            .iter()
            .find(|r| r.year == year)
            .map(|r| r.counts[col])
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.rows.iter().flat_map(|r| r.counts.iter()).sum()
    }
}

/// GDP components as percentages of GDP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GdpShare {
    pub year: i32,
    pub gdp: f64,
    pub final_consumption_pct: Option<f64>,
    pub gross_capital_formation_pct: Option<f64>,
    pub net_exports_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WageGrowth {
    pub year: i32,
    pub average_wage: f64,
    /// Change against the previous row, in percent.
    pub growth_rate: Option<f64>,
}
