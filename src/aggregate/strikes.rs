//! Strike and protest counts grouped by categorical keys.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::aggregate::filter::StrikeFilter;
use crate::aggregate::types::{
    CategoryCount, CountPivot, PivotRow, StateCategoryCount, SubindustryCount, YearCount,
};
use crate::records::StrikeRecord;

/// Bucket used for missing demands.
pub const OTHER: &str = "Other";

/// Categorical column of a strike record usable as a pivot axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeCategory {
    State,
    City,
    Industry,
    SubIndustry,
    Demands,
    Response,
    ActionType,
    EmployeeRange,
}

impl StrikeCategory {
    pub fn value(self, record: &StrikeRecord) -> Option<&str> {
        let field = match self {
            Self::State => &record.state,
            Self::City => &record.city,
            Self::Industry => &record.industry,
            Self::SubIndustry => &record.sub_industry,
            Self::Demands => &record.demands,
            Self::Response => &record.response,
            Self::ActionType => &record.action_type,
            Self::EmployeeRange => &record.employee_range,
        };
        field.as_deref()
    }
}

/// Splits a `/`-delimited field into trimmed, non-empty parts.
pub fn split_multi(value: &str) -> impl Iterator<Item = &str> {
    value.split('/').map(str::trim).filter(|p| !p.is_empty())
}

fn sorted_desc(counts: BTreeMap<String, usize>) -> Vec<CategoryCount> {
    let mut out: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();
    // stable: ties keep ascending label order
    out.sort_by_key(|c| Reverse(c.count));
    out
}

fn to_state_rows(counts: BTreeMap<(String, String), usize>) -> Vec<StateCategoryCount> {
    counts
        .into_iter()
        .map(|((state, category), count)| StateCategoryCount {
            state,
            category,
            count,
        })
        .collect()
}

/// Number of records per start year, ascending. Undated records are skipped.
pub fn strikes_per_year(records: &[StrikeRecord], filter: &StrikeFilter) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for record in filter.apply(records) {
        if let Some(year) = record.year() {
            *counts.entry(year).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Counts of each atomic action type among the selected records, descending.
pub fn action_type_counts(records: &[StrikeRecord], filter: &StrikeFilter) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in filter.apply(records) {
        let Some(action) = record.action_type.as_deref() else {
            continue;
        };
        for part in split_multi(action) {
            *counts.entry(part.to_string()).or_default() += 1;
        }
    }
    sorted_desc(counts)
}

/// Counts per (industry, sub-industry) among the selected records.
///
/// Records without an industry are skipped; a missing sub-industry is kept
/// as its own group so bucketing can fold it into "Other".
pub fn industry_subindustry_counts(
    records: &[StrikeRecord],
    filter: &StrikeFilter,
) -> Vec<SubindustryCount> {
    let mut counts: BTreeMap<(String, Option<String>), usize> = BTreeMap::new();
    for record in filter.apply(records) {
        let Some(industry) = record.industry.clone() else {
            continue;
        };
        *counts
            .entry((industry, record.sub_industry.clone()))
            .or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((industry, sub_industry), count)| SubindustryCount {
            industry,
            sub_industry,
            count,
        })
        .collect()
}

fn pivot_by_year<'a, I>(keys: I) -> CountPivot
where
    I: Iterator<Item = (i32, &'a str)>,
{
    let mut cells: BTreeMap<(i32, &str), usize> = BTreeMap::new();
    let mut columns: BTreeSet<&str> = BTreeSet::new();
    let mut years: BTreeSet<i32> = BTreeSet::new();

    for (year, column) in keys {
        *cells.entry((year, column)).or_default() += 1;
        columns.insert(column);
        years.insert(year);
    }

    let columns: Vec<&str> = columns.into_iter().collect();
    let rows = years
        .into_iter()
        .map(|year| PivotRow {
            year,
            counts: columns
                .iter()
                .map(|c| cells.get(&(year, *c)).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    CountPivot {
        columns: columns.into_iter().map(String::from).collect(),
        rows,
    }
}

/// Year x city count matrix for one state.
pub fn strikes_by_year_and_city(records: &[StrikeRecord], state: &str) -> CountPivot {
    pivot_by_year(
        records
            .iter()
            .filter(|r| r.state.as_deref() == Some(state))
            .filter_map(|r| Some((r.year()?, r.city.as_deref()?))),
    )
}

/// Year x category count matrix. Records missing the category are dropped.
pub fn strikes_by_year_and_category(
    records: &[StrikeRecord],
    category: StrikeCategory,
) -> CountPivot {
    pivot_by_year(
        records
            .iter()
            .filter_map(|r| Some((r.year()?, category.value(r)?))),
    )
}

/// Counts per (state, atomic response).
pub fn strikes_by_state_and_response(records: &[StrikeRecord]) -> Vec<StateCategoryCount> {
    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for record in records {
        let (Some(state), Some(response)) = (record.state.as_deref(), record.response.as_deref())
        else {
            continue;
        };
        if state.is_empty() {
            continue;
        }
        for part in split_multi(response) {
            *counts
                .entry((state.to_string(), part.to_string()))
                .or_default() += 1;
        }
    }
    to_state_rows(counts)
}

/// Counts per (state, industry), keeping groups with at least `min_count`.
pub fn strikes_by_state_and_industry(
    records: &[StrikeRecord],
    min_count: usize,
) -> Vec<StateCategoryCount> {
    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for record in records {
        if let (Some(state), Some(industry)) = (&record.state, &record.industry) {
            if state.is_empty() {
                continue;
            }
            *counts
                .entry((state.clone(), industry.clone()))
                .or_default() += 1;
        }
    }
    counts.retain(|_, count| *count >= min_count);
    to_state_rows(counts)
}

/// Counts per (state, atomic demand) among states with more than
/// `min_state_strikes` records.
pub fn strikes_by_state_and_demand(
    records: &[StrikeRecord],
    min_state_strikes: usize,
) -> Vec<StateCategoryCount> {
    let mut per_state: BTreeMap<&str, usize> = BTreeMap::new();
    for state in records
        .iter()
        .filter_map(|r| r.state.as_deref())
        .filter(|s| !s.is_empty())
    {
        *per_state.entry(state).or_default() += 1;
    }
    let active: BTreeSet<&str> = per_state
        .into_iter()
        .filter(|(_, total)| *total > min_state_strikes)
        .map(|(state, _)| state)
        .collect();
    debug!(active_states = active.len(), min_state_strikes, "Active states selected");

    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for record in records {
        let (Some(state), Some(demands)) = (record.state.as_deref(), record.demands.as_deref())
        else {
            continue;
        };
        if state.is_empty() || !active.contains(state) {
            continue;
        }
        for part in split_multi(demands) {
            *counts
                .entry((state.to_string(), part.to_string()))
                .or_default() += 1;
        }
    }
    to_state_rows(counts)
}

/// Counts per (state, atomic action type).
///
/// Records are first grouped by their full action string; groups below
/// `min_count` are dropped before the string is split, so rare combinations
/// do not leak into the atomic counts.
pub fn action_by_state_and_type(
    records: &[StrikeRecord],
    min_count: usize,
) -> Vec<StateCategoryCount> {
    let mut grouped: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for record in records {
        if let (Some(state), Some(action)) = (record.state.as_deref(), record.action_type.as_deref())
        {
            if state.is_empty() {
                continue;
            }
            *grouped.entry((state, action)).or_default() += 1;
        }
    }

    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for ((state, action), count) in grouped {
        if count < min_count {
            continue;
        }
        for part in split_multi(action) {
            *counts
                .entry((state.to_string(), part.to_string()))
                .or_default() += count;
        }
    }
    to_state_rows(counts)
}

/// Lower bound of an employee-count range label such as `"100-999"`.
pub fn range_lower_bound(label: &str) -> Option<u64> {
    label.split('-').next()?.trim().parse().ok()
}

/// Counts per employee-count range, optionally for one state.
///
/// Sorted by the numeric lower bound of the label; labels without one come
/// last in alphabetical order.
pub fn strikes_by_size(records: &[StrikeRecord], state: Option<&str>) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        if state.is_some_and(|s| record.state.as_deref() != Some(s)) {
            continue;
        }
        if let Some(range) = &record.employee_range {
            *counts.entry(range.clone()).or_default() += 1;
        }
    }

    let mut out: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();
    out.sort_by_key(|c| range_lower_bound(&c.category).map_or((1, 0), |lb| (0, lb)));
    out
}

/// Totals per atomic demand, descending. A record without demands, or whose
/// demands are blank, counts once towards [`OTHER`].
pub fn demand_totals(records: &[StrikeRecord]) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        let mut parts = record
            .demands
            .as_deref()
            .map(split_multi)
            .into_iter()
            .flatten()
            .peekable();
        if parts.peek().is_none() {
            *counts.entry(OTHER.to_string()).or_default() += 1;
            continue;
        }
        for part in parts {
            *counts.entry(part.to_string()).or_default() += 1;
        }
    }
    sorted_desc(counts)
}
