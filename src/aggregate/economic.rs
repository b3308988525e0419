use std::collections::BTreeMap;
use tracing::debug;

use crate::aggregate::filter::IndicatorFilter;
use crate::aggregate::types::{GdpShare, IndustryYearSummary, WageGrowth};
use crate::records::{GdpRecord, IndustryRecord, PROFIT_UNIT, WORKERS_UNIT, WageRecord};
use crate::stats::{mean, pct_growth, ratio};
use crate::taxonomy::CategoryNormalizer;

#[derive(Default)]
struct IndustryAccumulator {
    profit_per_worker: Vec<Option<f64>>,
    workers_per_enterprise: Vec<Option<f64>>,
    profit: f64,
    workers: f64,
    total_output: f64,
    enterprises: f64,
}

/// Groups industry records by (canonical industry, year).
///
/// Per record, employment is rescaled to persons and profit per worker is
/// derived in currency units per person before grouping; those ratios are
/// averaged, the raw measures summed. Output is sorted by industry, then year.
pub fn economic_indicators(
    records: &[IndustryRecord],
    normalizer: &CategoryNormalizer,
    filter: &IndicatorFilter,
) -> Vec<IndustryYearSummary> {
    let mut groups: BTreeMap<(String, i32), IndustryAccumulator> = BTreeMap::new();
    let mut dropped = 0usize;

    for record in records {
        let industry = normalizer.normalize(&record.industry);
        if !filter.keeps(industry, record.year) {
            dropped += 1;
            continue;
        }

        let workers = record.workers * WORKERS_UNIT;
        let acc = groups
            .entry((industry.to_string(), record.year))
            .or_default();

        acc.profit_per_worker
            .push(ratio(record.profit * PROFIT_UNIT, workers));
        acc.workers_per_enterprise
            .push(ratio(workers, record.enterprises));
        acc.profit += record.profit;
        acc.workers += workers;
        acc.total_output += record.total_output;
        acc.enterprises += record.enterprises;
    }

    debug!(
        records = records.len(),
        dropped,
        groups = groups.len(),
        "Economic indicators grouped"
    );

    groups
        .into_iter()
        .map(|((industry, year), acc)| IndustryYearSummary {
            industry,
            year,
            profit_per_worker: mean(&acc.profit_per_worker),
            profit: acc.profit,
            workers: acc.workers,
            total_output: acc.total_output,
            enterprises: acc.enterprises,
            workers_per_enterprise: mean(&acc.workers_per_enterprise),
        })
        .collect()
}

/// Expresses each GDP component as a percentage of GDP.
pub fn gdp_composition(records: &[GdpRecord]) -> Vec<GdpShare> {
    let share = |part: f64, gdp: f64| ratio(part, gdp).map(|r| r * 100.0);

    records
        .iter()
        .map(|r| GdpShare {
            year: r.year,
            gdp: r.gdp,
            final_consumption_pct: share(r.final_consumption, r.gdp),
            gross_capital_formation_pct: share(r.gross_capital_formation, r.gdp),
            net_exports_pct: share(r.net_exports, r.gdp),
        })
        .collect()
}

/// Year-over-year change of the average wage, in input order.
pub fn wage_growth(records: &[WageRecord]) -> Vec<WageGrowth> {
    let mut previous: Option<f64> = None;

    records
        .iter()
        .map(|r| {
            let growth_rate = previous.and_then(|p| pct_growth(p, r.average_wage));
            previous = Some(r.average_wage);
            WageGrowth {
                year: r.year,
                average_wage: r.average_wage,
                growth_rate,
            }
        })
        .collect()
}
