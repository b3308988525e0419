//! Strike-leverage composite index.
//!
//! Two sector panels are joined across years, growth and productivity
//! metrics are derived, and four weighted robust z-scores are combined
//! multiplicatively after an asymmetric penalty:
//!
//! ```text
//! strike_leverage = penalize(avg_workers) * penalize(employment_growth)
//!                 * penalize(profit_per_worker) * penalize(profit_growth) - 1
//! ```
//!
//! Zero means no structural effect; positive values mark sectors with more
//! capacity for labor leverage than the baseline.

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::config::{LeverageConfig, VintagePolicy};
use crate::error::{Error, Result};
use crate::records::{SectorIndicators, SectorPanel, WORKERS_UNIT};
use crate::stats::{asinh_growth, median, pct_growth, ratio, robust_zscore};
use crate::taxonomy::CategoryNormalizer;

/// Reward non-negative components linearly, shrink negative ones towards
/// zero without ever crossing it.
pub fn penalize(x: f64, alpha: f64) -> f64 {
    if x >= 0.0 {
        1.0 + x
    } else {
        1.0 / (1.0 + x.abs() * alpha)
    }
}

/// Product of the penalized components, minus one.
///
/// Missing when any component is missing.
pub fn composite(components: [Option<f64>; 4], alpha: f64) -> Option<f64> {
    components
        .into_iter()
        .try_fold(1.0, |acc, c| c.map(|x| acc * penalize(x, alpha)))
        .map(|product| product - 1.0)
}

/// One sector compared across two years.
///
/// Money is in source units (1e8 currency), employment in source units
/// (1e4 persons), so profit per worker is in 1e4 currency per person.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeverageRow {
    /// Start-year (canonical) sector name.
    pub sector: String,
    pub start_year: i32,
    pub end_year: i32,

    pub enterprises_start: f64,
    pub enterprises_end: f64,
    pub output_value_start: f64,
    pub output_value_end: f64,
    pub business_revenue_start: f64,
    pub business_revenue_end: f64,
    pub total_profits_start: f64,
    pub total_profits_end: f64,
    pub employed_persons_start: f64,
    pub employed_persons_end: f64,

    pub enterprises_pct_growth: Option<f64>,
    pub output_value_pct_growth: Option<f64>,
    pub business_revenue_pct_growth: Option<f64>,
    pub total_profits_pct_growth: Option<f64>,
    pub employed_persons_pct_growth: Option<f64>,

    pub profit_per_worker_start: Option<f64>,
    pub profit_per_worker: Option<f64>,
    /// asinh difference of profit per worker, x100.
    pub profit_per_worker_growth: Option<f64>,

    /// Share of end-year profits across all joined sectors, in percent.
    pub weight: Option<f64>,
    /// End-year persons per enterprise.
    pub avg_workers_per_enterprise: Option<f64>,

    pub comp_avg_workers: Option<f64>,
    pub comp_emp_growth: Option<f64>,
    pub comp_profit_worker: Option<f64>,
    pub comp_profit_per_worker_growth: Option<f64>,

    pub strike_leverage: Option<f64>,
}

/// A sector matched across the two panels.
struct JoinedSector<'a> {
    sector: &'a str,
    start: &'a SectorIndicators,
    end: &'a SectorIndicators,
}

/// Computes strike-leverage tables.
#[derive(Debug, Clone, Default)]
pub struct LeverageComposer {
    config: LeverageConfig,
    normalizer: CategoryNormalizer,
}

impl LeverageComposer {
    pub fn new(config: LeverageConfig, normalizer: CategoryNormalizer) -> Self {
        Self { config, normalizer }
    }

    /// Builds one row per sector present in both panels.
    ///
    /// `median_profit_base` overrides the cross-sector median used to center
    /// the profit-per-worker level score. Rows follow the end panel's order.
    pub fn compose(
        &self,
        start: &SectorPanel,
        end: &SectorPanel,
        median_profit_base: Option<f64>,
    ) -> Result<Vec<LeverageRow>> {
        self.config.validate()?;

        let joined = self.join(start, end)?;
        let alpha = self.config.penalty_alpha;
        let weights = &self.config.weights;

        let mut rows: Vec<LeverageRow> = joined
            .iter()
            .map(|j| base_row(j, start.year, end.year))
            .collect();

        let total_profits: f64 = rows.iter().map(|r| r.total_profits_end).sum();
        for row in &mut rows {
            row.weight = ratio(row.total_profits_end, total_profits).map(|w| w * 100.0);
        }

        let avg_workers: Vec<Option<f64>> =
            rows.iter().map(|r| r.avg_workers_per_enterprise).collect();
        let emp_growth: Vec<Option<f64>> =
            rows.iter().map(|r| r.employed_persons_pct_growth).collect();
        let ppw: Vec<Option<f64>> = rows.iter().map(|r| r.profit_per_worker).collect();
        let ppw_growth: Vec<Option<f64>> =
            rows.iter().map(|r| r.profit_per_worker_growth).collect();

        let emp_baseline = self.config.employment_baseline(end.year);
        let profit_center = median_profit_base.or_else(|| median(&ppw));
        debug!(
            emp_baseline,
            ?profit_center,
            avg_workers_reference = self.config.avg_workers_reference,
            "Leverage reference centers"
        );

        let z_avg = robust_zscore(&avg_workers, Some(self.config.avg_workers_reference));
        let z_emp = robust_zscore(&emp_growth, Some(emp_baseline));
        let z_ppw = robust_zscore(&ppw, profit_center);
        let z_growth = robust_zscore(&ppw_growth, Some(self.config.profit_growth_reference));

        for (i, row) in rows.iter_mut().enumerate() {
            row.comp_avg_workers = z_avg[i].map(|z| weights.avg_workers * z);
            // only contraction against the baseline counts
            row.comp_emp_growth = z_emp[i].map(|z| weights.employment_growth * z.min(0.0));
            row.comp_profit_worker = z_ppw[i].map(|z| weights.profit_per_worker * z);
            row.comp_profit_per_worker_growth = z_growth[i].map(|z| weights.profit_growth * z);

            row.strike_leverage = composite(
                [
                    row.comp_avg_workers,
                    row.comp_emp_growth,
                    row.comp_profit_worker,
                    row.comp_profit_per_worker_growth,
                ],
                alpha,
            );
        }

        info!(
            start_year = start.year,
            end_year = end.year,
            sectors = rows.len(),
            "Strike leverage computed"
        );
        Ok(rows)
    }

    /// Pairs every end-year sector with its start-year partner.
    fn join<'a>(&'a self, start: &'a SectorPanel, end: &'a SectorPanel) -> Result<Vec<JoinedSector<'a>>> {
        let remapped = self.normalizer.remap_for(start.year, end.year).is_some();

        let mut by_name: HashMap<&str, &SectorIndicators> = HashMap::new();
        for s in &start.sectors {
            if by_name.insert(s.sector.as_str(), s).is_some() {
                warn!(sector = %s.sector, year = start.year, "Duplicate sector, keeping the last row");
            }
        }

        let mut joined = Vec::with_capacity(end.sectors.len());
        let mut unmatched = Vec::new();

        for e in &end.sectors {
            let key = self.normalizer.remap(start.year, end.year, &e.sector);
            match by_name.get(key) {
                Some(&s) => joined.push(JoinedSector {
                    sector: key,
                    start: s,
                    end: e,
                }),
                None => unmatched.push(e.sector.clone()),
            }
        }

        if !unmatched.is_empty() || joined.is_empty() {
            match self.config.vintage_policy {
                VintagePolicy::Strict => {
                    return Err(Error::UnreconciledSectors {
                        start_year: start.year,
                        end_year: end.year,
                        sectors: unmatched,
                    });
                }
                VintagePolicy::Lenient => {
                    warn!(
                        start_year = start.year,
                        end_year = end.year,
                        remapped,
                        joined = joined.len(),
                        unmatched = ?unmatched,
                        "Sectors dropped from the year-over-year join"
                    );
                }
            }
        }

        Ok(joined)
    }
}

fn base_row(j: &JoinedSector<'_>, start_year: i32, end_year: i32) -> LeverageRow {
    let (s, e) = (j.start, j.end);

    let ppw_start = ratio(s.total_profits, s.employed_persons);
    let ppw_end = ratio(e.total_profits, e.employed_persons);
    let ppw_growth = match (ppw_start, ppw_end) {
        (Some(a), Some(b)) => Some(asinh_growth(a, b)),
        _ => None,
    };

    LeverageRow {
        sector: j.sector.to_string(),
        start_year,
        end_year,

        enterprises_start: s.enterprises,
        enterprises_end: e.enterprises,
        output_value_start: s.output_value,
        output_value_end: e.output_value,
        business_revenue_start: s.business_revenue,
        business_revenue_end: e.business_revenue,
        total_profits_start: s.total_profits,
        total_profits_end: e.total_profits,
        employed_persons_start: s.employed_persons,
        employed_persons_end: e.employed_persons,

        enterprises_pct_growth: pct_growth(s.enterprises, e.enterprises),
        output_value_pct_growth: pct_growth(s.output_value, e.output_value),
        business_revenue_pct_growth: pct_growth(s.business_revenue, e.business_revenue),
        total_profits_pct_growth: pct_growth(s.total_profits, e.total_profits),
        employed_persons_pct_growth: pct_growth(s.employed_persons, e.employed_persons),

        profit_per_worker_start: ppw_start,
        profit_per_worker: ppw_end,
        profit_per_worker_growth: ppw_growth,

        weight: None,
        avg_workers_per_enterprise: ratio(e.employed_persons * WORKERS_UNIT, e.enterprises),

        comp_avg_workers: None,
        comp_emp_growth: None,
        comp_profit_worker: None,
        comp_profit_per_worker_growth: None,
        strike_leverage: None,
    }
}
