//! Grouping, filtering and long-tail bucketing of strike records and
//! industry indicators.
//!
//! Every function here takes its input by reference and returns a fresh
//! table ready for charting.

pub mod bucket;
pub mod economic;
pub mod filter;
pub mod strikes;
pub mod types;

pub use bucket::bucket_subindustries;
pub use economic::{economic_indicators, gdp_composition, wage_growth};
pub use filter::{IndicatorFilter, IndustryCutoff, StrikeFilter};
pub use strikes::{
    OTHER, StrikeCategory, action_by_state_and_type, action_type_counts, demand_totals,
    industry_subindustry_counts, strikes_by_size, strikes_by_state_and_demand,
    strikes_by_state_and_industry, strikes_by_state_and_response, strikes_by_year_and_category,
    strikes_by_year_and_city, strikes_per_year,
};
pub use types::*;
