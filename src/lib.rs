pub mod aggregate;
pub mod config;
pub mod error;
pub mod leverage;
pub mod loader;
pub mod output;
pub mod records;
pub mod stats;
pub mod taxonomy;

pub use config::{ComponentWeights, LeverageConfig, VintagePolicy};
pub use error::{Error, Result};
pub use leverage::{LeverageComposer, LeverageRow, composite, penalize};
pub use records::{PROFIT_UNIT, SectorIndicators, SectorPanel, StrikeRecord, WORKERS_UNIT};
pub use stats::robust_zscore;
pub use taxonomy::{CategoryNormalizer, SectorRemap, TaxonomyTables};
