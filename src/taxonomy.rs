//! Industry label reconciliation across classification vintages.
//!
//! [`TaxonomyTables`] holds the two lookup tables as plain data so callers can
//! load alternates from JSON. [`CategoryNormalizer`] applies them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::loader::read_json;

/// Spelling variants of the same industry, collapsed to one canonical name.
static NORMALIZE_INDUSTRIES: &[(&str, &str)] = &[
    // communication / electronics
    ("Communication Equipment, Computers & Other Electronics", "Communication Equipment, Computers and Other Electronics"),
    ("Manufacture of Communication Equipment, Computers and Other Electronic Equipment", "Communication Equipment, Computers and Other Electronics"),
    // electrical machinery
    ("Electrical Machinery and Equipment", "Electrical Machinery and Equipment"),
    ("Manufacture of Electrical Machinery and Equipment", "Electrical Machinery and Equipment"),
    // chemicals
    ("Raw Chemical Materials and Chemical Products", "Chemical Materials and Products"),
    ("Manufacture of Raw Chemical Materials and Chemical Products", "Chemical Materials and Products"),
    // rubber / plastic
    ("Rubber Products", "Rubber and Plastic Products"),
    ("Plastic Products", "Rubber and Plastic Products"),
    ("Rubber and Plastic Products", "Rubber and Plastic Products"),
    // transport
    ("Transport Equipment", "Transport Equipment"),
    ("Manufacture of Transport Equipment", "Transport Equipment"),
    ("Railway/Ship/Aeronautics & Other Transport Equipment", "Transport Equipment"),
    // timber
    ("Timber Processing, Bamboo/Cane/Palm/Straw Products", "Timber Processing, Bamboo and Straw Products"),
    ("Timber Processing, Bamboo, Cane, Palm Fiber and Straw Products", "Timber Processing, Bamboo and Straw Products"),
    // instruments
    ("Instruments and Office Machinery", "Instruments, Meters and Office Machinery"),
    ("Instruments and Meters", "Instruments, Meters and Office Machinery"),
    ("Manufacture of Instruments, Meters and Machinery for Cultural and Office Use", "Instruments, Meters and Office Machinery"),
    // cultural goods
    ("Cultural/Educational/Sports/Entertainment Articles", "Cultural, Educational and Sports Goods"),
    ("Manufacture of Cultural, Educational and Sports Articles", "Cultural, Educational and Sports Goods"),
    ("Manufacture of Cultural, Educational and Sports Goods", "Cultural, Educational and Sports Goods"),
    // machinery
    ("General-purpose Machinery", "General-purpose Machinery"),
    ("Manufacture of General-purpose Machinery", "General-purpose Machinery"),
    ("Special-purpose Machinery", "Special-purpose Machinery"),
    ("Manufacture of Special-purpose Machinery", "Special-purpose Machinery"),
    // leather
    ("Leather, Fur, Feather & Related Products and Footwear", "Leather, Fur, Feather and Related Products"),
    ("Leather, Fur, Feather, Down and Related Products", "Leather, Fur, Feather and Related Products"),
    ("Feather, Furs, Down and Related Products", "Leather, Fur, Feather and Related Products"),
    // petroleum
    ("Petroleum Refining, Coking and Nuclear Fuel Processing", "Petroleum, Coal and other Fuel Processing"),
    ("Petroleum, Coal and other Fuel Processing", "Petroleum, Coal and other Fuel Processing"),
    // utilities
    ("Electric Power & Heat Production/Supply", "Electric Power and Heat Production/Supply"),
    ("Production and Supply of Electric Power and Heat Power", "Electric Power and Heat Production/Supply"),
    ("Gas Production and Supply", "Production and Supply of Gas"),
    ("Production and Supply of Gas", "Production and Supply of Gas"),
    ("Water Production and Supply", "Production and Supply of Water"),
    ("Production and Supply of Water", "Production and Supply of Water"),
    // mining
    ("Mining Specialized and Auxiliary Operations", "Auxiliary Mining Operations"),
    ("Auxiliary Mining Operations", "Auxiliary Mining Operations"),
    ("Mining and Washing of Coal", "Coal Mining and Dressing"),
    ("Coal Mining and Dressing", "Coal Mining and Dressing"),
    ("Mining and Dressing of Other Ores", "Mining and Dressing of Nonmetal Ores"),
    // recycling
    ("Comprehensive Utilization of Waste", "Recycling and Disposal of Waste"),
];

/// 2023 sector names redirected to their 2013 counterparts.
static SECTOR_REMAP_2013_2023: &[(&str, &str)] = &[
    ("Processing of Farm and Sideline Food", "Processing of Food from Agricultural Products"),
    ("Manufacture of Food", "Manufacturing of Foods"),
    ("Textile Industry", "Textile Industry"),
    ("Manufacture of Textile Garments, Footwear and Headgear", "Manufacture of Textile Wearing Apparel, Clothing"),
    ("Manufacture of Cultural, Educational, Sports and Entertainment Articles", "Manufacture of Culture and Education, Arts and Crafts, Sports and Entertainment Supplies"),
    ("Petroleum, Coal and other Fuel Processing", "Processing of Petroleum, Coking, Processing of Nuclear"),
    ("Manufacture of Raw Chemical Materials and Chemical Products", "Manufacturing of Raw Chemical Material and Chemical Products"),
    ("Manufacture of Medicines", "Manufacturing of Medical and Pharmaceutical Products"),
    ("Rubber and Plastic Products", "Manufacture of Rubber and Plastic"),
    ("Nonmetal Mineral Products", "Manufacturing of Non-metallic Mineral Products"),
    ("Smelting and Pressing of Ferrous Metals", "Smelting and Pressing of Ferrous Metals"),
    ("Smelting and Pressing of Nonferrous Metals", "Smelting and Pressing of Non-ferrous Metals"),
    ("Metal Products", "Manufacturing of Metal Products"),
    ("Manufacture of General-purpose Machinery", "Manufacturing of General Purpose Equipment"),
    ("Manufacture of Special-purpose Machinery", "Manufacturing of Special Purpose Equipment"),
    ("Manufacture of Automobile", "Manufacture of Automobile"),
    ("Manufacture of Electrical Machinery and Equipment", "Manufacturing of Electric Machinery and Equipment"),
    ("Manufacture of Communication Equipment, Computers and Other Electronic Equipment", "Manufacture of Computers, Communications and Other Electronic Equipment"),
    ("Production and Supply of Electric Power and Heat Power", "Production and Supply of Electric Power and Heat Power"),
    ("Production and Supply of Gas", "Production and Supply of Gas"),
];

fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(raw, canonical)| (raw.to_string(), canonical.to_string()))
        .collect()
}

/// Sector remap from one classification vintage to an earlier one.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SectorRemap {
    pub start_year: i32,
    pub end_year: i32,
    /// End-year sector name -> start-year sector name.
    pub mapping: HashMap<String, String>,
}

/// The lookup tables behind a [`CategoryNormalizer`].
///
/// Stored as JSON on disk:
/// ```json
/// {
///   "normalization": { "Rubber Products": "Rubber and Plastic Products" },
///   "remaps": [
///     { "start_year": 2013, "end_year": 2023,
///       "mapping": { "Metal Products": "Manufacturing of Metal Products" } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TaxonomyTables {
    pub normalization: HashMap<String, String>,
    pub remaps: Vec<SectorRemap>,
}

impl Default for TaxonomyTables {
    fn default() -> Self {
        Self {
            normalization: to_map(NORMALIZE_INDUSTRIES),
            remaps: vec![SectorRemap {
                start_year: 2013,
                end_year: 2023,
                mapping: to_map(SECTOR_REMAP_2013_2023),
            }],
        }
    }
}

impl TaxonomyTables {
    /// Tables with no entries: every label is already canonical.
    pub fn empty() -> Self {
        Self {
            normalization: HashMap::new(),
            remaps: Vec::new(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        read_json(path.as_ref())
    }
}

/// Maps raw labels onto canonical ones.
#[derive(Debug, Clone, Default)]
pub struct CategoryNormalizer {
    tables: TaxonomyTables,
}

impl CategoryNormalizer {
    pub fn new(tables: TaxonomyTables) -> Self {
        Self { tables }
    }

    /// Canonical label for `raw`; labels absent from the table are already
    /// canonical and come back unchanged.
    pub fn normalize<'a>(&'a self, raw: &'a str) -> &'a str {
        self.tables
            .normalization
            .get(raw)
            .map(String::as_str)
            .unwrap_or(raw)
    }

    /// The remap registered for exactly this year pair, if any.
    pub fn remap_for(&self, start_year: i32, end_year: i32) -> Option<&SectorRemap> {
        self.tables
            .remaps
            .iter()
            .find(|r| r.start_year == start_year && r.end_year == end_year)
    }

    /// Name under which an end-year sector joins the start-year table.
    ///
    /// Without a registered remap for the pair the name is used as-is.
    pub fn remap<'a>(&'a self, start_year: i32, end_year: i32, end_sector: &'a str) -> &'a str {
        self.remap_for(start_year, end_year)
            .and_then(|r| r.mapping.get(end_sector))
            .map(String::as_str)
            .unwrap_or(end_sector)
    }
}
