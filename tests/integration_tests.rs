use std::path::PathBuf;
use strike_leverage::aggregate::{self, IndicatorFilter, StrikeCategory, StrikeFilter};
use strike_leverage::{
    CategoryNormalizer, Error, LeverageComposer, LeverageConfig, SectorIndicators, SectorPanel,
    loader,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn strict_composer() -> LeverageComposer {
    LeverageComposer::new(LeverageConfig::default().strict(), CategoryNormalizer::default())
}

#[test]
fn test_leverage_across_reclassification() {
    let start = loader::load_sector_panel(fixture("sectors_2013.csv"), 2013).unwrap();
    let end = loader::load_sector_panel(fixture("sectors_2023.csv"), 2023).unwrap();

    let rows = strict_composer().compose(&start, &end, None).unwrap();
    assert_eq!(rows.len(), 8);

    // joined rows carry the start-year names
    assert_eq!(rows[0].sector, "Processing of Food from Agricultural Products");
    assert!(rows.iter().any(|r| r.sector == "Manufacturing of Metal Products"));

    let weight_total: f64 = rows.iter().map(|r| r.weight.unwrap()).sum();
    assert!((weight_total - 100.0).abs() < 1e-9);
    assert!(rows.iter().all(|r| r.strike_leverage.is_some()));

    // penalized factors stay positive, so the index never reaches -1
    assert!(rows.iter().all(|r| r.strike_leverage.unwrap() > -1.0));
}

#[test]
fn test_unsupported_vintage_pair() {
    let start = loader::load_sector_panel(fixture("sectors_2013.csv"), 2003).unwrap();
    let end = loader::load_sector_panel(fixture("sectors_2023.csv"), 2023).unwrap();

    let lenient = LeverageComposer::default().compose(&start, &end, None).unwrap();
    let names: Vec<&str> = lenient.iter().map(|r| r.sector.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Textile Industry",
            "Manufacture of Automobile",
            "Production and Supply of Gas"
        ]
    );

    match strict_composer().compose(&start, &end, None) {
        Err(Error::UnreconciledSectors { sectors, .. }) => assert_eq!(sectors.len(), 5),
        other => panic!("expected UnreconciledSectors, got {other:?}"),
    }
}

#[test]
fn test_contracting_sector_outranks_growing_sector() {
    let sector = |name: &str, profits: f64, employed: f64| SectorIndicators {
        sector: name.into(),
        enterprises: 10.0,
        output_value: 1000.0,
        business_revenue: 950.0,
        total_profits: profits,
        employed_persons: employed,
    };
    let start = SectorPanel::new(2018, vec![sector("A", 100.0, 10.0), sector("B", 50.0, 5.0)]);
    let end = SectorPanel::new(2020, vec![sector("A", 200.0, 8.0), sector("B", 40.0, 6.0)]);

    let rows = LeverageComposer::default().compose(&start, &end, None).unwrap();
    let (a, b) = (&rows[0], &rows[1]);

    assert!(a.employed_persons_pct_growth.unwrap() < 0.0);
    assert!(b.employed_persons_pct_growth.unwrap() > 0.0);
    assert_eq!(b.comp_emp_growth, Some(0.0));
    assert!(a.strike_leverage.unwrap() > b.strike_leverage.unwrap());
}

#[test]
fn test_state_year_counts_match_filtered_total() {
    let records = loader::load_strikes(fixture("strikes.json")).unwrap();
    assert_eq!(records.len(), 7);

    let filter = StrikeFilter::new().years(2019, 2022);
    let selected: Vec<_> = filter.apply(&records).into_iter().cloned().collect();
    assert_eq!(selected.len(), 6);

    let pivot = aggregate::strikes_by_year_and_category(&selected, StrikeCategory::State);
    assert_eq!(pivot.total(), selected.len());
    assert_eq!(pivot.get(2020, "Jiangsu"), 1);
    assert_eq!(pivot.get(2020, "Guangdong"), 2);

    let per_year = aggregate::strikes_per_year(&records, &filter);
    assert_eq!(per_year.iter().map(|y| y.count).sum::<usize>(), selected.len());
}

#[test]
fn test_industry_bucketing_from_file() {
    let records = loader::load_strikes(fixture("strikes.json")).unwrap();
    let counts = aggregate::industry_subindustry_counts(&records, &StrikeFilter::new());
    let buckets = aggregate::bucket_subindustries(&counts, 3);

    let total: usize = buckets.iter().map(|b| b.total()).sum();
    assert_eq!(total, records.len());

    assert_eq!(buckets[0].industry, "Manufacturing");
    assert_eq!(buckets[0].total(), 6);
    assert_eq!(buckets[0].subindustries[0].category, "Electronics");
    assert_eq!(buckets[1].subindustries[0].category, aggregate::OTHER);
}

#[test]
fn test_strike_reports_from_file() {
    let records = loader::load_strikes(fixture("strikes.json")).unwrap();

    let sizes = aggregate::strikes_by_size(&records, Some("Guangdong"));
    let labels: Vec<&str> = sizes.iter().map(|s| s.category.as_str()).collect();
    assert_eq!(labels, vec!["1-99", "100-999", "1000-9999", "Unknown"]);

    let demands = aggregate::demand_totals(&records);
    assert_eq!(demands[0].category, "Wage arrears");
    assert_eq!(demands[0].count, 4);

    let strikes = aggregate::action_type_counts(
        &records,
        &StrikeFilter::new().state("Guangdong").action_pattern("Strike"),
    );
    assert_eq!(strikes[0].category, "Strike");
    assert_eq!(strikes[0].count, 3);
}

#[test]
fn test_indicators_from_file() {
    let records = loader::load_industry_records(fixture("industries.csv")).unwrap();
    let rows = aggregate::economic_indicators(
        &records,
        &CategoryNormalizer::default(),
        &IndicatorFilter::default(),
    );

    let keys: Vec<(&str, i32)> = rows.iter().map(|r| (r.industry.as_str(), r.year)).collect();
    assert_eq!(
        keys,
        vec![
            ("Rubber and Plastic Products", 2002),
            ("Textile Industry", 2002),
            ("Textile Industry", 2013),
            ("Transport Equipment", 2011),
        ]
    );
}

#[test]
fn test_missing_source_is_fatal() {
    let err = loader::load_sector_panel(fixture("sectors_1990.csv"), 1990).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}
