use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::aggregate::strikes::OTHER;
use crate::aggregate::types::{CategoryCount, IndustryBreakdown, SubindustryCount};

/// Folds the long tail of each industry's sub-industries into an `"Other"`
/// bucket.
///
/// A missing sub-industry always lands in the bucket; a named one lands there
/// when its count is strictly below `min_count`. The bucket is only emitted
/// when non-empty, so every industry's total is preserved.
///
/// Sub-industries are sorted by descending count, industries by descending
/// total; ties keep ascending name order.
pub fn bucket_subindustries(rows: &[SubindustryCount], min_count: usize) -> Vec<IndustryBreakdown> {
    let mut by_industry: BTreeMap<&str, (BTreeMap<&str, usize>, usize)> = BTreeMap::new();

    for row in rows {
        let (named, other) = by_industry.entry(row.industry.as_str()).or_default();
        match row.sub_industry.as_deref() {
            Some(sub) if row.count >= min_count => *named.entry(sub).or_default() += row.count,
            _ => *other += row.count,
        }
    }

    let mut out: Vec<IndustryBreakdown> = by_industry
        .into_iter()
        .map(|(industry, (named, other))| {
            let mut subindustries: Vec<CategoryCount> = named
                .into_iter()
                .map(|(sub, count)| CategoryCount::new(sub, count))
                .collect();
            if other > 0 {
                subindustries.push(CategoryCount::new(OTHER, other));
            }
            subindustries.sort_by_key(|s| Reverse(s.count));

            IndustryBreakdown {
                industry: industry.to_string(),
                subindustries,
            }
        })
        .collect();

    out.sort_by_key(|b| Reverse(b.total()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(industry: &str, sub: Option<&str>, count: usize) -> SubindustryCount {
        SubindustryCount {
            industry: industry.into(),
            sub_industry: sub.map(String::from),
            count,
        }
    }

    #[test]
    fn test_bucketing_preserves_volume() {
        let rows = vec![
            row("Manufacturing", Some("Electronics"), 12),
            row("Manufacturing", Some("Garments"), 4),
            row("Manufacturing", Some("Toys"), 2),
            row("Manufacturing", Some("Shoes"), 1),
            row("Manufacturing", None, 5),
            row("Construction", Some("Housing"), 30),
            row("Construction", Some("Roads"), 2),
        ];
        let total_in: usize = rows.iter().map(|r| r.count).sum();

        let out = bucket_subindustries(&rows, 3);
        let total_out: usize = out.iter().map(|b| b.total()).sum();
        assert_eq!(total_in, total_out);

        assert_eq!(out[0].industry, "Construction");
        assert_eq!(out[1].industry, "Manufacturing");

        let manufacturing = &out[1];
        assert_eq!(
            manufacturing.subindustries,
            vec![
                CategoryCount::new("Electronics", 12),
                CategoryCount::new(OTHER, 8),
                CategoryCount::new("Garments", 4),
            ]
        );
    }

    #[test]
    fn test_missing_sub_always_buckets() {
        let out = bucket_subindustries(&[row("Services", None, 100)], 3);
        assert_eq!(out[0].subindustries, vec![CategoryCount::new(OTHER, 100)]);
    }

    #[test]
    fn test_no_other_when_nothing_small() {
        let out = bucket_subindustries(&[row("Mining", Some("Coal"), 3)], 3);
        assert_eq!(out[0].subindustries, vec![CategoryCount::new("Coal", 3)]);
    }

    #[test]
    fn test_zero_threshold_keeps_everything_named() {
        let out = bucket_subindustries(&[row("Mining", Some("Coal"), 1), row("Mining", Some("Iron"), 2)], 0);
        assert_eq!(out[0].subindustries.len(), 2);
        assert!(out[0].subindustries.iter().all(|s| s.category != OTHER));
    }
}
