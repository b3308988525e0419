//! Robust statistics used by the aggregation and scoring layers.
//!
//! Series are `&[Option<f64>]`: `None` marks a missing value (for example a
//! ratio whose denominator was zero). Missing values are skipped when
//! computing medians and means and stay missing in derived series.

/// Scale factor that makes the MAD consistent with the standard deviation
/// of a normal distribution.
pub const MAD_SCALE: f64 = 1.4826;

/// Median of the present, finite values. `None` when there are none.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut present: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .collect();

    if present.is_empty() {
        return None;
    }

    present.sort_by(f64::total_cmp);
    let mid = present.len() / 2;

    if present.len() % 2 == 0 {
        Some((present[mid - 1] + present[mid]) / 2.0)
    } else {
        Some(present[mid])
    }
}

/// Arithmetic mean of the present, finite values. `None` when there are none.
pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .collect();

    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64)
}

/// Median absolute deviation of `values` around `center`.
pub fn mad(values: &[Option<f64>], center: f64) -> Option<f64> {
    let deviations: Vec<Option<f64>> = values
        .iter()
        .map(|v| v.map(|x| (x - center).abs()))
        .collect();
    median(&deviations)
}

/// Robust z-score: `(x - center) / (MAD_SCALE * MAD)`.
///
/// `center` is `base_value` when given, otherwise the series median. When the
/// MAD is zero or cannot be computed every element scores `0.0`, missing ones
/// included, so the output always has the input's length.
pub fn robust_zscore(values: &[Option<f64>], base_value: Option<f64>) -> Vec<Option<f64>> {
    let zeros = || vec![Some(0.0); values.len()];

    let Some(center) = base_value.or_else(|| median(values)) else {
        return zeros();
    };

    let scale = match mad(values, center) {
        Some(m) if m != 0.0 && m.is_finite() => MAD_SCALE * m,
        _ => return zeros(),
    };

    values
        .iter()
        .map(|v| v.map(|x| (x - center) / scale))
        .collect()
}

/// `numerator / denominator`, missing when the denominator is zero or the
/// result is not finite.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator).filter(|r| r.is_finite())
}

/// Simple percentage growth `(end / start - 1) * 100`.
pub fn pct_growth(start: f64, end: f64) -> Option<f64> {
    ratio(end, start).map(|r| (r - 1.0) * 100.0)
}

/// Log-scale growth through the inverse hyperbolic sine, in percentage-like
/// units. Defined for zero and negative values, unlike [`pct_growth`].
pub fn asinh_growth(start: f64, end: f64) -> f64 {
    (end.asinh() - start.asinh()) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn series(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&series(&[3.0, 1.0, 2.0])), Some(2.0));
        assert_eq!(median(&series(&[4.0, 1.0, 3.0, 2.0])), Some(2.5));
    }

    #[test]
    fn test_median_skips_missing() {
        assert_eq!(median(&[None, Some(5.0), None, Some(1.0)]), Some(3.0));
        assert_eq!(median(&[None, None]), None);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_mean_skips_missing() {
        assert_eq!(mean(&[Some(2.0), None, Some(4.0)]), Some(3.0));
        assert_eq!(mean(&[None]), None);
    }

    #[test]
    fn test_zscore_zero_mad_is_all_zero() {
        let values = series(&[7.0, 7.0, 7.0, 7.0]);
        let z = robust_zscore(&values, None);
        assert_eq!(z.len(), values.len());
        assert!(z.iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn test_zscore_single_element_is_zero() {
        assert_eq!(robust_zscore(&series(&[42.0]), None), vec![Some(0.0)]);
    }

    #[test]
    fn test_zscore_empty_series() {
        assert!(robust_zscore(&[], None).is_empty());
        assert!(robust_zscore(&[], Some(1.0)).is_empty());
    }

    #[test]
    fn test_zscore_known_values() {
        // median 3, deviations [2,1,0,1,2] -> MAD 1
        let z = robust_zscore(&series(&[1.0, 2.0, 3.0, 4.0, 5.0]), None);
        assert!((z[0].unwrap() + 2.0 / MAD_SCALE).abs() < EPS);
        assert!(z[2].unwrap().abs() < EPS);
        assert!((z[4].unwrap() - 2.0 / MAD_SCALE).abs() < EPS);
    }

    #[test]
    fn test_zscore_depends_on_explicit_center() {
        let values = series(&[1.0, 2.0, 4.0, 8.0, 16.0]);
        let at_median = robust_zscore(&values, None);
        let at_zero = robust_zscore(&values, Some(0.0));
        let at_ten = robust_zscore(&values, Some(10.0));
        assert_ne!(at_median, at_zero);
        assert_ne!(at_zero, at_ten);
    }

    #[test]
    fn test_zscore_keeps_missing_positions() {
        let z = robust_zscore(&[Some(1.0), None, Some(3.0), Some(5.0)], None);
        assert_eq!(z.len(), 4);
        assert!(z[1].is_none());
        assert!(z[2].unwrap().abs() < EPS);
    }

    #[test]
    fn test_zscore_is_resistant_to_outliers() {
        let values = series(&[10.0, 11.0, 9.0, 10.0, 1000.0]);
        let z = robust_zscore(&values, None);
        assert!(z[4].unwrap() > 100.0);
        assert!(z[0].unwrap().abs() < EPS);
    }

    #[test]
    fn test_ratio_division_by_zero_is_missing() {
        assert_eq!(ratio(5.0, 0.0), None);
        assert_eq!(ratio(5.0, 2.0), Some(2.5));
    }

    #[test]
    fn test_pct_growth() {
        assert!((pct_growth(10.0, 8.0).unwrap() + 20.0).abs() < EPS);
        assert!((pct_growth(5.0, 6.0).unwrap() - 20.0).abs() < EPS);
        assert_eq!(pct_growth(0.0, 6.0), None);
    }

    #[test]
    fn test_asinh_growth_handles_sign_change() {
        let g = asinh_growth(-3.0, 3.0);
        assert!(g.is_finite());
        assert!((g - 2.0 * 3.0_f64.asinh() * 100.0).abs() < EPS);
        assert_eq!(asinh_growth(4.0, 4.0), 0.0);
    }
}
