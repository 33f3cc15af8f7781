use super::correlation::{correlation_p_value, pearson, spearman};
use super::rank::average_ranks;
use super::*;
use crate::model::thresholds::CorrelationMethod;

fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

#[test]
fn test_average_ranks_with_ties() {
    assert_eq!(average_ranks(&[10.0, 20.0, 20.0, 5.0]), vec![2.0, 3.5, 3.5, 1.0]);
    assert!(average_ranks(&[]).is_empty());
}

#[test]
fn test_pearson_known_value() {
    let x = [1.0, 2.0, 3.0, 4.0, 5.0];
    let y = [2.0, 4.0, 5.0, 4.0, 5.0];
    let r = pearson(&x, &y).unwrap();
    assert!(approx(r, 0.774_596_669, 1e-6));
}

#[test]
fn test_pearson_constant_is_none() {
    assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_none());
}

#[test]
fn test_spearman_monotone() {
    let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let up = [1.0, 4.0, 9.0, 16.0, 25.0, 36.0];
    let down = [10.0, 8.0, 7.0, 3.0, 2.0, -1.0];
    assert!(approx(spearman(&x, &up).unwrap(), 1.0, 1e-12));
    assert!(approx(spearman(&x, &down).unwrap(), -1.0, 1e-12));
}

#[test]
fn test_correlation_p_value_bounds() {
    assert_eq!(correlation_p_value(1.0, 20), 0.0);
    assert_eq!(correlation_p_value(-1.0, 20), 0.0);
    assert!(approx(correlation_p_value(0.0, 20), 1.0, 1e-12));
    assert!(correlation_p_value(0.5, 2).is_nan());
    // r = 0.5, n = 20: t = 2.449, df = 18
    let p = correlation_p_value(0.5, 20);
    assert!(p > 0.02 && p < 0.03);
}

#[test]
fn test_correlate_pairwise_complete() {
    let x = [1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0];
    let y = [2.0, 4.0, 6.0, f64::NAN, 10.0, 12.0];
    let t = correlate(&x, &y, CorrelationMethod::Pearson, 3).unwrap();
    assert_eq!(t.n, 4);
    assert!(approx(t.coefficient, 1.0, 1e-12));

    assert!(correlate(&x, &y, CorrelationMethod::Pearson, 5).is_none());
}

#[test]
fn test_benjamini_hochberg_known_values() {
    let q = benjamini_hochberg(&[0.01, 0.04, 0.03, 0.20]);
    assert!(approx(q[0], 0.04, 1e-12));
    assert!(approx(q[1], 0.053_333_333_333, 1e-9));
    // 0.03 * 4 / 2 = 0.06 is capped by the next rank
    assert!(approx(q[2], 0.053_333_333_333, 1e-9));
    assert!(approx(q[3], 0.20, 1e-12));
}

#[test]
fn test_benjamini_hochberg_never_below_raw() {
    let p = [0.9, 0.001, 0.5, 0.5, 0.02, 1.0, 0.049];
    let q = benjamini_hochberg(&p);
    for (raw, adj) in p.iter().zip(&q) {
        assert!(adj >= raw);
        assert!(*adj <= 1.0);
    }
}

#[test]
fn test_benjamini_hochberg_nan_passthrough() {
    let q = benjamini_hochberg(&[f64::NAN, 0.01]);
    assert!(q[0].is_nan());
    assert!(approx(q[1], 0.01, 1e-12));
    assert!(benjamini_hochberg(&[]).is_empty());
}

#[test]
fn test_mean_finite_and_neg_log10() {
    assert_eq!(mean_finite(&[1.0, f64::NAN, 3.0]), 2.0);
    assert!(mean_finite(&[f64::NAN]).is_nan());
    assert!(approx(neg_log10(0.001), 3.0, 1e-12));
    assert!(approx(neg_log10(0.0), 300.0, 1e-9));
}
