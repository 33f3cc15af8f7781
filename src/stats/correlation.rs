use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::model::thresholds::CorrelationMethod;
use crate::stats::rank::average_ranks;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationTest {
    pub coefficient: f64,
    pub p_value: f64,
    pub n: usize,
}

pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n != y.len() || n < 2 {
        return None;
    }
    let mx = x.iter().sum::<f64>() / n as f64;
    let my = y.iter().sum::<f64>() / n as f64;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for i in 0..n {
        let dx = x[i] - mx;
        let dy = y[i] - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

pub fn spearman(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() {
        return None;
    }
    pearson(&average_ranks(x), &average_ranks(y))
}

pub fn correlation_p_value(r: f64, n: usize) -> f64 {
    if n < 3 || r.is_nan() {
        return f64::NAN;
    }
    let df = (n - 2) as f64;
    let denom = (1.0 - r) * (1.0 + r);
    if denom <= 0.0 {
        return 0.0;
    }
    let t = r * (df / denom).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}

pub fn correlate(
    x: &[f64],
    y: &[f64],
    method: CorrelationMethod,
    min_pairs: usize,
) -> Option<CorrelationTest> {
    let mut xs = Vec::with_capacity(x.len());
    let mut ys = Vec::with_capacity(y.len());
    for (&a, &b) in x.iter().zip(y.iter()) {
        if a.is_finite() && b.is_finite() {
            xs.push(a);
            ys.push(b);
        }
    }
    let n = xs.len();
    if n < min_pairs.max(3) {
        return None;
    }
    let coefficient = match method {
        CorrelationMethod::Spearman => spearman(&xs, &ys)?,
        CorrelationMethod::Pearson => pearson(&xs, &ys)?,
    };
    let p_value = correlation_p_value(coefficient, n);
    if p_value.is_nan() {
        return None;
    }
    Some(CorrelationTest {
        coefficient,
        p_value,
        n,
    })
}
