pub mod correlation;
pub mod fdr;
pub mod rank;

pub use correlation::correlate;
pub use fdr::benjamini_hochberg;

pub fn mean_finite(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for &v in values {
        if v.is_finite() {
            sum += v;
            n += 1;
        }
    }
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

pub fn neg_log10(p: f64) -> f64 {
    -(p.max(1e-300)).log10()
}

#[cfg(test)]
#[path = "../../tests/src_inline/stats/mod.rs"]
mod tests;
