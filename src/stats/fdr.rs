use std::cmp::Ordering;

// NaN p-values rank last and stay NaN.
pub fn benjamini_hochberg(pvalues: &[f64]) -> Vec<f64> {
    let m = pvalues.iter().filter(|p| !p.is_nan()).count();
    let mut q = vec![f64::NAN; pvalues.len()];
    if m == 0 {
        return q;
    }

    let mut order: Vec<usize> = (0..pvalues.len())
        .filter(|&i| !pvalues[i].is_nan())
        .collect();
    order.sort_by(|&i, &j| {
        pvalues[i]
            .partial_cmp(&pvalues[j])
            .unwrap_or(Ordering::Equal)
            .then(i.cmp(&j))
    });

    let mut prev = 1.0_f64;
    for (rank0, &idx) in order.iter().enumerate().rev() {
        let rank = rank0 + 1;
        let p = pvalues[idx];
        let adj = (p * m as f64 / rank as f64).max(p).min(1.0);
        prev = prev.min(adj);
        q[idx] = prev;
    }
    q
}
