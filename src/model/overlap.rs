use std::collections::{BTreeMap, BTreeSet};

pub type GeneSet = BTreeSet<String>;

#[derive(Debug, Clone, PartialEq)]
pub struct OverlapMatrix<T> {
    pub labels: Vec<String>,
    values: Vec<T>,
}

impl<T: Copy> OverlapMatrix<T> {
    pub fn build(sets: &BTreeMap<String, GeneSet>, f: impl Fn(&GeneSet, &GeneSet) -> T) -> Self {
        let labels: Vec<String> = sets.keys().cloned().collect();
        let mut values = Vec::with_capacity(labels.len() * labels.len());
        for a in sets.values() {
            for b in sets.values() {
                values.push(f(a, b));
            }
        }
        Self { labels, values }
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, i: usize, j: usize) -> T {
        self.values[i * self.labels.len() + j]
    }

    #[cfg(test)]
    pub fn get_by_label(&self, a: &str, b: &str) -> Option<T> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        Some(self.get(i, j))
    }

    pub fn row(&self, i: usize) -> &[T] {
        let n = self.labels.len();
        &self.values[i * n..(i + 1) * n]
    }
}

pub fn jaccard(a: &GeneSet, b: &GeneSet) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

pub fn intersection_count(a: &GeneSet, b: &GeneSet) -> usize {
    a.intersection(b).count()
}

pub fn jaccard_matrix(sets: &BTreeMap<String, GeneSet>) -> OverlapMatrix<f64> {
    OverlapMatrix::build(sets, jaccard)
}

pub fn intersection_matrix(sets: &BTreeMap<String, GeneSet>) -> OverlapMatrix<usize> {
    OverlapMatrix::build(sets, intersection_count)
}
