use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "positive")]
    Positive,
    #[serde(rename = "negative")]
    Negative,
    #[serde(rename = "none")]
    Neutral,
}

impl Direction {
    pub fn classify(coefficient: f64, adj_p_value: f64, fdr_alpha: f64) -> Direction {
        if adj_p_value.is_nan() || adj_p_value >= fdr_alpha {
            return Direction::Neutral;
        }
        if coefficient > 0.0 {
            Direction::Positive
        } else if coefficient < 0.0 {
            Direction::Negative
        } else {
            Direction::Neutral
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Positive => "positive",
            Direction::Negative => "negative",
            Direction::Neutral => "none",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Positive => "Positive",
            Direction::Negative => "Negative",
            Direction::Neutral => "None",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneHit {
    pub cancer: String,
    pub gene: String,
    pub n: usize,
    pub coefficient: f64,
    pub p_value: f64,
    pub adj_p_value: f64,
    pub neg_log10_p: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CancerResult {
    pub cancer: String,
    pub n_samples: usize,
    pub n_untested: usize,
    pub hits: Vec<GeneHit>,
}

impl CancerResult {
    pub fn count(&self, direction: Direction) -> usize {
        self.hits.iter().filter(|h| h.direction == direction).count()
    }

    pub fn top_by_coefficient(&self, direction: Direction, n: usize) -> Vec<&GeneHit> {
        top_by_coefficient(&self.hits, direction, n)
    }

    pub fn summary(&self, top: usize) -> CancerSummary {
        let join = |hits: Vec<&GeneHit>| {
            hits.iter()
                .map(|h| h.gene.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        };
        CancerSummary {
            cancer: self.cancer.clone(),
            n_samples: self.n_samples,
            n_tested: self.hits.len(),
            n_untested: self.n_untested,
            n_positive: self.count(Direction::Positive),
            n_negative: self.count(Direction::Negative),
            top_positive: join(self.top_by_coefficient(Direction::Positive, top)),
            top_negative: join(self.top_by_coefficient(Direction::Negative, top)),
        }
    }
}

pub fn top_by_coefficient(hits: &[GeneHit], direction: Direction, n: usize) -> Vec<&GeneHit> {
    let mut ranked: Vec<&GeneHit> = hits
        .iter()
        .filter(|h| match direction {
            Direction::Positive => h.coefficient > 0.0,
            Direction::Negative => h.coefficient < 0.0,
            Direction::Neutral => true,
        })
        .collect();
    match direction {
        Direction::Negative => ranked.sort_by(|a, b| {
            a.coefficient
                .total_cmp(&b.coefficient)
                .then_with(|| a.gene.cmp(&b.gene))
        }),
        _ => ranked.sort_by(|a, b| {
            b.coefficient
                .total_cmp(&a.coefficient)
                .then_with(|| a.gene.cmp(&b.gene))
        }),
    }
    ranked.truncate(n);
    ranked
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancerSummary {
    pub cancer: String,
    pub n_samples: usize,
    pub n_tested: usize,
    pub n_untested: usize,
    pub n_positive: usize,
    pub n_negative: usize,
    pub top_positive: String,
    pub top_negative: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedGroup {
    pub cancer: String,
    pub n_samples: usize,
    pub reason: String,
}
