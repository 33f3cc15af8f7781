use std::collections::{BTreeMap, BTreeSet};

use tracing::{info, warn};

use crate::enrich::{EnrichmentService, EnrichmentTerm};
use crate::error::{PipelineError, PipelineResult};
use crate::input::results::CancerTable;
use crate::input::table::clean_gene_label;
use crate::model::hits::{Direction, top_by_coefficient};
use crate::model::overlap::{GeneSet, OverlapMatrix, intersection_matrix, jaccard_matrix};
use crate::model::thresholds::{AnalysisConfig, HitSelection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneRecurrence {
    pub gene: String,
    pub count: usize,
    pub cancers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionAggregate {
    pub direction: Direction,
    pub sets: BTreeMap<String, GeneSet>,
    pub jaccard: OverlapMatrix<f64>,
    pub overlap: OverlapMatrix<usize>,
    pub recurrence: Vec<GeneRecurrence>,
}

impl DirectionAggregate {
    pub fn build(direction: Direction, sets: BTreeMap<String, GeneSet>) -> Self {
        let jaccard = jaccard_matrix(&sets);
        let overlap = intersection_matrix(&sets);
        let recurrence = gene_recurrence(&sets);
        Self {
            direction,
            sets,
            jaccard,
            overlap,
            recurrence,
        }
    }

    pub fn top(&self, n: usize) -> &[GeneRecurrence] {
        &self.recurrence[..n.min(self.recurrence.len())]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceMatrix {
    pub genes: Vec<String>,
    pub cancers: Vec<String>,
    present: Vec<bool>,
}

impl PresenceMatrix {
    pub fn build(genes: Vec<String>, sets: &BTreeMap<String, GeneSet>) -> Self {
        let cancers: Vec<String> = sets.keys().cloned().collect();
        let mut present = Vec::with_capacity(genes.len() * cancers.len());
        for gene in &genes {
            for set in sets.values() {
                present.push(set.contains(gene));
            }
        }
        Self {
            genes,
            cancers,
            present,
        }
    }

    pub fn is_present(&self, gene_idx: usize, cancer_idx: usize) -> bool {
        self.present[gene_idx * self.cancers.len() + cancer_idx]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentOutcome {
    pub cancer: String,
    pub direction: Direction,
    pub n_genes: usize,
    pub result: Result<Vec<EnrichmentTerm>, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stage4Output {
    pub cancers: Vec<String>,
    pub positive: DirectionAggregate,
    pub negative: DirectionAggregate,
    pub presence: PresenceMatrix,
    pub enrichment: Vec<EnrichmentOutcome>,
}

impl Stage4Output {
    pub fn enrichment_failures(&self) -> usize {
        self.enrichment.iter().filter(|o| o.result.is_err()).count()
    }
}

pub fn run_stage4(
    tables: &[CancerTable],
    config: &AnalysisConfig,
    service: Option<&dyn EnrichmentService>,
) -> PipelineResult<Stage4Output> {
    if tables.is_empty() {
        return Err(PipelineError::MissingData(
            "no per-cancer result tables to aggregate".to_string(),
        ));
    }

    let positive_sets = select_hit_sets(tables, Direction::Positive, config);
    let negative_sets = select_hit_sets(tables, Direction::Negative, config);
    let cancers: Vec<String> = positive_sets.keys().cloned().collect();

    let positive = DirectionAggregate::build(Direction::Positive, positive_sets);
    let negative = DirectionAggregate::build(Direction::Negative, negative_sets);

    let presence_genes = positive
        .top(config.presence_top)
        .iter()
        .map(|r| r.gene.clone())
        .collect();
    let presence = PresenceMatrix::build(presence_genes, &positive.sets);

    info!(
        "aggregated {} cancer types: {} recurrent positive genes, {} recurrent negative genes",
        cancers.len(),
        positive.recurrence.len(),
        negative.recurrence.len()
    );

    let enrichment = match service {
        Some(service) => run_enrichment(service, &[&positive, &negative]),
        None => Vec::new(),
    };

    Ok(Stage4Output {
        cancers,
        positive,
        negative,
        presence,
        enrichment,
    })
}

pub fn select_hit_sets(
    tables: &[CancerTable],
    direction: Direction,
    config: &AnalysisConfig,
) -> BTreeMap<String, GeneSet> {
    let mut sets: BTreeMap<String, GeneSet> = BTreeMap::new();
    for table in tables {
        let genes: Vec<&str> = match config.hit_selection {
            HitSelection::Significant => table
                .hits
                .iter()
                .filter(|h| h.direction == direction)
                .map(|h| h.gene.as_str())
                .collect(),
            HitSelection::TopRanked => top_by_coefficient(&table.hits, direction, config.top_n)
                .into_iter()
                .map(|h| h.gene.as_str())
                .collect(),
        };
        if sets.contains_key(&table.cancer) {
            warn!(
                "cancer type {} appears in more than one result table; merging",
                table.cancer
            );
        }
        let set = sets.entry(table.cancer.clone()).or_default();
        for gene in genes {
            let symbol = clean_gene_label(gene);
            if !symbol.is_empty() {
                set.insert(symbol);
            }
        }
    }
    sets
}

pub fn gene_recurrence(sets: &BTreeMap<String, GeneSet>) -> Vec<GeneRecurrence> {
    let mut by_gene: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (cancer, genes) in sets {
        for gene in genes {
            by_gene.entry(gene.as_str()).or_default().insert(cancer.as_str());
        }
    }
    let mut out: Vec<GeneRecurrence> = by_gene
        .into_iter()
        .map(|(gene, cancers)| GeneRecurrence {
            gene: gene.to_string(),
            count: cancers.len(),
            cancers: cancers.into_iter().map(|c| c.to_string()).collect(),
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.gene.cmp(&b.gene)));
    out
}

fn run_enrichment(
    service: &dyn EnrichmentService,
    aggregates: &[&DirectionAggregate],
) -> Vec<EnrichmentOutcome> {
    let mut outcomes = Vec::new();
    for aggregate in aggregates {
        for (cancer, genes) in &aggregate.sets {
            if genes.is_empty() {
                continue;
            }
            let query: Vec<String> = genes.iter().cloned().collect();
            let result = match service.profile(&query) {
                Ok(terms) => {
                    info!(
                        "{} {}: {} enriched terms from {}",
                        cancer,
                        aggregate.direction.as_str(),
                        terms.len(),
                        service.name()
                    );
                    Ok(terms)
                }
                Err(err) => {
                    warn!(
                        "enrichment failed for {} ({}): {}",
                        cancer,
                        aggregate.direction.as_str(),
                        err
                    );
                    Err(err.to_string())
                }
            };
            outcomes.push(EnrichmentOutcome {
                cancer: cancer.clone(),
                direction: aggregate.direction,
                n_genes: query.len(),
                result,
            });
        }
    }
    outcomes
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_aggregate.rs"]
mod tests;
