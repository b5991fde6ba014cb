use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::util::neg_log10;

/// Statistic that drives node size in the network chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum NodeSizeBy {
    #[default]
    #[serde(rename = "count")]
    Count,
    #[value(name = "pvalue", alias = "p_value")]
    #[serde(rename = "pvalue", alias = "p_value")]
    PValue,
    #[value(name = "fold_enrichment", alias = "fold-enrichment")]
    #[serde(rename = "fold_enrichment")]
    FoldEnrichment,
}

impl NodeSizeBy {
    pub const ALL: [Self; 3] = [Self::Count, Self::PValue, Self::FoldEnrichment];

    pub fn label(self) -> &'static str {
        match self {
            Self::Count => "Gene count",
            Self::PValue => "-log10 p",
            Self::FoldEnrichment => "log2 fold enrichment",
        }
    }
}

/// Statistics of one row, before the derived columns are filled in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TermStats {
    pub count: u32,
    pub expected: f64,
    pub fold_enrichment: f64,
    pub p_value: f64,
    pub fdr: f64,
    pub gene_ratio: f64,
    pub over_represented: bool,
}

/// One enrichment result row. Built once by the loader and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Term {
    pub term_id: String,
    pub term_name: String,
    pub count: u32,
    pub expected: f64,
    pub fold_enrichment: f64,
    pub p_value: f64,
    pub fdr: f64,
    pub gene_ratio: f64,
    pub neg_log10_p: f64,
    pub over_represented: bool,
}

impl Term {
    pub fn new(term_id: impl Into<String>, term_name: impl Into<String>, stats: TermStats) -> Self {
        Self {
            term_id: term_id.into(),
            term_name: term_name.into(),
            count: stats.count,
            expected: stats.expected,
            fold_enrichment: stats.fold_enrichment,
            p_value: stats.p_value,
            fdr: stats.fdr,
            gene_ratio: stats.gene_ratio,
            neg_log10_p: neg_log10(stats.p_value),
            over_represented: stats.over_represented,
        }
    }

    pub fn size_metric(&self, size_by: NodeSizeBy) -> f64 {
        match size_by {
            NodeSizeBy::Count => f64::from(self.count),
            NodeSizeBy::PValue => self.neg_log10_p,
            NodeSizeBy::FoldEnrichment => self.fold_enrichment.max(f64::MIN_POSITIVE).log2(),
        }
    }

    pub fn neg_log10_fdr(&self) -> f64 {
        neg_log10(self.fdr)
    }
}

#[derive(Clone, Debug)]
pub struct EnrichmentReport {
    pub source: String,
    pub metadata: BTreeMap<String, String>,
    pub terms: Vec<Term>,
}

impl EnrichmentReport {
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn over_represented_count(&self) -> usize {
        self.terms.iter().filter(|term| term.over_represented).count()
    }

    pub fn find(&self, term_id: &str) -> Option<&Term> {
        self.terms.iter().find(|term| term.term_id == term_id)
    }
}
