use serde::Serialize;

use crate::enrichment::Term;
use crate::util::{short_label, value_range};

use super::LABEL_CHARS;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dot {
    pub term_id: String,
    pub label: String,
    pub gene_ratio: f64,
    pub count: u32,
    pub neg_log10_p: f64,
}

/// One row per term: x is gene ratio, size is gene count, color is `-log10 p`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DotChart {
    pub dots: Vec<Dot>,
    pub gene_ratio_range: (f64, f64),
    pub count_range: (f64, f64),
    pub significance_range: (f64, f64),
}

pub fn dot_chart(terms: &[Term], top_n: usize) -> DotChart {
    let mut dots = terms
        .iter()
        .take(top_n)
        .map(|term| Dot {
            term_id: term.term_id.clone(),
            label: short_label(&term.term_name, LABEL_CHARS),
            gene_ratio: term.gene_ratio,
            count: term.count,
            neg_log10_p: term.neg_log10_p,
        })
        .collect::<Vec<_>>();
    dots.sort_by(|a, b| b.gene_ratio.total_cmp(&a.gene_ratio));

    DotChart {
        gene_ratio_range: value_range(dots.iter().map(|dot| dot.gene_ratio)).unwrap_or((0.0, 1.0)),
        count_range: value_range(dots.iter().map(|dot| f64::from(dot.count))).unwrap_or((0.0, 1.0)),
        significance_range: value_range(dots.iter().map(|dot| dot.neg_log10_p))
            .unwrap_or((0.0, 1.0)),
        dots,
    }
}
