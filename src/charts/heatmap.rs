use serde::Serialize;

use crate::enrichment::{NodeSizeBy, Term};
use crate::util::{short_label, value_range};

use super::LABEL_CHARS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatmapColumn {
    Count,
    GeneRatio,
    Log2FoldEnrichment,
    NegLog10P,
    NegLog10Fdr,
}

impl HeatmapColumn {
    pub const ALL: [Self; 5] = [
        Self::Count,
        Self::GeneRatio,
        Self::Log2FoldEnrichment,
        Self::NegLog10P,
        Self::NegLog10Fdr,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Count => "Count",
            Self::GeneRatio => "Gene ratio",
            Self::Log2FoldEnrichment => "log2 FE",
            Self::NegLog10P => "-log10 p",
            Self::NegLog10Fdr => "-log10 FDR",
        }
    }

    fn value(self, term: &Term) -> f64 {
        match self {
            Self::Count => term.size_metric(NodeSizeBy::Count),
            Self::GeneRatio => term.gene_ratio,
            Self::Log2FoldEnrichment => term.size_metric(NodeSizeBy::FoldEnrichment),
            Self::NegLog10P => term.neg_log10_p,
            Self::NegLog10Fdr => term.neg_log10_fdr(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub raw: f64,
    /// Min-max scaled within the column.
    pub scaled: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Heatmap {
    pub term_ids: Vec<String>,
    pub rows: Vec<String>,
    pub columns: Vec<HeatmapColumn>,
    /// `cells[row][column]`
    pub cells: Vec<Vec<HeatmapCell>>,
}

pub fn heatmap_chart(terms: &[Term], top_n: usize) -> Heatmap {
    let terms = &terms[..terms.len().min(top_n)];
    let columns = HeatmapColumn::ALL.to_vec();

    let ranges = columns
        .iter()
        .map(|column| value_range(terms.iter().map(|term| column.value(term))))
        .collect::<Vec<_>>();

    let cells = terms
        .iter()
        .map(|term| {
            columns
                .iter()
                .zip(&ranges)
                .map(|(column, range)| {
                    let raw = column.value(term);
                    HeatmapCell {
                        raw,
                        scaled: scale(raw, range.unwrap_or((raw, raw))),
                    }
                })
                .collect()
        })
        .collect();

    Heatmap {
        term_ids: terms.iter().map(|term| term.term_id.clone()).collect(),
        rows: terms
            .iter()
            .map(|term| short_label(&term.term_name, LABEL_CHARS))
            .collect(),
        columns,
        cells,
    }
}

fn scale(value: f64, (min, max): (f64, f64)) -> f64 {
    let span = max - min;
    if span.abs() < f64::EPSILON {
        return 0.5;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::term::fixtures::term_with;

    #[test]
    fn columns_are_scaled_independently() {
        let terms = vec![
            term_with("cell adhesion", 10, 4.0, 0.0001),
            term_with("cell migration", 30, 4.0, 0.01),
        ];

        let map = heatmap_chart(&terms, 10);
        assert_eq!(map.rows.len(), 2);
        assert_eq!(map.term_ids[1], terms[1].term_id);
        assert_eq!(map.columns.len(), 5);

        let count = HeatmapColumn::ALL
            .iter()
            .position(|column| *column == HeatmapColumn::Count)
            .expect("count column");
        let fold = HeatmapColumn::ALL
            .iter()
            .position(|column| *column == HeatmapColumn::Log2FoldEnrichment)
            .expect("fold column");

        assert_eq!(map.cells[0][count].scaled, 0.0);
        assert_eq!(map.cells[1][count].scaled, 1.0);
        assert_eq!(map.cells[1][count].raw, 30.0);
        assert_eq!(map.cells[0][fold].scaled, 0.5);
    }

    #[test]
    fn top_n_limits_rows() {
        let terms = (0..8)
            .map(|index| term_with(&format!("term {index}"), 5 + index, 2.0, 0.001))
            .collect::<Vec<_>>();
        assert_eq!(heatmap_chart(&terms, 3).cells.len(), 3);
    }
}
