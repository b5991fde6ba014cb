use serde::Serialize;

use crate::enrichment::Term;
use crate::util::{short_label, value_range};

use super::LABEL_CHARS;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bar {
    pub term_id: String,
    pub label: String,
    pub neg_log10_p: f64,
    pub fold_enrichment: f64,
}

/// Horizontal bars, most significant first; length is `-log10 p`,
/// fill encodes fold enrichment.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BarChart {
    pub bars: Vec<Bar>,
    pub max_value: f64,
    pub fold_range: (f64, f64),
}

pub fn bar_chart(terms: &[Term], top_n: usize) -> BarChart {
    let bars = terms
        .iter()
        .take(top_n)
        .map(|term| Bar {
            term_id: term.term_id.clone(),
            label: short_label(&term.term_name, LABEL_CHARS),
            neg_log10_p: term.neg_log10_p,
            fold_enrichment: term.fold_enrichment,
        })
        .collect::<Vec<_>>();

    let max_value = bars
        .iter()
        .map(|bar| bar.neg_log10_p)
        .fold(0.0, f64::max);
    let fold_range =
        value_range(bars.iter().map(|bar| bar.fold_enrichment)).unwrap_or((0.0, 1.0));

    BarChart {
        bars,
        max_value,
        fold_range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::term::fixtures::term_with;

    #[test]
    fn bars_follow_ranking_and_stop_at_top_n() {
        let terms = vec![
            term_with("cell adhesion", 10, 4.0, 0.0001),
            term_with("cell migration", 6, 2.0, 0.001),
            term_with("apoptosis", 3, 1.5, 0.01),
        ];

        let chart = bar_chart(&terms, 2);
        assert_eq!(chart.bars.len(), 2);
        assert_eq!(chart.bars[0].label, "cell adhesion");
        assert!((chart.max_value - 4.0).abs() < 1e-9);
        assert_eq!(chart.fold_range, (2.0, 4.0));
    }

    #[test]
    fn empty_input_gives_empty_chart() {
        let chart = bar_chart(&[], 20);
        assert!(chart.bars.is_empty());
        assert_eq!(chart.max_value, 0.0);
    }
}
