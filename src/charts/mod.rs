mod bar;
mod dot;
mod heatmap;

use serde::Serialize;

use crate::enrichment::Term;

pub use bar::{BarChart, bar_chart};
pub use dot::{DotChart, dot_chart};
pub use heatmap::{Heatmap, heatmap_chart};

const LABEL_CHARS: usize = 48;

/// Data for the three tabular charts, built from the same ranked terms.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ChartBundle {
    pub bar: BarChart,
    pub dot: DotChart,
    pub heatmap: Heatmap,
}

pub fn build_charts(terms: &[Term], top_n: usize) -> ChartBundle {
    ChartBundle {
        bar: bar_chart(terms, top_n),
        dot: dot_chart(terms, top_n),
        heatmap: heatmap_chart(terms, top_n),
    }
}
