mod collect;
mod filter;
mod parse;
pub(crate) mod term;

pub use collect::load_report;
pub use filter::select_significant;
pub use term::{EnrichmentReport, NodeSizeBy, Term};
