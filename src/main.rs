mod app;
mod charts;
mod config;
mod enrichment;
mod export;
mod network;
mod util;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::enrichment::{NodeSizeBy, load_report};
use crate::network::LayoutKind;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Enrichment report: PANTHER text export or JSON term records.
    report: PathBuf,

    /// JSON settings file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    similarity_threshold: Option<f64>,

    #[arg(long, value_enum)]
    layout: Option<LayoutKind>,

    #[arg(long, value_enum)]
    node_size_by: Option<NodeSizeBy>,

    /// Most significant terms kept as network nodes.
    #[arg(long)]
    max_terms: Option<usize>,

    #[arg(long)]
    fdr_cutoff: Option<f64>,

    #[arg(long)]
    p_value_cutoff: Option<f64>,

    #[arg(long)]
    include_under_represented: bool,

    /// Terms shown in the bar, dot and heatmap charts.
    #[arg(long)]
    top_n: Option<usize>,

    /// Force layout iterations.
    #[arg(long)]
    iterations: Option<usize>,

    /// Force layout seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Write charts and network as JSON to this file instead of opening a window.
    #[arg(long)]
    export: Option<PathBuf>,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(threshold) = self.similarity_threshold {
            settings.network.similarity_threshold = threshold;
        }
        if let Some(layout) = self.layout {
            settings.network.layout = layout;
        }
        if let Some(node_size_by) = self.node_size_by {
            settings.network.node_size_by = node_size_by;
        }
        if let Some(max_terms) = self.max_terms {
            settings.network.max_terms = max_terms;
        }
        if let Some(iterations) = self.iterations {
            settings.network.iterations = iterations;
        }
        if let Some(seed) = self.seed {
            settings.network.seed = seed;
        }
        if let Some(cutoff) = self.fdr_cutoff {
            settings.filter.fdr_cutoff = cutoff;
        }
        if let Some(cutoff) = self.p_value_cutoff {
            settings.filter.p_value_cutoff = cutoff;
        }
        if self.include_under_represented {
            settings.filter.include_under_represented = true;
        }
        if let Some(top_n) = self.top_n {
            settings.charts.top_n = top_n;
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("enrichnet=info")),
        )
        .init();

    let args = Args::parse();
    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);
    settings.validate()?;

    let report = load_report(&args.report, &settings.report)?;

    if let Some(path) = &args.export {
        return export::write_export(path, &report, &settings);
    }

    info!(report = %args.report.display(), "opening viewer");
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    let report_path = args.report;
    eframe::run_native(
        "enrichnet",
        options,
        Box::new(move |_cc| Ok(Box::new(app::EnrichViewApp::new(report_path, settings, report)))),
    )
    .map_err(|error| anyhow!("viewer failed: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "enrichnet",
            "report.txt",
            "--similarity-threshold",
            "0.5",
            "--layout",
            "kamada-kawai",
            "--node-size-by",
            "pvalue",
            "--top-n",
            "7",
            "--include-under-represented",
        ])
        .expect("arguments parse");

        let mut settings = Settings::default();
        args.apply(&mut settings);

        assert_eq!(settings.network.similarity_threshold, 0.5);
        assert_eq!(settings.network.layout, LayoutKind::KamadaKawai);
        assert_eq!(settings.network.node_size_by, NodeSizeBy::PValue);
        assert_eq!(settings.charts.top_n, 7);
        assert!(settings.filter.include_under_represented);
        assert_eq!(settings.network.max_terms, 100);
    }

    #[test]
    fn report_path_is_required() {
        assert!(Args::try_parse_from(["enrichnet"]).is_err());
    }
}
