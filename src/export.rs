use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::charts::{ChartBundle, build_charts};
use crate::config::Settings;
use crate::enrichment::{EnrichmentReport, Term, select_significant};
use crate::network::{NetworkScene, NetworkWarning, build_network};

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NetworkExport {
    Built { scene: NetworkScene },
    Failed {
        reason: String,
        warnings: Vec<NetworkWarning>,
    },
}

/// Everything a headless run produces, ready for `serde_json`.
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub source: &'a str,
    pub metadata: &'a BTreeMap<String, String>,
    pub settings: &'a Settings,
    pub ranked_terms: Vec<Term>,
    pub charts: ChartBundle,
    pub network: NetworkExport,
}

impl<'a> ExportDocument<'a> {
    pub fn build(report: &'a EnrichmentReport, settings: &'a Settings) -> Self {
        let ranked_terms = select_significant(&report.terms, &settings.filter);
        let charts = build_charts(&ranked_terms, settings.charts.top_n);

        // A failed network still leaves the tabular charts worth exporting.
        let network = match build_network(&ranked_terms, &settings.network) {
            Ok(scene) => NetworkExport::Built { scene },
            Err(failure) => {
                warn!("{failure}");
                NetworkExport::Failed {
                    reason: failure.error.to_string(),
                    warnings: failure.warnings,
                }
            }
        };

        Self {
            source: &report.source,
            metadata: &report.metadata,
            settings,
            ranked_terms,
            charts,
            network,
        }
    }
}

pub fn write_export(path: &Path, report: &EnrichmentReport, settings: &Settings) -> Result<()> {
    let document = ExportDocument::build(report, settings);
    let json = serde_json::to_string_pretty(&document).context("failed to serialize export")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write export {}", path.display()))?;

    info!(
        path = %path.display(),
        ranked = document.ranked_terms.len(),
        "wrote export"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::process;

    use super::*;
    use crate::enrichment::term::fixtures::term;

    fn report(names: &[&str]) -> EnrichmentReport {
        EnrichmentReport {
            source: "fixture".to_owned(),
            metadata: BTreeMap::from([("organism".to_owned(), "Homo sapiens".to_owned())]),
            terms: names
                .iter()
                .enumerate()
                .map(|(index, name)| term(name, 0.001 * (index + 1) as f64))
                .collect(),
        }
    }

    #[test]
    fn network_failure_is_reported_in_the_document() {
        let report = report(&["cell adhesion", "apoptosis"]);
        let settings = Settings::default();

        let document = ExportDocument::build(&report, &settings);
        assert_eq!(document.ranked_terms.len(), 2);
        assert_eq!(document.charts.bar.bars.len(), 2);

        let value = serde_json::to_value(&document).expect("document serializes");
        assert_eq!(value["network"]["status"], "failed");
        assert!(
            value["network"]["reason"]
                .as_str()
                .is_some_and(|reason| reason.contains("threshold"))
        );
        assert_eq!(value["network"]["warnings"], serde_json::json!([]));
        assert_eq!(value["metadata"]["organism"], "Homo sapiens");
    }

    #[test]
    fn failed_network_keeps_truncation_warning() {
        let names = (0..4).map(|index| format!("unique{index}")).collect::<Vec<_>>();
        let report = report(&names.iter().map(String::as_str).collect::<Vec<_>>());
        let mut settings = Settings::default();
        settings.network.max_terms = 3;

        let value =
            serde_json::to_value(ExportDocument::build(&report, &settings)).expect("serializes");
        assert_eq!(value["network"]["status"], "failed");
        assert_eq!(
            value["network"]["warnings"],
            serde_json::json!([{"kind": "term_count_exceeded", "supplied": 4, "max_terms": 3}])
        );
    }

    #[test]
    fn built_network_carries_scene() {
        let report = report(&["cell adhesion", "cell migration", "apoptosis"]);
        let settings = Settings::default();

        let value =
            serde_json::to_value(ExportDocument::build(&report, &settings)).expect("serializes");
        assert_eq!(value["network"]["status"], "built");
        assert_eq!(value["network"]["scene"]["nodes"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["network"]["scene"]["edges"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn export_file_is_pretty_json() {
        let path = env::temp_dir().join(format!("enrichnet-{}-export.json", process::id()));
        let report = report(&["cell adhesion", "cell migration"]);

        write_export(&path, &report, &Settings::default()).expect("export writes");
        let raw = fs::read_to_string(&path).expect("export readable");
        fs::remove_file(&path).ok();

        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(value["source"], "fixture");
        assert!(raw.contains('\n'));
    }
}
