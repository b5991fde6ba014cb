use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::network::NetworkParams;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Substituted for unbounded (`> x`) or out-of-range fold enrichment readings.
    pub fold_enrichment_ceiling: f64,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            fold_enrichment_ceiling: 100.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub fdr_cutoff: f64,
    pub p_value_cutoff: f64,
    pub include_under_represented: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            fdr_cutoff: 0.05,
            p_value_cutoff: 0.05,
            include_under_represented: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Terms shown by the bar, dot and heatmap charts.
    pub top_n: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self { top_n: 20 }
    }
}

/// Every tunable value, passed explicitly to the operations that need it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub report: ReportSettings,
    pub filter: FilterSettings,
    pub network: NetworkParams,
    pub charts: ChartSettings,
}

impl Settings {
    /// Defaults, optionally overlaid by a JSON settings file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid settings file {}", path.display()))?;
        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.report.fold_enrichment_ceiling.is_finite()
                && self.report.fold_enrichment_ceiling > 0.0,
            "fold enrichment ceiling must be a positive number, got {}",
            self.report.fold_enrichment_ceiling
        );
        ensure!(
            (0.0..=1.0).contains(&self.filter.fdr_cutoff),
            "FDR cutoff must lie within [0, 1], got {}",
            self.filter.fdr_cutoff
        );
        ensure!(
            (0.0..=1.0).contains(&self.filter.p_value_cutoff),
            "p-value cutoff must lie within [0, 1], got {}",
            self.filter.p_value_cutoff
        );
        ensure!(
            (0.0..=1.0).contains(&self.network.similarity_threshold),
            "similarity threshold must lie within [0, 1], got {}",
            self.network.similarity_threshold
        );
        ensure!(
            self.network.max_terms >= 2,
            "max terms must be at least 2, got {}",
            self.network.max_terms
        );
        ensure!(self.charts.top_n >= 1, "top-n must be at least 1");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::NodeSizeBy;
    use crate::network::LayoutKind;

    #[test]
    fn defaults_are_valid() {
        Settings::default().validate().expect("defaults validate");
        assert!(Settings::load(None).is_ok_and(|settings| settings == Settings::default()));
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let settings: Settings = serde_json::from_str(
            r#"{"network": {"layout": "kamada_kawai", "node_size_by": "fold_enrichment",
                "similarity_threshold": 0.25}, "charts": {"top_n": 12}}"#,
        )
        .expect("settings parse");

        assert_eq!(settings.network.layout, LayoutKind::KamadaKawai);
        assert_eq!(settings.network.node_size_by, NodeSizeBy::FoldEnrichment);
        assert_eq!(settings.network.similarity_threshold, 0.25);
        assert_eq!(settings.network.max_terms, 100);
        assert_eq!(settings.charts.top_n, 12);
        assert_eq!(settings.filter, FilterSettings::default());
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        let mut settings = Settings::default();
        settings.filter.fdr_cutoff = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.network.similarity_threshold = -0.1;
        let error = settings.validate().expect_err("negative threshold");
        assert!(error.to_string().contains("similarity threshold"));
    }
}
