use std::path::Path;

use eframe::egui::{self, Align, Context, Layout, Vec2};
use tracing::debug;

use crate::charts::build_charts;
use crate::config::Settings;
use crate::enrichment::{EnrichmentReport, select_significant};
use crate::network::build_network;

use super::super::{ChartKind, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(report: EnrichmentReport, settings: Settings) -> Self {
        let ranked = select_significant(&report.terms, &settings.filter);
        let charts = build_charts(&ranked, settings.charts.top_n);
        let network = build_network(&ranked, &settings.network);

        Self {
            report,
            settings,
            ranked,
            charts,
            network,
            chart: ChartKind::Network,
            search: String::new(),
            selected: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            ranking_dirty: false,
            charts_dirty: false,
            network_dirty: false,
        }
    }

    /// Rebuilds whatever the side panel invalidated last frame.
    fn refresh(&mut self) {
        if self.ranking_dirty {
            self.ranked = select_significant(&self.report.terms, &self.settings.filter);
            debug!(ranked = self.ranked.len(), "re-ranked terms");
            self.ranking_dirty = false;
            self.charts_dirty = true;
            self.network_dirty = true;
        }

        if self.charts_dirty {
            self.charts = build_charts(&self.ranked, self.settings.charts.top_n);
            self.charts_dirty = false;
        }

        if self.network_dirty {
            self.network = build_network(&self.ranked, &self.settings.network);
            self.network_dirty = false;
            self.reset_view();
        }
    }

    fn network_summary(&self) -> String {
        match &self.network {
            Ok(scene) => format!(
                "network: {} nodes, {} edges",
                scene.nodes.len(),
                scene.edges.len()
            ),
            Err(_) => "network: unavailable".to_owned(),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        report_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.refresh();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("enrichnet");
                    ui.separator();
                    ui.label(format!("report: {}", report_path.display()));
                    ui.label(format!("terms: {}", self.report.term_count()));
                    ui.label(format!("significant: {}", self.ranked.len()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload report"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.network_summary());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| match self.chart {
            ChartKind::Network => self.draw_network(ui),
            ChartKind::Bar => self.draw_bar_chart(ui),
            ChartKind::Dot => self.draw_dot_chart(ui),
            ChartKind::Heatmap => self.draw_heatmap(ui),
        });
    }
}
