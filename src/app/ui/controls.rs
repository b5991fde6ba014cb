use eframe::egui::{self, Align, Layout, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::enrichment::NodeSizeBy;
use crate::network::LayoutKind;
use crate::util::{format_p_value, short_label};

use super::super::{ChartKind, ViewModel};

const RANKING_ROW_HEIGHT: f32 = 22.0;
const RANKING_LABEL_CHARS: usize = 38;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

impl ViewModel {
    /// Ranked terms whose name or identifier fuzzy-matches the search box,
    /// best match first, as `(score, index into ranked)`.
    pub(in crate::app) fn search_matches(&self) -> Vec<(i64, usize)> {
        let query = self.search.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let mut matches = self
            .ranked
            .iter()
            .enumerate()
            .filter_map(|(index, term)| {
                let score = fuzzy_match_score(&matcher, &term.term_name, query)
                    .max(fuzzy_match_score(&matcher, &term.term_id, query))?;
                Some((score, index))
            })
            .collect::<Vec<_>>();
        matches.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        matches
    }

    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Chart Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.horizontal_wrapped(|ui| {
            for kind in ChartKind::ALL {
                ui.selectable_value(&mut self.chart, kind, kind.label());
            }
        });

        ui.separator();
        self.draw_filter_controls(ui);
        ui.separator();
        self.draw_network_controls(ui);
        ui.separator();
        self.draw_chart_controls(ui);
        ui.separator();
        self.draw_term_ranking(ui);
    }

    fn draw_filter_controls(&mut self, ui: &mut Ui) {
        let filter = &mut self.settings.filter;
        let mut changed = false;

        ui.label(egui::RichText::new("Significance").strong());
        changed |= ui
            .add(
                egui::Slider::new(&mut filter.fdr_cutoff, 0.0..=1.0)
                    .logarithmic(true)
                    .text("FDR cutoff"),
            )
            .on_hover_text("Keep terms whose false discovery rate is at or below this value.")
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut filter.p_value_cutoff, 0.0..=1.0)
                    .logarithmic(true)
                    .text("p-value cutoff"),
            )
            .on_hover_text("Keep terms whose raw p-value is at or below this value.")
            .changed();
        changed |= ui
            .checkbox(&mut filter.include_under_represented, "Include under-represented terms")
            .changed();

        if changed {
            self.ranking_dirty = true;
        }
    }

    fn draw_network_controls(&mut self, ui: &mut Ui) {
        let network = &mut self.settings.network;
        let mut changed = false;

        ui.label(egui::RichText::new("Network").strong());
        changed |= ui
            .add(
                egui::Slider::new(&mut network.similarity_threshold, 0.0..=1.0)
                    .step_by(0.01)
                    .text("Similarity threshold"),
            )
            .on_hover_text("Connect two terms when their name similarity reaches this value.")
            .changed();

        egui::ComboBox::from_label("Layout")
            .selected_text(network.layout.label())
            .show_ui(ui, |ui| {
                for kind in LayoutKind::ALL {
                    changed |= ui
                        .selectable_value(&mut network.layout, kind, kind.label())
                        .changed();
                }
            });

        egui::ComboBox::from_label("Node size")
            .selected_text(network.node_size_by.label())
            .show_ui(ui, |ui| {
                for metric in NodeSizeBy::ALL {
                    changed |= ui
                        .selectable_value(&mut network.node_size_by, metric, metric.label())
                        .changed();
                }
            });

        changed |= ui
            .add(egui::Slider::new(&mut network.max_terms, 2..=500).text("Max terms"))
            .on_hover_text("Only the top-ranked terms up to this count become nodes.")
            .changed();

        ui.collapsing("Force layout tuning", |ui| {
            changed |= ui
                .add(egui::Slider::new(&mut network.iterations, 0..=500).text("Iterations"))
                .changed();
            ui.horizontal(|ui| {
                ui.label("Seed");
                changed |= ui.add(egui::DragValue::new(&mut network.seed)).changed();
            });
        });

        if changed {
            self.network_dirty = true;
        }

        if ui.button("Reset view").clicked() {
            self.reset_view();
        }
    }

    fn draw_chart_controls(&mut self, ui: &mut Ui) {
        ui.label(egui::RichText::new("Charts").strong());
        let response = ui
            .add(egui::Slider::new(&mut self.settings.charts.top_n, 1..=100).text("Top terms"))
            .on_hover_text("Number of top-ranked terms shown in the bar, dot and heatmap charts.");
        if response.changed() {
            self.charts_dirty = true;
        }
    }

    fn draw_term_ranking(&mut self, ui: &mut Ui) {
        ui.label("Search terms")
            .on_hover_text("Fuzzy-match term names or identifiers.");
        ui.text_edit_singleline(&mut self.search);
        ui.add_space(4.0);

        let rows = if self.search.trim().is_empty() {
            (0..self.ranked.len()).collect::<Vec<_>>()
        } else {
            self.search_matches()
                .into_iter()
                .map(|(_, index)| index)
                .collect()
        };

        ui.label(format!("{} of {} significant terms", rows.len(), self.ranked.len()));

        let mut selected_id = None;
        egui::ScrollArea::vertical()
            .id_salt("term_ranking")
            .auto_shrink([false, false])
            .show_rows(ui, RANKING_ROW_HEIGHT, rows.len(), |ui, row_range| {
                for &index in &rows[row_range] {
                    let term = &self.ranked[index];
                    let is_selected = self.selected.as_deref() == Some(term.term_id.as_str());

                    let clicked = ui
                        .horizontal(|ui| {
                            let clicked = ui
                                .selectable_label(
                                    is_selected,
                                    short_label(&term.term_name, RANKING_LABEL_CHARS),
                                )
                                .on_hover_text(term.term_id.as_str())
                                .clicked();
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.label(format_p_value(term.p_value));
                            });
                            clicked
                        })
                        .inner;

                    if clicked {
                        selected_id = Some(term.term_id.clone());
                    }
                }
            });

        if let Some(term_id) = selected_id {
            self.set_selected(Some(term_id));
        }
    }
}
