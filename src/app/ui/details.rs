use eframe::egui::{self, RichText, Ui};

use crate::util::format_p_value;

use super::super::ViewModel;

const NEIGHBOR_ROWS: usize = 32;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Term Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Select a term from a chart or the ranking list.");
            self.draw_report_metadata(ui);
            return;
        };

        let Some(term) = self.report.find(&selected_id) else {
            ui.label("Selected term is not part of the loaded report.");
            return;
        };

        ui.label(RichText::new(&term.term_name).strong());
        ui.small(term.term_id.as_str());
        ui.add_space(6.0);

        let ceiling = self.settings.report.fold_enrichment_ceiling;
        let fold_note = if term.fold_enrichment >= ceiling {
            " (capped)"
        } else {
            ""
        };

        ui.label(format!("Genes in list: {}", term.count));
        ui.label(format!("Expected: {:.2}", term.expected));
        ui.label(format!("Fold enrichment: {:.2}{fold_note}", term.fold_enrichment));
        ui.label(format!("p-value: {}", format_p_value(term.p_value)));
        ui.label(format!("FDR: {}", format_p_value(term.fdr)));
        ui.label(format!("Gene ratio: {:.3}", term.gene_ratio));
        ui.label(format!("-log10 p: {:.2}", term.neg_log10_p));
        ui.label(if term.over_represented {
            "Direction: over-represented"
        } else {
            "Direction: under-represented"
        });

        match self.ranked.iter().position(|ranked| ranked.term_id == selected_id) {
            Some(rank) => ui.label(format!("Rank: {} of {}", rank + 1, self.ranked.len())),
            None => ui.label("Rank: filtered out at the current cutoffs"),
        };

        ui.separator();
        ui.label(RichText::new("Similar terms in the network").strong());

        let mut next_selection = None;
        match &self.network {
            Err(failure) => {
                ui.label(failure.to_string());
            }
            Ok(scene) => match scene.node_index(&selected_id) {
                None => {
                    ui.label("Not a network node (filtered out or beyond max terms).");
                }
                Some(index) if scene.graph.neighbors(index).is_empty() => {
                    ui.label("No neighbors above the similarity threshold.");
                }
                Some(index) => {
                    egui::ScrollArea::vertical()
                        .id_salt("neighbor_list")
                        .max_height(260.0)
                        .show(ui, |ui| {
                            for &(neighbor, similarity) in
                                scene.graph.neighbors(index).iter().take(NEIGHBOR_ROWS)
                            {
                                let node = &scene.nodes[neighbor];
                                ui.horizontal(|ui| {
                                    if ui.link(node.term_name.as_str()).clicked() {
                                        next_selection = Some(node.term_id.clone());
                                    }
                                    ui.label(format!("{similarity:.2}"));
                                });
                            }
                        });
                }
            },
        }

        if let Some(term_id) = next_selection {
            self.set_selected(Some(term_id));
        }
    }

    fn draw_report_metadata(&self, ui: &mut Ui) {
        ui.separator();
        ui.label(format!("Source: {}", self.report.source));
        ui.label(format!(
            "Terms: {} ({} over-represented)",
            self.report.term_count(),
            self.report.over_represented_count()
        ));

        if self.report.metadata.is_empty() {
            return;
        }

        ui.collapsing("Report metadata", |ui| {
            for (key, value) in &self.report.metadata {
                ui.label(format!("{key}: {value}"));
            }
        });
    }
}
