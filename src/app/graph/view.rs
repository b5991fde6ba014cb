use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Painter, Rect, Sense, Stroke, Ui, vec2};

use crate::network::{NetworkFailure, NetworkScene};
use crate::util::short_label;

use super::super::ViewModel;
use super::super::render_utils::{
    HOVER_COLOR, LABEL_COLOR, MUTED_COLOR, SEARCH_COLOR, SELECTED_COLOR, blend_color, dim_color,
    draw_background, fit_scale, node_radius, significance_color, world_to_screen,
};

const NODE_LABEL_CHARS: usize = 32;

impl ViewModel {
    pub(in crate::app) fn draw_network(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        let fit = match &self.network {
            Ok(scene) => fit_scale(rect, scene.extent()),
            Err(failure) => {
                draw_network_error(&painter, rect, failure);
                return;
            }
        };

        self.handle_graph_zoom(ui, rect, &response, fit);
        self.handle_graph_pan(&response);

        let search_hits = self.search_hit_ids();
        let Ok(scene) = &self.network else {
            return;
        };

        let scale = self.zoom * fit;
        let screen_positions = scene
            .nodes
            .iter()
            .map(|node| world_to_screen(rect, self.pan, scale, node.world_pos()))
            .collect::<Vec<_>>();
        let size_range = scene.size_range();
        let screen_radii = scene
            .nodes
            .iter()
            .map(|node| {
                (node_radius(node.size_metric, size_range) * self.zoom.powf(0.4)).clamp(3.0, 46.0)
            })
            .collect::<Vec<_>>();

        let hovered = Self::hovered_node(ui, rect, &screen_positions, &screen_radii);
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let pending_selection = if response.clicked_by(egui::PointerButton::Primary) {
            Some(hovered.map(|index| scene.nodes[index].term_id.clone()))
        } else {
            None
        };

        let selected_index = self
            .selected
            .as_deref()
            .and_then(|term_id| scene.node_index(term_id));
        let neighbors = selected_index
            .map(|index| {
                scene
                    .graph
                    .neighbors(index)
                    .iter()
                    .map(|(neighbor, _)| *neighbor)
                    .collect::<HashSet<_>>()
            })
            .unwrap_or_default();
        let search_active = !search_hits.is_empty();

        let zoom_sqrt = self.zoom.sqrt();
        for edge in &scene.edges {
            let start = screen_positions[edge.from];
            let end = screen_positions[edge.to];
            let weight = edge.weight as f32;
            let touches_selection =
                selected_index.is_some_and(|index| index == edge.from || index == edge.to);

            let (width, color) = if touches_selection {
                (
                    ((1.2 + weight * 3.0) * zoom_sqrt).clamp(1.2, 6.0),
                    Color32::from_rgb(241, 146, 94),
                )
            } else if selected_index.is_some() {
                (
                    ((0.5 + weight * 1.5) * zoom_sqrt).clamp(0.4, 3.0),
                    Color32::from_rgba_unmultiplied(80, 90, 104, 110),
                )
            } else {
                let alpha = (90.0 + weight * 140.0) as u8;
                (
                    ((0.6 + weight * 3.0) * zoom_sqrt).clamp(0.6, 5.0),
                    Color32::from_rgba_unmultiplied(150, 160, 172, alpha),
                )
            };

            painter.line_segment([start, end], Stroke::new(width, color));
        }

        let mut draw_order = (0..scene.nodes.len()).collect::<Vec<_>>();
        draw_order.sort_by(|a, b| {
            scene.nodes[*b]
                .size_metric
                .total_cmp(&scene.nodes[*a].size_metric)
        });

        let color_range = scene.color_range();
        for index in draw_order {
            let node = &scene.nodes[index];
            let position = screen_positions[index];
            let radius = screen_radii[index];

            let is_selected = selected_index == Some(index);
            let is_hovered = hovered == Some(index);
            let is_neighbor = neighbors.contains(&index);
            let is_search_hit = search_hits.contains(node.term_id.as_str());

            let base_color = significance_color(node.color_metric, color_range);
            let color = if is_selected {
                SELECTED_COLOR
            } else if is_hovered {
                HOVER_COLOR
            } else if is_neighbor {
                blend_color(base_color, Color32::from_rgb(246, 137, 92), 0.55)
            } else if is_search_hit {
                blend_color(base_color, SEARCH_COLOR, 0.68)
            } else if selected_index.is_some() {
                dim_color(base_color, 0.52)
            } else if search_active {
                dim_color(base_color, 0.38)
            } else {
                base_color
            };

            painter.circle_filled(position, radius, color);
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(
                    if is_selected || is_search_hit { 2.0 } else { 1.0 },
                    Color32::from_rgba_unmultiplied(15, 15, 15, 190),
                ),
            );

            let should_draw_label = is_selected
                || is_hovered
                || is_neighbor
                || is_search_hit
                || radius > 18.0
                || self.zoom > 1.4;
            if should_draw_label {
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    short_label(&node.term_name, NODE_LABEL_CHARS),
                    FontId::proportional(12.0),
                    LABEL_COLOR,
                );
            }
        }

        if let Some(index) = hovered {
            let node = &scene.nodes[index];
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "{}  |  {}: {:.2}  |  -log10 p: {:.2}  |  degree {}",
                    node.term_name,
                    scene.node_size_by.label(),
                    node.size_metric,
                    node.color_metric,
                    scene.graph.degree(index),
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        draw_legend(&painter, rect, scene);

        if let Some(selection) = pending_selection {
            self.set_selected(selection);
        }
    }

    fn search_hit_ids(&self) -> HashSet<String> {
        self.search_matches()
            .into_iter()
            .map(|(_, index)| self.ranked[index].term_id.clone())
            .collect()
    }
}

fn draw_legend(painter: &Painter, rect: Rect, scene: &NetworkScene) {
    let (color_min, color_max) = scene.color_range();
    let mut lines = vec![
        format!(
            "{} layout  |  {} nodes  |  {} edges  |  similarity >= {:.2}",
            scene.layout.label(),
            scene.nodes.len(),
            scene.edges.len(),
            scene.similarity_threshold,
        ),
        format!(
            "size: {}  |  color: -log10 p {color_min:.1} to {color_max:.1}",
            scene.node_size_by.label()
        ),
    ];
    lines.extend(scene.warnings.iter().map(ToString::to_string));

    let line_height = 16.0;
    let lifted = line_height * (lines.len() - 1) as f32;
    let mut position = rect.left_bottom() + vec2(10.0, -10.0 - lifted);
    for line in lines {
        painter.text(
            position,
            Align2::LEFT_BOTTOM,
            line,
            FontId::proportional(12.0),
            MUTED_COLOR,
        );
        position.y += line_height;
    }
}

fn draw_network_error(painter: &Painter, rect: Rect, failure: &NetworkFailure) {
    painter.text(
        rect.center() - vec2(0.0, 12.0),
        Align2::CENTER_CENTER,
        "No network to draw",
        FontId::proportional(18.0),
        LABEL_COLOR,
    );
    painter.text(
        rect.center() + vec2(0.0, 14.0),
        Align2::CENTER_CENTER,
        failure.to_string(),
        FontId::proportional(13.0),
        MUTED_COLOR,
    );
}
