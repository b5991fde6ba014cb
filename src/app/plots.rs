use eframe::egui::{
    Align2, Color32, FontId, Painter, Pos2, Rect, Response, Sense, Stroke, StrokeKind, Ui, pos2,
    vec2,
};

use super::ViewModel;
use super::render_utils::{
    BACKGROUND, HOVER_COLOR, LABEL_COLOR, MUTED_COLOR, SELECTED_COLOR, blend_color, fold_color,
    heat_color, normalize_linear, significance_color,
};

const AXIS_TICKS: u32 = 4;
const AXIS_COLOR: Color32 = Color32::from_gray(110);
const GRID_COLOR: Color32 = Color32::from_rgba_premultiplied(16, 19, 22, 70);

fn chart_canvas(ui: &mut Ui) -> (Rect, Response, Painter) {
    let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, BACKGROUND);
    (rect, response, painter)
}

/// Leaves a gutter on the left for term labels and room below for the axis.
fn plot_area(rect: Rect, top_margin: f32) -> Rect {
    let gutter = (rect.width() * 0.36).clamp(140.0, 340.0);
    Rect::from_min_max(
        pos2(rect.left() + gutter, rect.top() + top_margin),
        pos2(rect.right() - 60.0, rect.bottom() - 44.0),
    )
}

fn row_center(plot: Rect, row_height: f32, row: usize) -> f32 {
    plot.top() + row_height * (row as f32 + 0.5)
}

fn hovered_row(
    pointer: Option<Pos2>,
    rect: Rect,
    plot: Rect,
    row_height: f32,
    rows: usize,
) -> Option<usize> {
    let pointer = pointer?;
    if !rect.contains(pointer) || pointer.y < plot.top() || row_height <= 0.0 {
        return None;
    }

    let row = ((pointer.y - plot.top()) / row_height).floor() as usize;
    (row < rows).then_some(row)
}

fn label_font(row_height: f32) -> FontId {
    FontId::proportional((row_height * 0.7).clamp(8.0, 13.0))
}

fn draw_row_label(painter: &Painter, plot: Rect, y: f32, label: &str, font: FontId, strong: bool) {
    painter.text(
        pos2(plot.left() - 8.0, y),
        Align2::RIGHT_CENTER,
        label,
        font,
        if strong { SELECTED_COLOR } else { LABEL_COLOR },
    );
}

fn draw_x_axis(painter: &Painter, plot: Rect, (min, max): (f64, f64), title: &str) {
    let stroke = Stroke::new(1.0, AXIS_COLOR);
    painter.line_segment([plot.left_bottom(), plot.right_bottom()], stroke);

    for step in 0..=AXIS_TICKS {
        let t = step as f32 / AXIS_TICKS as f32;
        let x = plot.left() + t * plot.width();
        let value = min + (max - min) * f64::from(t);

        painter.line_segment(
            [pos2(x, plot.top()), pos2(x, plot.bottom())],
            Stroke::new(1.0, GRID_COLOR),
        );
        painter.line_segment([pos2(x, plot.bottom()), pos2(x, plot.bottom() + 4.0)], stroke);
        painter.text(
            pos2(x, plot.bottom() + 6.0),
            Align2::CENTER_TOP,
            format!("{value:.2}"),
            FontId::proportional(11.0),
            MUTED_COLOR,
        );
    }

    painter.text(
        pos2(plot.center().x, plot.bottom() + 24.0),
        Align2::CENTER_TOP,
        title,
        FontId::proportional(12.0),
        LABEL_COLOR,
    );
}

fn draw_caption(painter: &Painter, rect: Rect, text: String) {
    painter.text(
        rect.left_top() + vec2(10.0, 10.0),
        Align2::LEFT_TOP,
        text,
        FontId::proportional(13.0),
        Color32::from_gray(240),
    );
}

fn draw_legend(painter: &Painter, rect: Rect, text: String) {
    painter.text(
        rect.right_top() + vec2(-10.0, 10.0),
        Align2::RIGHT_TOP,
        text,
        FontId::proportional(12.0),
        MUTED_COLOR,
    );
}

fn draw_empty(painter: &Painter, rect: Rect) {
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        "No terms pass the current significance cutoffs",
        FontId::proportional(16.0),
        LABEL_COLOR,
    );
}

impl ViewModel {
    pub(super) fn draw_bar_chart(&mut self, ui: &mut Ui) {
        let (rect, response, painter) = chart_canvas(ui);
        let chart = &self.charts.bar;
        if chart.bars.is_empty() {
            draw_empty(&painter, rect);
            return;
        }

        let plot = plot_area(rect, 36.0);
        let row_height = plot.height() / chart.bars.len() as f32;
        let max_value = chart.max_value.max(f64::EPSILON);
        let hovered = hovered_row(response.hover_pos(), rect, plot, row_height, chart.bars.len());
        let font = label_font(row_height);

        draw_x_axis(&painter, plot, (0.0, chart.max_value), "-log10(p)");

        for (row, bar) in chart.bars.iter().enumerate() {
            let y = row_center(plot, row_height, row);
            let length = (bar.neg_log10_p / max_value) as f32 * plot.width();
            let bar_rect = Rect::from_min_max(
                pos2(plot.left(), y - row_height * 0.35),
                pos2(plot.left() + length, y + row_height * 0.35),
            );

            let is_selected = self.selected.as_deref() == Some(bar.term_id.as_str());
            let fill = fold_color(bar.fold_enrichment, chart.fold_range);
            let fill = if is_selected {
                SELECTED_COLOR
            } else if hovered == Some(row) {
                blend_color(fill, HOVER_COLOR, 0.5)
            } else {
                fill
            };

            painter.rect_filled(bar_rect, 2.0, fill);
            draw_row_label(&painter, plot, y, &bar.label, font.clone(), is_selected);
            painter.text(
                pos2(bar_rect.right() + 6.0, y),
                Align2::LEFT_CENTER,
                format!("{:.2}", bar.neg_log10_p),
                FontId::proportional(11.0),
                MUTED_COLOR,
            );
        }

        let (fold_min, fold_max) = chart.fold_range;
        draw_legend(
            &painter,
            rect,
            format!("fill: fold enrichment {fold_min:.2} to {fold_max:.2}"),
        );

        if let Some(row) = hovered {
            let bar = &chart.bars[row];
            draw_caption(
                &painter,
                rect,
                format!(
                    "{}  |  -log10 p: {:.2}  |  fold enrichment: {:.2}",
                    bar.label, bar.neg_log10_p, bar.fold_enrichment
                ),
            );
        }

        let clicked = hovered
            .filter(|_| response.clicked())
            .map(|row| chart.bars[row].term_id.clone());
        if let Some(term_id) = clicked {
            self.set_selected(Some(term_id));
        }
    }

    pub(super) fn draw_dot_chart(&mut self, ui: &mut Ui) {
        let (rect, response, painter) = chart_canvas(ui);
        let chart = &self.charts.dot;
        if chart.dots.is_empty() {
            draw_empty(&painter, rect);
            return;
        }

        let plot = plot_area(rect, 36.0);
        let row_height = plot.height() / chart.dots.len() as f32;
        let x_max = (chart.gene_ratio_range.1 * 1.1).max(f64::EPSILON);
        let hovered = hovered_row(response.hover_pos(), rect, plot, row_height, chart.dots.len());
        let font = label_font(row_height);

        draw_x_axis(&painter, plot, (0.0, x_max), "gene ratio");

        for (row, dot) in chart.dots.iter().enumerate() {
            let y = row_center(plot, row_height, row);
            let x = plot.left() + (dot.gene_ratio / x_max) as f32 * plot.width();
            let radius = 4.0 + normalize_linear(f64::from(dot.count), chart.count_range) * 10.0;

            let is_selected = self.selected.as_deref() == Some(dot.term_id.as_str());
            let color = significance_color(dot.neg_log10_p, chart.significance_range);
            let color = if is_selected {
                SELECTED_COLOR
            } else if hovered == Some(row) {
                HOVER_COLOR
            } else {
                color
            };

            painter.line_segment(
                [pos2(plot.left(), y), pos2(x, y)],
                Stroke::new(1.0, GRID_COLOR),
            );
            painter.circle_filled(pos2(x, y), radius, color);
            painter.circle_stroke(
                pos2(x, y),
                radius,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            );
            draw_row_label(&painter, plot, y, &dot.label, font.clone(), is_selected);
        }

        let (count_min, count_max) = chart.count_range;
        let (sig_min, sig_max) = chart.significance_range;
        draw_legend(
            &painter,
            rect,
            format!(
                "size: gene count {count_min:.0} to {count_max:.0}  |  \
                 color: -log10 p {sig_min:.1} to {sig_max:.1}"
            ),
        );

        if let Some(row) = hovered {
            let dot = &chart.dots[row];
            draw_caption(
                &painter,
                rect,
                format!(
                    "{}  |  gene ratio: {:.3}  |  count: {}  |  -log10 p: {:.2}",
                    dot.label, dot.gene_ratio, dot.count, dot.neg_log10_p
                ),
            );
        }

        let clicked = hovered
            .filter(|_| response.clicked())
            .map(|row| chart.dots[row].term_id.clone());
        if let Some(term_id) = clicked {
            self.set_selected(Some(term_id));
        }
    }

    pub(super) fn draw_heatmap(&mut self, ui: &mut Ui) {
        let (rect, response, painter) = chart_canvas(ui);
        let heatmap = &self.charts.heatmap;
        if heatmap.rows.is_empty() {
            draw_empty(&painter, rect);
            return;
        }

        let plot = plot_area(rect, 56.0);
        let row_height = plot.height() / heatmap.rows.len() as f32;
        let column_width = plot.width() / heatmap.columns.len().max(1) as f32;
        let pointer = response.hover_pos();
        let hovered = hovered_row(pointer, rect, plot, row_height, heatmap.rows.len());
        let hovered_column = pointer
            .filter(|pointer| pointer.x >= plot.left() && pointer.x < plot.right())
            .map(|pointer| ((pointer.x - plot.left()) / column_width).floor() as usize)
            .filter(|column| *column < heatmap.columns.len());
        let font = label_font(row_height);

        for (column, kind) in heatmap.columns.iter().enumerate() {
            painter.text(
                pos2(plot.left() + column_width * (column as f32 + 0.5), plot.top() - 8.0),
                Align2::CENTER_BOTTOM,
                kind.label(),
                FontId::proportional(12.0),
                LABEL_COLOR,
            );
        }

        for (row, (label, cells)) in heatmap.rows.iter().zip(&heatmap.cells).enumerate() {
            let top = plot.top() + row_height * row as f32;
            let is_selected = self.selected.as_deref() == Some(heatmap.term_ids[row].as_str());

            for (column, cell) in cells.iter().enumerate() {
                let cell_rect = Rect::from_min_size(
                    pos2(plot.left() + column_width * column as f32, top),
                    vec2(column_width, row_height),
                )
                .shrink(0.5);
                painter.rect_filled(cell_rect, 0.0, heat_color(cell.scaled as f32));
            }

            if is_selected || hovered == Some(row) {
                let row_rect =
                    Rect::from_min_size(pos2(plot.left(), top), vec2(plot.width(), row_height));
                let color = if is_selected { SELECTED_COLOR } else { HOVER_COLOR };
                painter.rect_stroke(row_rect, 0.0, Stroke::new(1.5, color), StrokeKind::Inside);
            }

            let y = top + row_height * 0.5;
            draw_row_label(&painter, plot, y, label, font.clone(), is_selected);
        }

        draw_legend(&painter, rect, "cells scaled per column, low to high".to_owned());

        if let (Some(row), Some(column)) = (hovered, hovered_column) {
            let cell = heatmap.cells[row][column];
            draw_caption(
                &painter,
                rect,
                format!(
                    "{}  |  {}: {:.3}",
                    heatmap.rows[row],
                    heatmap.columns[column].label(),
                    cell.raw
                ),
            );
        }

        let clicked = hovered
            .filter(|_| response.clicked())
            .map(|row| heatmap.term_ids[row].clone());
        if let Some(term_id) = clicked {
            self.set_selected(Some(term_id));
        }
    }
}
