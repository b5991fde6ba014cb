use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
pub(super) const LABEL_COLOR: Color32 = Color32::from_gray(225);
pub(super) const MUTED_COLOR: Color32 = Color32::from_gray(150);
pub(super) const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
pub(super) const HOVER_COLOR: Color32 = Color32::from_rgb(255, 164, 101);
pub(super) const SEARCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, BACKGROUND);

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Screen pixels per layout unit when the whole layout fits in `rect`.
pub(super) fn fit_scale(rect: Rect, extent: f32) -> f32 {
    (rect.width().min(rect.height()) * 0.42) / extent.max(f32::EPSILON)
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, scale: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * scale
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, scale: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / scale
}

pub(super) fn normalize_linear(value: f64, (min, max): (f64, f64)) -> f32 {
    let span = max - min;
    if !span.is_finite() || span.abs() < f64::EPSILON {
        return 0.5;
    }

    ((value - min) / span).clamp(0.0, 1.0) as f32
}

pub(super) fn node_radius(metric: f64, range: (f64, f64)) -> f32 {
    6.0 + (normalize_linear(metric, range) * 22.0)
}

/// Cool blue for weak terms, warm red for the most significant.
pub(super) fn significance_color(value: f64, range: (f64, f64)) -> Color32 {
    heat_color(normalize_linear(value, range))
}

pub(super) fn heat_color(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let r = (55.0 + (190.0 * t)) as u8;
    let g = (150.0 - (70.0 * t)) as u8;
    let b = (215.0 - (155.0 * t)) as u8;
    Color32::from_rgb(r, g, b)
}

/// Purple-to-green fill for fold enrichment bars.
pub(super) fn fold_color(value: f64, range: (f64, f64)) -> Color32 {
    blend_color(
        Color32::from_rgb(126, 98, 190),
        Color32::from_rgb(92, 196, 128),
        normalize_linear(value, range),
    )
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn flat_range_maps_to_midpoint() {
        assert_eq!(normalize_linear(3.0, (3.0, 3.0)), 0.5);
        assert_eq!(node_radius(3.0, (3.0, 3.0)), 17.0);
    }

    #[test]
    fn radius_grows_with_metric() {
        let range = (1.0, 9.0);
        assert_eq!(node_radius(1.0, range), 6.0);
        assert_eq!(node_radius(9.0, range), 28.0);
        assert!(node_radius(4.0, range) < node_radius(5.0, range));
    }

    #[test]
    fn heat_ramp_endpoints() {
        assert_eq!(heat_color(0.0), Color32::from_rgb(55, 150, 215));
        assert_eq!(heat_color(1.0), Color32::from_rgb(245, 80, 60));
    }

    #[test]
    fn screen_mapping_inverts() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(400.0, 300.0));
        let pan = vec2(12.0, -7.0);
        let world = vec2(0.3, -0.8);
        let screen = world_to_screen(rect, pan, 120.0, world);
        let back = screen_to_world(rect, pan, 120.0, screen);
        assert!((back - world).length() < 1e-5);
    }

    #[test]
    fn fit_scale_uses_shorter_side() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 400.0));
        assert!((fit_scale(rect, 2.0) - 84.0).abs() < 1e-4);
    }
}
