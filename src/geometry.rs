//! Point and segment math shared by the model, the store and the viewport.

use eframe::egui;

pub fn midpoint(a: egui::Pos2, b: egui::Pos2) -> egui::Pos2 {
    a.lerp(b, 0.5)
}

/// Angle of the segment `a -> b` in degrees, measured like `atan2(dy, dx)`.
pub fn angle_degrees(a: egui::Pos2, b: egui::Pos2) -> f32 {
    (b.y - a.y).atan2(b.x - a.x).to_degrees()
}

pub fn distance(a: egui::Pos2, b: egui::Pos2) -> f32 {
    (b - a).length()
}

pub fn distance_to_segment(p: egui::Pos2, a: egui::Pos2, b: egui::Pos2) -> f32 {
    let ab = b - a;
    let ap = p - a;
    let ab_len2 = ab.x * ab.x + ab.y * ab.y;
    if ab_len2 <= f32::EPSILON {
        return (p - a).length();
    }
    let t = (ap.x * ab.x + ap.y * ab.y) / ab_len2;
    let t = t.clamp(0.0, 1.0);
    let closest = a + ab * t;
    (p - closest).length()
}

pub fn disc_contains(center: egui::Pos2, radius: f32, p: egui::Pos2, tolerance: f32) -> bool {
    distance(center, p) <= radius + tolerance
}

pub fn rect_contains(rect: egui::Rect, p: egui::Pos2, tolerance: f32) -> bool {
    rect.expand(tolerance).contains(p)
}

/// Point on the segment `from -> to` at `dist` from `from`. Degenerate
/// segments return `from`.
pub fn point_toward(from: egui::Pos2, to: egui::Pos2, dist: f32) -> egui::Pos2 {
    let v = to - from;
    let len = v.length();
    if len <= f32::EPSILON {
        return from;
    }
    from + v / len * dist
}

pub fn union_bounds(rects: impl IntoIterator<Item = egui::Rect>) -> Option<egui::Rect> {
    rects.into_iter().reduce(|a, b| a.union(b))
}
