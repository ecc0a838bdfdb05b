use eframe::egui;
use eframe::egui::emath::Rot2;
use netsim::{Edge, EdgeGeometry, Node, Tier, ViewportTransform};

use super::DiagramApp;

const EDGE_COLOR: egui::Color32 = egui::Color32::from_gray(170);
const SELECTED_COLOR: egui::Color32 = egui::Color32::from_rgb(90, 160, 255);
const TOPMOST_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 170, 60);
const NODE_FILL: egui::Color32 = egui::Color32::from_rgb(60, 70, 90);
const LABEL_COLOR: egui::Color32 = egui::Color32::from_gray(230);

/// Grid pitch in diagram units, and the smallest on-screen pitch still drawn.
const GRID_PITCH: f32 = 50.0;
const GRID_MIN_SCREEN_PITCH: f32 = 16.0;

fn tier_color(tier: Tier, base: egui::Color32) -> egui::Color32 {
    match tier {
        Tier::Default => base,
        Tier::Highlighted => SELECTED_COLOR,
        Tier::Topmost => TOPMOST_COLOR,
    }
}

/// Multiples of `pitch` covering `lo..=hi`.
fn grid_stops(lo: f32, hi: f32, pitch: f32) -> impl Iterator<Item = f32> {
    let first = (lo / pitch).floor() as i64;
    let last = (hi / pitch).ceil() as i64;
    (first..=last).map(move |k| k as f32 * pitch)
}

/// Grid lines sit on diagram-space multiples of `GRID_PITCH`, so they pan
/// and zoom with the nodes. The diagram axes are drawn a little brighter.
pub(super) fn draw_background(painter: &egui::Painter, rect: egui::Rect, view: &ViewportTransform) {
    painter.rect_filled(rect, 0.0, painter.ctx().style().visuals.extreme_bg_color);
    if GRID_PITCH * view.zoom() < GRID_MIN_SCREEN_PITCH {
        return;
    }
    let to_screen = |p: egui::Pos2| rect.min + view.diagram_to_screen(p).to_vec2();
    let top_left = view.screen_to_diagram(egui::Pos2::ZERO);
    let bottom_right = view.screen_to_diagram(rect.size().to_pos2());

    let stroke_for = |coord: f32| {
        let gray = if coord == 0.0 { 80 } else { 50 };
        egui::Stroke::new(1.0, egui::Color32::from_gray(gray))
    };
    for x in grid_stops(top_left.x, bottom_right.x, GRID_PITCH) {
        let sx = to_screen(egui::pos2(x, 0.0)).x;
        painter.vline(sx, rect.y_range(), stroke_for(x));
    }
    for y in grid_stops(top_left.y, bottom_right.y, GRID_PITCH) {
        let sy = to_screen(egui::pos2(0.0, y)).y;
        painter.hline(rect.x_range(), sy, stroke_for(y));
    }
}

impl DiagramApp {
    /// Edges first, then nodes; each layer ordered by tier so raised items
    /// paint last.
    pub(super) fn draw_diagram(&self, painter: &egui::Painter, origin: egui::Pos2) {
        let store = self.editor.store();
        let mut edges: Vec<&Edge> = store.edges().iter().collect();
        edges.sort_by_key(|e| e.tier());
        for edge in edges {
            self.draw_edge(painter, origin, edge);
        }
        let mut nodes: Vec<&Node> = store.nodes().iter().collect();
        nodes.sort_by_key(|n| n.tier());
        for node in nodes {
            self.draw_node(painter, origin, node);
        }
        if let Some((from, to)) = self.editor.preview_line() {
            let points = [self.to_screen(origin, from), self.to_screen(origin, to)];
            let stroke = egui::Stroke::new(1.5, SELECTED_COLOR);
            painter.extend(egui::Shape::dashed_line(&points, stroke, 8.0, 4.0));
        }
    }

    fn draw_edge(&self, painter: &egui::Painter, origin: egui::Pos2, edge: &Edge) {
        let zoom = self.editor.viewport().zoom();
        let g = edge.geometry();
        let color = tier_color(edge.tier(), EDGE_COLOR);
        let stroke = egui::Stroke::new(2.0 * zoom.max(0.5), color);
        let start = self.to_screen(origin, g.start);
        let end = self.to_screen(origin, g.arrow_tip.unwrap_or(g.end));
        painter.line_segment([start, end], stroke);
        if g.arrow_tip.is_some() {
            painter.add(arrowhead(g, end, 10.0 * zoom, color));
        }

        if let Some(patch) = g.label_rect {
            let screen_patch = egui::Rect::from_min_max(
                self.to_screen(origin, patch.min),
                self.to_screen(origin, patch.max),
            );
            painter.rect_filled(screen_patch, 2.0, painter.ctx().style().visuals.extreme_bg_color);
            let size = self.editor.settings().label_text_size * zoom;
            draw_centered_text(painter, screen_patch.center(), edge.label(), size, color);
        }
    }

    fn draw_node(&self, painter: &egui::Painter, origin: egui::Pos2, node: &Node) {
        let zoom = self.editor.viewport().zoom();
        let center = self.to_screen(origin, node.position());
        let radius = self.editor.store().metrics().node_radius * zoom;
        let stroke = egui::Stroke::new(2.0, tier_color(node.tier(), EDGE_COLOR));
        painter.circle(center, radius, NODE_FILL, stroke);
        let size = self.editor.settings().label_text_size * zoom;
        draw_centered_text(painter, center, node.label(), size, LABEL_COLOR);
    }
}

/// Filled triangle with its point at `tip`, turned by the edge's cached
/// angle. The view only scales and translates, so the diagram angle holds on
/// screen too.
fn arrowhead(g: &EdgeGeometry, tip: egui::Pos2, length: f32, color: egui::Color32) -> egui::Shape {
    let rot = Rot2::from_angle(g.angle_degrees.to_radians());
    let back = rot * egui::vec2(-length, 0.0);
    let wing = rot * egui::vec2(0.0, length * 0.6);
    egui::Shape::convex_polygon(
        vec![tip, tip + back + wing, tip + back - wing],
        color,
        egui::Stroke::NONE,
    )
}

fn draw_centered_text(
    painter: &egui::Painter,
    center: egui::Pos2,
    text: &str,
    font_size: f32,
    color: egui::Color32,
) {
    if text.is_empty() || font_size < 4.0 {
        return;
    }
    let galley = painter.layout_no_wrap(text.to_string(), egui::FontId::proportional(font_size), color);
    let pos = center - galley.size() * 0.5;
    painter.galley(pos, galley, color);
}
