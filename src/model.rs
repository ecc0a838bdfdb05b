use crate::geometry;
use eframe::egui;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Anything the user can point at, select or delete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Item {
    Node(NodeId),
    Edge(EdgeId),
}

impl From<NodeId> for Item {
    fn from(id: NodeId) -> Self {
        Item::Node(id)
    }
}

impl From<EdgeId> for Item {
    fn from(id: EdgeId) -> Self {
        Item::Edge(id)
    }
}

/// Z-order bucket. Nodes always paint above edges; within a layer a higher
/// tier paints (and hit-tests) first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    #[default]
    Default,
    Highlighted,
    Topmost,
}

/// Sizes the geometry pass needs. Built from `EditorSettings`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeMetrics {
    pub node_radius: f32,
    pub label_text_size: f32,
    pub label_char_width: f32,
    pub label_line_height: f32,
    pub label_padding: f32,
}

impl Default for ShapeMetrics {
    fn default() -> Self {
        Self {
            node_radius: 25.0,
            label_text_size: 11.0,
            label_char_width: 0.6,
            label_line_height: 1.2,
            label_padding: 2.0,
        }
    }
}

impl ShapeMetrics {
    /// Approximate extent of a single-line label.
    pub fn measure_label(&self, text: &str) -> egui::Vec2 {
        let chars = text.chars().count() as f32;
        egui::vec2(
            chars * self.label_text_size * self.label_char_width,
            self.label_text_size * self.label_line_height,
        )
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    id: NodeId,
    position: egui::Pos2,
    label: String,
    edges: Vec<EdgeId>,
    tier: Tier,
}

impl Node {
    pub(crate) fn new(id: NodeId, position: egui::Pos2, label: String) -> Self {
        Self {
            id,
            position,
            label,
            edges: Vec::new(),
            tier: Tier::Default,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn position(&self) -> egui::Pos2 {
        self.position
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Edges whose source or destination is this node, in attach order.
    pub fn incident_edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn bounds(&self, radius: f32) -> egui::Rect {
        egui::Rect::from_center_size(self.position, egui::vec2(radius * 2.0, radius * 2.0))
    }

    pub fn contains(&self, p: egui::Pos2, radius: f32, tolerance: f32) -> bool {
        geometry::disc_contains(self.position, radius, p, tolerance)
    }

    pub(crate) fn set_position(&mut self, position: egui::Pos2) {
        self.position = position;
    }

    pub(crate) fn set_label(&mut self, label: String) {
        self.label = label;
    }

    pub(crate) fn set_tier(&mut self, tier: Tier) {
        self.tier = tier;
    }

    pub(crate) fn attach_edge(&mut self, edge: EdgeId) {
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    pub(crate) fn detach_edge(&mut self, edge: EdgeId) {
        self.edges.retain(|e| *e != edge);
    }
}

/// Render geometry of an edge, derived from its endpoint positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeGeometry {
    pub start: egui::Pos2,
    pub end: egui::Pos2,
    pub angle_degrees: f32,
    /// Background patch behind the label, centered on the midpoint. `None`
    /// for an empty label.
    pub label_rect: Option<egui::Rect>,
    /// Where a directed edge's arrowhead touches the destination disc.
    pub arrow_tip: Option<egui::Pos2>,
}

impl EdgeGeometry {
    pub fn midpoint(&self) -> egui::Pos2 {
        geometry::midpoint(self.start, self.end)
    }
}

#[derive(Clone, Debug)]
pub struct Edge {
    id: EdgeId,
    source: NodeId,
    destination: NodeId,
    directed: bool,
    label: String,
    geometry: EdgeGeometry,
    tier: Tier,
}

impl Edge {
    pub(crate) fn new(
        id: EdgeId,
        source: NodeId,
        destination: NodeId,
        directed: bool,
        label: String,
    ) -> Self {
        Self {
            id,
            source,
            destination,
            directed,
            label,
            geometry: EdgeGeometry {
                start: egui::Pos2::ZERO,
                end: egui::Pos2::ZERO,
                angle_degrees: 0.0,
                label_rect: None,
                arrow_tip: None,
            },
            tier: Tier::Default,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn destination(&self) -> NodeId {
        self.destination
    }

    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.source, self.destination)
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.destination == node
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn geometry(&self) -> &EdgeGeometry {
        &self.geometry
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// The segment thickened to `hit_width`, plus the label patch.
    pub fn contains(&self, p: egui::Pos2, hit_width: f32) -> bool {
        let g = &self.geometry;
        if geometry::distance_to_segment(p, g.start, g.end) <= hit_width * 0.5 {
            return true;
        }
        g.label_rect
            .is_some_and(|r| geometry::rect_contains(r, p, 0.0))
    }

    pub fn bounds(&self) -> egui::Rect {
        let g = &self.geometry;
        let line = egui::Rect::from_two_pos(g.start, g.end);
        match g.label_rect {
            Some(r) => line.union(r),
            None => line,
        }
    }

    pub(crate) fn set_label(&mut self, label: String) {
        self.label = label;
    }

    pub(crate) fn set_tier(&mut self, tier: Tier) {
        self.tier = tier;
    }

    /// Recomputes everything in `geometry()` from the endpoint positions.
    pub(crate) fn update_geometry(
        &mut self,
        source: egui::Pos2,
        destination: egui::Pos2,
        metrics: &ShapeMetrics,
    ) {
        let mid = geometry::midpoint(source, destination);
        let label_rect = (!self.label.is_empty()).then(|| {
            let size = metrics.measure_label(&self.label)
                + egui::vec2(metrics.label_padding, metrics.label_padding) * 2.0;
            egui::Rect::from_center_size(mid, size)
        });
        let arrow_tip = self
            .directed
            .then(|| geometry::point_toward(destination, source, metrics.node_radius));
        self.geometry = EdgeGeometry {
            start: source,
            end: destination,
            angle_degrees: geometry::angle_degrees(source, destination),
            label_rect,
            arrow_tip,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(label: &str, directed: bool) -> Edge {
        Edge::new(EdgeId(3), NodeId(1), NodeId(2), directed, label.to_string())
    }

    #[test]
    fn geometry_tracks_endpoints_and_label_extent() {
        let metrics = ShapeMetrics::default();
        let mut e = edge("45", false);
        e.update_geometry(egui::pos2(-200.0, -100.0), egui::pos2(0.0, -100.0), &metrics);

        let g = e.geometry();
        assert_eq!(g.start, egui::pos2(-200.0, -100.0));
        assert_eq!(g.end, egui::pos2(0.0, -100.0));
        assert_eq!(g.angle_degrees, 0.0);
        assert!(g.arrow_tip.is_none());

        let rect = g.label_rect.unwrap();
        let expected = metrics.measure_label("45") + egui::vec2(4.0, 4.0);
        assert!((rect.center() - egui::pos2(-100.0, -100.0)).length() < 1e-3);
        assert!((rect.width() - expected.x).abs() < 1e-4);
        assert!((rect.height() - expected.y).abs() < 1e-4);
    }

    #[test]
    fn label_patch_grows_with_relabel() {
        let metrics = ShapeMetrics::default();
        let mut e = edge("1", false);
        let (a, b) = (egui::pos2(0.0, 0.0), egui::pos2(100.0, 0.0));
        e.update_geometry(a, b, &metrics);
        let narrow = e.geometry().label_rect.unwrap().width();

        e.set_label("1000".to_string());
        e.update_geometry(a, b, &metrics);
        let wide = e.geometry().label_rect.unwrap().width();
        assert!(wide > narrow);

        e.set_label(String::new());
        e.update_geometry(a, b, &metrics);
        assert!(e.geometry().label_rect.is_none());
    }

    #[test]
    fn directed_edge_tip_sits_on_destination_rim() {
        let metrics = ShapeMetrics::default();
        let mut e = edge("", true);
        e.update_geometry(egui::pos2(0.0, 0.0), egui::pos2(100.0, 0.0), &metrics);
        assert_eq!(e.geometry().arrow_tip, Some(egui::pos2(75.0, 0.0)));
    }

    #[test]
    fn hit_region_includes_stroke_and_label() {
        let metrics = ShapeMetrics::default();
        let mut e = edge("weight", false);
        e.update_geometry(egui::pos2(0.0, 0.0), egui::pos2(200.0, 0.0), &metrics);

        assert!(e.contains(egui::pos2(40.0, 7.9), 16.0));
        assert!(!e.contains(egui::pos2(40.0, 8.5), 16.0));
        // inside the label patch but outside the thickened stroke
        let patch = e.geometry().label_rect.unwrap();
        let probe = egui::pos2(100.0, patch.max.y - 0.5);
        assert!(probe.y > 8.0);
        assert!(e.contains(probe, 16.0));
    }

    #[test]
    fn incident_list_ignores_duplicate_attach() {
        let mut n = Node::new(NodeId(1), egui::pos2(0.0, 0.0), "A".to_string());
        n.attach_edge(EdgeId(5));
        n.attach_edge(EdgeId(5));
        n.attach_edge(EdgeId(6));
        assert_eq!(n.incident_edges(), &[EdgeId(5), EdgeId(6)]);
        n.detach_edge(EdgeId(5));
        assert_eq!(n.incident_edges(), &[EdgeId(6)]);
    }

    #[test]
    fn tiers_order_from_default_to_topmost() {
        assert!(Tier::Default < Tier::Highlighted);
        assert!(Tier::Highlighted < Tier::Topmost);
        assert_eq!(Tier::default(), Tier::Default);
    }
}
