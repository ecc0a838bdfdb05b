//! The authoritative node/edge collection.
//!
//! `GraphStore` is the only place nodes and edges are created or destroyed.
//! Handles are allocated from one increasing counter and never reused, so a
//! handle to a removed item stays stale forever. Every mutation that changes
//! a node position or the topology recomputes the geometry of the affected
//! edges before it returns.

use crate::error::EditError;
use crate::geometry;
use crate::model::{Edge, EdgeId, Item, Node, NodeId, ShapeMetrics, Tier};
use eframe::egui;
use std::collections::HashSet;

#[derive(Clone, Debug)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    next_id: u64,
    metrics: ShapeMetrics,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(ShapeMetrics::default())
    }
}

impl GraphStore {
    pub fn new(metrics: ShapeMetrics) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            next_id: 1,
            metrics,
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn metrics(&self) -> &ShapeMetrics {
        &self.metrics
    }

    pub fn set_metrics(&mut self, metrics: ShapeMetrics) {
        self.metrics = metrics;
        self.refresh_edges(|_| true);
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    fn node_index(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id() == id)
    }

    fn edge_index(&self, id: EdgeId) -> Option<usize> {
        self.edges.iter().position(|e| e.id() == id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, item: Item) -> bool {
        match item {
            Item::Node(id) => self.node_index(id).is_some(),
            Item::Edge(id) => self.edge_index(id).is_some(),
        }
    }

    pub fn add_node(&mut self, position: egui::Pos2, label: impl Into<String>) -> NodeId {
        let id = NodeId(self.allocate_id());
        let node = Node::new(id, position, label.into());
        tracing::debug!(node = %id, label = node.label(), "added node");
        self.nodes.push(node);
        id
    }

    pub fn add_edge(
        &mut self,
        source: NodeId,
        destination: NodeId,
        directed: bool,
        label: impl Into<String>,
    ) -> Result<EdgeId, EditError> {
        if source == destination {
            return Err(EditError::RejectedSelfLoop);
        }
        let src_idx = self.node_index(source).ok_or(EditError::StaleNode(source))?;
        let dst_idx = self
            .node_index(destination)
            .ok_or(EditError::StaleNode(destination))?;

        let id = EdgeId(self.allocate_id());
        let mut edge = Edge::new(id, source, destination, directed, label.into());
        edge.update_geometry(
            self.nodes[src_idx].position(),
            self.nodes[dst_idx].position(),
            &self.metrics,
        );
        self.nodes[src_idx].attach_edge(id);
        self.nodes[dst_idx].attach_edge(id);
        tracing::debug!(edge = %id, %source, %destination, directed, "added edge");
        self.edges.push(edge);
        Ok(id)
    }

    /// Removes the node and every edge touching it. Edges go first, in store
    /// order, so no edge ever references a missing node. Returns the removed
    /// edge handles.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Vec<EdgeId>, EditError> {
        if self.node_index(id).is_none() {
            return Err(EditError::StaleNode(id));
        }
        let doomed: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|e| e.touches(id))
            .map(|e| e.id())
            .collect();
        for edge_id in &doomed {
            self.remove_edge(*edge_id)?;
        }
        self.nodes.retain(|n| n.id() != id);
        tracing::debug!(node = %id, edges = doomed.len(), "removed node");
        Ok(doomed)
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, EditError> {
        let idx = self.edge_index(id).ok_or(EditError::StaleEdge(id))?;
        let edge = self.edges.remove(idx);
        for node in &mut self.nodes {
            if edge.touches(node.id()) {
                node.detach_edge(id);
            }
        }
        tracing::debug!(edge = %id, "removed edge");
        Ok(edge)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    pub fn relabel_node(&mut self, id: NodeId, label: impl Into<String>) -> Result<(), EditError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(EditError::InvalidLabel);
        }
        let idx = self.node_index(id).ok_or(EditError::StaleNode(id))?;
        self.nodes[idx].set_label(label);
        Ok(())
    }

    /// Edge labels may be empty; the label patch disappears with them.
    pub fn relabel_edge(&mut self, id: EdgeId, label: impl Into<String>) -> Result<(), EditError> {
        let idx = self.edge_index(id).ok_or(EditError::StaleEdge(id))?;
        self.edges[idx].set_label(label.into());
        self.refresh_edges(|e| e.id() == id);
        Ok(())
    }

    pub fn move_node(&mut self, id: NodeId, position: egui::Pos2) -> Result<(), EditError> {
        let idx = self.node_index(id).ok_or(EditError::StaleNode(id))?;
        self.nodes[idx].set_position(position);
        self.refresh_edges(|e| e.touches(id));
        Ok(())
    }

    /// Moves each distinct live node in `ids` by `delta` exactly once, then
    /// refreshes every edge touching a moved node. Returns how many nodes
    /// moved.
    pub fn translate_nodes(&mut self, ids: &[NodeId], delta: egui::Vec2) -> usize {
        let mut moved = HashSet::new();
        for id in ids {
            if moved.contains(id) {
                continue;
            }
            if let Some(idx) = self.node_index(*id) {
                let node = &mut self.nodes[idx];
                node.set_position(node.position() + delta);
                moved.insert(*id);
            }
        }
        if !moved.is_empty() {
            self.refresh_edges(|e| moved.contains(&e.source()) || moved.contains(&e.destination()));
        }
        moved.len()
    }

    pub(crate) fn set_tier(&mut self, item: Item, tier: Tier) {
        match item {
            Item::Node(id) => {
                if let Some(node) = self.nodes.iter_mut().find(|n| n.id() == id) {
                    node.set_tier(tier);
                }
            }
            Item::Edge(id) => {
                if let Some(edge) = self.edges.iter_mut().find(|e| e.id() == id) {
                    edge.set_tier(tier);
                }
            }
        }
    }

    pub fn tier_of(&self, item: Item) -> Option<Tier> {
        match item {
            Item::Node(id) => self.node(id).map(Node::tier),
            Item::Edge(id) => self.edge(id).map(Edge::tier),
        }
    }

    /// Topmost node whose disc contains `p` within `tolerance`. Higher tiers
    /// win; within a tier the most recently added node wins.
    pub fn node_at(&self, p: egui::Pos2, tolerance: f32) -> Option<NodeId> {
        let radius = self.metrics.node_radius;
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.contains(p, radius, tolerance))
            .max_by_key(|(idx, n)| (n.tier(), *idx))
            .map(|(_, n)| n.id())
    }

    /// Topmost edge whose stroke (thickened to `hit_width`) or label patch
    /// contains `p`.
    pub fn edge_at(&self, p: egui::Pos2, hit_width: f32) -> Option<EdgeId> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.contains(p, hit_width))
            .max_by_key(|(idx, e)| (e.tier(), *idx))
            .map(|(_, e)| e.id())
    }

    /// Bounding box of every node disc and edge (label patches included).
    pub fn bounds(&self) -> Option<egui::Rect> {
        let radius = self.metrics.node_radius;
        geometry::union_bounds(
            self.nodes
                .iter()
                .map(|n| n.bounds(radius))
                .chain(self.edges.iter().map(Edge::bounds)),
        )
    }

    fn refresh_edges(&mut self, mut affected: impl FnMut(&Edge) -> bool) {
        let nodes = &self.nodes;
        let metrics = &self.metrics;
        for edge in self.edges.iter_mut().filter(|e| affected(e)) {
            let src = nodes.iter().find(|n| n.id() == edge.source());
            let dst = nodes.iter().find(|n| n.id() == edge.destination());
            match (src, dst) {
                (Some(src), Some(dst)) => {
                    edge.update_geometry(src.position(), dst.position(), metrics)
                }
                _ => tracing::warn!(edge = %edge.id(), "edge references a missing node"),
            }
        }
    }

    /// Checks the incident-list invariant in both directions.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        for edge in &self.edges {
            for end in [edge.source(), edge.destination()] {
                let node = self.node(end).expect("edge endpoint must be live");
                assert!(node.incident_edges().contains(&edge.id()));
            }
            assert_ne!(edge.source(), edge.destination());
        }
        for node in &self.nodes {
            let expected: Vec<EdgeId> = self
                .edges
                .iter()
                .filter(|e| e.touches(node.id()))
                .map(|e| e.id())
                .collect();
            let mut actual = node.incident_edges().to_vec();
            actual.sort();
            let mut expected_sorted = expected.clone();
            expected_sorted.sort();
            assert_eq!(actual, expected_sorted, "incident list of {}", node.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_nodes() -> (GraphStore, NodeId, NodeId) {
        let mut store = GraphStore::default();
        let a = store.add_node(egui::pos2(-200.0, -100.0), "A");
        let b = store.add_node(egui::pos2(0.0, -100.0), "B");
        (store, a, b)
    }

    #[test]
    fn add_edge_registers_on_both_endpoints() {
        let (mut store, a, b) = two_nodes();
        let e = store.add_edge(a, b, false, "1").unwrap();
        assert_eq!(store.node(a).unwrap().incident_edges(), &[e]);
        assert_eq!(store.node(b).unwrap().incident_edges(), &[e]);
        assert_eq!(store.edge(e).unwrap().geometry().start, egui::pos2(-200.0, -100.0));
        store.assert_consistent();
    }

    #[test]
    fn self_loop_is_rejected_without_mutation() {
        let (mut store, a, _) = two_nodes();
        assert_eq!(store.add_edge(a, a, false, "x"), Err(EditError::RejectedSelfLoop));
        assert_eq!(store.edge_count(), 0);
        assert!(store.node(a).unwrap().incident_edges().is_empty());
    }

    #[test]
    fn stale_endpoint_is_rejected() {
        let (mut store, a, b) = two_nodes();
        store.remove_node(b).unwrap();
        assert_eq!(store.add_edge(a, b, true, "x"), Err(EditError::StaleNode(b)));
        assert_eq!(store.edge_count(), 0);
        assert!(store.node(a).unwrap().incident_edges().is_empty());
    }

    #[test]
    fn removing_a_node_drops_its_edges_first() {
        let (mut store, a, b) = two_nodes();
        store.add_edge(a, b, false, "1").unwrap();
        let removed = store.remove_node(a).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(store.edge_count(), 0);
        assert!(store.node(b).unwrap().incident_edges().is_empty());
        store.assert_consistent();
    }

    #[test]
    fn stale_handles_report_not_found() {
        let (mut store, a, b) = two_nodes();
        let e = store.add_edge(a, b, false, "1").unwrap();
        store.remove_edge(e).unwrap();
        assert!(matches!(store.remove_edge(e), Err(EditError::StaleEdge(id)) if id == e));
        store.remove_node(a).unwrap();
        assert_eq!(store.remove_node(a), Err(EditError::StaleNode(a)));
        assert_eq!(store.relabel_edge(e, "x"), Err(EditError::StaleEdge(e)));
    }

    #[test]
    fn handles_are_never_reused() {
        let (mut store, a, _) = two_nodes();
        store.remove_node(a).unwrap();
        let c = store.add_node(egui::pos2(0.0, 0.0), "C");
        assert_ne!(c, a);
        assert!(store.node(a).is_none());
    }

    #[test]
    fn moving_a_node_refreshes_incident_geometry() {
        let (mut store, a, b) = two_nodes();
        let e = store.add_edge(a, b, false, "1").unwrap();
        store.move_node(b, egui::pos2(50.0, 50.0)).unwrap();
        let g = store.edge(e).unwrap().geometry();
        assert_eq!(g.end, egui::pos2(50.0, 50.0));
        assert_eq!(g.midpoint(), egui::pos2(-75.0, -25.0));
        let center = g.label_rect.unwrap().center();
        assert!((center - egui::pos2(-75.0, -25.0)).length() < 1e-3);
    }

    #[test]
    fn translate_moves_duplicates_once() {
        let (mut store, a, b) = two_nodes();
        let moved = store.translate_nodes(&[a, a, b, a], egui::vec2(10.0, 5.0));
        assert_eq!(moved, 2);
        assert_eq!(store.node(a).unwrap().position(), egui::pos2(-190.0, -95.0));
        assert_eq!(store.node(b).unwrap().position(), egui::pos2(10.0, -95.0));
    }

    #[test]
    fn empty_node_label_is_invalid() {
        let (mut store, a, _) = two_nodes();
        assert_eq!(store.relabel_node(a, "  "), Err(EditError::InvalidLabel));
        assert_eq!(store.node(a).unwrap().label(), "A");
        store.relabel_node(a, "Alpha").unwrap();
        assert_eq!(store.node(a).unwrap().label(), "Alpha");
    }

    #[test]
    fn node_hit_prefers_tier_then_recency() {
        let mut store = GraphStore::default();
        let a = store.add_node(egui::pos2(0.0, 0.0), "A");
        let b = store.add_node(egui::pos2(20.0, 0.0), "B");
        let p = egui::pos2(10.0, 0.0);
        assert_eq!(store.node_at(p, 0.0), Some(b));
        store.set_tier(Item::Node(a), Tier::Highlighted);
        assert_eq!(store.node_at(p, 0.0), Some(a));
        assert_eq!(store.node_at(egui::pos2(200.0, 0.0), 10.0), None);
    }

    #[test]
    fn node_hit_uses_tolerance() {
        let mut store = GraphStore::default();
        let a = store.add_node(egui::pos2(0.0, 0.0), "A");
        assert_eq!(store.node_at(egui::pos2(33.0, 0.0), 10.0), Some(a));
        assert_eq!(store.node_at(egui::pos2(33.0, 0.0), 5.0), None);
    }

    #[test]
    fn edge_hit_covers_stroke_and_label() {
        let (mut store, a, b) = two_nodes();
        let e = store.add_edge(a, b, false, "weight").unwrap();
        assert_eq!(store.edge_at(egui::pos2(-150.0, -94.0), 16.0), Some(e));
        assert_eq!(store.edge_at(egui::pos2(-150.0, -80.0), 16.0), None);
        let patch = store.edge(e).unwrap().geometry().label_rect.unwrap();
        assert_eq!(store.edge_at(egui::pos2(-100.0, patch.max.y - 0.1), 2.0), Some(e));
    }

    #[test]
    fn bounds_cover_discs_and_labels() {
        let (mut store, a, b) = two_nodes();
        store.add_edge(a, b, false, "1").unwrap();
        let bounds = store.bounds().unwrap();
        assert_eq!(bounds.min, egui::pos2(-225.0, -125.0));
        assert_eq!(bounds.max, egui::pos2(25.0, -75.0));
        assert!(GraphStore::default().bounds().is_none());
    }

    #[derive(Clone, Debug)]
    enum Op {
        AddNode(i16, i16),
        AddEdge(usize, usize),
        RemoveNode(usize),
        RemoveEdge(usize),
        Move(usize, i16, i16),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<i16>(), any::<i16>()).prop_map(|(x, y)| Op::AddNode(x, y)),
            (0usize..16, 0usize..16).prop_map(|(a, b)| Op::AddEdge(a, b)),
            (0usize..16).prop_map(Op::RemoveNode),
            (0usize..16).prop_map(Op::RemoveEdge),
            (0usize..16, any::<i16>(), any::<i16>()).prop_map(|(i, x, y)| Op::Move(i, x, y)),
        ]
    }

    proptest! {
        /// Incident lists and edge endpoints stay in sync under any sequence
        /// of edits, and removed nodes are never referenced afterwards.
        #[test]
        fn prop_referential_integrity(ops in proptest::collection::vec(op_strategy(), 1..60)) {
            let mut store = GraphStore::default();
            let mut removed: Vec<NodeId> = Vec::new();
            for op in ops {
                let ids: Vec<NodeId> = store.nodes().iter().map(Node::id).collect();
                let edges: Vec<EdgeId> = store.edges().iter().map(Edge::id).collect();
                match op {
                    Op::AddNode(x, y) => {
                        store.add_node(egui::pos2(x as f32, y as f32), "n");
                    }
                    Op::AddEdge(a, b) if !ids.is_empty() => {
                        let (a, b) = (ids[a % ids.len()], ids[b % ids.len()]);
                        let before = store.edge_count();
                        let result = store.add_edge(a, b, false, "w");
                        if a == b {
                            prop_assert_eq!(result, Err(EditError::RejectedSelfLoop));
                            prop_assert_eq!(store.edge_count(), before);
                        }
                    }
                    Op::RemoveNode(i) if !ids.is_empty() => {
                        let id = ids[i % ids.len()];
                        store.remove_node(id).unwrap();
                        removed.push(id);
                    }
                    Op::RemoveEdge(i) if !edges.is_empty() => {
                        store.remove_edge(edges[i % edges.len()]).unwrap();
                    }
                    Op::Move(i, x, y) if !ids.is_empty() => {
                        let id = ids[i % ids.len()];
                        let to = egui::pos2(x as f32, y as f32);
                        store.move_node(id, to).unwrap();
                        for edge in store.edges().iter().filter(|e| e.touches(id)) {
                            let g = edge.geometry();
                            let end = if edge.source() == id { g.start } else { g.end };
                            prop_assert_eq!(end, to);
                        }
                    }
                    _ => {}
                }
                store.assert_consistent();
                for gone in &removed {
                    prop_assert!(store.edges().iter().all(|e| !e.touches(*gone)));
                }
            }
        }
    }
}
