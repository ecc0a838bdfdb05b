use super::{Gesture, InteractionController, Mode};
use crate::error::EditError;
use crate::model::{EdgeId, Item, NodeId};
use crate::notify::{LabelPrompt, Notifier};
use eframe::egui;

/// The demo network a fresh diagram starts with.
const SAMPLE_NODES: [(&str, f32, f32); 5] = [
    ("A", -200.0, -100.0),
    ("B", 0.0, -100.0),
    ("C", 200.0, -100.0),
    ("D", -100.0, 100.0),
    ("E", 100.0, 100.0),
];

/// (source, destination, weight) as indices into `SAMPLE_NODES`.
const SAMPLE_EDGES: [(usize, usize, &str); 6] = [
    (0, 1, "-5"),
    (1, 2, "2"),
    (1, 3, "3"),
    (0, 3, "45"),
    (3, 4, "-47"),
    (3, 2, "39"),
];

impl<N: Notifier> InteractionController<N> {
    /// Enters edge-creation mode from `source`; the next press on another
    /// node completes the edge.
    pub fn begin_edge(&mut self, source: NodeId, directed: bool) -> Result<(), EditError> {
        let Some(node) = self.store.node(source) else {
            return self.reject(EditError::StaleNode(source));
        };
        self.mode = Mode::CreatingEdge {
            source,
            directed,
            preview_end: node.position(),
        };
        self.gesture = Gesture::None;
        tracing::debug!(%source, directed, "edge creation started");
        self.notify("Click on destination node for the edge...");
        Ok(())
    }

    pub fn cancel_edge_creation(&mut self) {
        if !self.is_creating_edge() {
            return;
        }
        self.mode = Mode::Idle;
        tracing::debug!("edge creation cancelled");
        self.notify("Edge creation cancelled.");
    }

    /// A pending edge must never start from a node that is gone.
    fn forget_edge_source(&mut self, node: NodeId) {
        if matches!(self.mode, Mode::CreatingEdge { source, .. } if source == node) {
            self.cancel_edge_creation();
        }
    }

    pub fn add_node_at(&mut self, position: egui::Pos2, label: &str) -> NodeId {
        let id = self.store.add_node(position, label);
        self.notify(format!("Added node: {label}"));
        id
    }

    /// Asks for a label (default `Node{n}`) and places the node at the
    /// viewport center. `Ok(None)` when the prompt is cancelled.
    pub fn add_node_prompted(
        &mut self,
        prompt: &mut dyn LabelPrompt,
    ) -> Result<Option<NodeId>, EditError> {
        let center = self.view.screen_to_diagram(self.view.screen_center());
        self.add_node_prompted_at(center, prompt)
    }

    pub fn add_node_prompted_at(
        &mut self,
        position: egui::Pos2,
        prompt: &mut dyn LabelPrompt,
    ) -> Result<Option<NodeId>, EditError> {
        let default = self.default_node_label();
        let Some(label) = prompt.request_label("Add Node", &default) else {
            return Ok(None);
        };
        if label.trim().is_empty() {
            return self.reject(EditError::InvalidLabel);
        }
        Ok(Some(self.add_node_at(position, &label)))
    }

    pub fn default_node_label(&self) -> String {
        format!("Node{}", self.store.node_count() + 1)
    }

    pub fn connect(
        &mut self,
        source: NodeId,
        destination: NodeId,
        directed: bool,
        label: &str,
    ) -> Result<EdgeId, EditError> {
        match self.store.add_edge(source, destination, directed, label) {
            Ok(edge) => {
                self.notify("Edge created successfully.");
                Ok(edge)
            }
            Err(err) => self.reject(err),
        }
    }

    /// Prompts with the current label. `Ok(false)` when cancelled.
    pub fn edit_node_label(
        &mut self,
        id: NodeId,
        prompt: &mut dyn LabelPrompt,
    ) -> Result<bool, EditError> {
        let Some(current) = self.store.node(id).map(|n| n.label().to_string()) else {
            return self.reject(EditError::StaleNode(id));
        };
        match prompt.request_label("Edit Node Label", &current) {
            Some(label) => self.relabel_node(id, &label).map(|()| true),
            None => Ok(false),
        }
    }

    pub fn relabel_node(&mut self, id: NodeId, label: &str) -> Result<(), EditError> {
        match self.store.relabel_node(id, label) {
            Ok(()) => Ok(()),
            Err(err) => self.reject(err),
        }
    }

    pub fn edit_edge_label(
        &mut self,
        id: EdgeId,
        prompt: &mut dyn LabelPrompt,
    ) -> Result<bool, EditError> {
        let Some(current) = self.store.edge(id).map(|e| e.label().to_string()) else {
            return self.reject(EditError::StaleEdge(id));
        };
        match prompt.request_label("Edit Edge Label", &current) {
            Some(label) => self.relabel_edge(id, &label).map(|()| true),
            None => Ok(false),
        }
    }

    pub fn relabel_edge(&mut self, id: EdgeId, label: &str) -> Result<(), EditError> {
        match self.store.relabel_edge(id, label) {
            Ok(()) => Ok(()),
            Err(err) => self.reject(err),
        }
    }

    /// Removes the node with its edges. Returns the removed edge handles.
    pub fn delete_node(&mut self, id: NodeId) -> Result<Vec<EdgeId>, EditError> {
        let removed = match self.store.remove_node(id) {
            Ok(removed) => removed,
            Err(err) => return self.reject(err),
        };
        self.forget_edge_source(id);
        self.after_removal();
        self.notify(format!("Deleted {} item(s)", removed.len() + 1));
        Ok(removed)
    }

    pub fn delete_edge(&mut self, id: EdgeId) -> Result<(), EditError> {
        if let Err(err) = self.store.remove_edge(id) {
            return self.reject(err);
        }
        self.after_removal();
        self.notify("Deleted 1 item(s)");
        Ok(())
    }

    /// Deletes every selected item, edges before nodes. Returns how many
    /// selected items went away.
    pub fn delete_selected(&mut self) -> Result<usize, EditError> {
        if self.selection.is_empty() {
            return self.reject(EditError::EmptySelection);
        }
        let selected = std::mem::take(&mut self.selection);
        let (edges, nodes): (Vec<Item>, Vec<Item>) = selected
            .iter()
            .partition(|item| matches!(item, Item::Edge(_)));

        let mut deleted = 0;
        for item in edges.into_iter().chain(nodes) {
            let removed = match item {
                Item::Edge(id) => self.store.remove_edge(id).is_ok(),
                Item::Node(id) => {
                    self.forget_edge_source(id);
                    self.store.remove_node(id).is_ok()
                }
            };
            if removed {
                deleted += 1;
            }
        }
        self.gesture = Gesture::None;
        self.after_removal();
        tracing::debug!(deleted, "deleted selection");
        self.notify(format!("Deleted {deleted} item(s)"));
        Ok(deleted)
    }

    fn after_removal(&mut self) {
        self.prune_selection();
        self.apply_tiers();
    }

    /// Empties the diagram and resets all transient state. Seeds the sample
    /// network when `seed_sample_network` is set.
    pub fn new_diagram(&mut self) {
        self.mode = Mode::Idle;
        self.gesture = Gesture::None;
        self.selection.clear();
        self.raised.clear();
        self.store.clear();
        if self.settings.seed_sample_network {
            if let Err(err) = self.seed_sample_network() {
                tracing::warn!(%err, "could not seed sample network");
            }
        }
        self.reset_view();
        self.notify("New network created.");
    }

    /// Adds the five-node weighted sample network.
    pub fn seed_sample_network(&mut self) -> Result<(), EditError> {
        let ids: Vec<NodeId> = SAMPLE_NODES
            .iter()
            .map(|(label, x, y)| self.store.add_node(egui::pos2(*x, *y), *label))
            .collect();
        for (source, destination, weight) in SAMPLE_EDGES {
            self.store
                .add_edge(ids[source], ids[destination], false, weight)?;
        }
        tracing::debug!(
            nodes = self.store.node_count(),
            edges = self.store.edge_count(),
            "seeded sample network"
        );
        Ok(())
    }

    pub fn zoom_in(&mut self) {
        let center = self.view.screen_center();
        self.zoom_at(center, self.settings.button_zoom_factor);
        self.notify("Zoomed in");
    }

    pub fn zoom_out(&mut self) {
        let center = self.view.screen_center();
        self.zoom_at(center, 1.0 / self.settings.button_zoom_factor);
        self.notify("Zoomed out");
    }

    /// Fits everything (plus padding) into the viewport; an empty diagram
    /// centers the origin at unit zoom.
    pub fn reset_view(&mut self) {
        self.view.fit(
            self.store.bounds(),
            self.settings.reset_padding,
            self.settings.min_zoom,
            self.settings.max_zoom,
        );
        self.notify("View reset");
    }
}
