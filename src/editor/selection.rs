use super::InteractionController;
use crate::model::{Item, NodeId, Tier};
use crate::notify::Notifier;

impl<N: Notifier> InteractionController<N> {
    pub fn selection(&self) -> &[Item] {
        &self.selection
    }

    pub fn is_selected(&self, item: Item) -> bool {
        self.selection.contains(&item)
    }

    /// Most recently selected item.
    pub fn last_selected(&self) -> Option<Item> {
        self.selection.last().copied()
    }

    /// Adds `item` to the selection (or moves it to the most-recent slot).
    /// An edge drags both endpoints in ahead of itself. Stale handles are
    /// ignored.
    pub fn select(&mut self, item: Item) {
        if !self.push_selected(item) {
            return;
        }
        self.apply_tiers();
    }

    pub fn select_only(&mut self, item: Item) {
        if !self.store.contains(item) {
            return;
        }
        self.selection.clear();
        self.push_selected(item);
        self.apply_tiers();
    }

    pub fn toggle_selection(&mut self, item: Item) {
        if self.is_selected(item) {
            self.deselect(item);
        } else {
            self.select(item);
        }
    }

    /// Removes `item`. Dropping a node also drops the selected edges touching
    /// it, so no selected edge is left without its endpoints.
    pub fn deselect(&mut self, item: Item) {
        let before = self.selection.len();
        self.selection.retain(|i| *i != item);
        if let Item::Node(node) = item {
            let store = &self.store;
            self.selection.retain(|i| match i {
                Item::Edge(e) => !store.edge(*e).is_some_and(|edge| edge.touches(node)),
                Item::Node(_) => true,
            });
        }
        if self.selection.len() != before {
            self.apply_tiers();
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() && self.raised.is_empty() {
            return;
        }
        self.selection.clear();
        self.apply_tiers();
    }

    fn push_selected(&mut self, item: Item) -> bool {
        let endpoints = match item {
            Item::Node(id) => {
                if self.store.node(id).is_none() {
                    return false;
                }
                None
            }
            Item::Edge(id) => match self.store.edge(id) {
                Some(edge) => Some(edge.endpoints()),
                None => return false,
            },
        };
        if let Some((source, destination)) = endpoints {
            self.raise_in_selection(Item::Node(source));
            self.raise_in_selection(Item::Node(destination));
        }
        self.raise_in_selection(item);
        true
    }

    fn raise_in_selection(&mut self, item: Item) {
        self.selection.retain(|i| *i != item);
        self.selection.push(item);
    }

    /// Drops handles the store no longer knows.
    pub(super) fn prune_selection(&mut self) {
        let store = &self.store;
        self.selection.retain(|item| store.contains(*item));
        self.raised.retain(|item| store.contains(*item));
    }

    /// Demotes everything raised last time, then promotes the current
    /// selection: `Highlighted` for all, `Topmost` for the most recent.
    pub(super) fn apply_tiers(&mut self) {
        for item in std::mem::take(&mut self.raised) {
            self.store.set_tier(item, Tier::Default);
        }
        let count = self.selection.len();
        for (idx, item) in self.selection.iter().enumerate() {
            let tier = if idx + 1 == count {
                Tier::Topmost
            } else {
                Tier::Highlighted
            };
            self.store.set_tier(*item, tier);
        }
        self.raised = self.selection.clone();
    }

    /// Status line for the current selection; an empty one reads
    /// `last: None`.
    pub(super) fn report_selection(&mut self) {
        let label = match self.last_selected() {
            Some(Item::Node(id)) => self
                .store
                .node(id)
                .map(|n| n.label().to_string())
                .unwrap_or_default(),
            Some(Item::Edge(_)) => "(edge)".to_string(),
            None => "None".to_string(),
        };
        let message = format!(
            "{} item(s) selected, last: {}",
            self.selection.len(),
            label
        );
        self.notify(message);
    }

    /// Selected nodes plus endpoints of selected edges, each once.
    pub(super) fn nodes_to_move(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = Vec::new();
        let mut push = |id: NodeId| {
            if !nodes.contains(&id) {
                nodes.push(id);
            }
        };
        for item in &self.selection {
            match item {
                Item::Node(id) => push(*id),
                Item::Edge(id) => {
                    if let Some(edge) = self.store.edge(*id) {
                        push(edge.source());
                        push(edge.destination());
                    }
                }
            }
        }
        nodes
    }
}
