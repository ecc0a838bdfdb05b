//! The interaction controller: edge-creation state machine, selection and
//! tiers, pointer gestures, viewport and user commands.
//!
//! All handlers run to completion on the caller's thread. The controller
//! exclusively owns the `GraphStore`; renderers read it through `store()`.

use crate::error::EditError;
use crate::model::{EdgeId, Item, NodeId};
use crate::notify::Notifier;
use crate::settings::EditorSettings;
use crate::store::GraphStore;
use crate::view::ViewportTransform;
use eframe::egui;

mod actions;
mod menu;
mod pointer;
mod selection;

pub use menu::{ContextAction, ContextMenu, ContextTarget};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mode {
    Idle,
    CreatingEdge {
        source: NodeId,
        directed: bool,
        /// Free end of the rubber-band line, in diagram space.
        preview_end: egui::Pos2,
    },
}

/// The gesture owning the pointer between press and release.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Gesture {
    None,
    Dragging { last_world: egui::Pos2 },
    Panning { last_screen: egui::Pos2 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Add to / toggle the selection instead of replacing it.
    pub additive: bool,
    /// Turn a primary press into a pan.
    pub pan: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Delete,
}

pub struct InteractionController<N: Notifier> {
    store: GraphStore,
    settings: EditorSettings,
    view: ViewportTransform,
    mode: Mode,
    gesture: Gesture,
    /// Selected items, most recently selected last.
    selection: Vec<Item>,
    /// Items whose tier was raised by the last `apply_tiers`.
    raised: Vec<Item>,
    notifier: N,
}

impl<N: Notifier> InteractionController<N> {
    pub fn new(settings: EditorSettings, notifier: N) -> Self {
        Self {
            store: GraphStore::new(settings.shape_metrics()),
            settings,
            view: ViewportTransform::default(),
            mode: Mode::Idle,
            gesture: Gesture::None,
            selection: Vec::new(),
            raised: Vec::new(),
            notifier,
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: EditorSettings) {
        self.store.set_metrics(settings.shape_metrics());
        self.settings = settings;
    }

    pub fn viewport(&self) -> &ViewportTransform {
        &self.view
    }

    pub fn set_viewport_size(&mut self, size: egui::Vec2) {
        self.view.set_size(size);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_creating_edge(&self) -> bool {
        matches!(self.mode, Mode::CreatingEdge { .. })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    /// Rubber-band line from the edge source to the pointer, in diagram
    /// space, while an edge is being created.
    pub fn preview_line(&self) -> Option<(egui::Pos2, egui::Pos2)> {
        let Mode::CreatingEdge {
            source,
            preview_end,
            ..
        } = self.mode
        else {
            return None;
        };
        self.store
            .node(source)
            .map(|node| (node.position(), preview_end))
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    fn notify(&mut self, message: impl AsRef<str>) {
        self.notifier.notify(message.as_ref());
    }

    /// Logs and surfaces a refused edit, handing the error back.
    fn reject<T>(&mut self, err: EditError) -> Result<T, EditError> {
        tracing::warn!(%err, "edit rejected");
        self.notify(err.to_string());
        Err(err)
    }

    fn node_tolerance(&self) -> f32 {
        self.settings.pick_tolerance / self.view.zoom()
    }

    /// Nodes win over edges: they paint above them.
    pub fn item_at(&self, world: egui::Pos2) -> Option<Item> {
        if let Some(node) = self.store.node_at(world, self.node_tolerance()) {
            return Some(Item::Node(node));
        }
        self.store
            .edge_at(world, self.settings.edge_hit_width)
            .map(Item::Edge)
    }

    pub fn node_at(&self, world: egui::Pos2) -> Option<NodeId> {
        self.store.node_at(world, self.node_tolerance())
    }

    pub fn edge_at(&self, world: egui::Pos2) -> Option<EdgeId> {
        self.store.edge_at(world, self.settings.edge_hit_width)
    }
}
