//! Graph-editing interaction engine for the netsim diagram editor.
//!
//! `GraphStore` owns the nodes and edges, `InteractionController` turns
//! pointer and keyboard events into edits, and `ViewportTransform` maps
//! between screen and diagram space. The eframe host in `main.rs` only
//! renders and forwards input.

pub mod editor;
pub mod error;
pub mod geometry;
pub mod model;
pub mod notify;
pub mod settings;
pub mod store;
pub mod view;

pub use editor::{
    ContextAction, ContextMenu, ContextTarget, InteractionController, Key, Mode, Modifiers,
};
pub use error::EditError;
pub use model::{Edge, EdgeGeometry, EdgeId, Item, Node, NodeId, ShapeMetrics, Tier};
pub use notify::{LabelPrompt, Notifier, StatusLog};
pub use settings::EditorSettings;
pub use store::GraphStore;
pub use view::ViewportTransform;
