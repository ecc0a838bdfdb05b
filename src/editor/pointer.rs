use super::{Gesture, InteractionController, Key, Mode, Modifiers};
use crate::error::EditError;
use crate::model::NodeId;
use crate::notify::Notifier;
use eframe::egui;

impl<N: Notifier> InteractionController<N> {
    pub fn on_primary_press(&mut self, screen: egui::Pos2, modifiers: Modifiers) {
        if modifiers.pan {
            self.on_pan_press(screen);
            return;
        }
        let world = self.view.screen_to_diagram(screen);

        if let Mode::CreatingEdge {
            source, directed, ..
        } = self.mode
        {
            self.finish_edge_at(world, source, directed);
            return;
        }

        match self.item_at(world) {
            Some(item) => {
                if modifiers.additive {
                    self.toggle_selection(item);
                } else if self.is_selected(item) {
                    self.select(item);
                } else {
                    self.select_only(item);
                }
                self.report_selection();
                // a shift-press that deselected the item must not drag the rest
                self.gesture = if self.is_selected(item) {
                    Gesture::Dragging { last_world: world }
                } else {
                    Gesture::None
                };
            }
            None => {
                if !modifiers.additive {
                    self.clear_selection();
                    self.report_selection();
                }
                self.gesture = Gesture::None;
            }
        }
    }

    /// Completes (or abandons) the pending edge with a press at `world`.
    fn finish_edge_at(&mut self, world: egui::Pos2, source: NodeId, directed: bool) {
        let Some(target) = self.node_at(world) else {
            if self.settings.cancel_edge_on_empty_click {
                self.cancel_edge_creation();
            }
            return;
        };
        self.mode = Mode::Idle;
        if target == source {
            let _ = self.reject::<()>(EditError::RejectedSelfLoop);
            return;
        }
        let label = format!("edge{}", self.store.edge_count() + 1);
        match self.store.add_edge(source, target, directed, label) {
            Ok(edge) => {
                tracing::debug!(%edge, "edge creation finished");
                self.notify("Edge created successfully.");
            }
            Err(err) => {
                let _ = self.reject::<()>(err);
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen: egui::Pos2) {
        let world = self.view.screen_to_diagram(screen);
        match self.gesture {
            Gesture::Panning { last_screen } => {
                self.view.pan_by(screen - last_screen);
                self.gesture = Gesture::Panning {
                    last_screen: screen,
                };
                return;
            }
            Gesture::Dragging { last_world } => {
                let delta = world - last_world;
                if delta != egui::Vec2::ZERO {
                    let nodes = self.nodes_to_move();
                    self.store.translate_nodes(&nodes, delta);
                }
                self.gesture = Gesture::Dragging { last_world: world };
            }
            Gesture::None => {}
        }
        if let Mode::CreatingEdge { preview_end, .. } = &mut self.mode {
            *preview_end = world;
        }
    }

    pub fn on_primary_release(&mut self) {
        if self.is_dragging() {
            tracing::debug!("drag finished");
        }
        self.gesture = Gesture::None;
    }

    /// Middle button (or primary + pan modifier) starts a pan.
    pub fn on_pan_press(&mut self, screen: egui::Pos2) {
        self.gesture = Gesture::Panning {
            last_screen: screen,
        };
    }

    pub fn on_pan_release(&mut self) {
        if self.is_panning() {
            self.gesture = Gesture::None;
        }
    }

    /// Positive `delta` zooms in one wheel step, negative zooms out.
    pub fn on_wheel(&mut self, delta: f32, screen: egui::Pos2) {
        if delta == 0.0 {
            return;
        }
        let step = self.settings.wheel_zoom_factor;
        let factor = if delta > 0.0 { step } else { 1.0 / step };
        self.zoom_at(screen, factor);
    }

    pub fn on_key(&mut self, key: Key) {
        match key {
            Key::Escape => {
                if self.is_creating_edge() {
                    self.cancel_edge_creation();
                }
            }
            Key::Delete => {
                let _ = self.delete_selected();
            }
        }
    }

    pub(super) fn zoom_at(&mut self, screen: egui::Pos2, factor: f32) {
        self.view.zoom_about_screen_point(
            screen,
            factor,
            self.settings.min_zoom,
            self.settings.max_zoom,
        );
        tracing::debug!(zoom = self.view.zoom(), "zoom changed");
    }
}
