use eframe::egui;
use netsim::{Key, Modifiers};

use super::render::draw_background;
use super::DiagramApp;

impl eframe::App for DiagramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.label_dialog.is_none() && !ctx.wants_keyboard_input() {
            let (escape, delete) = ctx.input(|i| {
                (
                    i.key_pressed(egui::Key::Escape),
                    i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                )
            });
            if escape {
                self.editor.on_key(Key::Escape);
            }
            if delete {
                self.editor.on_key(Key::Delete);
            }
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New network").clicked() {
                        self.editor.new_diagram();
                        ui.close();
                    }
                });
                ui.menu_button("Edit", |ui| {
                    if ui.button("Add node...").clicked() {
                        self.open_add_node_dialog();
                        ui.close();
                    }
                    if ui.button("Delete selected (Del)").clicked() {
                        let _ = self.editor.delete_selected();
                        ui.close();
                    }
                    ui.add_enabled_ui(self.editor.is_creating_edge(), |ui| {
                        if ui.button("Cancel edge (Esc)").clicked() {
                            self.editor.cancel_edge_creation();
                            ui.close();
                        }
                    });
                });
                ui.menu_button("View", |ui| {
                    if ui.button("Zoom in").clicked() {
                        self.editor.zoom_in();
                        ui.close();
                    }
                    if ui.button("Zoom out").clicked() {
                        self.editor.zoom_out();
                        ui.close();
                    }
                    if ui.button("Reset view").clicked() {
                        self.editor.reset_view();
                        ui.close();
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status_text());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let store = self.editor.store();
                    ui.label(format!("Zoom: {:.0}%", self.editor.viewport().zoom() * 100.0));
                    ui.separator();
                    ui.label(format!("Nodes: {}  Edges: {}", store.node_count(), store.edge_count()));
                    ui.separator();
                    ui.label(format!("Selected: {}", self.editor.selection().len()));
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (rect, response) =
                ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
            let origin = rect.min;
            self.editor.set_viewport_size(rect.size());
            if self.fit_pending && rect.width() > 0.0 {
                self.editor.reset_view();
                self.fit_pending = false;
            }

            if self.label_dialog.is_none() {
                self.handle_canvas_input(ctx, &response, rect);
            }

            let mut chosen = None;
            response.context_menu(|ui| {
                let Some(menu) = &self.context_menu else {
                    ui.close();
                    return;
                };
                for action in &menu.actions {
                    if ui.button(action.title()).clicked() {
                        chosen = Some(*action);
                        ui.close();
                    }
                }
            });
            if let Some(action) = chosen {
                self.context_menu = None;
                self.start_context_action(action);
            }

            let painter = ui.painter_at(rect);
            draw_background(&painter, rect, self.editor.viewport());
            self.draw_diagram(&painter, origin);

            let hovering_item = ctx
                .input(|i| i.pointer.hover_pos())
                .filter(|p| rect.contains(*p))
                .map(|p| self.editor.viewport().screen_to_diagram((p - origin).to_pos2()))
                .and_then(|world| self.editor.item_at(world));
            if self.editor.is_panning() {
                ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
            } else if self.editor.is_creating_edge() {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            } else if hovering_item.is_some() {
                ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
            }
        });

        self.show_label_dialog(ctx);
    }
}

impl DiagramApp {
    /// Translates raw egui pointer state into engine events. Positions are
    /// handed over relative to the canvas' top-left corner.
    fn handle_canvas_input(&mut self, ctx: &egui::Context, response: &egui::Response, rect: egui::Rect) {
        let origin = rect.min;
        let local = |p: egui::Pos2| (p - origin).to_pos2();
        let (hover, primary_pressed, primary_released, middle_pressed, middle_released, mods, scroll) =
            ctx.input(|i| {
                (
                    i.pointer.hover_pos(),
                    i.pointer.primary_pressed(),
                    i.pointer.primary_released(),
                    i.pointer.button_pressed(egui::PointerButton::Middle),
                    i.pointer.button_released(egui::PointerButton::Middle),
                    i.modifiers,
                    i.raw_scroll_delta.y,
                )
            });
        let inside = hover.filter(|p| rect.contains(*p) && response.hovered());

        if let Some(p) = inside {
            if primary_pressed {
                let modifiers = Modifiers {
                    additive: mods.shift,
                    pan: mods.command,
                };
                self.editor.on_primary_press(local(p), modifiers);
            }
            if middle_pressed {
                self.editor.on_pan_press(local(p));
            }
            if scroll.abs() > 0.0 {
                self.editor.on_wheel(scroll, local(p));
            }
            if response.secondary_clicked() {
                self.context_menu = Some(self.editor.on_secondary_action(local(p)));
            }
        }
        if let Some(p) = hover {
            self.editor.on_pointer_move(local(p));
        }
        if primary_released {
            self.editor.on_primary_release();
        }
        if middle_released {
            self.editor.on_pan_release();
        }
    }

    fn show_label_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.label_dialog.as_mut() else {
            return;
        };
        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new(dialog.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                let edit = ui.text_edit_singleline(&mut dialog.text);
                edit.request_focus();
                if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    confirmed = true;
                }
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    cancelled = true;
                }
            });
        if confirmed {
            if let Some(dialog) = self.label_dialog.take() {
                self.confirm_label(dialog);
            }
        } else if cancelled {
            self.label_dialog = None;
            tracing::debug!("label dialog cancelled");
        }
    }
}
