use eframe::egui;
use netsim::{ContextAction, ContextMenu, InteractionController, StatusLog, settings};

mod render;
mod update;

/// What a confirmed label dialog feeds its text into.
#[derive(Clone, Copy, Debug)]
enum LabelRequest {
    /// "Add Node" from the menu bar: placed at the viewport center.
    NodeAtCenter,
    /// A context-menu action that needs a label.
    Context(ContextAction),
}

struct LabelDialog {
    title: &'static str,
    text: String,
    request: LabelRequest,
}

pub struct DiagramApp {
    editor: InteractionController<StatusLog>,
    context_menu: Option<ContextMenu>,
    label_dialog: Option<LabelDialog>,
    /// Fit the diagram once the canvas size is known.
    fit_pending: bool,
}

impl DiagramApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = settings::load_or_default();
        let mut editor = InteractionController::new(settings, StatusLog::default());
        editor.new_diagram();
        Self {
            editor,
            context_menu: None,
            label_dialog: None,
            fit_pending: true,
        }
    }

    /// Runs `action` now, or opens the label dialog first when it needs
    /// text from the user.
    fn start_context_action(&mut self, action: ContextAction) {
        let dialog = match action {
            ContextAction::EditNodeLabel(id) => self
                .editor
                .store()
                .node(id)
                .map(|n| ("Edit Node Label", n.label().to_string())),
            ContextAction::EditEdgeLabel(id) => self
                .editor
                .store()
                .edge(id)
                .map(|e| ("Edit Edge Label", e.label().to_string())),
            ContextAction::AddNodeHere(_) => Some(("Add Node", self.editor.default_node_label())),
            _ => None,
        };
        match dialog {
            Some((title, text)) => {
                self.label_dialog = Some(LabelDialog {
                    title,
                    text,
                    request: LabelRequest::Context(action),
                });
            }
            None => {
                let mut no_prompt = |_: &str, _: &str| -> Option<String> { None };
                let _ = self.editor.run_context_action(action, &mut no_prompt);
            }
        }
    }

    fn open_add_node_dialog(&mut self) {
        self.label_dialog = Some(LabelDialog {
            title: "Add Node",
            text: self.editor.default_node_label(),
            request: LabelRequest::NodeAtCenter,
        });
    }

    /// Replays the dialog's answer through the engine's prompt-driven
    /// commands, so validation stays in one place.
    fn confirm_label(&mut self, dialog: LabelDialog) {
        let mut answer = |_: &str, _: &str| Some(dialog.text.clone());
        let result = match dialog.request {
            LabelRequest::NodeAtCenter => self.editor.add_node_prompted(&mut answer).map(drop),
            LabelRequest::Context(action) => self.editor.run_context_action(action, &mut answer),
        };
        if let Err(err) = result {
            tracing::debug!(%err, "label dialog result refused");
        }
    }

    fn status_text(&self) -> &str {
        self.editor.notifier().latest().unwrap_or("Ready")
    }

    fn to_screen(&self, origin: egui::Pos2, world: egui::Pos2) -> egui::Pos2 {
        origin + self.editor.viewport().diagram_to_screen(world).to_vec2()
    }
}
