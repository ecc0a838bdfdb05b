use super::InteractionController;
use crate::error::EditError;
use crate::model::{EdgeId, Item, NodeId};
use crate::notify::{LabelPrompt, Notifier};
use eframe::egui;

/// What a secondary press landed on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContextTarget {
    Node(NodeId),
    Edge(EdgeId),
    /// Empty canvas at this diagram position.
    Empty(egui::Pos2),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContextAction {
    EditNodeLabel(NodeId),
    AddEdge(NodeId),
    AddDirectedEdge(NodeId),
    DeleteNode(NodeId),
    EditEdgeLabel(EdgeId),
    DeleteEdge(EdgeId),
    AddNodeHere(egui::Pos2),
}

impl ContextAction {
    pub fn title(&self) -> &'static str {
        match self {
            ContextAction::EditNodeLabel(_) => "Edit label",
            ContextAction::AddEdge(_) => "Add edge",
            ContextAction::AddDirectedEdge(_) => "Add directed edge",
            ContextAction::DeleteNode(_) => "Delete node",
            ContextAction::EditEdgeLabel(_) => "Edit label",
            ContextAction::DeleteEdge(_) => "Delete edge",
            ContextAction::AddNodeHere(_) => "Add node here",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContextMenu {
    pub target: ContextTarget,
    pub actions: Vec<ContextAction>,
}

impl ContextMenu {
    fn for_target(target: ContextTarget) -> Self {
        let actions = match target {
            ContextTarget::Node(id) => vec![
                ContextAction::EditNodeLabel(id),
                ContextAction::AddEdge(id),
                ContextAction::AddDirectedEdge(id),
                ContextAction::DeleteNode(id),
            ],
            ContextTarget::Edge(id) => vec![
                ContextAction::EditEdgeLabel(id),
                ContextAction::DeleteEdge(id),
            ],
            ContextTarget::Empty(at) => vec![ContextAction::AddNodeHere(at)],
        };
        Self { target, actions }
    }
}

impl<N: Notifier> InteractionController<N> {
    /// Builds the menu for whatever sits under `screen`. An unselected item
    /// becomes the sole selection first.
    pub fn on_secondary_action(&mut self, screen: egui::Pos2) -> ContextMenu {
        let world = self.view.screen_to_diagram(screen);
        let target = match self.item_at(world) {
            Some(item) => {
                if !self.is_selected(item) {
                    self.select_only(item);
                    self.report_selection();
                }
                match item {
                    Item::Node(id) => ContextTarget::Node(id),
                    Item::Edge(id) => ContextTarget::Edge(id),
                }
            }
            None => ContextTarget::Empty(world),
        };
        ContextMenu::for_target(target)
    }

    pub fn run_context_action(
        &mut self,
        action: ContextAction,
        prompt: &mut dyn LabelPrompt,
    ) -> Result<(), EditError> {
        tracing::debug!(action = action.title(), "context action");
        match action {
            ContextAction::EditNodeLabel(id) => self.edit_node_label(id, prompt).map(drop),
            ContextAction::AddEdge(id) => self.begin_edge(id, false),
            ContextAction::AddDirectedEdge(id) => self.begin_edge(id, true),
            ContextAction::DeleteNode(id) => self.delete_node(id).map(drop),
            ContextAction::EditEdgeLabel(id) => self.edit_edge_label(id, prompt).map(drop),
            ContextAction::DeleteEdge(id) => self.delete_edge(id),
            ContextAction::AddNodeHere(at) => self.add_node_prompted_at(at, prompt).map(drop),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn never(_: &str, _: &str) -> Option<String> {
        panic!("no prompt expected")
    }

    #[test]
    fn node_menu_offers_edit_edge_and_delete() {
        let mut ctl = controller();
        let a = add(&mut ctl, -200.0, -100.0, "A");
        let menu = ctl.on_secondary_action(screen(-200.0, -100.0));
        assert_eq!(menu.target, ContextTarget::Node(a));
        let titles: Vec<&str> = menu.actions.iter().map(ContextAction::title).collect();
        assert_eq!(
            titles,
            ["Edit label", "Add edge", "Add directed edge", "Delete node"]
        );
        assert_eq!(ctl.selection(), &[Item::Node(a)]);
    }

    #[test]
    fn edge_menu_targets_the_edge_under_pointer() {
        let mut ctl = controller();
        let a = add(&mut ctl, -200.0, -100.0, "A");
        let b = add(&mut ctl, 0.0, -100.0, "B");
        let e = ctl.connect(a, b, false, "1").unwrap();

        let menu = ctl.on_secondary_action(screen(-150.0, -100.0));
        assert_eq!(menu.target, ContextTarget::Edge(e));
        assert_eq!(
            menu.actions,
            vec![ContextAction::EditEdgeLabel(e), ContextAction::DeleteEdge(e)]
        );
        assert_eq!(ctl.last_selected(), Some(Item::Edge(e)));
        assert_eq!(ctl.notifier().latest(), Some("3 item(s) selected, last: (edge)"));
    }

    #[test]
    fn right_click_keeps_existing_selection() {
        let mut ctl = controller();
        let a = add(&mut ctl, -200.0, -100.0, "A");
        let b = add(&mut ctl, 0.0, -100.0, "B");
        ctl.select(a.into());
        ctl.select(b.into());
        ctl.on_secondary_action(screen(-200.0, -100.0));
        assert_eq!(ctl.selection(), &[Item::Node(a), Item::Node(b)]);
    }

    #[test]
    fn empty_menu_adds_node_where_clicked() {
        let mut ctl = controller();
        let menu = ctl.on_secondary_action(screen(120.0, 80.0));
        let at = egui::pos2(120.0, 80.0);
        assert_eq!(menu.actions, vec![ContextAction::AddNodeHere(at)]);

        let mut prompt = |title: &str, default: &str| {
            assert_eq!(title, "Add Node");
            Some(default.to_string())
        };
        ctl.run_context_action(menu.actions[0], &mut prompt).unwrap();
        let node = &ctl.store().nodes()[0];
        assert_eq!(node.position(), at);
        assert_eq!(node.label(), "Node1");
    }

    #[test]
    fn add_edge_action_enters_creation_mode() {
        let mut ctl = controller();
        let a = add(&mut ctl, -200.0, -100.0, "A");
        ctl.run_context_action(ContextAction::AddDirectedEdge(a), &mut never)
            .unwrap();
        assert!(matches!(
            ctl.mode(),
            super::super::Mode::CreatingEdge { source, directed: true, .. } if source == a
        ));
        assert_eq!(
            ctl.notifier().latest(),
            Some("Click on destination node for the edge...")
        );
    }

    #[test]
    fn delete_actions_on_stale_handles_fail_cleanly() {
        let mut ctl = controller();
        let a = add(&mut ctl, -200.0, -100.0, "A");
        ctl.run_context_action(ContextAction::DeleteNode(a), &mut never)
            .unwrap();
        assert_eq!(
            ctl.run_context_action(ContextAction::DeleteNode(a), &mut never),
            Err(EditError::StaleNode(a))
        );
        assert_eq!(ctl.notifier().latest(), Some(format!("Node {a} no longer exists.").as_str()));
    }
}
