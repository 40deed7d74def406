use crate::items::NodeId;
use crate::signals::Algorithm;
use eframe::egui::Pos2;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};

/// Entries of the node context menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeMenuAction {
    Delete,
    Isolate,
    Rename,
    SetArc,
    Traverse(Algorithm),
}

impl NodeMenuAction {
    pub const ALL: [NodeMenuAction; 7] = [
        NodeMenuAction::Delete,
        NodeMenuAction::Isolate,
        NodeMenuAction::Rename,
        NodeMenuAction::SetArc,
        NodeMenuAction::Traverse(Algorithm::Bfs),
        NodeMenuAction::Traverse(Algorithm::Dfs),
        NodeMenuAction::Traverse(Algorithm::FindPath),
    ];

    pub fn label(self) -> &'static str {
        match self {
            NodeMenuAction::Delete => "Delete",
            NodeMenuAction::Isolate => "Isolate",
            NodeMenuAction::Rename => "Rename",
            NodeMenuAction::SetArc => "Set arc to (select other node by mouse)",
            NodeMenuAction::Traverse(Algorithm::Bfs) => "BFS from here",
            NodeMenuAction::Traverse(Algorithm::Dfs) => "DFS from here",
            NodeMenuAction::Traverse(Algorithm::FindPath) => "Find path to",
        }
    }

    /// Whether a separator is drawn above this entry.
    pub fn starts_group(self) -> bool {
        matches!(
            self,
            NodeMenuAction::SetArc | NodeMenuAction::Traverse(Algorithm::Bfs)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcMenuAction {
    Delete,
    AdjustWeight,
}

impl ArcMenuAction {
    pub const ALL: [ArcMenuAction; 2] = [ArcMenuAction::Delete, ArcMenuAction::AdjustWeight];

    pub fn label(self) -> &'static str {
        match self {
            ArcMenuAction::Delete => "Delete",
            ArcMenuAction::AdjustWeight => "Adjust weight",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasMenuAction {
    NewNode,
}

impl CanvasMenuAction {
    pub const ALL: [CanvasMenuAction; 1] = [CanvasMenuAction::NewNode];

    pub fn label(self) -> &'static str {
        match self {
            CanvasMenuAction::NewNode => "New node",
        }
    }
}

/// A choice made in whichever menu is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Node(NodeMenuAction),
    Arc(ArcMenuAction),
    Canvas(CanvasMenuAction),
}

/// What the right click landed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuTarget {
    Node { index: NodeIndex, id: NodeId },
    Arc { index: EdgeIndex, from: NodeId, to: NodeId },
    Canvas { scene_pos: Pos2 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenu {
    pub target: MenuTarget,
    /// Viewport position the menu pops up at.
    pub screen_pos: Pos2,
}

impl ContextMenu {
    /// Actions offered for this target, with a flag marking entries
    /// preceded by a separator.
    pub fn entries(&self) -> Vec<(MenuAction, bool)> {
        match self.target {
            MenuTarget::Node { .. } => NodeMenuAction::ALL
                .iter()
                .map(|&a| (MenuAction::Node(a), a.starts_group()))
                .collect(),
            MenuTarget::Arc { .. } => ArcMenuAction::ALL
                .iter()
                .map(|&a| (MenuAction::Arc(a), false))
                .collect(),
            MenuTarget::Canvas { .. } => CanvasMenuAction::ALL
                .iter()
                .map(|&a| (MenuAction::Canvas(a), false))
                .collect(),
        }
    }
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Node(a) => a.label(),
            MenuAction::Arc(a) => a.label(),
            MenuAction::Canvas(a) => a.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_menu_lists_all_entries_with_two_separators() {
        let menu = ContextMenu {
            target: MenuTarget::Node {
                index: NodeIndex::new(0),
                id: NodeId(0),
            },
            screen_pos: Pos2::ZERO,
        };
        let entries = menu.entries();
        assert_eq!(entries.len(), 7);
        assert_eq!(entries.iter().filter(|(_, sep)| *sep).count(), 2);
        assert_eq!(entries[6].0.label(), "Find path to");
    }

    #[test]
    fn canvas_menu_offers_new_node_only() {
        let menu = ContextMenu {
            target: MenuTarget::Canvas {
                scene_pos: Pos2::new(1.0, 2.0),
            },
            screen_pos: Pos2::ZERO,
        };
        assert_eq!(
            menu.entries(),
            vec![(MenuAction::Canvas(CanvasMenuAction::NewNode), false)]
        );
    }
}
