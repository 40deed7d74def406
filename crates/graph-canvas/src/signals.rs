use crate::items::NodeId;
use eframe::egui::Pos2;
use std::fmt;

/// Traversals a node context menu can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Bfs,
    Dfs,
    FindPath,
}

impl Algorithm {
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "BFS",
            Algorithm::Dfs => "DFS",
            Algorithm::FindPath => "Find path",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic requests the view publishes for the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewSignal {
    SelectedNode(NodeId),
    SelectedArc(NodeId, NodeId),
    RemoveNode(NodeId),
    IsolateNode(NodeId),
    EditNode(NodeId),
    /// Create the arc, or adjust its weight when it already exists.
    SetArc(NodeId, NodeId),
    RemoveArc(NodeId, NodeId),
    StartAlgorithm(Algorithm, NodeId),
    /// Scene coordinates of the requested node.
    AddNewNode(Pos2),
    UnSelect,
}

/// Outbound signals, buffered until the controller drains them.
#[derive(Debug, Default)]
pub struct SignalQueue {
    queue: Vec<ViewSignal>,
}

impl SignalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, signal: ViewSignal) {
        log::debug!("emit {:?}", signal);
        self.queue.push(signal);
    }

    pub fn drain(&mut self) -> Vec<ViewSignal> {
        std::mem::take(&mut self.queue)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_match_menu_contract() {
        assert_eq!(Algorithm::Bfs.name(), "BFS");
        assert_eq!(Algorithm::Dfs.name(), "DFS");
        assert_eq!(Algorithm::FindPath.to_string(), "Find path");
    }

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut queue = SignalQueue::new();
        queue.emit(ViewSignal::SelectedNode(NodeId(1)));
        queue.emit(ViewSignal::UnSelect);
        assert_eq!(
            queue.drain(),
            vec![ViewSignal::SelectedNode(NodeId(1)), ViewSignal::UnSelect]
        );
        assert!(queue.is_empty());
    }
}
