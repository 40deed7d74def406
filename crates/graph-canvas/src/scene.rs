use crate::config::ViewConfig;
use crate::demo::DemoTimer;
use crate::error::{CanvasError, Result};
use crate::items::{ArcItem, ItemRef, NodeId, NodeItem, SceneItem, distance_to_segment};
use crossbeam_channel::{Receiver, Sender, unbounded};
use eframe::egui::{Color32, Pos2};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Direction;
use std::time::Duration;

pub type SceneGraph = StableGraph<NodeItem, ArcItem>;

/// Change notifications published by a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneNotification {
    /// Nodes or arcs were added, removed or edited.
    GraphChanged,
    /// Only the visual state changed.
    NeedRedraw,
}

/// Passive holder of node and arc items over the underlying graph.
pub struct GraphScene {
    graph: SceneGraph,
    next_id: u32,
    node_radius: f32,
    hit_tolerance: f32,
    demo: DemoTimer,
    subscribers: Vec<Sender<SceneNotification>>,
}

impl GraphScene {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            graph: SceneGraph::default(),
            next_id: 0,
            node_radius: config.node_radius,
            hit_tolerance: config.hit_tolerance,
            demo: DemoTimer::new(config.demo_interval()),
            subscribers: Vec::new(),
        }
    }

    /// Triangle of three nodes, shown when the app starts.
    pub fn with_default_graph(config: &ViewConfig) -> Self {
        let mut scene = Self::new(config);
        let a = scene.add_node(Pos2::new(0.0, -80.0));
        let b = scene.add_node(Pos2::new(70.0, 40.0));
        let c = scene.add_node(Pos2::new(-70.0, 40.0));
        for (from, to) in [(a, b), (b, c), (c, a)] {
            if let Err(err) = scene.set_arc(from, to, 1.0) {
                log::warn!("default graph: {}", err);
            }
        }
        scene
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub fn subscribe(&mut self) -> Receiver<SceneNotification> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, notification: SceneNotification) {
        self.subscribers.retain(|tx| tx.send(notification).is_ok());
    }

    // ------------------------------------------------------------------
    // Graph edits
    // ------------------------------------------------------------------

    pub fn add_node(&mut self, pos: Pos2) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let name = format!("Node {}", id);
        self.graph
            .add_node(NodeItem::new(id, name, pos, self.node_radius));
        log::debug!("added node {} at {:?}", id, pos);
        self.notify(SceneNotification::GraphChanged);
        id
    }

    pub fn remove_node(&mut self, id: NodeId) -> Result<NodeItem> {
        let idx = self.node_index(id).ok_or(CanvasError::UnknownNode(id))?;
        let item = self
            .graph
            .remove_node(idx)
            .ok_or(CanvasError::UnknownNode(id))?;
        self.reset_after_demo_algo();
        log::debug!("removed node {}", id);
        self.notify(SceneNotification::GraphChanged);
        Ok(item)
    }

    pub fn rename_node(&mut self, id: NodeId, name: String) -> Result<()> {
        let idx = self.node_index(id).ok_or(CanvasError::UnknownNode(id))?;
        self.graph[idx].name = name;
        self.notify(SceneNotification::GraphChanged);
        Ok(())
    }

    /// Removes every arc touching `id`. Returns how many were removed.
    pub fn isolate_node(&mut self, id: NodeId) -> Result<usize> {
        let idx = self.node_index(id).ok_or(CanvasError::UnknownNode(id))?;
        let incident: Vec<EdgeIndex> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|edge| edge.id())
            .collect();
        let mut removed = 0;
        for edge in incident {
            // Self-loops show up in both directions.
            if self.graph.remove_edge(edge).is_some() {
                removed += 1;
            }
        }
        log::debug!("isolated node {} ({} arcs removed)", id, removed);
        self.notify(SceneNotification::GraphChanged);
        Ok(removed)
    }

    /// Adds the arc `from -> to`, or updates its weight if it exists.
    pub fn set_arc(&mut self, from: NodeId, to: NodeId, weight: f64) -> Result<EdgeIndex> {
        let a = self.node_index(from).ok_or(CanvasError::UnknownNode(from))?;
        let b = self.node_index(to).ok_or(CanvasError::UnknownNode(to))?;
        let edge = match self.graph.find_edge(a, b) {
            Some(edge) => {
                self.graph[edge].weight = weight;
                edge
            }
            None => self.graph.add_edge(a, b, ArcItem::new(from, to, weight)),
        };
        log::debug!("arc {} -> {} weight {}", from, to, weight);
        self.notify(SceneNotification::GraphChanged);
        Ok(edge)
    }

    pub fn remove_arc(&mut self, from: NodeId, to: NodeId) -> Result<ArcItem> {
        let edge = self
            .arc_index(from, to)
            .ok_or(CanvasError::UnknownArc(from, to))?;
        let item = self
            .graph
            .remove_edge(edge)
            .ok_or(CanvasError::UnknownArc(from, to))?;
        self.notify(SceneNotification::GraphChanged);
        Ok(item)
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    pub fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&idx| self.graph[idx].id == id)
    }

    pub fn arc_index(&self, from: NodeId, to: NodeId) -> Option<EdgeIndex> {
        let a = self.node_index(from)?;
        let b = self.node_index(to)?;
        self.graph.find_edge(a, b)
    }

    pub fn arc_weight(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.arc_index(from, to).map(|edge| self.graph[edge].weight)
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&NodeItem> {
        self.graph.node_weight(idx)
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&NodeItem> {
        self.node_index(id).and_then(|idx| self.node(idx))
    }

    pub fn arc(&self, idx: EdgeIndex) -> Option<&ArcItem> {
        self.graph.edge_weight(idx)
    }

    pub fn item(&self, item: ItemRef) -> Option<SceneItem<'_>> {
        match item {
            ItemRef::Node(idx) => self.node(idx).map(SceneItem::Node),
            ItemRef::Arc(idx) => self.arc(idx).map(SceneItem::Arc),
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &NodeItem)> {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    /// Arcs with the positions of their endpoints.
    pub fn arcs(&self) -> impl Iterator<Item = (EdgeIndex, &ArcItem, Pos2, Pos2)> {
        self.graph.edge_references().map(move |edge| {
            (
                edge.id(),
                edge.weight(),
                self.graph[edge.source()].pos,
                self.graph[edge.target()].pos,
            )
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn arc_count(&self) -> usize {
        self.graph.edge_count()
    }

    // ------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------

    /// Items under `pos` (scene coordinates), topmost first.
    ///
    /// Nodes are painted above arcs, and later nodes above earlier ones.
    pub fn items_at(&self, pos: Pos2) -> Vec<ItemRef> {
        let mut nodes: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph[idx].contains(pos))
            .collect();
        nodes.reverse();
        let arcs = self.arcs().filter_map(|(idx, _, a, b)| {
            (distance_to_segment(pos, a, b) <= self.hit_tolerance).then_some(ItemRef::Arc(idx))
        });
        nodes.into_iter().map(ItemRef::Node).chain(arcs).collect()
    }

    pub fn top_item_at(&self, pos: Pos2) -> Option<ItemRef> {
        self.items_at(pos).into_iter().next()
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Selected items, nodes before arcs.
    pub fn selected_items(&self) -> Vec<ItemRef> {
        let nodes = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph[idx].selected)
            .map(ItemRef::Node);
        let arcs = self
            .graph
            .edge_indices()
            .filter(|&idx| self.graph[idx].selected)
            .map(ItemRef::Arc);
        nodes.chain(arcs).collect()
    }

    pub fn set_selected(&mut self, item: ItemRef, selected: bool) {
        match item {
            ItemRef::Node(idx) => {
                if let Some(node) = self.graph.node_weight_mut(idx) {
                    node.selected = selected;
                }
            }
            ItemRef::Arc(idx) => {
                if let Some(arc) = self.graph.edge_weight_mut(idx) {
                    arc.selected = selected;
                }
            }
        }
        self.notify(SceneNotification::NeedRedraw);
    }

    pub fn clear_selection(&mut self) {
        for item in self.selected_items() {
            self.set_selected(item, false);
        }
    }

    pub fn set_on_select_color(&mut self, item: ItemRef, color: Color32) {
        match item {
            ItemRef::Node(idx) => {
                if let Some(node) = self.graph.node_weight_mut(idx) {
                    node.on_select_color = color;
                }
            }
            ItemRef::Arc(idx) => {
                if let Some(arc) = self.graph.edge_weight_mut(idx) {
                    arc.on_select_color = color;
                }
            }
        }
        self.notify(SceneNotification::NeedRedraw);
    }

    pub fn reset_on_select_color(&mut self, item: ItemRef) {
        let default = match item {
            ItemRef::Node(_) => NodeItem::default_on_selected_color(),
            ItemRef::Arc(_) => ArcItem::default_on_selected_color(),
        };
        self.set_on_select_color(item, default);
    }

    // ------------------------------------------------------------------
    // Traversal demo
    // ------------------------------------------------------------------

    pub fn start_demo(&mut self, order: Vec<NodeIndex>) {
        self.reset_after_demo_algo();
        self.demo.start(order);
        self.apply_demo_highlights();
    }

    pub fn stop_demo(&mut self) {
        self.demo.stop();
    }

    pub fn is_demo_running(&self) -> bool {
        self.demo.is_running()
    }

    /// Advances the demo timer. Returns true when a node was revealed.
    pub fn tick_demo(&mut self, dt: Duration) -> bool {
        if self.demo.tick(dt).is_empty() {
            return false;
        }
        self.apply_demo_highlights();
        true
    }

    /// Clears every highlight left by a demo run.
    pub fn reset_after_demo_algo(&mut self) {
        self.demo.clear();
        for node in self.graph.node_weights_mut() {
            node.highlight = None;
        }
        self.notify(SceneNotification::NeedRedraw);
    }

    fn apply_demo_highlights(&mut self) {
        let revealed = self.demo.revealed().to_vec();
        for (step, idx) in revealed.into_iter().enumerate() {
            let color = self.demo.step_color(step);
            if let Some(node) = self.graph.node_weight_mut(idx) {
                node.highlight = Some(color);
            }
        }
        self.notify(SceneNotification::NeedRedraw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> GraphScene {
        GraphScene::new(&ViewConfig::default())
    }

    #[test]
    fn items_at_returns_topmost_node_first_then_arcs() {
        let mut scene = scene();
        let a = scene.add_node(Pos2::new(0.0, 0.0));
        let b = scene.add_node(Pos2::new(5.0, 0.0));
        scene.set_arc(a, b, 1.0).unwrap();

        let hits = scene.items_at(Pos2::new(2.0, 0.0));
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0], ItemRef::Node(scene.node_index(b).unwrap()));
        assert_eq!(hits[1], ItemRef::Node(scene.node_index(a).unwrap()));
        assert!(matches!(hits[2], ItemRef::Arc(_)));
    }

    #[test]
    fn arcs_are_hit_within_tolerance_only() {
        let mut scene = scene();
        let a = scene.add_node(Pos2::new(0.0, 0.0));
        let b = scene.add_node(Pos2::new(200.0, 0.0));
        scene.set_arc(a, b, 2.0).unwrap();

        assert!(matches!(
            scene.top_item_at(Pos2::new(100.0, 3.0)),
            Some(ItemRef::Arc(_))
        ));
        assert_eq!(scene.top_item_at(Pos2::new(100.0, 30.0)), None);
    }

    #[test]
    fn set_arc_updates_existing_weight() {
        let mut scene = scene();
        let a = scene.add_node(Pos2::ZERO);
        let b = scene.add_node(Pos2::new(50.0, 0.0));
        let first = scene.set_arc(a, b, 1.0).unwrap();
        let second = scene.set_arc(a, b, 4.5).unwrap();
        assert_eq!(first, second);
        assert_eq!(scene.arc_count(), 1);
        assert_eq!(scene.arc_weight(a, b), Some(4.5));
        assert_eq!(scene.arc_weight(b, a), None);
    }

    #[test]
    fn isolate_removes_incident_arcs_including_loops() {
        let mut scene = GraphScene::with_default_graph(&ViewConfig::default());
        let a = NodeId(0);
        scene.set_arc(a, a, 1.0).unwrap();
        assert_eq!(scene.arc_count(), 4);
        assert_eq!(scene.isolate_node(a).unwrap(), 3);
        assert_eq!(scene.arc_count(), 1);
        assert_eq!(scene.node_count(), 3);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut scene = scene();
        assert!(matches!(
            scene.remove_node(NodeId(9)),
            Err(CanvasError::UnknownNode(NodeId(9)))
        ));
        let a = scene.add_node(Pos2::ZERO);
        assert!(matches!(
            scene.remove_arc(a, a),
            Err(CanvasError::UnknownArc(_, _))
        ));
    }

    #[test]
    fn node_ids_are_not_reused_after_removal() {
        let mut scene = scene();
        let a = scene.add_node(Pos2::ZERO);
        scene.remove_node(a).unwrap();
        let b = scene.add_node(Pos2::ZERO);
        assert_ne!(a, b);
    }

    #[test]
    fn subscribers_receive_notifications() {
        let mut scene = scene();
        let rx = scene.subscribe();
        let a = scene.add_node(Pos2::ZERO);
        assert_eq!(rx.try_recv(), Ok(SceneNotification::GraphChanged));

        let idx = scene.node_index(a).unwrap();
        scene.set_selected(ItemRef::Node(idx), true);
        assert_eq!(rx.try_recv(), Ok(SceneNotification::NeedRedraw));

        drop(rx);
        scene.add_node(Pos2::ZERO);
        assert!(scene.subscribers.is_empty());
    }

    #[test]
    fn demo_highlights_and_reset() {
        let mut scene = GraphScene::with_default_graph(&ViewConfig::default());
        let order: Vec<NodeIndex> = scene.graph().node_indices().collect();
        scene.start_demo(order.clone());
        assert!(scene.is_demo_running());
        assert!(scene.node(order[0]).unwrap().highlight.is_some());
        assert!(scene.node(order[1]).unwrap().highlight.is_none());

        assert!(scene.tick_demo(Duration::from_millis(400)));
        assert!(scene.node(order[1]).unwrap().highlight.is_some());

        scene.stop_demo();
        scene.reset_after_demo_algo();
        assert!(!scene.is_demo_running());
        assert!(scene.nodes().all(|(_, node)| node.highlight.is_none()));
    }

    #[test]
    fn removing_a_node_clears_demo_highlights() {
        let mut scene = GraphScene::with_default_graph(&ViewConfig::default());
        let order: Vec<NodeIndex> = scene.graph().node_indices().collect();
        scene.start_demo(order);
        scene.tick_demo(Duration::from_millis(400));
        assert!(scene.nodes().any(|(_, node)| node.highlight.is_some()));

        scene.remove_node(NodeId(2)).unwrap();
        assert!(!scene.is_demo_running());
        assert!(scene.nodes().all(|(_, node)| node.highlight.is_none()));
        assert!(!scene.tick_demo(Duration::from_secs(10)));
    }

    #[test]
    fn default_graph_is_a_triangle() {
        let scene = GraphScene::with_default_graph(&ViewConfig::default());
        assert_eq!(scene.node_count(), 3);
        assert_eq!(scene.arc_count(), 3);
        assert_eq!(scene.arc_weight(NodeId(2), NodeId(0)), Some(1.0));
    }
}
