use eframe::egui::{Color32, Pos2};
use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use std::fmt;

/// Stable identifier of a graph node, independent of storage indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ------------------------------------------------------------------
// Node items
// ------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NodeItem {
    pub id: NodeId,
    pub name: String,
    pub pos: Pos2,
    pub radius: f32,
    pub selected: bool,
    pub on_select_color: Color32,
    /// Fill override set while a traversal demo runs.
    pub highlight: Option<Color32>,
}

impl NodeItem {
    pub fn new(id: NodeId, name: String, pos: Pos2, radius: f32) -> Self {
        Self {
            id,
            name,
            pos,
            radius,
            selected: false,
            on_select_color: Self::default_on_selected_color(),
            highlight: None,
        }
    }

    pub const fn default_on_selected_color() -> Color32 {
        Color32::from_rgb(180, 50, 60)
    }

    pub fn contains(&self, point: Pos2) -> bool {
        self.pos.distance_sq(point) <= self.radius * self.radius
    }
}

// ------------------------------------------------------------------
// Arc items
// ------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ArcItem {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f64,
    pub selected: bool,
    pub on_select_color: Color32,
}

impl ArcItem {
    pub fn new(from: NodeId, to: NodeId, weight: f64) -> Self {
        Self {
            from,
            to,
            weight,
            selected: false,
            on_select_color: Self::default_on_selected_color(),
        }
    }

    pub const fn default_on_selected_color() -> Color32 {
        Color32::from_rgb(200, 120, 40)
    }
}

/// Distance from `point` to the segment `a`-`b`.
pub fn distance_to_segment(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq < f32::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

// ------------------------------------------------------------------
// Item handles
// ------------------------------------------------------------------

/// Handle to an item held by a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRef {
    Node(NodeIndex),
    Arc(EdgeIndex),
}

/// A resolved item, borrowed from the scene.
#[derive(Debug, Clone, Copy)]
pub enum SceneItem<'a> {
    Node(&'a NodeItem),
    Arc(&'a ArcItem),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_contains_points_within_radius() {
        let node = NodeItem::new(NodeId(0), "A".into(), Pos2::new(10.0, 10.0), 5.0);
        assert!(node.contains(Pos2::new(13.0, 14.0)));
        assert!(!node.contains(Pos2::new(16.0, 10.0)));
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Pos2::new(0.0, 0.0);
        let b = Pos2::new(10.0, 0.0);
        assert!((distance_to_segment(Pos2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-6);
        assert!((distance_to_segment(Pos2::new(-4.0, 3.0), a, b) - 5.0).abs() < 1e-6);
        assert!((distance_to_segment(Pos2::new(1.0, 1.0), a, a) - 2f32.sqrt()).abs() < 1e-6);
    }
}
