use eframe::egui::Color32;
use petgraph::stable_graph::NodeIndex;
use std::time::Duration;

/// Repeating step timer that reveals a traversal order one node at a time.
#[derive(Debug, Clone)]
pub struct DemoTimer {
    order: Vec<NodeIndex>,
    revealed: usize,
    interval: Duration,
    elapsed: Duration,
    running: bool,
}

impl DemoTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            order: Vec::new(),
            revealed: 0,
            interval,
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    /// Starts over with a new order; the first node is revealed right away.
    pub fn start(&mut self, order: Vec<NodeIndex>) {
        self.running = !order.is_empty();
        self.revealed = usize::from(self.running);
        self.order = order;
        self.elapsed = Duration::ZERO;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advances by `dt`. Returns the nodes revealed by this tick.
    pub fn tick(&mut self, dt: Duration) -> &[NodeIndex] {
        if !self.running {
            return &[];
        }
        self.elapsed += dt;
        let before = self.revealed;
        while self.elapsed >= self.interval && self.revealed < self.order.len() {
            self.elapsed -= self.interval;
            self.revealed += 1;
        }
        if self.revealed >= self.order.len() {
            self.running = false;
        }
        &self.order[before..self.revealed]
    }

    /// Nodes revealed so far, in traversal order.
    pub fn revealed(&self) -> &[NodeIndex] {
        &self.order[..self.revealed]
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.revealed = 0;
        self.elapsed = Duration::ZERO;
        self.running = false;
    }

    /// Highlight for the `step`-th revealed node.
    pub fn step_color(&self, step: usize) -> Color32 {
        let t = if self.order.len() > 1 {
            step as f64 / (self.order.len() - 1) as f64
        } else {
            0.0
        };
        let c = colorous::VIRIDIS.eval_continuous(t.clamp(0.0, 1.0));
        Color32::from_rgb(c.r, c.g, c.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(n: usize) -> Vec<NodeIndex> {
        (0..n).map(NodeIndex::new).collect()
    }

    #[test]
    fn reveals_one_node_per_interval() {
        let mut timer = DemoTimer::new(Duration::from_millis(100));
        timer.start(order(3));
        assert_eq!(timer.revealed().len(), 1);

        assert!(timer.tick(Duration::from_millis(50)).is_empty());
        assert_eq!(timer.tick(Duration::from_millis(60)), &[NodeIndex::new(1)]);
        assert!(timer.is_running());
        assert_eq!(timer.tick(Duration::from_millis(100)), &[NodeIndex::new(2)]);
        assert!(!timer.is_running());
    }

    #[test]
    fn stopped_timer_does_not_advance() {
        let mut timer = DemoTimer::new(Duration::from_millis(10));
        timer.start(order(4));
        timer.stop();
        assert!(timer.tick(Duration::from_secs(1)).is_empty());
        assert_eq!(timer.revealed().len(), 1);
    }

    #[test]
    fn empty_order_never_runs() {
        let mut timer = DemoTimer::new(Duration::from_millis(10));
        timer.start(Vec::new());
        assert!(!timer.is_running());
        assert!(timer.revealed().is_empty());
    }
}
