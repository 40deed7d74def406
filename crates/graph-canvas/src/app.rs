use crate::canvas;
use crate::config::ViewConfig;
use crate::error::{CanvasError, Result};
use crate::items::NodeId;
use crate::scene::GraphScene;
use crate::signals::{Algorithm, ViewSignal};
use crate::view::InteractiveView;
use eframe::egui;
use petgraph::stable_graph::NodeIndex;
use petgraph::visit::{Bfs, Dfs, EdgeRef};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct RenameDialog {
    pub id: NodeId,
    pub buffer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightDialog {
    pub from: NodeId,
    pub to: NodeId,
    pub buffer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathDialog {
    pub from: NodeId,
    pub target: Option<NodeId>,
}

/// Controller: owns the scene and the view, and applies the view's signals.
pub struct GraphApp {
    scene: GraphScene,
    view: InteractiveView,
    status: String,
    rename: Option<RenameDialog>,
    weight_edit: Option<WeightDialog>,
    path_search: Option<PathDialog>,
    error_message: Option<String>,
}

impl GraphApp {
    pub fn new(config: &ViewConfig) -> Self {
        let mut scene = GraphScene::with_default_graph(config);
        let mut view = InteractiveView::new(config);
        view.attach_scene(&mut scene);
        Self {
            scene,
            view,
            status: String::new(),
            rename: None,
            weight_edit: None,
            path_search: None,
            error_message: None,
        }
    }

    pub fn scene(&self) -> &GraphScene {
        &self.scene
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn node_name(&self, id: NodeId) -> String {
        self.scene
            .node_by_id(id)
            .map(|node| node.name.clone())
            .unwrap_or_else(|| String::from("???"))
    }

    // ------------------------------------------------------------------
    // Signal handling
    // ------------------------------------------------------------------

    /// Applies every signal the view emitted since the last call.
    pub fn process_signals(&mut self) {
        for signal in self.view.drain_signals() {
            if let Err(e) = self.apply_signal(signal) {
                log::warn!("{}", e);
                self.error_message = Some(e.to_string());
            }
        }
    }

    pub fn apply_signal(&mut self, signal: ViewSignal) -> Result<()> {
        match signal {
            ViewSignal::SelectedNode(id) => {
                self.status = format!("Selected {}", self.node_name(id));
            }
            ViewSignal::SelectedArc(from, to) => {
                let weight = self
                    .scene
                    .arc_weight(from, to)
                    .ok_or(CanvasError::UnknownArc(from, to))?;
                self.status = format!(
                    "Selected arc {} -> {} (weight {})",
                    self.node_name(from),
                    self.node_name(to),
                    weight
                );
            }
            ViewSignal::UnSelect => self.status.clear(),
            ViewSignal::RemoveNode(id) => {
                let node = self.scene.remove_node(id)?;
                log::info!("Removed {}", node.name);
                self.status.clear();
            }
            ViewSignal::IsolateNode(id) => {
                let removed = self.scene.isolate_node(id)?;
                self.status = format!("Removed {} arcs from {}", removed, self.node_name(id));
            }
            ViewSignal::EditNode(id) => {
                let node = self
                    .scene
                    .node_by_id(id)
                    .ok_or(CanvasError::UnknownNode(id))?;
                self.rename = Some(RenameDialog {
                    id,
                    buffer: node.name.clone(),
                });
            }
            ViewSignal::SetArc(from, to) => match self.scene.arc_weight(from, to) {
                Some(weight) => {
                    self.weight_edit = Some(WeightDialog {
                        from,
                        to,
                        buffer: weight.to_string(),
                    });
                }
                None => {
                    self.scene.set_arc(from, to, 1.0)?;
                    log::info!(
                        "Added arc {} -> {}",
                        self.node_name(from),
                        self.node_name(to)
                    );
                }
            },
            ViewSignal::RemoveArc(from, to) => {
                self.scene.remove_arc(from, to)?;
                self.status.clear();
            }
            ViewSignal::StartAlgorithm(algorithm, id) => self.start_algorithm(algorithm, id)?,
            ViewSignal::AddNewNode(pos) => {
                let id = self.scene.add_node(pos);
                log::info!("Added {}", self.node_name(id));
            }
        }
        Ok(())
    }

    fn start_algorithm(&mut self, algorithm: Algorithm, id: NodeId) -> Result<()> {
        let start = self
            .scene
            .node_index(id)
            .ok_or(CanvasError::UnknownNode(id))?;
        let graph = self.scene.graph();
        let order = match algorithm {
            Algorithm::Bfs => {
                let mut order = Vec::new();
                let mut bfs = Bfs::new(graph, start);
                while let Some(node) = bfs.next(graph) {
                    order.push(node);
                }
                order
            }
            Algorithm::Dfs => {
                let mut order = Vec::new();
                let mut dfs = Dfs::new(graph, start);
                while let Some(node) = dfs.next(graph) {
                    order.push(node);
                }
                order
            }
            Algorithm::FindPath => {
                self.path_search = Some(PathDialog {
                    from: id,
                    target: None,
                });
                return Ok(());
            }
        };
        log::info!("{} from {} visits {} nodes", algorithm, self.node_name(id), order.len());
        self.scene.start_demo(order);
        Ok(())
    }

    /// Shortest path by arc weight, animated like a traversal.
    pub fn find_path(&mut self, from: NodeId, to: NodeId) -> Result<Option<f64>> {
        let start = self
            .scene
            .node_index(from)
            .ok_or(CanvasError::UnknownNode(from))?;
        let goal: NodeIndex = self
            .scene
            .node_index(to)
            .ok_or(CanvasError::UnknownNode(to))?;
        let found = petgraph::algo::astar(
            self.scene.graph(),
            start,
            |node| node == goal,
            |edge| edge.weight().weight.max(0.0),
            |_| 0.0,
        );
        match found {
            Some((cost, path)) => {
                self.status = format!(
                    "Path {} -> {}: {} steps, cost {}",
                    self.node_name(from),
                    self.node_name(to),
                    path.len().saturating_sub(1),
                    cost
                );
                self.scene.start_demo(path);
                Ok(Some(cost))
            }
            None => {
                self.status = format!(
                    "No path from {} to {}",
                    self.node_name(from),
                    self.node_name(to)
                );
                Ok(None)
            }
        }
    }

    // ------------------------------------------------------------------
    // Dialog commits
    // ------------------------------------------------------------------

    pub fn commit_rename(&mut self) -> Result<()> {
        let Some(dialog) = self.rename.take() else {
            return Ok(());
        };
        let name = dialog.buffer.trim();
        if name.is_empty() {
            return Ok(());
        }
        self.scene.rename_node(dialog.id, name.to_string())
    }

    pub fn commit_weight(&mut self) -> Result<()> {
        let Some(dialog) = self.weight_edit.take() else {
            return Ok(());
        };
        match dialog.buffer.trim().parse::<f64>() {
            Ok(weight) if weight.is_finite() => {
                self.scene.set_arc(dialog.from, dialog.to, weight)?;
            }
            _ => {
                self.error_message = Some(format!("\"{}\" is not a valid weight", dialog.buffer));
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Dialog rendering
    // ------------------------------------------------------------------

    fn show_rename_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.rename.as_mut() else {
            return;
        };
        let mut commit = false;
        let mut cancel = false;
        egui::Window::new("Rename node")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                let response = ui.text_edit_singleline(&mut dialog.buffer);
                response.request_focus();
                if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    commit = true;
                }
                ui.horizontal(|ui| {
                    commit |= ui.button("OK").clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });
        if commit {
            if let Err(e) = self.commit_rename() {
                self.error_message = Some(e.to_string());
            }
        } else if cancel {
            self.rename = None;
        }
    }

    fn show_weight_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.weight_edit.as_mut() else {
            return;
        };
        let title = format!("Arc {} -> {}", dialog.from, dialog.to);
        let mut commit = false;
        let mut cancel = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Weight");
                let response = ui.text_edit_singleline(&mut dialog.buffer);
                response.request_focus();
                if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    commit = true;
                }
                ui.horizontal(|ui| {
                    commit |= ui.button("OK").clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });
        if commit {
            if let Err(e) = self.commit_weight() {
                self.error_message = Some(e.to_string());
            }
        } else if cancel {
            self.weight_edit = None;
        }
    }

    fn show_path_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.path_search.clone() else {
            return;
        };
        let candidates: Vec<(NodeId, String)> = self
            .scene
            .nodes()
            .filter(|(_, node)| node.id != dialog.from)
            .map(|(_, node)| (node.id, node.name.clone()))
            .collect();
        let mut target = dialog.target;
        let mut run = false;
        let mut cancel = false;
        egui::Window::new(format!("Find path from {}", self.node_name(dialog.from)))
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                let selected_text = target
                    .and_then(|id| candidates.iter().find(|(c, _)| *c == id))
                    .map(|(_, name)| name.clone())
                    .unwrap_or_else(|| String::from("Select target"));
                egui::ComboBox::from_label("Target")
                    .selected_text(selected_text)
                    .show_ui(ui, |ui| {
                        for (id, name) in &candidates {
                            ui.selectable_value(&mut target, Some(*id), name);
                        }
                    });
                ui.horizontal(|ui| {
                    run = ui
                        .add_enabled(target.is_some(), egui::Button::new("Find"))
                        .clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });

        if cancel {
            self.path_search = None;
        } else if run && let Some(to) = target {
            self.path_search = None;
            if let Err(e) = self.find_path(dialog.from, to) {
                self.error_message = Some(e.to_string());
            }
        } else if let Some(open) = self.path_search.as_mut() {
            open.target = target;
        }
    }
}

impl eframe::App for GraphApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dt = ctx.input(|i| i.stable_dt);
        self.scene
            .tick_demo(Duration::try_from_secs_f32(dt).unwrap_or_default());
        if self.scene.is_demo_running() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Zoom: {:.0}%", self.view.scale() * 100.0));
                ui.separator();
                ui.label(format!(
                    "Nodes: {}  Arcs: {}",
                    self.scene.node_count(),
                    self.scene.arc_count()
                ));
                ui.separator();
                if self.view.is_awaiting_target() {
                    ui.label("Click the target node of the new arc");
                } else {
                    ui.label(&self.status);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            canvas::show(ui, &mut self.view, &mut self.scene);
        });

        self.process_signals();

        self.show_rename_dialog(ctx);
        self.show_weight_dialog(ctx);
        self.show_path_dialog(ctx);

        if let Some(error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&error);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }
    }
}
