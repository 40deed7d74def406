use crate::config::ViewConfig;
use crate::items::{ItemRef, SceneItem};
use crate::menu::{
    ArcMenuAction, CanvasMenuAction, ContextMenu, MenuAction, MenuTarget, NodeMenuAction,
};
use crate::scene::{GraphScene, SceneNotification};
use crate::signals::{SignalQueue, ViewSignal};
use crossbeam_channel::Receiver;
use eframe::egui::{Color32, Pos2, Vec2};
use petgraph::stable_graph::NodeIndex;

/// On-select color of a node waiting to become an arc source.
pub const PENDING_ARC_COLOR: Color32 = Color32::from_rgb(100, 100, 255);

/// Interactive view over a [`GraphScene`].
///
/// Translates pointer input into selection changes and [`ViewSignal`]s.
/// Positions passed in are viewport-relative; the view maps them to scene
/// coordinates through its zoom scale and pan offset.
pub struct InteractiveView {
    zoom_factor: f32,
    scale_max: f32,
    scale: f32,
    offset: Vec2,
    centered: bool,
    panning: bool,
    /// Set when a press outside an open menu dismissed it; its release is dropped.
    swallow_release: bool,
    /// Source node of a pending "set arc" gesture.
    pending_arc: Option<NodeIndex>,
    menu: Option<ContextMenu>,
    signals: SignalQueue,
    scene_events: Option<Receiver<SceneNotification>>,
    repaint_requested: bool,
}

impl InteractiveView {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            zoom_factor: config.zoom_factor,
            scale_max: config.scale_max,
            scale: 1.0,
            offset: Vec2::ZERO,
            centered: false,
            panning: false,
            swallow_release: false,
            pending_arc: None,
            menu: None,
            signals: SignalQueue::new(),
            scene_events: None,
            repaint_requested: false,
        }
    }

    // ------------------------------------------------------------------
    // Scene wiring
    // ------------------------------------------------------------------

    /// Repaints whenever the scene reports a graph change or asks for a redraw.
    pub fn attach_scene(&mut self, scene: &mut GraphScene) {
        self.scene_events = Some(scene.subscribe());
    }

    /// Drains scene notifications. Returns true if any arrived.
    pub fn poll_scene(&mut self) -> bool {
        let Some(rx) = &self.scene_events else {
            return false;
        };
        let mut any = false;
        for notification in rx.try_iter() {
            match notification {
                SceneNotification::GraphChanged | SceneNotification::NeedRedraw => any = true,
            }
        }
        if any {
            self.redraw();
        }
        any
    }

    pub fn redraw(&mut self) {
        self.repaint_requested = true;
    }

    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.repaint_requested)
    }

    pub fn drain_signals(&mut self) -> Vec<ViewSignal> {
        self.signals.drain()
    }

    // ------------------------------------------------------------------
    // Transform
    // ------------------------------------------------------------------

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn map_to_scene(&self, pos: Pos2) -> Pos2 {
        ((pos.to_vec2() - self.offset) / self.scale).to_pos2()
    }

    pub fn map_from_scene(&self, pos: Pos2) -> Pos2 {
        (pos.to_vec2() * self.scale + self.offset).to_pos2()
    }

    /// Puts the scene origin at the middle of the viewport, once.
    pub fn ensure_centered(&mut self, viewport: Vec2) {
        if !self.centered {
            self.offset = viewport * 0.5;
            self.centered = true;
        }
    }

    /// Zooms about `cursor`. Positive `delta` zooms in.
    pub fn wheel(&mut self, delta: f32, cursor: Pos2) {
        let new_scale = if delta > 0.0 {
            if self.scale >= self.scale_max {
                return;
            }
            (self.scale * self.zoom_factor).min(self.scale_max)
        } else if delta < 0.0 {
            self.scale / self.zoom_factor
        } else {
            return;
        };
        if new_scale < f32::MIN_POSITIVE {
            return;
        }
        let anchor = self.map_to_scene(cursor);
        self.scale = new_scale;
        self.offset = cursor.to_vec2() - anchor.to_vec2() * self.scale;
        self.redraw();
    }

    /// Pans the viewport while a press on empty canvas is held.
    pub fn drag(&mut self, delta: Vec2) {
        if self.panning && delta != Vec2::ZERO {
            self.offset += delta;
            self.redraw();
        }
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    // ------------------------------------------------------------------
    // Set-arc gesture
    // ------------------------------------------------------------------

    pub fn is_awaiting_target(&self) -> bool {
        self.pending_arc.is_some()
    }

    pub fn pending_arc_source(&self) -> Option<NodeIndex> {
        self.pending_arc
    }

    /// Steps every button press runs first: restores on-select colours,
    /// stops the demo and resolves a pending set-arc gesture against `hit`.
    /// Returns true if a gesture was pending.
    fn begin_press(&mut self, scene: &mut GraphScene, hit: Option<ItemRef>) -> bool {
        for item in scene.selected_items() {
            scene.reset_on_select_color(item);
        }
        scene.stop_demo();
        scene.reset_after_demo_algo();

        let Some(source) = self.pending_arc.take() else {
            return false;
        };
        scene.reset_on_select_color(ItemRef::Node(source));
        if let Some(ItemRef::Node(target)) = hit
            && target != source
            && let (Some(from), Some(to)) = (
                scene.node(source).map(|node| node.id),
                scene.node(target).map(|node| node.id),
            )
        {
            scene.set_selected(ItemRef::Node(target), false);
            self.signals.emit(ViewSignal::SetArc(from, to));
        }
        true
    }

    // ------------------------------------------------------------------
    // Context menu
    // ------------------------------------------------------------------

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.menu.as_ref()
    }

    /// Right click: runs the press steps, then selects the topmost item under
    /// `pos` and opens the menu matching it.
    pub fn open_context_menu(&mut self, scene: &mut GraphScene, pos: Pos2) -> ContextMenu {
        if self.menu.is_some() {
            self.resolve_context_menu(scene, None);
        }
        let scene_pos = self.map_to_scene(pos);
        let hit = scene.top_item_at(scene_pos);
        self.begin_press(scene, hit);
        scene.clear_selection();

        let target = match hit {
            Some(ItemRef::Node(index)) => scene
                .node(index)
                .map(|node| MenuTarget::Node { index, id: node.id }),
            Some(ItemRef::Arc(index)) => scene.arc(index).map(|arc| MenuTarget::Arc {
                index,
                from: arc.from,
                to: arc.to,
            }),
            None => None,
        }
        .unwrap_or(MenuTarget::Canvas { scene_pos });

        match target {
            MenuTarget::Node { index, id } => {
                scene.set_selected(ItemRef::Node(index), true);
                self.signals.emit(ViewSignal::SelectedNode(id));
            }
            MenuTarget::Arc { index, from, to } => {
                scene.set_selected(ItemRef::Arc(index), true);
                self.signals.emit(ViewSignal::SelectedArc(from, to));
            }
            MenuTarget::Canvas { .. } => {}
        }

        let menu = ContextMenu {
            target,
            screen_pos: pos,
        };
        self.menu = Some(menu);
        self.redraw();
        menu
    }

    /// Closes the open menu. `None` means it was dismissed without a choice.
    pub fn resolve_context_menu(&mut self, scene: &mut GraphScene, choice: Option<MenuAction>) {
        let Some(menu) = self.menu.take() else {
            return;
        };
        match (menu.target, choice) {
            (MenuTarget::Node { index, id }, Some(MenuAction::Node(action))) => match action {
                NodeMenuAction::Delete => self.signals.emit(ViewSignal::RemoveNode(id)),
                NodeMenuAction::Isolate => self.signals.emit(ViewSignal::IsolateNode(id)),
                NodeMenuAction::Rename => self.signals.emit(ViewSignal::EditNode(id)),
                NodeMenuAction::SetArc => {
                    self.pending_arc = Some(index);
                    scene.set_on_select_color(ItemRef::Node(index), PENDING_ARC_COLOR);
                }
                NodeMenuAction::Traverse(algorithm) => {
                    self.signals.emit(ViewSignal::StartAlgorithm(algorithm, id))
                }
            },
            (MenuTarget::Arc { from, to, .. }, Some(MenuAction::Arc(action))) => match action {
                ArcMenuAction::Delete => self.signals.emit(ViewSignal::RemoveArc(from, to)),
                ArcMenuAction::AdjustWeight => self.signals.emit(ViewSignal::SetArc(from, to)),
            },
            (
                MenuTarget::Canvas { scene_pos },
                Some(MenuAction::Canvas(CanvasMenuAction::NewNode)),
            ) => self.signals.emit(ViewSignal::AddNewNode(scene_pos)),
            (target, choice) => {
                if let Some(choice) = choice {
                    log::warn!("menu action {:?} does not apply to {:?}", choice, target);
                }
                Self::deselect_target(scene, target);
            }
        }
        self.redraw();
    }

    /// Dismisses the open menu because a press landed outside it. With
    /// `swallow_release`, the release of that press is not handled.
    pub fn dismiss_context_menu(&mut self, scene: &mut GraphScene, swallow_release: bool) {
        if self.menu.is_none() {
            return;
        }
        self.resolve_context_menu(scene, None);
        self.swallow_release = swallow_release;
    }

    fn deselect_target(scene: &mut GraphScene, target: MenuTarget) {
        match target {
            MenuTarget::Node { index, .. } => scene.set_selected(ItemRef::Node(index), false),
            MenuTarget::Arc { index, .. } => scene.set_selected(ItemRef::Arc(index), false),
            MenuTarget::Canvas { .. } => {}
        }
    }

    // ------------------------------------------------------------------
    // Pointer buttons
    // ------------------------------------------------------------------

    /// Left press: completes a pending set-arc gesture or does default
    /// selection handling.
    pub fn mouse_press(&mut self, scene: &mut GraphScene, pos: Pos2) {
        self.swallow_release = false;
        let hit = scene.top_item_at(self.map_to_scene(pos));
        if !self.begin_press(scene, hit) {
            scene.clear_selection();
            match hit {
                Some(item) => scene.set_selected(item, true),
                None => self.panning = true,
            }
        }
        self.redraw();
    }

    /// Left release: re-announces the current selection, or reports a
    /// release over empty space.
    pub fn mouse_release(&mut self, scene: &GraphScene, pos: Pos2) {
        if std::mem::take(&mut self.swallow_release) {
            self.panning = false;
            return;
        }
        if let Some(item) = scene
            .selected_items()
            .first()
            .and_then(|&item| scene.item(item))
        {
            match item {
                SceneItem::Arc(arc) => self.signals.emit(ViewSignal::SelectedArc(arc.from, arc.to)),
                SceneItem::Node(node) => self.signals.emit(ViewSignal::SelectedNode(node.id)),
            }
        }
        if scene.items_at(self.map_to_scene(pos)).is_empty() {
            self.signals.emit(ViewSignal::UnSelect);
        }
        self.panning = false;
    }
}
