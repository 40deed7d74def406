use crate::menu::{ContextMenu, MenuAction};
use crate::scene::GraphScene;
use crate::view::InteractiveView;
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Stroke, Vec2};

// UI Constants
const NODE_FILL: Color32 = Color32::from_rgb(70, 70, 80);
const NODE_STROKE: Stroke = Stroke {
    width: 2.0,
    color: Color32::from_rgb(180, 180, 180),
};
const SELECTED_STROKE_WIDTH: f32 = 4.0;
const ARC_COLOR: Color32 = Color32::from_rgb(120, 120, 120);
const ARC_WIDTH: f32 = 2.0;
const ARROW_LENGTH: f32 = 10.0;
const LABEL_FONT: f32 = 13.0;
const ARC_PREVIEW_STROKE_WIDTH: f32 = 2.0;
const ARC_PREVIEW_COLOR: Color32 = Color32::from_rgb(100, 100, 255);

/// Shows the scene through `view`, feeding it this frame's pointer input.
pub fn show(ui: &mut egui::Ui, view: &mut InteractiveView, scene: &mut GraphScene) -> egui::Response {
    let (response, painter) =
        ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
    let origin = response.rect.min.to_vec2();
    view.ensure_centered(response.rect.size());

    // Menus are modal: while one is open, pointer input only closes it.
    let menu_open = view.context_menu().is_some();
    if !menu_open {
        handle_input(ui, &response, view, scene, origin);
    }

    draw_scene(&painter, view, scene, origin);

    if view.is_awaiting_target()
        && let Some(source) = view.pending_arc_source().and_then(|idx| scene.node(idx))
        && let Some(hover) = response.hover_pos()
    {
        painter.line_segment(
            [view.map_from_scene(source.pos) + origin, hover],
            Stroke::new(ARC_PREVIEW_STROKE_WIDTH, ARC_PREVIEW_COLOR),
        );
    }

    if let Some(menu) = view.context_menu().copied() {
        draw_context_menu(ui, view, scene, menu, origin, menu_open);
    }

    view.poll_scene();
    if view.take_repaint() {
        ui.ctx().request_repaint();
    }
    response
}

fn handle_input(
    ui: &egui::Ui,
    response: &egui::Response,
    view: &mut InteractiveView,
    scene: &mut GraphScene,
    origin: Vec2,
) {
    let (scroll, pressed, released) = ui.input(|i| {
        (
            i.raw_scroll_delta.y,
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
        )
    });

    if let Some(hover) = response.hover_pos() {
        if scroll != 0.0 {
            view.wheel(scroll, hover - origin);
        }
        if pressed {
            view.mouse_press(scene, hover - origin);
        }
    }

    if response.dragged_by(egui::PointerButton::Primary) {
        view.drag(response.drag_delta());
    }

    if released
        && (response.hovered() || view.is_panning())
        && let Some(pos) = ui.input(|i| i.pointer.interact_pos())
    {
        view.mouse_release(scene, pos - origin);
    }

    if response.secondary_clicked()
        && let Some(pos) = response.interact_pointer_pos()
    {
        view.open_context_menu(scene, pos - origin);
    }
}

fn draw_scene(painter: &egui::Painter, view: &InteractiveView, scene: &GraphScene, origin: Vec2) {
    let to_screen = |pos: Pos2| view.map_from_scene(pos) + origin;
    let text_color = painter.ctx().style().visuals.text_color();

    for (_, arc, from, to) in scene.arcs() {
        let color = if arc.selected {
            arc.on_select_color
        } else {
            ARC_COLOR
        };
        let stroke = Stroke::new(ARC_WIDTH, color);
        let (a, b) = (to_screen(from), to_screen(to));
        let dir = b - a;
        if dir.length_sq() < f32::EPSILON {
            continue;
        }
        let unit = dir.normalized();
        let radius = scene.node_radius() * view.scale();
        let start = a + unit * radius;
        let tip = b - unit * radius;
        painter.line_segment([start, tip], stroke);
        painter.arrow(tip - unit * ARROW_LENGTH, unit * ARROW_LENGTH, stroke);
        painter.text(
            start + (tip - start) * 0.5 + Vec2::new(0.0, -8.0),
            Align2::CENTER_BOTTOM,
            format_weight(arc.weight),
            FontId::proportional(LABEL_FONT),
            text_color,
        );
    }

    for (_, node) in scene.nodes() {
        let center = to_screen(node.pos);
        let radius = node.radius * view.scale();
        let fill = node.highlight.unwrap_or(NODE_FILL);
        let stroke = if node.selected {
            Stroke::new(SELECTED_STROKE_WIDTH, node.on_select_color)
        } else {
            NODE_STROKE
        };
        painter.circle(center, radius, fill, stroke);
        painter.text(
            center + Vec2::new(0.0, radius + 4.0),
            Align2::CENTER_TOP,
            &node.name,
            FontId::proportional(LABEL_FONT),
            text_color,
        );
    }
}

fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{}", weight as i64)
    } else {
        format!("{:.2}", weight)
    }
}

/// Renders the open context menu as a popup and resolves it once an entry
/// is clicked, a click lands outside it, or Escape is pressed.
///
/// `armed` is false on the frame the menu was opened, so the opening click
/// does not immediately dismiss it.
fn draw_context_menu(
    ui: &egui::Ui,
    view: &mut InteractiveView,
    scene: &mut GraphScene,
    menu: ContextMenu,
    origin: Vec2,
    armed: bool,
) {
    let mut choice: Option<MenuAction> = None;

    let area_response = egui::Area::new(egui::Id::new("graph_canvas_context_menu"))
        .fixed_pos(menu.screen_pos + origin)
        .order(egui::Order::Foreground)
        .show(ui.ctx(), |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.vertical(|ui| {
                    for (action, separated) in menu.entries() {
                        if separated {
                            ui.separator();
                        }
                        if ui.button(action.label()).clicked() {
                            choice = Some(action);
                        }
                    }
                });
            })
        });

    if let Some(action) = choice {
        view.resolve_context_menu(scene, Some(action));
        return;
    }

    if !armed {
        return;
    }

    let (escape, clicked_outside, primary) = ui.input(|i| {
        let outside = i.pointer.any_pressed()
            && i
                .pointer
                .interact_pos()
                .is_some_and(|pos| !area_response.response.rect.contains(pos));
        (
            i.key_pressed(egui::Key::Escape),
            outside,
            i.pointer.primary_pressed(),
        )
    });
    if clicked_outside {
        view.dismiss_context_menu(scene, primary);
    } else if escape {
        view.resolve_context_menu(scene, None);
    }
}
