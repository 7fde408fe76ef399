use crate::engine::{FloorPlan, Gesture, Span, WorkingItem};
use crate::model::{GridPos, ItemStatus};
use eframe::egui;

use super::settings::KindPalette;

const SELECTION: egui::Color32 = egui::Color32::from_rgb(90, 160, 255);

/// Screen position of a world point on a canvas whose top-left is `origin`.
fn to_screen(plan: &FloorPlan, origin: egui::Pos2, world: egui::Pos2) -> egui::Pos2 {
    origin + plan.viewport().world_to_canvas(world).to_vec2()
}

fn world_rect_to_screen(plan: &FloorPlan, origin: egui::Pos2, rect: egui::Rect) -> egui::Rect {
    egui::Rect::from_min_max(to_screen(plan, origin, rect.min), to_screen(plan, origin, rect.max))
}

pub(super) fn draw_floor(painter: &egui::Painter, rect: egui::Rect, plan: &FloorPlan, kinds: &KindPalette) {
    let visuals = painter.ctx().style().visuals.clone();
    painter.rect_filled(rect, 0.0, visuals.extreme_bg_color);

    let grid = plan.grid();
    let room_world = plan.cells_rect(GridPos::ORIGIN, Span::new(grid.cols, grid.rows));
    let room = world_rect_to_screen(plan, rect.min, room_world);
    painter.rect_filled(room, 0.0, visuals.faint_bg_color);
    draw_tiles(painter, rect, room, grid.cols, grid.rows);
    painter.rect_stroke(
        room,
        0.0,
        egui::Stroke::new(2.0, egui::Color32::from_gray(140)),
        egui::StrokeKind::Outside,
    );

    let dragged = match plan.gesture() {
        Gesture::Dragging(session) => Some(session.item_id),
        _ => None,
    };
    for item in plan.items() {
        if Some(item.id()) != dragged {
            draw_item(painter, rect.min, plan, item, kinds);
        }
    }
    // the dragged item is drawn last so it stays on top while moving
    if let Some(item) = dragged.and_then(|id| plan.item(id)) {
        draw_item(painter, rect.min, plan, item, kinds);
    }
}

fn draw_tiles(painter: &egui::Painter, clip: egui::Rect, room: egui::Rect, cols: u32, rows: u32) {
    let cell = egui::vec2(room.width() / cols as f32, room.height() / rows as f32);
    if cell.x < 6.0 || cell.y < 6.0 {
        return;
    }
    let stroke = egui::Stroke::new(1.0, egui::Color32::from_gray(70));
    let top = room.min.y.max(clip.min.y);
    let bottom = room.max.y.min(clip.max.y);
    for c in 1..cols {
        let x = room.min.x + c as f32 * cell.x;
        if x >= clip.min.x && x <= clip.max.x {
            painter.line_segment([egui::pos2(x, top), egui::pos2(x, bottom)], stroke);
        }
    }
    let left = room.min.x.max(clip.min.x);
    let right = room.max.x.min(clip.max.x);
    for r in 1..rows {
        let y = room.min.y + r as f32 * cell.y;
        if y >= clip.min.y && y <= clip.max.y {
            painter.line_segment([egui::pos2(left, y), egui::pos2(right, y)], stroke);
        }
    }
}

fn draw_item(
    painter: &egui::Painter,
    origin: egui::Pos2,
    plan: &FloorPlan,
    item: &WorkingItem,
    kinds: &KindPalette,
) {
    let placed = &item.committed;
    let span = plan.span_of(placed);
    let r = world_rect_to_screen(plan, origin, plan.cells_rect(item.working, span)).shrink(1.0);
    let look = kinds.look(placed.kind);

    let mut fill = placed.meta.color.map(|c| c.to_color32()).unwrap_or(look.fill);
    if placed.status == ItemStatus::PendingApproval {
        fill = fill.gamma_multiply(0.6);
    }
    if item.is_moving() {
        fill = fill.gamma_multiply(0.75);
    }
    painter.rect_filled(r, 2.0, fill);

    let selected = plan.selected() == Some(item.id());
    let outline = if selected {
        egui::Stroke::new(2.0, SELECTION)
    } else {
        egui::Stroke::new(1.0, egui::Color32::from_gray(30))
    };
    if plan.is_saving(item.id()) {
        draw_dashed_rect(painter, r, outline);
    } else {
        painter.rect_stroke(r, 2.0, outline, egui::StrokeKind::Inside);
    }

    let scale = plan.viewport().scale;
    let glyph_size = (r.height().min(r.width()) * 0.45).clamp(6.0, 28.0);
    if r.width() >= 12.0 && r.height() >= 12.0 {
        painter.text(
            r.center(),
            egui::Align2::CENTER_CENTER,
            &look.glyph,
            egui::FontId::proportional(glyph_size),
            egui::Color32::WHITE,
        );
    }
    if scale >= 0.6 {
        painter.text(
            egui::pos2(r.center().x, r.max.y + 2.0),
            egui::Align2::CENTER_TOP,
            &placed.name,
            egui::FontId::proportional(11.0 * scale.min(1.5)),
            painter.ctx().style().visuals.text_color(),
        );
    }
}

fn draw_dashed_rect(painter: &egui::Painter, r: egui::Rect, stroke: egui::Stroke) {
    let corners = [r.left_top(), r.right_top(), r.right_bottom(), r.left_bottom(), r.left_top()];
    for pair in corners.windows(2) {
        draw_dashed_line(painter, pair[0], pair[1], stroke, 6.0, 4.0);
    }
}

fn draw_dashed_line(
    painter: &egui::Painter,
    a: egui::Pos2,
    b: egui::Pos2,
    stroke: egui::Stroke,
    dash_len: f32,
    gap_len: f32,
) {
    let v = b - a;
    let len = v.length();
    if len <= f32::EPSILON {
        return;
    }
    let dir = v / len;
    let mut pos = 0.0;
    let mut drawing = true;
    while pos < len {
        let seg_len = if drawing { dash_len } else { gap_len };
        let next_pos = (pos + seg_len).min(len);
        if drawing {
            painter.line_segment([a + dir * pos, a + dir * next_pos], stroke);
        }
        pos = next_pos;
        drawing = !drawing;
    }
}
