use std::time::Instant;

use egui::{CursorIcon, FontId, Rect, Sense, Stroke, Ui};

use crate::grid::{CellKey, Grid, SelectionEngine, END_HOUR, FIRST_DAY, LAST_DAY, START_HOUR};
use super::theme;

pub const DAY_NAMES: [&str; 5] = ["MON", "TUE", "WED", "THU", "FRI"];

const LABEL_WIDTH: f32 = 56.0;
const HEADER_HEIGHT: f32 = 24.0;
const ROW_HEIGHT: f32 = 44.0;
const GAP: f32 = 4.0;

/// Render the weekly activity grid and feed pointer gestures to the
/// selection engine. Pure projection: everything drawn comes from `grid` and
/// `engine`, nothing is read back out of the widgets.
pub fn render_grid(ui: &mut Ui, grid: &Grid, engine: &mut SelectionEngine, now: Instant) {
    let num_days = (LAST_DAY - FIRST_DAY + 1) as f32;
    let num_rows = (END_HOUR - START_HOUR + 1) as f32;

    let avail_w = ui.available_width();
    let day_w = ((avail_w - LABEL_WIDTH - GAP * num_days) / num_days).max(60.0);
    let total_h = HEADER_HEIGHT + num_rows * (ROW_HEIGHT + GAP);
    let (outer, _) = ui.allocate_exact_size(egui::vec2(avail_w, total_h), Sense::hover());

    let label_font = FontId::proportional(13.0);
    let cell_font = FontId::proportional(13.0);
    let label_color = theme::grid_label_color();

    // Day header
    for (idx, name) in DAY_NAMES.iter().enumerate() {
        let x = outer.min.x + LABEL_WIDTH + GAP + idx as f32 * (day_w + GAP);
        let center = egui::pos2(x + day_w / 2.0, outer.min.y + HEADER_HEIGHT / 2.0);
        ui.painter().text(
            center,
            egui::Align2::CENTER_CENTER,
            *name,
            label_font.clone(),
            label_color,
        );
    }

    let mut hovered_cell: Option<CellKey> = None;

    for (row, hour) in (START_HOUR..=END_HOUR).enumerate() {
        let y = outer.min.y + HEADER_HEIGHT + GAP + row as f32 * (ROW_HEIGHT + GAP);

        // Hour label
        ui.painter().text(
            egui::pos2(outer.min.x + LABEL_WIDTH - 8.0, y + ROW_HEIGHT / 2.0),
            egui::Align2::RIGHT_CENTER,
            format!("{:02}:00", hour),
            label_font.clone(),
            label_color,
        );

        for (col, day) in (FIRST_DAY..=LAST_DAY).enumerate() {
            let Some(cell) = CellKey::new(hour, day) else {
                continue;
            };
            let x = outer.min.x + LABEL_WIDTH + GAP + col as f32 * (day_w + GAP);
            let rect = Rect::from_min_size(egui::pos2(x, y), egui::vec2(day_w, ROW_HEIGHT));

            let response = ui.interact(
                rect,
                ui.id().with(("cell", hour, day)),
                Sense::click_and_drag(),
            );
            if response.hovered() {
                hovered_cell = Some(cell);
                ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
            }

            let text = grid.get(cell);
            let (fill, border, text_color) = theme::cell_colors(
                engine.is_selected(cell),
                response.hovered(),
                text.is_some(),
            );
            let painter = ui.painter();
            painter.rect_filled(rect, 4.0, fill);
            painter.rect_stroke(rect, 4.0, Stroke::new(1.0, border));

            if let Some(text) = text {
                // Wrap to the cell width, clip anything past two lines
                let galley = painter.layout(
                    text.to_string(),
                    cell_font.clone(),
                    text_color,
                    day_w - 12.0,
                );
                let text_pos = egui::pos2(
                    rect.center().x - galley.size().x.min(day_w - 12.0) / 2.0,
                    rect.center().y - (galley.size().y / 2.0).min(ROW_HEIGHT / 2.0 - 4.0),
                );
                painter.with_clip_rect(rect.shrink(2.0)).galley(
                    text_pos,
                    galley,
                    text_color,
                );
            }
        }
    }

    // Feed the engine. Gestures that never touched a cell are ignored so a
    // click on surrounding chrome cannot re-trigger the edit dialog.
    let additive = ui.input(|i| i.modifiers.command);
    let (pointer_pos, pressed, released) = ui.input(|i| {
        (
            i.pointer.interact_pos(),
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
        )
    });

    if let Some(pos) = pointer_pos {
        if pressed {
            if let Some(cell) = hovered_cell {
                engine.pointer_down(cell, pos.x, pos.y, now, additive);
            }
        }
        if engine.is_active() {
            engine.pointer_move(pos.x, pos.y);
            if engine.is_dragging() {
                if let Some(cell) = hovered_cell {
                    engine.pointer_enter(cell, additive);
                }
            }
        }
    }
    if released && engine.is_active() {
        engine.pointer_up(now, additive);
    }
}
