use eframe::egui;

use crate::model::{GridPos, ItemId};

use super::error::PlacementError;
use super::occupancy::{self, Placement};
use super::{FloorEvent, FloorPlan};

/// Item grabbed by the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub item_id: ItemId,
    /// Pointer position relative to the item's top-left corner, in world units.
    pub grab_offset: egui::Vec2,
    /// Where the item was when the drag started; restored on an invalid drop.
    pub start: GridPos,
}

/// Pointer gesture in progress. Panning and dragging exclude each other.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Panning {
        anchor: egui::Vec2,
    },
    Dragging(DragSession),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerDown {
    PanStarted,
    DragStarted(ItemId),
    /// The item was selected but cannot be dragged while it is being saved.
    Selected(ItemId),
    /// Another gesture is already running.
    Ignored,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DropOutcome {
    Moved {
        id: ItemId,
        from: GridPos,
        to: GridPos,
    },
    Reverted {
        id: ItemId,
        to: GridPos,
        reason: PlacementError,
    },
    Unmoved(ItemId),
    PanEnded,
    Idle,
}

impl FloorPlan {
    /// Topmost item under a canvas position. Later items draw above earlier
    /// ones, so the list is searched back to front.
    pub fn item_at(&self, pointer: egui::Pos2) -> Option<ItemId> {
        let world = self.viewport.canvas_to_world(pointer);
        let cell = self.config.cell_pixel_size;
        let (cx, cy) = (world.x / cell, world.y / cell);
        self.items
            .iter()
            .rev()
            .find(|w| {
                Placement::new(Some(w.id()), w.working, self.span_of(&w.committed))
                    .contains_cell(cx, cy)
            })
            .map(|w| w.id())
    }

    /// Cell under a canvas position. May lie outside the room.
    pub fn cell_at(&self, pointer: egui::Pos2) -> GridPos {
        let world = self.viewport.canvas_to_world(pointer);
        let cell = self.config.cell_pixel_size;
        GridPos::new((world.x / cell).floor() as i32, (world.y / cell).floor() as i32)
    }

    pub fn pointer_down(&mut self, pointer: egui::Pos2) -> PointerDown {
        if !matches!(self.gesture, Gesture::Idle) {
            return PointerDown::Ignored;
        }
        let Some(id) = self.item_at(pointer) else {
            self.gesture = Gesture::Panning {
                anchor: self.viewport.pan_anchor(pointer),
            };
            self.select(None);
            tracing::debug!("pan started");
            return PointerDown::PanStarted;
        };
        self.select(Some(id));
        if self.gateway.is_in_flight(id) {
            return PointerDown::Selected(id);
        }
        let Some(item) = self.item(id) else {
            return PointerDown::Ignored;
        };
        let origin = self.cells_rect(item.working, self.span_of(&item.committed)).min;
        let session = DragSession {
            item_id: id,
            grab_offset: self.viewport.canvas_to_world(pointer) - origin,
            start: item.committed.position,
        };
        self.gesture = Gesture::Dragging(session);
        tracing::debug!(item = %id, start = %session.start, "drag started");
        PointerDown::DragStarted(id)
    }

    /// Updates the running gesture. Dragged items follow the pointer without
    /// validation; the drop decides. Returns whether anything moved.
    pub fn pointer_move(&mut self, pointer: egui::Pos2) -> bool {
        match self.gesture {
            Gesture::Idle => false,
            Gesture::Panning { anchor } => {
                self.viewport.pan_to(pointer, anchor);
                true
            }
            Gesture::Dragging(session) => {
                let target = self.drag_target(&session, pointer);
                match self.items.iter_mut().find(|w| w.id() == session.item_id) {
                    Some(item) if item.working != target => {
                        item.working = target;
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    /// Ends the running gesture. A drop on a legal cell is committed; an
    /// illegal one puts the item back where the drag started.
    pub fn pointer_up(&mut self, pointer: egui::Pos2) -> DropOutcome {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => DropOutcome::Idle,
            Gesture::Panning { anchor } => {
                self.viewport.pan_to(pointer, anchor);
                DropOutcome::PanEnded
            }
            Gesture::Dragging(session) => self.finish_drag(session, pointer),
        }
    }

    /// Abandons the running gesture, putting a dragged item back.
    pub fn cancel_gesture(&mut self) {
        if let Gesture::Dragging(session) = std::mem::take(&mut self.gesture) {
            if let Some(item) = self.items.iter_mut().find(|w| w.id() == session.item_id) {
                item.rollback();
            }
            tracing::debug!(item = %session.item_id, "drag cancelled");
        }
    }

    /// Wheel input, with deltas in page convention (positive is scrolling
    /// down). With the zoom modifier held the view zooms around the cursor,
    /// otherwise it scrolls. Ignored while panning.
    pub fn wheel(&mut self, cursor: egui::Pos2, delta: egui::Vec2, zoom: bool) -> bool {
        if matches!(self.gesture, Gesture::Panning { .. }) {
            return false;
        }
        if zoom {
            self.viewport.zoom_at(cursor, delta.y, &self.config)
        } else if delta != egui::Vec2::ZERO {
            self.viewport.scroll_by(-delta);
            true
        } else {
            false
        }
    }

    /// Double click or double tap on an item opens its editor. Any drag in
    /// progress is abandoned first.
    pub fn double_activate(&mut self, pointer: egui::Pos2) -> Option<ItemId> {
        let id = self.item_at(pointer)?;
        self.activate(id).then_some(id)
    }

    /// Opens the editor for `id`, as a double click on it would.
    pub fn activate(&mut self, id: ItemId) -> bool {
        let Some(item) = self.item(id).map(|w| w.committed.clone()) else {
            return false;
        };
        self.cancel_gesture();
        self.select(Some(id));
        self.editing = Some(id);
        self.events.push(FloorEvent::ItemActivated(item));
        true
    }

    /// Toolbar zoom: multiplies the scale around the canvas centre.
    pub fn step_zoom(&mut self, factor: f32, canvas_size: egui::Vec2) -> bool {
        let center = (canvas_size * 0.5).to_pos2();
        let target = self.viewport.scale * factor;
        self.viewport.zoom_to(center, target, &self.config)
    }

    /// Selects an item and scrolls it to the middle of the canvas.
    pub fn focus_item(&mut self, id: ItemId, canvas_size: egui::Vec2) -> bool {
        let Some(item) = self.item(id) else {
            return false;
        };
        let center = self.cells_rect(item.working, self.span_of(&item.committed)).center();
        self.viewport.center_on(center, canvas_size);
        self.select(Some(id));
        true
    }

    fn drag_target(&self, session: &DragSession, pointer: egui::Pos2) -> GridPos {
        let top_left = self.viewport.canvas_to_world(pointer) - session.grab_offset;
        let cell = self.config.cell_pixel_size;
        GridPos::new(
            (top_left.x / cell).round() as i32,
            (top_left.y / cell).round() as i32,
        )
    }

    fn finish_drag(&mut self, session: DragSession, pointer: egui::Pos2) -> DropOutcome {
        let id = session.item_id;
        let target = self.drag_target(&session, pointer);
        let placements = self.committed_placements();
        let Some(idx) = self.index_of(id) else {
            return DropOutcome::Idle;
        };
        if target == session.start {
            self.items[idx].working = session.start;
            return DropOutcome::Unmoved(id);
        }
        let span = self.span_of(&self.items[idx].committed);
        let candidate = Placement::new(Some(id), target, span);
        match occupancy::check(&candidate, &placements, &self.grid) {
            Ok(()) => {
                let item = &mut self.items[idx];
                item.committed.position = target;
                item.working = target;
                tracing::debug!(item = %id, from = %session.start, to = %target, "drop accepted");
                self.commit_changes(id);
                DropOutcome::Moved {
                    id,
                    from: session.start,
                    to: target,
                }
            }
            Err(reason) => {
                self.items[idx].working = session.start;
                tracing::debug!(item = %id, error = %reason, "drop reverted");
                DropOutcome::Reverted {
                    id,
                    to: session.start,
                    reason,
                }
            }
        }
    }
}
