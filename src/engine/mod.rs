//! The floor-plan engine: grid geometry, placement rules, viewport and
//! pointer handling for one room at a time. It never talks to storage
//! directly; committed placements leave through [`FloorEvent`]s and come
//! back through [`FloorPlan::resolve_commit`].

use eframe::egui;
use serde::{Deserialize, Serialize};

use crate::model::{GridPos, ItemId, NewItem, PlacedItem, Room, RoomId};
use crate::store::StoreError;

pub mod commit;
pub mod error;
pub mod grid;
pub mod interaction;
pub mod keys;
pub mod occupancy;
pub mod planner;
pub mod viewport;

pub use commit::{CommitGateway, PendingCommit, PlacementStore};
pub use error::{CommitError, PlacementError};
pub use grid::{Grid, GridDefaults, Span};
pub use interaction::{DragSession, DropOutcome, Gesture, PointerDown};
pub use keys::{FloorKey, KeyCommand, KeyListener, KeyboardHub};
pub use occupancy::Placement;
pub use viewport::Viewport;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    pub cell_pixel_size: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub zoom_sensitivity: f32,
    pub default_translate: [f32; 2],
    pub grid: GridDefaults,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            cell_pixel_size: 40.0,
            min_scale: 0.2,
            max_scale: 2.5,
            zoom_sensitivity: 0.001,
            default_translate: [40.0, 40.0],
            grid: GridDefaults::default(),
        }
    }
}

impl FloorConfig {
    /// Repairs values a hand-edited settings file may get wrong.
    pub fn sanitized(self) -> Self {
        let fallback = FloorConfig::default();
        let positive = |v: f32, d: f32| if v.is_finite() && v > 0.0 { v } else { d };
        let mut min_scale = positive(self.min_scale, fallback.min_scale);
        let mut max_scale = positive(self.max_scale, fallback.max_scale);
        if min_scale > max_scale {
            std::mem::swap(&mut min_scale, &mut max_scale);
        }
        let [tx, ty] = self.default_translate;
        Self {
            cell_pixel_size: positive(self.cell_pixel_size, fallback.cell_pixel_size),
            min_scale,
            max_scale,
            zoom_sensitivity: if self.zoom_sensitivity.is_finite() {
                self.zoom_sensitivity
            } else {
                fallback.zoom_sensitivity
            },
            default_translate: if tx.is_finite() && ty.is_finite() {
                [tx, ty]
            } else {
                fallback.default_translate
            },
            grid: self.grid.sanitized(),
        }
    }

    pub fn default_translate(&self) -> egui::Vec2 {
        egui::vec2(self.default_translate[0], self.default_translate[1])
    }
}

/// Notifications for the host, drained with [`FloorPlan::drain_events`].
#[derive(Clone, Debug, PartialEq)]
pub enum FloorEvent {
    /// A validated placement that should be persisted. Answer with
    /// [`FloorPlan::resolve_commit`].
    PlacementCommitted(PlacedItem),
    PlacementRejected(PlacementError),
    CommitFailed { id: ItemId, message: String },
    ItemActivated(PlacedItem),
    SelectionChanged(Option<ItemId>),
    /// Delete was pressed on a selection; the host confirms before calling
    /// [`FloorPlan::remove_item`].
    DeleteRequested(ItemId),
}

/// An item as the engine holds it: the last known-good state plus the
/// position currently shown, which differs only while it is being dragged.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkingItem {
    pub committed: PlacedItem,
    pub working: GridPos,
}

impl WorkingItem {
    fn new(item: PlacedItem) -> Self {
        let working = item.position;
        Self {
            committed: item,
            working,
        }
    }

    pub fn id(&self) -> ItemId {
        self.committed.id
    }

    pub fn is_moving(&self) -> bool {
        self.working != self.committed.position
    }

    fn rollback(&mut self) {
        self.working = self.committed.position;
    }
}

pub struct FloorPlan {
    room: RoomId,
    room_name: String,
    grid: Grid,
    items: Vec<WorkingItem>,
    viewport: Viewport,
    gesture: Gesture,
    selected: Option<ItemId>,
    editing: Option<ItemId>,
    gateway: CommitGateway,
    events: Vec<FloorEvent>,
    config: FloorConfig,
}

impl FloorPlan {
    pub fn new(room: Room, config: FloorConfig) -> Self {
        let config = config.sanitized();
        let grid = grid::resolve(&room.geometry, &config.grid);
        tracing::info!(
            room = %room.id,
            cols = grid.cols,
            rows = grid.rows,
            items = room.items.len(),
            "floor plan opened"
        );
        Self {
            room: room.id,
            room_name: room.name,
            grid,
            gateway: CommitGateway::new(room.id, &room.items),
            items: room.items.into_iter().map(WorkingItem::new).collect(),
            viewport: Viewport::new(&config),
            gesture: Gesture::Idle,
            selected: None,
            editing: None,
            events: Vec::new(),
            config,
        }
    }

    /// Replaces the room shown. Everything tied to the previous room (view,
    /// gesture, selection, editor, sync snapshot) is dropped.
    pub fn set_room(&mut self, room: Room) {
        let had_selection = self.selected.is_some();
        let events = std::mem::take(&mut self.events);
        *self = FloorPlan::new(room, self.config);
        self.events = events;
        if had_selection {
            self.events.push(FloorEvent::SelectionChanged(None));
        }
    }

    pub fn room_id(&self) -> RoomId {
        self.room
    }

    pub fn room_name(&self) -> &str {
        &self.room_name
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &FloorConfig {
        &self.config
    }

    pub fn items(&self) -> &[WorkingItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&WorkingItem> {
        self.items.iter().find(|w| w.id() == id)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn reset_viewport(&mut self) {
        self.viewport.reset(&self.config);
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    pub fn editing(&self) -> Option<ItemId> {
        self.editing
    }

    pub fn is_saving(&self, id: ItemId) -> bool {
        self.gateway.is_in_flight(id)
    }

    pub fn span_of(&self, item: &PlacedItem) -> Span {
        self.grid.span_for(item.footprint)
    }

    pub fn committed_items(&self) -> Vec<PlacedItem> {
        self.items.iter().map(|w| w.committed.clone()).collect()
    }

    pub fn drain_events(&mut self) -> Vec<FloorEvent> {
        std::mem::take(&mut self.events)
    }

    /// World-space rectangle covered by a block of cells.
    pub fn cells_rect(&self, pos: GridPos, span: Span) -> egui::Rect {
        let cell = self.config.cell_pixel_size;
        egui::Rect::from_min_size(
            egui::pos2(pos.x as f32 * cell, pos.y as f32 * cell),
            egui::vec2(span.cols as f32 * cell, span.rows as f32 * cell),
        )
    }

    pub fn select(&mut self, id: Option<ItemId>) {
        if self.selected != id {
            self.selected = id;
            self.events.push(FloorEvent::SelectionChanged(id));
        }
    }

    pub fn close_editor(&mut self) {
        self.editing = None;
    }

    /// Places a new item in the first free slot.
    pub fn place_new(&mut self, draft: NewItem) -> Result<ItemId, PlacementError> {
        let span = self.grid.span_for(draft.footprint);
        match planner::plan(span, &self.committed_placements(), &self.grid) {
            Ok(pos) => self.insert_item(draft, pos),
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Places a new item at a chosen cell.
    pub fn place_new_at(&mut self, draft: NewItem, pos: GridPos) -> Result<ItemId, PlacementError> {
        let span = self.grid.span_for(draft.footprint);
        let candidate = Placement::new(None, pos, span);
        if let Err(err) = occupancy::check(&candidate, &self.committed_placements(), &self.grid) {
            return Err(self.reject(err));
        }
        self.insert_item(draft, pos)
    }

    /// Applies an edit from the item editor. Position and footprint are
    /// validated; a rejected edit leaves the item untouched.
    pub fn update_item(&mut self, edited: PlacedItem) -> Result<(), PlacementError> {
        let Some(idx) = self.index_of(edited.id) else {
            return Err(self.reject(PlacementError::UnknownItem(edited.id)));
        };
        if self.gateway.is_in_flight(edited.id) {
            return Err(self.reject(PlacementError::SaveInFlight(edited.id)));
        }
        let candidate = Placement::of(&edited, &self.grid);
        if let Err(err) = occupancy::check(&candidate, &self.committed_placements(), &self.grid) {
            return Err(self.reject(err));
        }
        if matches!(&self.gesture, Gesture::Dragging(s) if s.item_id == edited.id) {
            self.gesture = Gesture::Idle;
        }
        let id = edited.id;
        self.items[idx] = WorkingItem::new(edited);
        self.commit_changes(id);
        Ok(())
    }

    /// Moves the selected item by whole cells. An illegal move is dropped
    /// without an event, like an invalid drop.
    pub fn nudge_selected(&mut self, dx: i32, dy: i32) -> Result<(), PlacementError> {
        let Some(id) = self.selected else {
            return Ok(());
        };
        if !matches!(self.gesture, Gesture::Idle) {
            return Ok(());
        }
        let idx = self.index_of(id).ok_or(PlacementError::UnknownItem(id))?;
        if self.gateway.is_in_flight(id) {
            return Err(PlacementError::SaveInFlight(id));
        }
        let mut moved = self.items[idx].committed.clone();
        moved.position = moved.position.offset(dx, dy);
        let candidate = Placement::of(&moved, &self.grid);
        occupancy::check(&candidate, &self.committed_placements(), &self.grid)?;
        self.items[idx] = WorkingItem::new(moved);
        self.commit_changes(id);
        Ok(())
    }

    /// Drops an item after the host confirmed the deletion. An item with a
    /// save in flight is kept until that save is resolved.
    pub fn remove_item(&mut self, id: ItemId) -> Result<PlacedItem, PlacementError> {
        let idx = self.index_of(id).ok_or(PlacementError::UnknownItem(id))?;
        if self.gateway.is_in_flight(id) {
            return Err(PlacementError::SaveInFlight(id));
        }
        let removed = self.items.remove(idx).committed;
        self.gateway.forget(id);
        if matches!(&self.gesture, Gesture::Dragging(s) if s.item_id == id) {
            self.gesture = Gesture::Idle;
        }
        if self.editing == Some(id) {
            self.editing = None;
        }
        if self.selected == Some(id) {
            self.select(None);
        }
        tracing::info!(item = %id, room = %self.room, "item removed");
        Ok(removed)
    }

    /// Completes the save started by a `PlacementCommitted` event. A failed
    /// save is reported and left for the caller to roll back with
    /// [`FloorPlan::revert_to_synced`].
    pub fn resolve_commit(
        &mut self,
        id: ItemId,
        result: Result<(), StoreError>,
    ) -> Result<(), CommitError> {
        match self.gateway.complete(id, result) {
            Ok(item) => {
                tracing::debug!(item = %item.id, pos = %item.position, "placement saved");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(item = %id, error = %err, "placement save failed");
                self.events.push(FloorEvent::CommitFailed {
                    id,
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Restores an item to its last saved state. Items that were never
    /// saved are removed.
    pub fn revert_to_synced(&mut self, id: ItemId) {
        let Some(idx) = self.index_of(id) else {
            return;
        };
        match self.gateway.synced(id).cloned() {
            Some(item) => {
                if matches!(&self.gesture, Gesture::Dragging(s) if s.item_id == id) {
                    self.gesture = Gesture::Idle;
                }
                self.items[idx] = WorkingItem::new(item);
            }
            None => {
                let _ = self.remove_item(id);
            }
        }
    }

    fn insert_item(&mut self, draft: NewItem, pos: GridPos) -> Result<ItemId, PlacementError> {
        let id = self.next_item_id();
        let item = draft.into_placed(id, pos);
        tracing::debug!(item = %id, pos = %pos, "item placed");
        self.items.push(WorkingItem::new(item));
        self.select(Some(id));
        self.commit_changes(id);
        Ok(id)
    }

    fn reject(&mut self, err: PlacementError) -> PlacementError {
        tracing::debug!(error = %err, "placement rejected");
        self.events.push(FloorEvent::PlacementRejected(err.clone()));
        err
    }

    /// Hands `id` to the store if its committed state differs from the
    /// last saved one.
    fn commit_changes(&mut self, id: ItemId) {
        let items = self.committed_items();
        match self.gateway.begin(&items, id) {
            Ok(Some(pending)) => {
                tracing::debug!(item = %pending.item.id, room = %pending.room, "commit started");
                self.events.push(FloorEvent::PlacementCommitted(pending.item));
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(item = %id, error = %err, "commit not started");
                self.events.push(FloorEvent::CommitFailed {
                    id,
                    message: err.to_string(),
                });
            }
        }
    }

    fn committed_placements(&self) -> Vec<Placement> {
        self.items
            .iter()
            .map(|w| Placement::of(&w.committed, &self.grid))
            .collect()
    }

    fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|w| w.id() == id)
    }

    fn next_item_id(&self) -> ItemId {
        let max_local = self.items.iter().map(|w| w.id().0).max().unwrap_or(0);
        ItemId(max_local.max(self.gateway.max_known_id()) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Footprint, ItemKind, RoomGeometry};

    pub(crate) fn room_with(items: Vec<PlacedItem>) -> Room {
        Room {
            id: RoomId(1),
            name: "Hall A".to_string(),
            geometry: RoomGeometry::new(12.0, 12.0, 60.0, 60.0),
            items,
        }
    }

    pub(crate) fn item(id: u64, x: i32, y: i32) -> PlacedItem {
        PlacedItem {
            id: ItemId(id),
            name: format!("R-{id:02}"),
            kind: ItemKind::Rack,
            position: GridPos::new(x, y),
            footprint: None,
            status: Default::default(),
            meta: Default::default(),
        }
    }

    fn draft(name: &str) -> NewItem {
        NewItem {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn place_then_reject_overlap_then_accept_neighbour() {
        let mut plan = FloorPlan::new(room_with(vec![]), FloorConfig::default());
        assert_eq!((plan.grid().cols, plan.grid().rows), (20, 20));

        let a = plan.place_new_at(draft("A"), GridPos::new(0, 0)).unwrap();
        let err = plan.place_new_at(draft("B"), GridPos::new(0, 0)).unwrap_err();
        assert_eq!(
            err,
            PlacementError::Overlap {
                pos: GridPos::ORIGIN,
                other: a
            }
        );
        let b = plan.place_new_at(draft("B"), GridPos::new(1, 0)).unwrap();
        assert_ne!(a, b);
        assert_eq!(plan.items().len(), 2);

        let events = plan.drain_events();
        assert!(events.contains(&FloorEvent::PlacementRejected(err)));
        let committed: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                FloorEvent::PlacementCommitted(item) => Some(item.id),
                _ => None,
            })
            .collect();
        assert_eq!(committed, vec![a, b]);
    }

    #[test]
    fn planner_fills_row_by_row() {
        let mut plan = FloorPlan::new(room_with(vec![item(1, 0, 0)]), FloorConfig::default());
        let id = plan.place_new(draft("new")).unwrap();
        assert_eq!(plan.item(id).unwrap().committed.position, GridPos::new(1, 0));
        assert_eq!(plan.selected(), Some(id));
    }

    #[test]
    fn full_room_reports_no_free_space() {
        let mut room = room_with(vec![]);
        room.geometry = RoomGeometry::new(1.2, 0.6, 60.0, 60.0);
        room.items = vec![item(1, 0, 0), item(2, 1, 0)];
        let mut plan = FloorPlan::new(room, FloorConfig::default());
        let err = plan.place_new(draft("late")).unwrap_err();
        assert_eq!(err, PlacementError::NoFreeSpace { span: Span::ONE });
        assert_eq!(plan.items().len(), 2);
        assert_eq!(
            plan.drain_events(),
            vec![FloorEvent::PlacementRejected(err)]
        );
    }

    #[test]
    fn new_ids_follow_highest_known_id() {
        let mut plan = FloorPlan::new(room_with(vec![item(9, 0, 0)]), FloorConfig::default());
        let id = plan.place_new(draft("x")).unwrap();
        assert_eq!(id, ItemId(10));
        plan.resolve_commit(id, Ok(())).unwrap();
        plan.remove_item(id).unwrap();
        let again = plan.place_new(draft("y")).unwrap();
        assert_eq!(again, ItemId(10));
    }

    #[test]
    fn editor_resize_into_neighbour_is_rejected() {
        let mut plan = FloorPlan::new(
            room_with(vec![item(1, 0, 0), item(2, 2, 0)]),
            FloorConfig::default(),
        );
        let mut edited = plan.item(ItemId(1)).unwrap().committed.clone();
        edited.footprint = Some(Footprint {
            width_m: 1.8,
            length_m: 0.6,
        });
        let err = plan.update_item(edited.clone()).unwrap_err();
        assert!(matches!(err, PlacementError::Overlap { other: ItemId(2), .. }));
        assert_eq!(plan.item(ItemId(1)).unwrap().committed.footprint, None);

        edited.footprint = Some(Footprint {
            width_m: 1.2,
            length_m: 0.6,
        });
        edited.name = "R-01 wide".to_string();
        plan.update_item(edited.clone()).unwrap();
        assert_eq!(plan.item(ItemId(1)).unwrap().committed, edited);
        assert!(plan.drain_events().contains(&FloorEvent::PlacementCommitted(edited)));
    }

    #[test]
    fn editor_move_out_of_room_is_rejected() {
        let mut plan = FloorPlan::new(room_with(vec![item(1, 0, 0)]), FloorConfig::default());
        let mut edited = plan.item(ItemId(1)).unwrap().committed.clone();
        edited.position = GridPos::new(20, 0);
        assert!(matches!(
            plan.update_item(edited),
            Err(PlacementError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn nudge_moves_selection_and_stops_at_walls() {
        let mut plan = FloorPlan::new(room_with(vec![item(1, 0, 0)]), FloorConfig::default());
        plan.select(Some(ItemId(1)));
        plan.nudge_selected(1, 0).unwrap();
        assert_eq!(plan.item(ItemId(1)).unwrap().committed.position, GridPos::new(1, 0));
        plan.resolve_commit(ItemId(1), Ok(())).unwrap();
        assert!(plan.nudge_selected(0, -1).is_err());
        assert_eq!(plan.item(ItemId(1)).unwrap().committed.position, GridPos::new(1, 0));
    }

    #[test]
    fn failed_save_can_be_rolled_back() {
        let mut plan = FloorPlan::new(room_with(vec![item(1, 0, 0)]), FloorConfig::default());
        plan.select(Some(ItemId(1)));
        plan.nudge_selected(0, 1).unwrap();
        plan.drain_events();

        let err = plan
            .resolve_commit(ItemId(1), Err(StoreError::Rejected("locked".into())))
            .unwrap_err();
        assert!(matches!(err, CommitError::Store { .. }));
        assert_eq!(plan.item(ItemId(1)).unwrap().committed.position, GridPos::new(0, 1));
        assert!(matches!(
            plan.drain_events().as_slice(),
            [FloorEvent::CommitFailed { id: ItemId(1), .. }]
        ));

        plan.revert_to_synced(ItemId(1));
        let restored = plan.item(ItemId(1)).unwrap();
        assert_eq!(restored.committed.position, GridPos::ORIGIN);
        assert_eq!(restored.working, GridPos::ORIGIN);
    }

    #[test]
    fn failed_save_of_new_item_removes_it_on_rollback() {
        let mut plan = FloorPlan::new(room_with(vec![]), FloorConfig::default());
        let id = plan.place_new(draft("ghost")).unwrap();
        let _ = plan.resolve_commit(id, Err(StoreError::Rejected("offline".into())));
        plan.revert_to_synced(id);
        assert!(plan.item(id).is_none());
        assert_eq!(plan.selected(), None);
    }

    #[test]
    fn edits_wait_for_in_flight_save() {
        let mut plan = FloorPlan::new(room_with(vec![item(1, 0, 0)]), FloorConfig::default());
        plan.select(Some(ItemId(1)));
        plan.nudge_selected(1, 0).unwrap();
        assert!(plan.is_saving(ItemId(1)));
        assert_eq!(
            plan.nudge_selected(1, 0),
            Err(PlacementError::SaveInFlight(ItemId(1)))
        );
        plan.resolve_commit(ItemId(1), Ok(())).unwrap();
        assert!(!plan.is_saving(ItemId(1)));
        plan.nudge_selected(1, 0).unwrap();
        assert_eq!(plan.item(ItemId(1)).unwrap().committed.position, GridPos::new(2, 0));
    }

    #[test]
    fn removal_waits_for_in_flight_save() {
        let mut plan = FloorPlan::new(room_with(vec![item(1, 0, 0)]), FloorConfig::default());
        plan.select(Some(ItemId(1)));
        plan.nudge_selected(1, 0).unwrap();
        plan.drain_events();

        assert_eq!(
            plan.remove_item(ItemId(1)),
            Err(PlacementError::SaveInFlight(ItemId(1)))
        );
        assert!(plan.item(ItemId(1)).is_some());
        plan.resolve_commit(ItemId(1), Ok(())).unwrap();
        assert!(plan.drain_events().is_empty());

        let removed = plan.remove_item(ItemId(1)).unwrap();
        assert_eq!(removed.position, GridPos::new(1, 0));
        assert_eq!(
            plan.remove_item(ItemId(1)),
            Err(PlacementError::UnknownItem(ItemId(1)))
        );
    }

    #[test]
    fn failed_save_left_in_place_does_not_block_other_items() {
        let mut plan = FloorPlan::new(
            room_with(vec![item(1, 0, 0), item(2, 0, 2)]),
            FloorConfig::default(),
        );
        plan.select(Some(ItemId(1)));
        plan.nudge_selected(1, 0).unwrap();
        plan.drain_events();
        let _ = plan.resolve_commit(ItemId(1), Err(StoreError::Rejected("offline".into())));
        plan.drain_events();

        plan.select(Some(ItemId(2)));
        plan.nudge_selected(1, 0).unwrap();
        let committed: Vec<_> = plan
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                FloorEvent::PlacementCommitted(item) => Some((item.id, item.position)),
                _ => None,
            })
            .collect();
        assert_eq!(committed, vec![(ItemId(2), GridPos::new(1, 2))]);
        assert!(plan.is_saving(ItemId(2)));
        assert!(!plan.is_saving(ItemId(1)));
    }

    #[test]
    fn switching_rooms_resets_view_and_selection() {
        let mut plan = FloorPlan::new(room_with(vec![item(1, 0, 0)]), FloorConfig::default());
        plan.select(Some(ItemId(1)));
        plan.viewport_mut().scroll_by(egui::vec2(300.0, -20.0));
        plan.drain_events();

        let mut other = room_with(vec![]);
        other.id = RoomId(2);
        other.geometry = RoomGeometry::new(6.0, 3.0, 60.0, 60.0);
        plan.set_room(other);

        assert_eq!(plan.room_id(), RoomId(2));
        assert_eq!((plan.grid().cols, plan.grid().rows), (10, 5));
        assert_eq!(*plan.viewport(), Viewport::new(plan.config()));
        assert_eq!(plan.selected(), None);
        assert!(plan.items().is_empty());
        assert_eq!(plan.drain_events(), vec![FloorEvent::SelectionChanged(None)]);
    }

    #[test]
    fn config_repairs_inverted_scale_range() {
        let config = FloorConfig {
            min_scale: 3.0,
            max_scale: 0.5,
            cell_pixel_size: -4.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!((config.min_scale, config.max_scale), (0.5, 3.0));
        assert_eq!(config.cell_pixel_size, 40.0);
    }
}
