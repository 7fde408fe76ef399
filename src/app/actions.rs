use crate::engine::{FloorEvent, FloorPlan, PlacementStore};
use crate::model::{GridPos, ItemId, NewItem, PlacedItem, RoomId};
use crate::store::JsonFileStore;

use super::editor::{ItemEditor, NewItemForm};
use super::settings;
use super::{FloorPlanApp, FloorView};

impl FloorPlanApp {
    pub(super) fn open_floor(&mut self, path: &str) {
        match JsonFileStore::open(path) {
            Ok(store) => {
                let room = self
                    .settings
                    .last_room
                    .map(RoomId)
                    .filter(|id| store.room(*id).is_some())
                    .or_else(|| store.rooms().first().map(|r| r.id));
                self.settings.floor_path = store.path().display().to_string();
                self.store = Some(store);
                match room {
                    Some(id) => self.open_room(id),
                    None => {
                        self.floor = None;
                        self.status = Some(format!("{} has no rooms", self.settings.floor_path));
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "cannot open floor file");
                self.status = Some(format!("Open failed: {e}"));
            }
        }
    }

    pub(super) fn open_floor_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            let path = path.display().to_string();
            self.open_floor(&path);
            self.persist_settings();
        }
    }

    pub(super) fn reload_floor(&mut self) {
        let path = self.settings.floor_path.clone();
        self.open_floor(&path);
    }

    /// Shows `id`, dropping everything tied to the room on screen. The old
    /// keyboard listener is detached before the new one is attached.
    pub(super) fn open_room(&mut self, id: RoomId) {
        let Some(room) = self.store.as_ref().and_then(|s| s.room(id)).cloned() else {
            self.status = Some(format!("Unknown {id}"));
            return;
        };
        let name = room.name.clone();
        self.editor = None;
        self.new_item = None;
        self.confirm_delete = None;
        match &mut self.floor {
            Some(view) => {
                view.keys.detach();
                view.plan.set_room(room);
                view.keys = self.keyboard.listen();
            }
            None => {
                self.floor = Some(FloorView {
                    plan: FloorPlan::new(room, self.settings.floor),
                    keys: self.keyboard.listen(),
                });
            }
        }
        if self.settings.last_room != Some(id.0) {
            self.settings.last_room = Some(id.0);
            self.persist_settings();
        }
        self.status = Some(format!("Opened {name}"));
    }

    pub(super) fn persist_settings(&mut self) {
        if let Err(e) = settings::save_settings(&self.settings_path, &self.settings) {
            tracing::warn!(path = %self.settings_path, error = %e, "cannot save settings");
            self.status = Some(format!("Settings save failed: {e}"));
        }
    }

    pub(super) fn open_new_item(&mut self, at: Option<GridPos>) {
        if let Some(view) = &self.floor {
            self.new_item = Some(NewItemForm::new(at, view.plan.grid()));
        }
    }

    pub(super) fn open_editor(&mut self, item: PlacedItem) {
        if let Some(view) = &self.floor {
            self.editor = Some(ItemEditor::new(item, view.plan.grid()));
        }
    }

    pub(super) fn edit_selected(&mut self) {
        if let Some(view) = &mut self.floor {
            if let Some(id) = view.plan.selected() {
                view.plan.activate(id);
            }
        }
    }

    pub(super) fn request_delete_selected(&mut self) {
        if let Some(id) = self.floor.as_ref().and_then(|v| v.plan.selected()) {
            self.confirm_delete = Some(id);
        }
    }

    pub(super) fn create_item(&mut self, draft: NewItem, at: Option<GridPos>) -> bool {
        let Some(view) = &mut self.floor else {
            return false;
        };
        let result = match at {
            Some(pos) => view.plan.place_new_at(draft, pos),
            None => view.plan.place_new(draft),
        };
        let placed = result.is_ok();
        if let Ok(id) = result {
            let size = self.canvas_size;
            view.plan.focus_item(id, size);
        }
        placed
    }

    pub(super) fn save_edit(&mut self, edited: PlacedItem) -> bool {
        match &mut self.floor {
            Some(view) => view.plan.update_item(edited).is_ok(),
            None => false,
        }
    }

    /// Removes an item after the user confirmed. If the store refuses, the
    /// room is reloaded so the view matches the file again.
    pub(super) fn delete_confirmed(&mut self, id: ItemId) {
        let (Some(view), Some(store)) = (&mut self.floor, &mut self.store) else {
            return;
        };
        let room = view.plan.room_id();
        let removed = match view.plan.remove_item(id) {
            Ok(removed) => removed,
            Err(e) => {
                self.status = Some(format!("Not deleted: {e}"));
                return;
            }
        };
        match store.delete_item(room, id) {
            Ok(()) => self.status = Some(format!("Deleted {}", removed.name)),
            Err(e) => {
                tracing::warn!(item = %id, error = %e, "delete failed");
                self.status = Some(format!("Delete failed: {e}"));
                self.open_room(room);
            }
        }
    }

    /// Answers the engine's events: commits go to the store, failed saves
    /// are rolled back, and the rest drive the windows and status line.
    pub(super) fn process_events(&mut self) {
        loop {
            let events = match &mut self.floor {
                Some(view) => view.plan.drain_events(),
                None => return,
            };
            if events.is_empty() {
                return;
            }
            for event in events {
                self.handle_event(event);
            }
        }
    }

    fn handle_event(&mut self, event: FloorEvent) {
        match event {
            FloorEvent::PlacementCommitted(item) => self.persist_item(item),
            FloorEvent::PlacementRejected(err) => {
                self.status = Some(format!("Not placed: {err}"));
            }
            FloorEvent::CommitFailed { id, message } => {
                self.status = Some(format!("Save of {id} failed: {message}"));
            }
            FloorEvent::ItemActivated(item) => self.open_editor(item),
            FloorEvent::SelectionChanged(id) => {
                tracing::debug!(selected = ?id, "selection changed");
                if id.is_none() {
                    self.status = None;
                }
            }
            FloorEvent::DeleteRequested(id) => self.confirm_delete = Some(id),
        }
    }

    fn persist_item(&mut self, item: PlacedItem) {
        let (Some(view), Some(store)) = (&mut self.floor, &mut self.store) else {
            return;
        };
        let result = store.save_item(view.plan.room_id(), &item);
        if view.plan.resolve_commit(item.id, result).is_err() {
            view.plan.revert_to_synced(item.id);
        } else {
            self.status = Some(format!("Saved {} at {}", item.name, item.position));
        }
    }
}
