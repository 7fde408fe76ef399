//! JSON file backing for rooms and their placed items.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::PlacementStore;
use crate::model::{
    Footprint, GridPos, ItemId, ItemKind, ItemMeta, ItemStatus, PlacedItem, Room, RoomGeometry,
    RoomId,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("floor file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("floor file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown {0}")]
    UnknownRoom(RoomId),
    #[error("unknown item {0}")]
    UnknownItem(ItemId),
    #[error("store rejected the write: {0}")]
    Rejected(String),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FloorFile {
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl FloorFile {
    /// Demo floor used when no file exists yet.
    pub fn sample() -> Self {
        let rack = |id: u64, name: &str, x: i32, y: i32| PlacedItem {
            id: ItemId(id),
            name: name.to_string(),
            kind: ItemKind::Rack,
            position: GridPos::new(x, y),
            footprint: Some(Footprint {
                width_m: 0.6,
                length_m: 1.2,
            }),
            status: ItemStatus::Confirmed,
            meta: ItemMeta::default(),
        };
        let mut hall_a = vec![
            rack(1, "A-01", 2, 2),
            rack(2, "A-02", 3, 2),
            rack(3, "A-03", 4, 2),
            rack(4, "A-04", 5, 2),
        ];
        hall_a.push(PlacedItem {
            id: ItemId(5),
            name: "CRAC-1".to_string(),
            kind: ItemKind::CoolingUnit,
            position: GridPos::new(10, 1),
            footprint: Some(Footprint {
                width_m: 1.8,
                length_m: 0.6,
            }),
            status: ItemStatus::PendingApproval,
            meta: ItemMeta {
                notes: "Awaiting facilities sign-off".to_string(),
                ..Default::default()
            },
        });
        Self {
            rooms: vec![
                Room {
                    id: RoomId(1),
                    name: "Hall A".to_string(),
                    geometry: RoomGeometry::new(12.0, 12.0, 60.0, 60.0),
                    items: hall_a,
                },
                Room {
                    id: RoomId(2),
                    name: "Hall B".to_string(),
                    geometry: RoomGeometry {
                        width_m: None,
                        length_m: None,
                        tile_width_cm: 60.0,
                        tile_length_cm: 60.0,
                    },
                    items: Vec::new(),
                },
            ],
        }
    }
}

/// Keeps the whole floor file in memory and rewrites it after every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    file: FloorFile,
}

impl JsonFileStore {
    /// Reads `path`, or starts from the sample floor if it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let file = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str::<FloorFile>(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no floor file, using sample floor");
                FloorFile::sample()
            }
            Err(e) => return Err(e.into()),
        };
        tracing::info!(path = %path.display(), rooms = file.rooms.len(), "floor file loaded");
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rooms(&self) -> &[Room] {
        &self.file.rooms
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.file.rooms.iter().find(|r| r.id == id)
    }

    /// Applies `change` to a copy of the room's items and swaps the copy in
    /// only once it is on disk, so a failed write leaves memory untouched.
    fn write_through<F>(&mut self, room: RoomId, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Vec<PlacedItem>) -> Result<(), StoreError>,
    {
        let mut next = self.file.clone();
        let target = next
            .rooms
            .iter_mut()
            .find(|r| r.id == room)
            .ok_or(StoreError::UnknownRoom(room))?;
        change(&mut target.items)?;
        write_floor(&self.path, &next)?;
        self.file = next;
        Ok(())
    }
}

fn write_floor(path: &Path, file: &FloorFile) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(file)?;
    std::fs::write(path, json)?;
    Ok(())
}

impl PlacementStore for JsonFileStore {
    fn save_item(&mut self, room: RoomId, item: &PlacedItem) -> Result<(), StoreError> {
        self.write_through(room, |items| {
            match items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => *existing = item.clone(),
                None => items.push(item.clone()),
            }
            Ok(())
        })?;
        tracing::info!(%room, item = %item.id, pos = %item.position, "item saved");
        Ok(())
    }

    fn delete_item(&mut self, room: RoomId, id: ItemId) -> Result<(), StoreError> {
        self.write_through(room, |items| {
            let before = items.len();
            items.retain(|i| i.id != id);
            if items.len() == before {
                return Err(StoreError::UnknownItem(id));
            }
            Ok(())
        })?;
        tracing::info!(%room, item = %id, "item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FloorConfig, FloorEvent, FloorPlan};
    use crate::model::NewItem;

    fn open_in(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::open(dir.path().join("floor.json")).unwrap()
    }

    #[test]
    fn missing_file_opens_sample_floor() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        assert_eq!(store.rooms().len(), 2);
        assert_eq!(store.room(RoomId(1)).unwrap().name, "Hall A");
        assert!(!store.path().exists());
    }

    #[test]
    fn saves_are_written_through_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);
        let mut moved = store.room(RoomId(1)).unwrap().items[0].clone();
        moved.position = GridPos::new(7, 7);
        store.save_item(RoomId(1), &moved).unwrap();

        let reopened = open_in(&dir);
        let items = &reopened.room(RoomId(1)).unwrap().items;
        assert_eq!(items.len(), 5);
        assert_eq!(items[0], moved);
    }

    #[test]
    fn unknown_room_and_item_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);
        let item = store.room(RoomId(1)).unwrap().items[0].clone();
        assert!(matches!(
            store.save_item(RoomId(99), &item),
            Err(StoreError::UnknownRoom(RoomId(99)))
        ));
        assert!(matches!(
            store.delete_item(RoomId(1), ItemId(404)),
            Err(StoreError::UnknownItem(ItemId(404)))
        ));
        store.delete_item(RoomId(1), item.id).unwrap();
        assert_eq!(open_in(&dir).room(RoomId(1)).unwrap().items.len(), 4);
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("floor.json");
        let mut store = JsonFileStore::open(path).unwrap();
        let before = store.room(RoomId(1)).unwrap().clone();

        let mut moved = before.items[0].clone();
        moved.position = GridPos::new(9, 9);
        assert!(matches!(
            store.save_item(RoomId(1), &moved),
            Err(StoreError::Io(_))
        ));
        assert!(matches!(
            store.delete_item(RoomId(1), before.items[1].id),
            Err(StoreError::Io(_))
        ));
        assert_eq!(store.room(RoomId(1)), Some(&before));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("floor.json"), "{ rooms: ").unwrap();
        assert!(matches!(
            JsonFileStore::open(dir.path().join("floor.json")),
            Err(StoreError::Json(_))
        ));
    }

    #[test]
    fn engine_commits_reach_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_in(&dir);
        let room = store.room(RoomId(1)).unwrap().clone();
        let mut plan = FloorPlan::new(room, FloorConfig::default());
        let id = plan
            .place_new(NewItem {
                name: "A-05".to_string(),
                ..Default::default()
            })
            .unwrap();

        for event in plan.drain_events() {
            if let FloorEvent::PlacementCommitted(item) = event {
                let result = store.save_item(plan.room_id(), &item);
                plan.resolve_commit(item.id, result).unwrap();
            }
        }
        assert!(!plan.is_saving(id));
        let saved = open_in(&dir);
        let placed = saved.room(RoomId(1)).unwrap().items.iter().find(|i| i.id == id).cloned();
        assert_eq!(placed.map(|i| i.position), Some(GridPos::ORIGIN));
    }
}
