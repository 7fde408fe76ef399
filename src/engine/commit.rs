use std::collections::BTreeMap;

use crate::model::{ItemId, PlacedItem, RoomId};
use crate::store::StoreError;

use super::error::CommitError;

/// Durable storage for placements. Implementations may reject a write; the
/// engine treats that as a recoverable failure.
pub trait PlacementStore {
    fn save_item(&mut self, room: RoomId, item: &PlacedItem) -> Result<(), StoreError>;
    fn delete_item(&mut self, room: RoomId, id: ItemId) -> Result<(), StoreError>;
}

/// A save handed to the store and not answered yet.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingCommit {
    pub room: RoomId,
    pub item: PlacedItem,
}

/// Tracks what the store has confirmed for one room and which items have a
/// save outstanding. At most one save per item is in flight.
#[derive(Clone, Debug)]
pub struct CommitGateway {
    room: RoomId,
    synced: BTreeMap<ItemId, PlacedItem>,
    in_flight: BTreeMap<ItemId, PlacedItem>,
}

impl CommitGateway {
    pub fn new(room: RoomId, items: &[PlacedItem]) -> Self {
        Self {
            room,
            synced: items.iter().map(|i| (i.id, i.clone())).collect(),
            in_flight: BTreeMap::new(),
        }
    }

    pub fn room(&self) -> RoomId {
        self.room
    }

    pub fn is_in_flight(&self, id: ItemId) -> bool {
        self.in_flight.contains_key(&id)
    }

    pub fn synced(&self, id: ItemId) -> Option<&PlacedItem> {
        self.synced.get(&id)
    }

    pub fn max_known_id(&self) -> u64 {
        self.synced
            .keys()
            .chain(self.in_flight.keys())
            .map(|id| id.0)
            .max()
            .unwrap_or(0)
    }

    /// `touched` as it appears in `items`, if it differs from the last
    /// confirmed state and is not already on its way to the store. Other
    /// items that differ, such as one whose save failed and was never
    /// rolled back, are left alone.
    pub fn changed_item<'a>(
        &self,
        items: &'a [PlacedItem],
        touched: ItemId,
    ) -> Option<&'a PlacedItem> {
        let item = items.iter().find(|item| item.id == touched)?;
        if self.in_flight.get(&item.id) == Some(item) || self.synced.get(&item.id) == Some(item) {
            return None;
        }
        Some(item)
    }

    /// Diffs `touched` against the confirmed snapshot and marks it as in
    /// flight if it changed.
    pub fn begin(
        &mut self,
        items: &[PlacedItem],
        touched: ItemId,
    ) -> Result<Option<PendingCommit>, CommitError> {
        let Some(item) = self.changed_item(items, touched) else {
            return Ok(None);
        };
        if self.in_flight.contains_key(&item.id) {
            return Err(CommitError::InFlight(item.id));
        }
        self.in_flight.insert(item.id, item.clone());
        Ok(Some(PendingCommit {
            room: self.room,
            item: item.clone(),
        }))
    }

    /// Settles the in-flight save for `id` with the store's answer.
    pub fn complete(
        &mut self,
        id: ItemId,
        result: Result<(), StoreError>,
    ) -> Result<PlacedItem, CommitError> {
        let item = self.in_flight.remove(&id).ok_or(CommitError::NotInFlight(id))?;
        match result {
            Ok(()) => {
                self.synced.insert(id, item.clone());
                Ok(item)
            }
            Err(source) => Err(CommitError::Store { id, source }),
        }
    }

    /// Drops all knowledge of a deleted item.
    pub fn forget(&mut self, id: ItemId) {
        self.synced.remove(&id);
        self.in_flight.remove(&id);
    }
}
