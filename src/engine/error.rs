use thiserror::Error;

use crate::model::{GridPos, ItemId};
use crate::store::StoreError;

use super::grid::Span;

/// A placement the engine refused. These are expected outcomes of normal
/// editing and never leave the engine in an inconsistent state.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("no free space for a {span} item")]
    NoFreeSpace { span: Span },
    #[error("a {span} item at {pos} does not fit inside the room")]
    OutOfBounds { pos: GridPos, span: Span },
    #[error("position {pos} overlaps item {other}")]
    Overlap { pos: GridPos, other: ItemId },
    #[error("unknown item {0}")]
    UnknownItem(ItemId),
    #[error("item {0} is still being saved")]
    SaveInFlight(ItemId),
}

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("item {0} already has a save in flight")]
    InFlight(ItemId),
    #[error("no save in flight for item {0}")]
    NotInFlight(ItemId),
    #[error("saving item {id} failed: {source}")]
    Store {
        id: ItemId,
        #[source]
        source: StoreError,
    },
}
