use crate::model::{GridPos, ItemId, PlacedItem};

use super::error::PlacementError;
use super::grid::{Grid, Span};

/// A block of cells claimed by an item, or by a candidate that has no id yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub id: Option<ItemId>,
    pub pos: GridPos,
    pub span: Span,
}

impl Placement {
    pub fn new(id: Option<ItemId>, pos: GridPos, span: Span) -> Self {
        Self { id, pos, span }
    }

    pub fn of(item: &PlacedItem, grid: &Grid) -> Self {
        Self {
            id: Some(item.id),
            pos: item.position,
            span: grid.span_for(item.footprint),
        }
    }

    fn right(&self) -> i64 {
        i64::from(self.pos.x) + i64::from(self.span.cols)
    }

    fn bottom(&self) -> i64 {
        i64::from(self.pos.y) + i64::from(self.span.rows)
    }

    /// Half-open rectangle intersection; blocks that only share an edge do
    /// not overlap.
    pub fn overlaps(&self, other: &Placement) -> bool {
        i64::from(self.pos.x) < other.right()
            && self.right() > i64::from(other.pos.x)
            && i64::from(self.pos.y) < other.bottom()
            && self.bottom() > i64::from(other.pos.y)
    }

    pub fn contains_cell(&self, x: f32, y: f32) -> bool {
        let (x, y) = (f64::from(x), f64::from(y));
        x >= f64::from(self.pos.x)
            && x < self.right() as f64
            && y >= f64::from(self.pos.y)
            && y < self.bottom() as f64
    }

    fn is_same_item(&self, other: &Placement) -> bool {
        self.id.is_some() && self.id == other.id
    }
}

/// Validates `candidate` against the room bounds and every other placement.
/// A placement with the candidate's own id is skipped so an item can be
/// re-validated while it moves away from its previous cells.
pub fn check(
    candidate: &Placement,
    existing: &[Placement],
    grid: &Grid,
) -> Result<(), PlacementError> {
    if !grid.contains(candidate.pos, candidate.span) {
        return Err(PlacementError::OutOfBounds {
            pos: candidate.pos,
            span: candidate.span,
        });
    }
    let blocker = existing
        .iter()
        .filter(|other| !candidate.is_same_item(other))
        .find(|other| candidate.overlaps(other));
    match blocker {
        Some(other) => Err(PlacementError::Overlap {
            pos: candidate.pos,
            other: other.id.unwrap_or(ItemId(0)),
        }),
        None => Ok(()),
    }
}

pub fn is_legal(candidate: &Placement, existing: &[Placement], grid: &Grid) -> bool {
    check(candidate, existing, grid).is_ok()
}
