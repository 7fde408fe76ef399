use crate::model::GridPos;

use super::error::PlacementError;
use super::grid::{Grid, Span};
use super::occupancy::{Placement, is_legal};

/// First free position for a `span`-sized block, scanning rows top to bottom
/// and cells left to right. The same occupancy always yields the same cell:
/// the smallest free `(y, x)`.
pub fn find_free_slot(span: Span, existing: &[Placement], grid: &Grid) -> Option<GridPos> {
    if span.cols > grid.cols || span.rows > grid.rows {
        return None;
    }
    let last_y = (grid.rows - span.rows) as i32;
    let last_x = (grid.cols - span.cols) as i32;
    for y in 0..=last_y {
        for x in 0..=last_x {
            let candidate = Placement::new(None, GridPos::new(x, y), span);
            if is_legal(&candidate, existing, grid) {
                return Some(candidate.pos);
            }
        }
    }
    None
}

pub fn plan(span: Span, existing: &[Placement], grid: &Grid) -> Result<GridPos, PlacementError> {
    find_free_slot(span, existing, grid).ok_or(PlacementError::NoFreeSpace { span })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::grid::{GridDefaults, resolve};
    use crate::model::{ItemId, RoomGeometry};
    use proptest::prelude::*;

    fn grid(w: f64, l: f64) -> Grid {
        resolve(&RoomGeometry::new(w, l, 60.0, 60.0), &GridDefaults::default())
    }

    fn block(id: u64, x: i32, y: i32, cols: u32, rows: u32) -> Placement {
        Placement::new(Some(ItemId(id)), GridPos::new(x, y), Span::new(cols, rows))
    }

    #[test]
    fn empty_room_places_at_origin() {
        let grid = grid(12.0, 12.0);
        assert_eq!(find_free_slot(Span::new(2, 2), &[], &grid), Some(GridPos::ORIGIN));
    }

    #[test]
    fn scan_is_row_major() {
        let grid = grid(3.0, 3.0);
        let taken = [block(1, 0, 0, 1, 1), block(2, 2, 0, 1, 1)];
        assert_eq!(find_free_slot(Span::ONE, &taken, &grid), Some(GridPos::new(1, 0)));

        let taken = [block(1, 0, 0, 5, 1)];
        assert_eq!(find_free_slot(Span::ONE, &taken, &grid), Some(GridPos::new(0, 1)));
    }

    #[test]
    fn wide_items_skip_gaps_that_are_too_narrow() {
        let grid = grid(3.0, 3.0);
        let taken = [block(1, 2, 0, 1, 1)];
        assert_eq!(
            find_free_slot(Span::new(3, 1), &taken, &grid),
            Some(GridPos::new(0, 1))
        );
    }

    #[test]
    fn repeated_calls_agree() {
        let grid = grid(6.0, 6.0);
        let taken = [block(1, 0, 0, 3, 2), block(2, 4, 0, 2, 3), block(3, 0, 2, 1, 1)];
        let first = find_free_slot(Span::new(2, 2), &taken, &grid);
        for _ in 0..10 {
            assert_eq!(find_free_slot(Span::new(2, 2), &taken, &grid), first);
        }
        assert_eq!(first, Some(GridPos::new(6, 0)));
    }

    #[test]
    fn packed_grid_has_no_room() {
        let grid = grid(3.0, 2.4);
        assert_eq!((grid.cols, grid.rows), (5, 4));
        let mut taken = Vec::new();
        let mut id = 0;
        for y in 0..grid.rows as i32 {
            for x in 0..grid.cols as i32 {
                id += 1;
                taken.push(block(id, x, y, 1, 1));
            }
        }
        assert_eq!(taken.len() as u64, grid.cell_count());
        assert_eq!(find_free_slot(Span::ONE, &taken, &grid), None);
        assert_eq!(
            plan(Span::ONE, &taken, &grid),
            Err(PlacementError::NoFreeSpace { span: Span::ONE })
        );
    }

    #[test]
    fn item_larger_than_room_is_reported() {
        let grid = grid(1.2, 1.2);
        assert_eq!(find_free_slot(Span::new(3, 1), &[], &grid), None);
    }

    fn smallest_free_by_brute_force(span: Span, taken: &[Placement], grid: &Grid) -> Option<GridPos> {
        let mut free = Vec::new();
        for y in 0..grid.rows as i32 {
            for x in 0..grid.cols as i32 {
                let candidate = Placement::new(None, GridPos::new(x, y), span);
                if is_legal(&candidate, taken, grid) {
                    free.push((y, x));
                }
            }
        }
        free.into_iter().min().map(|(y, x)| GridPos::new(x, y))
    }

    proptest! {
        #[test]
        fn slot_is_lexicographically_smallest_free_cell(
            blocks in prop::collection::vec((0i32..8, 0i32..8, 1u32..4, 1u32..4), 0..12),
            cols in 1u32..4,
            rows in 1u32..4,
        ) {
            let grid = grid(4.8, 4.8);
            let taken: Vec<Placement> = blocks
                .iter()
                .enumerate()
                .map(|(i, &(x, y, w, h))| block(i as u64 + 1, x, y, w, h))
                .collect();
            let span = Span::new(cols, rows);
            let found = find_free_slot(span, &taken, &grid);
            prop_assert_eq!(found, smallest_free_by_brute_force(span, &taken, &grid));
            prop_assert_eq!(found, find_free_slot(span, &taken, &grid));
        }
    }
}
