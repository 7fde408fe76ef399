use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{Footprint, GridPos, RoomGeometry};

// Absorbs float noise from the metre to centimetre conversion, e.g. 2.3 m
// over 23 cm tiles must give 10 cells, not 9.
const CELL_COUNT_EPSILON: f64 = 1e-9;

/// Used when a room is missing its dimensions or carries unusable tiles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridDefaults {
    pub room_width_m: f64,
    pub room_length_m: f64,
    pub tile_width_cm: f64,
    pub tile_length_cm: f64,
}

impl Default for GridDefaults {
    fn default() -> Self {
        Self {
            room_width_m: 12.0,
            room_length_m: 12.0,
            tile_width_cm: 60.0,
            tile_length_cm: 60.0,
        }
    }
}

impl GridDefaults {
    pub fn sanitized(self) -> Self {
        let fallback = GridDefaults::default();
        Self {
            room_width_m: positive_or(self.room_width_m, fallback.room_width_m),
            room_length_m: positive_or(self.room_length_m, fallback.room_length_m),
            tile_width_cm: positive_or(self.tile_width_cm, fallback.tile_width_cm),
            tile_length_cm: positive_or(self.tile_length_cm, fallback.tile_length_cm),
        }
    }
}

/// Number of cells an item covers on each axis. Always at least 1x1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub cols: u32,
    pub rows: u32,
}

impl Span {
    pub const ONE: Span = Span { cols: 1, rows: 1 };

    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// Integer grid laid over a room.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    pub cols: u32,
    pub rows: u32,
    pub cell_width_m: f64,
    pub cell_length_m: f64,
}

impl Grid {
    /// Whether a `span`-sized block at `pos` lies completely inside the room.
    pub fn contains(&self, pos: GridPos, span: Span) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && i64::from(pos.x) + i64::from(span.cols) <= i64::from(self.cols)
            && i64::from(pos.y) + i64::from(span.rows) <= i64::from(self.rows)
    }

    pub fn cell_count(&self) -> u64 {
        u64::from(self.cols) * u64::from(self.rows)
    }

    /// Span of an item footprint; items without one occupy a single tile.
    pub fn span_for(&self, footprint: Option<Footprint>) -> Span {
        match footprint {
            Some(footprint) => footprint_to_span(footprint, self.cell_width_m, self.cell_length_m),
            None => Span::ONE,
        }
    }

    pub fn footprint_for(&self, span: Span) -> Footprint {
        Footprint {
            width_m: f64::from(span.cols) * self.cell_width_m,
            length_m: f64::from(span.rows) * self.cell_length_m,
        }
    }
}

/// Derives the cell grid for a room. Never fails: missing room sizes and
/// non-positive tiles fall back to `defaults`, and every axis has at least
/// one cell.
pub fn resolve(geometry: &RoomGeometry, defaults: &GridDefaults) -> Grid {
    let defaults = defaults.sanitized();
    let tile_w = checked_tile(geometry.tile_width_cm, defaults.tile_width_cm, "width");
    let tile_l = checked_tile(geometry.tile_length_cm, defaults.tile_length_cm, "length");
    let width_m = room_side(geometry.width_m, defaults.room_width_m, "width");
    let length_m = room_side(geometry.length_m, defaults.room_length_m, "length");

    Grid {
        cols: cell_count(width_m, tile_w),
        rows: cell_count(length_m, tile_l),
        cell_width_m: tile_w / 100.0,
        cell_length_m: tile_l / 100.0,
    }
}

/// Rounds a footprint to whole cells, never below one cell per axis.
pub fn footprint_to_span(footprint: Footprint, cell_width_m: f64, cell_length_m: f64) -> Span {
    Span {
        cols: whole_cells(footprint.width_m, cell_width_m),
        rows: whole_cells(footprint.length_m, cell_length_m),
    }
}

fn checked_tile(tile_cm: f64, fallback: f64, axis: &str) -> f64 {
    if tile_cm.is_finite() && tile_cm > 0.0 {
        tile_cm
    } else {
        tracing::warn!(tile_cm, fallback, axis, "unusable tile size, using default");
        fallback
    }
}

fn room_side(side_m: Option<f64>, fallback: f64, axis: &str) -> f64 {
    match side_m {
        Some(v) if v.is_finite() && v > 0.0 => v,
        Some(v) => {
            tracing::warn!(side_m = v, fallback, axis, "unusable room size, using default");
            fallback
        }
        None => fallback,
    }
}

fn cell_count(side_m: f64, tile_cm: f64) -> u32 {
    let raw = (side_m * 100.0 / tile_cm + CELL_COUNT_EPSILON).floor();
    if raw.is_finite() && raw >= 1.0 {
        raw.min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}

fn whole_cells(length_m: f64, cell_m: f64) -> u32 {
    let n = (length_m / cell_m).round();
    if n.is_finite() && n >= 1.0 {
        n.min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid_for(w: f64, l: f64, tw: f64, tl: f64) -> Grid {
        resolve(&RoomGeometry::new(w, l, tw, tl), &GridDefaults::default())
    }

    #[test]
    fn twelve_metre_room_with_sixty_cm_tiles_is_twenty_by_twenty() {
        let grid = grid_for(12.0, 12.0, 60.0, 60.0);
        assert_eq!((grid.cols, grid.rows), (20, 20));
        assert!((grid.cell_width_m - 0.6).abs() < 1e-12);
    }

    #[test]
    fn partial_tiles_are_dropped() {
        let grid = grid_for(5.0, 3.1, 60.0, 60.0);
        assert_eq!((grid.cols, grid.rows), (8, 5));
    }

    #[test]
    fn float_noise_does_not_lose_a_column() {
        let grid = grid_for(2.3, 2.3, 23.0, 23.0);
        assert_eq!((grid.cols, grid.rows), (10, 10));
    }

    #[test]
    fn zero_tile_width_falls_back_to_default_tile() {
        let grid = grid_for(12.0, 12.0, 0.0, 60.0);
        assert_eq!(grid.cols, 20);
        assert_eq!(grid.rows, 20);
        assert!(grid.cell_width_m.is_finite());
    }

    #[test]
    fn nan_and_negative_tiles_fall_back() {
        let grid = grid_for(6.0, 6.0, f64::NAN, -30.0);
        assert_eq!((grid.cols, grid.rows), (10, 10));
    }

    #[test]
    fn missing_room_size_uses_default_room() {
        let geometry = RoomGeometry {
            width_m: None,
            length_m: None,
            tile_width_cm: 60.0,
            tile_length_cm: 120.0,
        };
        let grid = resolve(&geometry, &GridDefaults::default());
        assert_eq!((grid.cols, grid.rows), (20, 10));
    }

    #[test]
    fn tiny_room_clamps_to_single_cell() {
        let grid = grid_for(0.1, 0.2, 60.0, 60.0);
        assert_eq!((grid.cols, grid.rows), (1, 1));
    }

    #[test]
    fn broken_defaults_are_repaired() {
        let defaults = GridDefaults {
            room_width_m: -1.0,
            room_length_m: 0.0,
            tile_width_cm: 0.0,
            tile_length_cm: f64::INFINITY,
        };
        let geometry = RoomGeometry {
            width_m: None,
            length_m: None,
            tile_width_cm: 0.0,
            tile_length_cm: 0.0,
        };
        let grid = resolve(&geometry, &defaults);
        assert_eq!((grid.cols, grid.rows), (20, 20));
    }

    #[test]
    fn footprint_rounds_to_nearest_cell() {
        let span = |w, l| footprint_to_span(Footprint { width_m: w, length_m: l }, 0.6, 0.6);
        assert_eq!(span(0.6, 1.2), Span::new(1, 2));
        assert_eq!(span(0.8, 0.9), Span::new(1, 2));
        assert_eq!(span(0.1, 0.05), Span::ONE);
        assert_eq!(span(2.4, 0.6), Span::new(4, 1));
    }

    #[test]
    fn items_without_footprint_take_one_tile() {
        let grid = grid_for(12.0, 12.0, 60.0, 60.0);
        assert_eq!(grid.span_for(None), Span::ONE);
        let span = Span::new(2, 3);
        assert_eq!(grid.span_for(Some(grid.footprint_for(span))), span);
    }

    #[test]
    fn contains_respects_far_edges() {
        let grid = grid_for(3.0, 3.0, 60.0, 60.0);
        assert!(grid.contains(GridPos::new(3, 3), Span::new(2, 2)));
        assert!(!grid.contains(GridPos::new(4, 3), Span::new(2, 2)));
        assert!(!grid.contains(GridPos::new(-1, 0), Span::ONE));
    }

    proptest! {
        #[test]
        fn grid_size_follows_floor_formula(
            w in 0.5f64..200.0,
            l in 0.5f64..200.0,
            tw in 10.0f64..200.0,
            tl in 10.0f64..200.0,
        ) {
            let grid = grid_for(w, l, tw, tl);
            let expect = |side: f64, tile: f64| ((side * 100.0 / tile + CELL_COUNT_EPSILON).floor() as u32).max(1);
            prop_assert_eq!(grid.cols, expect(w, tw));
            prop_assert_eq!(grid.rows, expect(l, tl));
            prop_assert!(grid.cols >= 1 && grid.rows >= 1);
        }

        #[test]
        fn spans_are_never_empty(
            w in 0.0001f64..50.0,
            l in 0.0001f64..50.0,
            cell in 0.05f64..3.0,
        ) {
            let span = footprint_to_span(Footprint { width_m: w, length_m: l }, cell, cell);
            prop_assert!(span.cols >= 1);
            prop_assert!(span.rows >= 1);
        }
    }
}
