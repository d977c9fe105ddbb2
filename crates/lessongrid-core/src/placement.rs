//! Placement validation, first-fit search and canvas height derivation.

use crate::grid::{CanvasSettings, GRID_COLUMNS, GridPosition};
use crate::tile::{Tile, TileId};

/// Minimum canvas height in rows, even for an empty page.
pub const MIN_CANVAS_ROWS: u32 = 6;
/// Empty rows kept below the lowest tile.
pub const CANVAS_PADDING_ROWS: u32 = 2;
/// Rows scanned by [`find_available_position`] before falling back to stacking.
pub const MAX_SEARCH_ROWS: u32 = 50;

/// Check whether `candidate` is in bounds and overlaps no other tile.
///
/// `exclude` skips one tile, so a tile being moved does not collide with
/// its own committed footprint.
pub fn is_valid_position(
    candidate: &GridPosition,
    _settings: &CanvasSettings,
    tiles: &[Tile],
    exclude: Option<TileId>,
) -> bool {
    if candidate.col_span == 0 || candidate.row_span == 0 {
        return false;
    }
    if candidate.col_end() > GRID_COLUMNS {
        return false;
    }

    !tiles
        .iter()
        .filter(|tile| Some(tile.id) != exclude)
        .any(|tile| candidate.overlaps(&tile.grid_position))
}

/// Find the first legal position for `desired`.
///
/// Returns `desired` unchanged when it is already valid. Otherwise scans
/// rows top to bottom and columns left to right, keeping the spans, and
/// falls back to stacking below every tile at column 0.
pub fn find_available_position(
    desired: &GridPosition,
    settings: &CanvasSettings,
    tiles: &[Tile],
) -> GridPosition {
    if is_valid_position(desired, settings, tiles, None) {
        return *desired;
    }

    let col_span = desired.col_span.clamp(1, GRID_COLUMNS);
    let sized = GridPosition {
        col_span,
        row_span: desired.row_span.max(1),
        ..*desired
    };

    for row in 0..MAX_SEARCH_ROWS {
        for col in 0..=(GRID_COLUMNS - col_span) {
            let candidate = sized.at(col, row);
            if is_valid_position(&candidate, settings, tiles, None) {
                return candidate;
            }
        }
    }

    let bottom = tiles
        .iter()
        .map(|tile| tile.grid_position.row_end())
        .max()
        .unwrap_or(0);
    log::debug!("placement scan exhausted, stacking at row {}", bottom);
    sized.at(0, bottom)
}

/// Rows needed to show every tile plus padding, never below [`MIN_CANVAS_ROWS`].
pub fn calculate_canvas_height(tiles: &[Tile]) -> u32 {
    tiles
        .iter()
        .map(|tile| tile.grid_position.row_end().saturating_add(CANVAS_PADDING_ROWS))
        .fold(MIN_CANVAS_ROWS, u32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileKind;

    fn settings() -> CanvasSettings {
        CanvasSettings::with_grid_size(120.0)
    }

    fn tile_at(grid: GridPosition) -> Tile {
        Tile::new(TileKind::Text, grid, &settings())
    }

    #[test]
    fn test_bounds() {
        let s = settings();
        assert!(is_valid_position(&GridPosition::new(4, 0, 2, 1), &s, &[], None));
        assert!(!is_valid_position(&GridPosition::new(5, 0, 2, 1), &s, &[], None));
        assert!(is_valid_position(&GridPosition::new(0, 400, 6, 1), &s, &[], None));
    }

    #[test]
    fn test_overlap_rejected() {
        let s = settings();
        let tiles = vec![tile_at(GridPosition::new(1, 1, 2, 2))];
        assert!(!is_valid_position(&GridPosition::new(2, 2, 1, 1), &s, &tiles, None));
        assert!(is_valid_position(&GridPosition::new(3, 1, 1, 1), &s, &tiles, None));
        assert!(is_valid_position(&GridPosition::new(1, 3, 2, 1), &s, &tiles, None));
    }

    #[test]
    fn test_exclude_self() {
        let s = settings();
        let tiles = vec![tile_at(GridPosition::new(0, 0, 2, 2))];
        let id = tiles[0].id;
        let shifted = GridPosition::new(1, 0, 2, 2);
        assert!(!is_valid_position(&shifted, &s, &tiles, None));
        assert!(is_valid_position(&shifted, &s, &tiles, Some(id)));
    }

    #[test]
    fn test_empty_canvas_keeps_desired() {
        let desired = GridPosition::new(0, 0, 2, 1);
        assert_eq!(find_available_position(&desired, &settings(), &[]), desired);
    }

    #[test]
    fn test_valid_desired_kept_among_tiles() {
        let tiles = vec![
            tile_at(GridPosition::new(0, 0, 2, 2)),
            tile_at(GridPosition::new(4, 0, 2, 1)),
            tile_at(GridPosition::new(0, 3, 6, 1)),
        ];
        // Not the first fit (that would be col 2, row 0), but already legal.
        let desired = GridPosition::new(3, 1, 3, 2);
        assert!(is_valid_position(&desired, &settings(), &tiles, None));
        assert_eq!(find_available_position(&desired, &settings(), &tiles), desired);
    }

    #[test]
    fn test_full_row_pushes_down() {
        let tiles = vec![tile_at(GridPosition::new(0, 0, 6, 1))];
        let found = find_available_position(&GridPosition::new(0, 0, 2, 1), &settings(), &tiles);
        assert_eq!(found, GridPosition::new(0, 1, 2, 1));
    }

    #[test]
    fn test_first_fit_is_left_to_right() {
        let tiles = vec![
            tile_at(GridPosition::new(0, 0, 2, 1)),
            tile_at(GridPosition::new(3, 0, 1, 1)),
        ];
        let found = find_available_position(&GridPosition::new(0, 0, 2, 1), &settings(), &tiles);
        assert_eq!(found, GridPosition::new(4, 0, 2, 1));
    }

    #[test]
    fn test_search_is_deterministic() {
        let tiles = vec![
            tile_at(GridPosition::new(0, 0, 3, 2)),
            tile_at(GridPosition::new(3, 1, 3, 1)),
        ];
        let desired = GridPosition::new(1, 1, 3, 1);
        let a = find_available_position(&desired, &settings(), &tiles);
        let b = find_available_position(&desired, &settings(), &tiles);
        assert_eq!(a, b);
        assert!(is_valid_position(&a, &settings(), &tiles, None));
    }

    #[test]
    fn test_fallback_stacks_below() {
        // A single tile filling the whole scan window.
        let tiles = vec![tile_at(GridPosition::new(0, 0, 6, MAX_SEARCH_ROWS + 4))];
        let found = find_available_position(&GridPosition::new(2, 3, 2, 1), &settings(), &tiles);
        assert_eq!(found, GridPosition::new(0, MAX_SEARCH_ROWS + 4, 2, 1));
    }

    #[test]
    fn test_canvas_height() {
        assert_eq!(calculate_canvas_height(&[]), 6);
        assert_eq!(calculate_canvas_height(&[tile_at(GridPosition::new(0, 3, 1, 2))]), 7);
        assert_eq!(calculate_canvas_height(&[tile_at(GridPosition::new(0, 1, 1, 1))]), 6);
        assert_eq!(
            calculate_canvas_height(&[tile_at(GridPosition::new(0, u32::MAX - 1, 1, 1))]),
            u32::MAX
        );
    }
}
