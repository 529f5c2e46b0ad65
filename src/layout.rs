use std::cmp::{max, min};

use crate::snake::Position;
use crate::TermInt;

/// Integer grid that tiles a container with square cells and no remainder.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridDimensions {
    pub cols: TermInt,
    pub rows: TermInt,
    pub cell_size: TermInt,
}

impl GridDimensions {
    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }
}

/// Fits a `cols` x `rows` grid of square cells into `width` x `height` units.
///
/// `desired_cell` is only a hint: the square-cell constraint wins, and every
/// input is clamped so the result is never smaller than 1x1 with a cell of 1.
pub fn compute(width: TermInt, height: TermInt, desired_cell: TermInt) -> GridDimensions {
    let width = max(width, 1);
    let height = max(height, 1);
    let desired_cell = max(desired_cell, 1);

    let cols = max(1, width / desired_cell);
    let provisional = max(1, width / cols);
    let rows = max(1, height / provisional);

    let cell_size = max(1, min(width / cols, height / rows));
    let rows = max(1, height / cell_size);

    GridDimensions { cols, rows, cell_size }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_fits(w: TermInt, h: TermInt, d: TermInt) {
        let g = compute(w, h, d);
        assert!(g.cols >= 1 && g.rows >= 1 && g.cell_size >= 1, "{:?}", g);
        assert!(g.cols as u32 * g.cell_size as u32 <= w as u32, "width overflow for {}x{} d={}: {:?}", w, h, d, g);
        assert!(g.rows as u32 * g.cell_size as u32 <= h as u32, "height overflow for {}x{} d={}: {:?}", w, h, d, g);
    }

    #[test]
    fn fits_every_container_in_sweep() {
        for w in 1..=64 {
            for h in 1..=64 {
                for d in 1..=12 {
                    assert_fits(w, h, d);
                }
            }
        }
    }

    #[test]
    fn fits_large_containers() {
        assert_fits(1920, 1080, 40);
        assert_fits(TermInt::MAX, TermInt::MAX, 1);
        assert_fits(TermInt::MAX, 3, 7);
    }

    #[test]
    fn uses_desired_cell_when_it_divides_evenly() {
        let g = compute(400, 200, 40);
        assert_eq!(g, GridDimensions { cols: 10, rows: 5, cell_size: 40 });
        assert_eq!(g.cell_count(), 50);
    }

    #[test]
    fn square_cells_shrink_to_fit_short_container() {
        // Width alone would give 45px cells; the 30px height forces them down.
        let g = compute(90, 30, 40);
        assert_eq!(g, GridDimensions { cols: 2, rows: 1, cell_size: 30 });
    }

    #[test]
    fn cell_larger_than_container_degrades_to_single_cell() {
        let g = compute(5, 3, 40);
        assert_eq!(g, GridDimensions { cols: 1, rows: 1, cell_size: 3 });
    }

    #[test]
    fn zero_inputs_are_clamped() {
        assert_eq!(compute(0, 0, 0), GridDimensions { cols: 1, rows: 1, cell_size: 1 });
        assert_eq!(compute(10, 4, 0), GridDimensions { cols: 10, rows: 4, cell_size: 1 });
    }

    #[test]
    fn contains_checks_both_axes() {
        let g = compute(10, 4, 1);
        assert!(g.contains(Position::new(3, 9)));
        assert!(!g.contains(Position::new(4, 0)));
        assert!(!g.contains(Position::new(0, 10)));
    }
}
