use crate::layout::GridDimensions;
use crate::snake::Position;
use crate::state::GameState;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Snake,
    Food,
}

/// Row-major cell buffer, one entry per grid cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CellBuffer {
    cols: usize,
    rows: usize,
    cells: Vec<CellState>,
}

impl CellBuffer {
    pub fn new(grid: &GridDimensions) -> Self {
        CellBuffer {
            cols: grid.cols as usize,
            rows: grid.rows as usize,
            cells: vec![CellState::Empty; grid.cell_count()],
        }
    }

    pub fn get(&self, pos: Position) -> Option<CellState> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Out-of-range positions are ignored and reported as `false`.
    pub fn set(&mut self, pos: Position, state: CellState) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = state;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = CellState::Empty;
        }
    }

    /// Redraws the whole buffer from `state`: snake first, food on top.
    pub fn paint(&mut self, state: &GameState) {
        self.clear();
        for pos in state.snake().body() {
            self.set(*pos, CellState::Snake);
        }
        if let Some(food) = state.food() {
            self.set(food, CellState::Food);
        }
    }

    /// Cells whose state differs from `other`, with the new state.
    /// Buffers of different shape report every cell.
    pub fn diff<'a>(&'a self, other: &'a CellBuffer) -> impl Iterator<Item = (Position, CellState)> + 'a {
        let same_shape = self.cols == other.cols && self.rows == other.rows;
        self.cells.iter().enumerate()
            .filter(move |(i, cell)| !same_shape || other.cells[*i] != **cell)
            .map(move |(i, cell)| (self.position(i), *cell))
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let (row, col) = (pos.row as usize, pos.col as usize);
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }

    fn position(&self, index: usize) -> Position {
        Position::new((index / self.cols) as u16, (index % self.cols) as u16)
    }
}
