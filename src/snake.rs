use std::collections::VecDeque;

use crate::layout::GridDimensions;
use crate::TermInt;
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: TermInt,
    pub col: TermInt,
}

impl Position {
    pub fn new(row: TermInt, col: TermInt) -> Self {
        Position { row, col }
    }

    /// The neighbouring cell in `dir`, or `None` when it would leave the
    /// non-negative quadrant.
    pub fn step(self, dir: Direction) -> Option<Position> {
        let (dr, dc) = dir.delta();
        let row = offset(self.row, dr)?;
        let col = offset(self.col, dc)?;
        Some(Position { row, col })
    }
}

fn offset(value: TermInt, delta: i8) -> Option<TermInt> {
    match delta {
        -1 => value.checked_sub(1),
        1 => value.checked_add(1),
        _ => Some(value),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit vector as `(row, col)`.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Position, old_head: Position, old_tail: Option<Position> },
    HitWall,
    HitSelf,
}

/// Head first, tail last.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
}

impl Snake {
    pub fn new(pos: Position, direction: Direction) -> Self {
        let mut body = VecDeque::new();
        body.push_back(pos);
        Snake { body, direction }
    }

    #[cfg(test)]
    pub fn from_segments(segments: &[Position], direction: Direction) -> Self {
        assert!(!segments.is_empty());
        Snake { body: segments.iter().copied().collect(), direction }
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Advances one cell. The tail stays in place when the new head lands on
    /// `food`, so the snake grows by one.
    pub fn move_step(&mut self, grid: &GridDimensions, food: Option<Position>) -> MoveResult {
        let old_head = self.head();

        let new_head = match old_head.step(self.direction) {
            Some(pos) if grid.contains(pos) => pos,
            _ => return HitWall,
        };

        // The tail counts too, even though it would move out of the way.
        if self.occupies(new_head) {
            return HitSelf;
        }

        self.body.push_front(new_head);

        if food == Some(new_head) {
            Moved { new_head, old_head, old_tail: None }
        } else {
            let old_tail = self.body.pop_back();
            Moved { new_head, old_head, old_tail }
        }
    }

    pub fn set_direction(&mut self, new_direction: Direction) {
        if new_direction != self.direction.opposite() {
            self.direction = new_direction;
        }
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}
