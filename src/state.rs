use std::cmp::min;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::layout::GridDimensions;
use crate::snake::{Direction, MoveResult, Position, Snake};

const START: Position = Position { row: 5, col: 5 };

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    GameOver,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    Wall,
    SelfCollision,
    /// The snake covers every cell, so there is nowhere left to put food.
    BoardFilled,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SessionEnd {
    pub score: u32,
    pub reason: EndReason,
}

impl SessionEnd {
    pub fn is_win(&self) -> bool {
        self.reason == EndReason::BoardFilled
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Moved { new_head: Position, old_tail: Position },
    Ate { new_head: Position },
    Ended(SessionEnd),
}

/// All state of one session. `reset`, `set_direction` and `step` are the only
/// mutators.
pub struct GameState {
    grid: GridDimensions,
    snake: Snake,
    food: Option<Position>,
    score: u32,
    end: Option<SessionEnd>,
    rng: StdRng,
}

impl GameState {
    pub fn new(grid: GridDimensions) -> Self {
        Self::with_rng(grid, StdRng::from_entropy())
    }

    pub fn with_seed(grid: GridDimensions, seed: u64) -> Self {
        Self::with_rng(grid, StdRng::seed_from_u64(seed))
    }

    fn with_rng(grid: GridDimensions, rng: StdRng) -> Self {
        let mut state = GameState {
            grid,
            snake: Snake::new(Position::new(0, 0), Direction::Right),
            food: None,
            score: 0,
            end: None,
            rng,
        };
        state.reset(grid);
        state
    }

    /// Starts a fresh session on `grid`, discarding the previous one.
    pub fn reset(&mut self, grid: GridDimensions) {
        self.grid = grid;
        let start = Position::new(
            min(START.row, grid.rows.saturating_sub(1)),
            min(START.col, grid.cols.saturating_sub(1)),
        );
        self.snake = Snake::new(start, Direction::Right);
        self.score = 0;
        self.end = None;
        self.food = None;
        self.refresh_food();
    }

    /// Takes effect on the next `step`. Reversing straight into the neck is
    /// ignored.
    pub fn set_direction(&mut self, dir: Direction) {
        if self.end.is_none() {
            self.snake.set_direction(dir);
        }
    }

    pub fn step(&mut self) -> StepOutcome {
        if let Some(end) = self.end {
            return StepOutcome::Ended(end);
        }

        match self.snake.move_step(&self.grid, self.food) {
            MoveResult::HitWall => StepOutcome::Ended(self.finish(EndReason::Wall)),
            MoveResult::HitSelf => StepOutcome::Ended(self.finish(EndReason::SelfCollision)),
            MoveResult::Moved { new_head, old_tail: Some(old_tail), .. } => {
                StepOutcome::Moved { new_head, old_tail }
            }
            MoveResult::Moved { new_head, old_tail: None, .. } => {
                self.score += 1;
                match self.refresh_food() {
                    Some(end) => StepOutcome::Ended(end),
                    None => StepOutcome::Ate { new_head },
                }
            }
        }
    }

    /// Rejection-samples a free cell. `None` when the snake fills the grid.
    fn sample_free_cell(&mut self) -> Option<Position> {
        if self.snake.len() >= self.grid.cell_count() {
            return None;
        }

        loop {
            let pos = Position::new(
                self.rng.gen_range(0..self.grid.rows),
                self.rng.gen_range(0..self.grid.cols),
            );
            if !self.snake.occupies(pos) {
                return Some(pos);
            }
        }
    }

    /// Places new food, ending the session as a win when no cell is free.
    fn refresh_food(&mut self) -> Option<SessionEnd> {
        self.food = self.sample_free_cell();
        if self.food.is_some() {
            None
        } else {
            Some(self.finish(EndReason::BoardFilled))
        }
    }

    fn finish(&mut self, reason: EndReason) -> SessionEnd {
        let end = SessionEnd { score: self.score, reason };
        self.end = Some(end);
        end
    }

    pub fn phase(&self) -> Phase {
        if self.end.is_some() { Phase::GameOver } else { Phase::Running }
    }

    pub fn end(&self) -> Option<SessionEnd> {
        self.end
    }

    pub fn grid(&self) -> GridDimensions {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn direction(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::layout;
    use crate::snake::Direction::*;

    fn grid(cols: u16, rows: u16) -> GridDimensions {
        layout::compute(cols, rows, 1)
    }

    fn with_snake(g: GridDimensions, segments: &[Position], dir: Direction, food: Position) -> GameState {
        let mut state = GameState::with_seed(g, 7);
        state.snake = Snake::from_segments(segments, dir);
        state.food = Some(food);
        state
    }

    fn body(state: &GameState) -> Vec<Position> {
        state.snake().body().iter().copied().collect()
    }

    #[test]
    fn reset_starts_running_with_one_segment() {
        let state = GameState::with_seed(grid(20, 15), 1);
        assert_eq!(state.phase(), Phase::Running);
        assert_eq!(body(&state), vec![Position::new(5, 5)]);
        assert_eq!(state.direction(), Right);
        assert_eq!(state.score(), 0);
        let food = state.food().unwrap();
        assert!(state.grid().contains(food));
        assert_ne!(food, state.head());
    }

    #[test]
    fn reset_clamps_start_into_small_grid() {
        let state = GameState::with_seed(grid(3, 2), 1);
        assert_eq!(state.head(), Position::new(1, 2));
    }

    #[test]
    fn eating_grows_and_scores() {
        let mut state = with_snake(grid(10, 10), &[Position::new(5, 5)], Right, Position::new(5, 6));

        let outcome = state.step();

        assert_eq!(outcome, StepOutcome::Ate { new_head: Position::new(5, 6) });
        // Eating keeps the tail, so the old head stays as the second segment.
        assert_eq!(body(&state), vec![Position::new(5, 6), Position::new(5, 5)]);
        assert_eq!(state.score(), 1);
        let food = state.food().unwrap();
        assert!(!state.snake().occupies(food));
    }

    #[test]
    fn leaving_the_top_edge_ends_the_session() {
        let mut state = with_snake(grid(10, 10), &[Position::new(0, 0)], Up, Position::new(4, 4));
        state.score = 3;

        let outcome = state.step();

        assert_eq!(outcome, StepOutcome::Ended(SessionEnd { score: 3, reason: EndReason::Wall }));
        assert_eq!(state.phase(), Phase::GameOver);
        assert_eq!(body(&state), vec![Position::new(0, 0)]);
    }

    #[test]
    fn moving_away_from_body_drops_tail() {
        let mut state = with_snake(
            grid(10, 10),
            &[Position::new(3, 3), Position::new(3, 4), Position::new(3, 5)],
            Left,
            Position::new(8, 8),
        );

        let outcome = state.step();

        assert_eq!(outcome, StepOutcome::Moved { new_head: Position::new(3, 2), old_tail: Position::new(3, 5) });
        assert_eq!(body(&state), vec![Position::new(3, 2), Position::new(3, 3), Position::new(3, 4)]);
        assert_eq!(state.phase(), Phase::Running);
    }

    #[test]
    fn self_collision_ends_the_session() {
        let mut state = with_snake(
            grid(10, 10),
            &[
                Position::new(2, 2),
                Position::new(2, 3),
                Position::new(3, 3),
                Position::new(3, 2),
                Position::new(3, 1),
            ],
            Down,
            Position::new(8, 8),
        );

        let outcome = state.step();

        assert_eq!(outcome, StepOutcome::Ended(SessionEnd { score: 0, reason: EndReason::SelfCollision }));
    }

    #[test]
    fn reversal_has_no_effect_on_next_step() {
        let mut state = with_snake(
            grid(10, 10),
            &[Position::new(3, 3), Position::new(3, 2)],
            Right,
            Position::new(8, 8),
        );

        state.set_direction(Left);
        state.step();

        assert_eq!(state.head(), Position::new(3, 4));
        assert_eq!(state.phase(), Phase::Running);
    }

    #[test]
    fn repeated_direction_is_idempotent() {
        let mut state = GameState::with_seed(grid(10, 10), 3);
        state.set_direction(Down);
        state.set_direction(Down);
        state.set_direction(Down);
        assert_eq!(state.direction(), Down);
        state.step();
        assert_eq!(state.head(), Position::new(6, 5));
    }

    #[test]
    fn step_after_game_over_is_a_no_op() {
        let mut state = with_snake(grid(10, 10), &[Position::new(0, 0)], Up, Position::new(4, 4));
        let first = state.step();
        state.set_direction(Right);
        assert_eq!(state.step(), first);
        assert_eq!(state.direction(), Up);
    }

    #[test]
    fn food_never_lands_on_snake() {
        let segments: Vec<Position> = (0..4).map(|c| Position::new(0, c)).collect();
        let mut state = with_snake(grid(5, 1), &segments, Left, Position::new(0, 4));
        for _ in 0..200 {
            assert_eq!(state.sample_free_cell(), Some(Position::new(0, 4)));
        }
    }

    #[test]
    fn filling_the_board_is_a_win() {
        let mut state = with_snake(grid(2, 1), &[Position::new(0, 0)], Right, Position::new(0, 1));

        let outcome = state.step();

        let end = SessionEnd { score: 1, reason: EndReason::BoardFilled };
        assert_eq!(outcome, StepOutcome::Ended(end));
        assert!(end.is_win());
        assert_eq!(state.food(), None);
        assert_eq!(state.phase(), Phase::GameOver);
    }

    #[test]
    fn single_cell_grid_is_immediately_full() {
        let state = GameState::with_seed(grid(1, 1), 9);
        assert_eq!(state.phase(), Phase::GameOver);
        assert_eq!(state.end().map(|e| e.reason), Some(EndReason::BoardFilled));
    }

    #[test]
    fn reset_discards_progress() {
        let mut state = with_snake(grid(10, 10), &[Position::new(5, 5)], Right, Position::new(5, 6));
        state.step();
        assert_eq!(state.score(), 1);

        state.reset(grid(30, 8));

        assert_eq!(state.score(), 0);
        assert_eq!(state.grid(), grid(30, 8));
        assert_eq!(body(&state), vec![Position::new(5, 5)]);
        assert_eq!(state.phase(), Phase::Running);
    }

    #[test]
    fn random_play_never_duplicates_segments() {
        let dirs = [Up, Right, Down, Left];
        let mut rng = StdRng::seed_from_u64(42);

        for seed in 0..50 {
            let mut state = GameState::with_seed(grid(8, 6), seed);
            for _ in 0..500 {
                state.set_direction(dirs[rng.gen_range(0..dirs.len())]);
                // Bias towards food so snakes actually grow.
                if let Some(food) = state.food() {
                    let head = state.head();
                    if rng.gen_bool(0.7) {
                        let towards = if food.row < head.row {
                            Up
                        } else if food.row > head.row {
                            Down
                        } else if food.col < head.col {
                            Left
                        } else {
                            Right
                        };
                        state.set_direction(towards);
                    }
                }

                let outcome = state.step();

                let segments = body(&state);
                let unique: HashSet<_> = segments.iter().collect();
                assert_eq!(unique.len(), segments.len(), "duplicate segment in {:?}", segments);
                assert!(segments.iter().all(|p| state.grid().contains(*p)));
                if let Some(food) = state.food() {
                    assert!(!state.snake().occupies(food));
                }
                assert_eq!(state.score() as usize, segments.len() - 1);

                if let StepOutcome::Ended(_) = outcome {
                    break;
                }
            }
        }
    }
}
