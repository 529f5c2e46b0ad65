use std::cmp::max;
use std::time::{Duration, Instant};

use crate::Coords;
use crate::board::{CellBuffer, CellState};
use crate::config::Config;
use crate::high_score::HighScoreStore;
use crate::snake::{Direction::{self, *}, Position};
use crate::state::{GameState, Phase, SessionEnd, StepOutcome};
use crate::term::{BoardView, TermManager};
use crate::timer::{Debounce, Interval, Stopwatch};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use log::{debug, info, warn};

const CLOCK_PERIOD: Duration = Duration::from_secs(1);
const DEAD_SNAKE_CHAR: char = 'X';

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct SnakeGame {
    config: Config,
    term: TermManager,
    store: HighScoreStore,
    high_score: u32,
    view: BoardView,
    state: GameState,
    drawn: CellBuffer,
    drawn_head: Option<Position>,
}

impl SnakeGame {
    pub fn new(config: Config) -> Result<Self> {
        let term = TermManager::new()?;
        let view = BoardView::fit(term.get_terminal_size(), config.cell_size);
        let state = match config.seed {
            Some(seed) => GameState::with_seed(view.grid, seed),
            None => GameState::new(view.grid),
        };

        let store = HighScoreStore::new(config.high_score_file.clone());
        let high_score = store.get().unwrap_or_else(|e| {
            warn!("could not read high score: {:#}", e);
            0
        });

        let drawn = CellBuffer::new(&view.grid);
        Ok(SnakeGame { config, term, store, high_score, view, state, drawn, drawn_head: None })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.setup()
    }

    pub fn show_intro(&mut self) -> Result<Flow> {
        let lines = &[
            "Arrow keys or WASD to move",
            "CTRL+C to quit",
            "",
            "Press any key to begin"
        ];

        self.term.show_message(lines)?;

        if is_ctrl_c(&self.term.read_key_blocking()?) {
            return Ok(Flow::Quit);
        }

        self.term.hide_message()?;
        Ok(Flow::Continue)
    }

    /// Runs one session to its end.
    pub fn play(&mut self) -> Result<Flow> {
        let mut now = Instant::now();
        let clock_start = Stopwatch::start(now);
        let size = self.term.refresh_size()?;
        self.rebuild(size, clock_start.elapsed(now))?;

        let mut tick = Interval::new(self.config.tick(), now);
        let mut clock = Interval::new(CLOCK_PERIOD, now);
        let mut resize = Debounce::new(self.config.resize_debounce());

        loop {
            let deadline = [tick.next_deadline(), clock.next_deadline(), resize.next_deadline()]
                .iter()
                .flatten()
                .copied()
                .min();
            let timeout = deadline.map_or(CLOCK_PERIOD, |d| d.saturating_duration_since(now));

            for ev in self.term.read_events(timeout)? {
                match ev {
                    Event::Key(key) if is_ctrl_c(&key) => return Ok(Flow::Quit),
                    Event::Key(KeyEvent { code, .. }) if self.state.phase() == Phase::Running => {
                        if let Some(dir) = direction_for(code) {
                            self.state.set_direction(dir);
                        }
                    }
                    Event::Resize(w, h) => resize.trigger((w, h), Instant::now()),
                    _ => {}
                }
            }

            now = Instant::now();

            // The session clock keeps running across resizes; only a new
            // session after game over starts it again.
            if let Some(size) = resize.poll(now) {
                self.term.set_terminal_size(size);
                self.rebuild(size, clock_start.elapsed(now))?;
            }

            if clock.poll(now) {
                self.draw_status(clock_start.elapsed(now))?;
                self.term.flush()?;
            }

            if tick.poll(now) {
                let outcome = self.state.step();
                self.render()?;
                self.draw_status(clock_start.elapsed(now))?;
                self.term.flush()?;

                if let StepOutcome::Ate { new_head } = outcome {
                    debug!(
                        "ate at {:?} heading {:?}, score {}",
                        new_head, self.state.direction(), self.state.score()
                    );
                }

                if let Some(end) = self.state.end() {
                    tick.cancel();
                    resize.cancel();
                    return self.game_over(end);
                }
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Fits the board to `size` and starts a fresh session on it.
    fn rebuild(&mut self, size: Coords, elapsed: Duration) -> Result<()> {
        self.view = BoardView::fit(size, self.config.cell_size);
        self.state.reset(self.view.grid);
        self.drawn = CellBuffer::new(&self.state.grid());
        self.drawn_head = None;

        let grid = self.view.grid;
        info!("new session on {}x{} grid, cell size {}", grid.cols, grid.rows, grid.cell_size);

        self.term.draw_board_frame(&self.view)?;
        self.render()?;
        self.draw_status(elapsed)?;
        self.term.flush()
    }

    /// Repaints the cells that changed since the last frame.
    fn render(&mut self) -> Result<()> {
        let mut next = CellBuffer::new(&self.view.grid);
        next.paint(&self.state);

        for (pos, cell) in next.diff(&self.drawn) {
            self.term.draw_cell(&self.view, pos, cell, None)?;
        }

        // The previous head may still be snake, but loses its arrow.
        if let Some(pos) = self.drawn_head {
            if let Some(cell) = next.get(pos) {
                self.term.draw_cell(&self.view, pos, cell, None)?;
            }
        }
        let head = self.state.head();
        self.term.draw_cell(&self.view, head, CellState::Snake, Some(self.state.snake().head_char()))?;

        self.drawn = next;
        self.drawn_head = Some(head);
        Ok(())
    }

    fn draw_status(&mut self, elapsed: Duration) -> Result<()> {
        let shown_high = max(self.high_score, self.state.score());
        self.term.draw_status(self.state.score(), shown_high, elapsed)
    }

    fn game_over(&mut self, end: SessionEnd) -> Result<Flow> {
        info!("session over: {:?} with score {}", end.reason, end.score);

        match self.store.record(end.score) {
            Ok(true) => info!("new high score {} saved to {}", end.score, self.store.path().display()),
            Ok(false) => debug!("high score {} unchanged", self.high_score),
            Err(e) => warn!("could not save high score: {:#}", e),
        }
        self.high_score = max(self.high_score, end.score);

        if !end.is_win() {
            let body: Vec<_> = self.state.snake().body().iter().copied().collect();
            for pos in body {
                self.term.draw_cell(&self.view, pos, CellState::Snake, Some(DEAD_SNAKE_CHAR))?;
            }
        }

        let title = if end.is_win() {"You won!"} else {"Game over!"};
        let score = format!("Score: {}", end.score);
        let best = format!("High score: {}", self.high_score);
        self.term.show_message(&[
            title,
            score.as_str(),
            best.as_str(),
            "",
            "Press any key to play again,",
            "or CTRL+C to quit."
        ])?;

        if is_ctrl_c(&self.term.read_key_blocking()?) {
            Ok(Flow::Quit)
        } else {
            Ok(Flow::Continue)
        }
    }
}

fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('w') | KeyCode::Up => Some(Up),
        KeyCode::Char('a') | KeyCode::Left => Some(Left),
        KeyCode::Char('s') | KeyCode::Down => Some(Down),
        KeyCode::Char('d') | KeyCode::Right => Some(Right),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
