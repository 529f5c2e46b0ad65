use crate::{TermInt, Coords};
use crate::board::CellState;
use crate::layout::{self, GridDimensions};
use crate::snake::Position;
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const EMPTY_CHAR: char = ' ';

/// Rows above the board's top border.
const STATUS_ROWS: TermInt = 1;

/// Where the board sits on screen. One layout unit is two columns wide so
/// that cells come out roughly square.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoardView {
    pub grid: GridDimensions,
    pub origin: Coords,
}

impl BoardView {
    pub fn fit(term_size: Coords, desired_cell: TermInt) -> Self {
        let (width, height) = term_size;
        let avail_cols = width.saturating_sub(2);
        let avail_rows = height.saturating_sub(2 + STATUS_ROWS);

        let grid = layout::compute(avail_cols / 2, avail_rows, desired_cell);
        let (board_w, board_h) = Self::extent(&grid);

        let origin = (
            1 + avail_cols.saturating_sub(board_w) / 2,
            1 + STATUS_ROWS + avail_rows.saturating_sub(board_h) / 2,
        );
        BoardView { grid, origin }
    }

    /// Board size in terminal columns and rows.
    pub fn size(&self) -> Coords {
        Self::extent(&self.grid)
    }

    fn extent(grid: &GridDimensions) -> Coords {
        (
            grid.cols.saturating_mul(grid.cell_size).saturating_mul(2),
            grid.rows.saturating_mul(grid.cell_size),
        )
    }

    /// Top-left terminal coordinate of a cell.
    pub fn cell_origin(&self, pos: Position) -> Coords {
        let cell = self.grid.cell_size;
        (
            self.origin.0.saturating_add(pos.col.saturating_mul(cell).saturating_mul(2)),
            self.origin.1.saturating_add(pos.row.saturating_mul(cell)),
        )
    }
}

/// `MM-SS`, minutes keep growing past 99.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}-{:02}", secs / 60, secs % 60)
}

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
    active: bool,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("reading terminal size")?;
        let stdout = stdout();
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None, active: false })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("entering alternate screen")?;
        self.active = true;
        terminal::enable_raw_mode().context("enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("hiding cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal::disable_raw_mode().context("disabling raw mode")?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("leaving alternate screen")?;
        Ok(())
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read().context("reading terminal event")? {
                return Ok(ev);
            }
        }
    }

    /// Waits up to `timeout` for the first event, then drains whatever else
    /// is already queued.
    pub fn read_events(&self, timeout: Duration) -> Result<Vec<Event>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait).context("polling terminal events")? {
            match read().context("reading terminal event")? {
                ev @ Event::Key(_) | ev @ Event::Resize(_, _) => events.push(ev),
                Event::Mouse(_) => {}
            }
            wait = Duration::from_millis(0);
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    /// Re-reads the size from the terminal itself.
    pub fn refresh_size(&mut self) -> Result<Coords> {
        let size = terminal::size().context("reading terminal size")?;
        self.set_terminal_size(size);
        Ok(size)
    }

    pub fn set_terminal_size(&mut self, size: Coords) {
        self.width = size.0;
        self.height = size.1;
        self.current_msg = None;
        self.screen = vec![' '; self.width as usize * self.height as usize];
    }

    /// Clears the screen and frames an empty board.
    pub fn draw_board_frame(&mut self, view: &BoardView) -> Result<()> {
        self.clear()?;

        let (board_w, board_h) = view.size();
        let left = view.origin.0.saturating_sub(1);
        let top = view.origin.1.saturating_sub(1);
        let right = view.origin.0.saturating_add(board_w);
        let bottom = view.origin.1.saturating_add(board_h);

        for x in left..=right {
            let ch = if x == left || x == right {'+'} else {'-'};
            self.print_at((x, top), ch)?;
            self.print_at((x, bottom), ch)?;
        }

        for y in view.origin.1..bottom {
            self.print_at((left, y), '|')?;
            self.print_at((right, y), '|')?;
        }

        self.flush()
    }

    /// Fills a cell. `glyph` overrides the default character for its state.
    pub fn draw_cell(&mut self, view: &BoardView, pos: Position, state: CellState, glyph: Option<char>) -> Result<()> {
        let ch = glyph.unwrap_or(match state {
            CellState::Snake => SNAKE_BODY_CHAR,
            CellState::Food => FOOD_CHAR,
            CellState::Empty => EMPTY_CHAR,
        });

        let (x0, y0) = view.cell_origin(pos);
        let cell = view.grid.cell_size;
        for dy in 0..cell {
            for dx in 0..cell.saturating_mul(2) {
                self.print_at((x0.saturating_add(dx), y0.saturating_add(dy)), ch)?;
            }
        }
        Ok(())
    }

    pub fn draw_status(&mut self, score: u32, high_score: u32, elapsed: Duration) -> Result<()> {
        let line = format!(
            " Score: {}   High: {}   Time: {}",
            score, high_score, format_elapsed(elapsed)
        );
        let padded = format!("{:<width$}", line, width = self.width as usize);

        for (x, ch) in padded.chars().take(self.width as usize).enumerate() {
            self.print_at((x as TermInt, 0), ch)?;
        }
        Ok(())
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let (x, y) = (top_left.0 + x_diff, top_left.1 + y_diff);
                if let Some(i) = self.screen_index((x, y)) {
                    let ch = self.screen[i];
                    self.print_at_no_save((x, y), ch)?;
                }
            }
        }

        self.flush()
    }

    pub fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        if let Some(i) = self.screen_index(pos) {
            queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
            self.screen[i] = ch;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("clearing screen")?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("flushing terminal")
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> Result<()> {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        if self.screen_index(pos).is_some() {
            queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        }
        Ok(())
    }

    fn screen_index(&self, pos: Coords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::error!("failed to restore terminal: {:#}", e);
        }
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Coords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }
}
