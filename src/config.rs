use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "snake", about = "Snake on a grid sized to fit the terminal")]
pub struct Config {
    /// Milliseconds between simulation steps
    #[arg(long, default_value_t = 200, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Quiet period after the last resize before the board is rebuilt
    #[arg(long, default_value_t = 120, value_parser = clap::value_parser!(u64).range(1..))]
    pub resize_debounce_ms: u64,

    /// Desired cell size in layout units (one unit is two columns by one row)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub cell_size: u16,

    #[arg(long, default_value = ".snake_high_score.json")]
    pub high_score_file: PathBuf,

    /// Write logs here; nothing is logged otherwise
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Fix the food placement sequence
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Config {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}
