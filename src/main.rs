mod board;
mod config;
mod game;
mod high_score;
mod layout;
mod snake;
mod state;
mod term;
mod timer;

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use config::Config;
use game::Flow;

pub type TermInt = u16;
pub type Coords = (u16, u16);

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(config.log_file.as_deref())?;

    let mut game = game::SnakeGame::new(config)?;
    game.initialize()?;

    if game.show_intro()? == Flow::Quit {
        return Ok(());
    }

    // Dropping the game restores the terminal on every way out of here
    while game.play()? == Flow::Continue {}

    Ok(())
}

/// The terminal is the game screen, so logs only go to a file when asked.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => return Ok(()),
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    log::info!("logging to {}", path.display());
    Ok(())
}
