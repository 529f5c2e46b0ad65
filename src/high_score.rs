use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

const KEY: &str = "snakeHighScore";

/// Best score ever reached, kept under a fixed key in a small JSON file.
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        HighScoreStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file or key reads as zero.
    pub fn get(&self) -> Result<u32> {
        let entries = self.load()?;
        Ok(entries.get(KEY).and_then(Value::as_u64).map_or(0, |v| v.min(u32::MAX as u64) as u32))
    }

    pub fn set(&self, score: u32) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(KEY.to_string(), Value::from(score));

        let text = serde_json::to_string_pretty(&Value::Object(entries))?;
        fs::write(&self.path, text)
            .with_context(|| format!("writing high score to {}", self.path.display()))
    }

    /// Stores `score` if it beats the current best. Returns whether it did.
    pub fn record(&self, score: u32) -> Result<bool> {
        if score > self.get()? {
            self.set(score)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn load(&self) -> Result<Map<String, Value>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading high score from {}", self.path.display()))
            }
        };

        match serde_json::from_str::<Value>(&text)
            .with_context(|| format!("parsing high score file {}", self.path.display()))?
        {
            Value::Object(entries) => Ok(entries),
            _ => anyhow::bail!("high score file {} is not a JSON object", self.path.display()),
        }
    }
}
