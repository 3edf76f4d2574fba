//! The shared, atomically updated threshold.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::level::Level;

/// Current minimum severity, shared between one logger and one control handle.
///
/// Updates are single atomic stores, so a reader sees either the old or the
/// new level and concurrent writers resolve last-writer-wins.
#[derive(Debug, Clone)]
pub struct LevelCell {
    rank: Arc<AtomicU8>,
}

impl LevelCell {
    pub fn new(level: Level) -> Self {
        Self {
            rank: Arc::new(AtomicU8::new(level.rank())),
        }
    }

    pub fn get(&self) -> Level {
        // Only catalogue ranks are ever stored.
        Level::from_rank(self.rank.load(Ordering::Acquire)).unwrap_or(Level::Error)
    }

    pub fn set(&self, level: Level) {
        self.rank.store(level.rank(), Ordering::Release);
    }

    /// Whether a record at `level` passes the current threshold.
    pub fn allows(&self, level: Level) -> bool {
        level >= self.get()
    }
}
