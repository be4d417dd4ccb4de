//! Runtime-adjustable minimum level

use cairn_core_types::Level;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// A minimum level shared between a `Config` and the backend it built
///
/// Clones observe each other's changes, so keeping a clone of
/// `Config::level` allows the verbosity of a running logger to be raised or
/// lowered without rebuilding it.
#[derive(Debug, Clone)]
pub struct AtomicLevel(Arc<AtomicU8>);

impl AtomicLevel {
    pub fn new(level: Level) -> Self {
        Self(Arc::new(AtomicU8::new(level as u8)))
    }

    pub fn level(&self) -> Level {
        let raw = self.0.load(Ordering::Relaxed) as usize;
        Level::ALL[raw.min(Level::ALL.len() - 1)]
    }

    pub fn set_level(&self, level: Level) {
        self.0.store(level as u8, Ordering::Relaxed);
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }
}
