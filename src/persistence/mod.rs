//! High score persistence
//!
//! The simulation only knows the [`HighScoreStore`] interface. Stores are
//! tolerant: a failed load reads as zero and a failed save is logged, so a
//! broken storage medium never interrupts a game.

use std::cell::RefCell;
use std::rc::Rc;

pub mod file;

pub use file::JsonFileStore;

/// Where the best score lives between sessions
pub trait HighScoreStore {
    /// The persisted high score, or 0 when none is available
    fn load_high_score(&mut self) -> u64;
    fn save_high_score(&mut self, score: u64);
}

/// In-memory store, for tests and hosts without storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    score: u64,
    saves: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u64) -> Self {
        Self { score, saves: 0 }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Number of save calls received
    pub fn saves(&self) -> u32 {
        self.saves
    }
}

impl HighScoreStore for MemoryStore {
    fn load_high_score(&mut self) -> u64 {
        self.score
    }

    fn save_high_score(&mut self, score: u64) {
        self.score = score;
        self.saves += 1;
    }
}

/// A store shared with the host, so it can be inspected after the
/// simulation takes ownership of its handle
impl<S: HighScoreStore> HighScoreStore for Rc<RefCell<S>> {
    fn load_high_score(&mut self) -> u64 {
        self.borrow_mut().load_high_score()
    }

    fn save_high_score(&mut self, score: u64) {
        self.borrow_mut().save_high_score(score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::with_score(40);
        assert_eq!(store.load_high_score(), 40);
        store.save_high_score(120);
        assert_eq!(store.load_high_score(), 120);
        assert_eq!(store.saves(), 1);
    }

    #[test]
    fn test_shared_store_sees_saves() {
        let shared = Rc::new(RefCell::new(MemoryStore::new()));
        let mut handle: Box<dyn HighScoreStore> = Box::new(shared.clone());
        handle.save_high_score(9);
        assert_eq!(shared.borrow().score(), 9);
    }
}
