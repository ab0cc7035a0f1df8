//! Game phase, current score and the persisted best score.

use crate::storage::ScoreStore;
use tracing::{debug, info, warn};

/// Storage key for the best score.
pub const HIGH_SCORE_KEY: &str = "flappybird-highscore";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Playing,
    Ended,
}

/// Phase transitions only run ready -> playing -> ended -> ready. Requests
/// that don't fit the current phase are ignored.
pub struct Lifecycle<S: ScoreStore> {
    phase: Phase,
    score: u32,
    high_score: u32,
    store: S,
}

impl<S: ScoreStore> Lifecycle<S> {
    /// Starts in `Ready`, with the best score read back from `store`.
    pub fn new(store: S) -> Self {
        let high_score = load_high_score(&store);
        debug!(high_score, "loaded best score");
        Self {
            phase: Phase::Ready,
            score: 0,
            high_score,
            store,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns whether the game actually started.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Ready {
            debug!(phase = ?self.phase, "start ignored");
            return false;
        }
        self.phase = Phase::Playing;
        self.score = 0;
        info!("run started");
        true
    }

    pub fn restart(&mut self) {
        self.phase = Phase::Ready;
        self.score = 0;
    }

    /// Returns whether the run actually ended.
    pub fn end(&mut self) -> bool {
        if self.phase != Phase::Playing {
            debug!(phase = ?self.phase, "end ignored");
            return false;
        }
        self.phase = Phase::Ended;
        info!(score = self.score, best = self.high_score, "run ended");
        if self.score > self.high_score {
            self.set_high_score(self.score);
        }
        true
    }

    pub fn increment_score(&mut self) {
        self.score += 1;
    }

    /// Overwrites the best score and writes it through to storage.
    pub fn set_high_score(&mut self, value: u32) {
        self.high_score = value;
        if let Err(e) = self.store.set(HIGH_SCORE_KEY, &value.to_string()) {
            warn!("could not save best score: {e}");
        }
    }
}

/// Best score from `store`; absent, unreadable or malformed values count as 0.
pub fn load_high_score(store: &impl ScoreStore) -> u32 {
    match store.get(HIGH_SCORE_KEY) {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(value = %raw, "ignoring malformed best score");
            0
        }),
        Ok(None) => 0,
        Err(e) => {
            warn!("could not read best score: {e}");
            0
        }
    }
}
