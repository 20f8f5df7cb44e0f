//! Phase and score bookkeeping
//!
//! Menu -> Playing -> GameOver -> Playing ... The controller listens to
//! simulation events, persists the high score when a round ends and queues
//! one commentary request per finished round. Each round gets a token so a
//! commentary reply that arrives after a newer round started is dropped.

use crate::highscores::{ScoreRecord, save_high_score};
use crate::persistence::Storage;
use crate::scheduler::EventSink;
use crate::sim::{Phase, SimEvent};

/// Post-round commentary as the HUD sees it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CommentaryState {
    #[default]
    Idle,
    Loading,
    Ready(String),
}

/// A commentary fetch the host should start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentaryRequest {
    pub round: u64,
    pub score: u32,
    pub prior_high: u32,
}

pub struct Controller<S> {
    storage: S,
    phase: Phase,
    scores: ScoreRecord,
    round: u64,
    commentary: CommentaryState,
    outbox: Option<CommentaryRequest>,
}

impl<S: Storage> Controller<S> {
    pub fn new(storage: S) -> Self {
        let scores = ScoreRecord::load(&storage);
        Self {
            storage,
            phase: Phase::Menu,
            scores,
            round: 0,
            commentary: CommentaryState::Idle,
            outbox: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn scores(&self) -> ScoreRecord {
        self.scores
    }

    pub fn commentary(&self) -> &CommentaryState {
        &self.commentary
    }

    /// Token of the current (or last) round
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Start command; ignored while a round is already running
    pub fn start_round(&mut self) -> bool {
        if self.phase == Phase::Playing {
            return false;
        }
        self.phase = Phase::Playing;
        self.round += 1;
        self.scores.current = 0;
        self.commentary = CommentaryState::Idle;
        self.outbox = None;
        true
    }

    /// Commentary fetch queued by the last round end, if not yet taken
    pub fn take_commentary_request(&mut self) -> Option<CommentaryRequest> {
        self.outbox.take()
    }

    /// Deliver commentary; returns false if it belongs to an older round
    pub fn resolve_commentary(&mut self, round: u64, text: String) -> bool {
        if round != self.round || self.phase != Phase::GameOver {
            log::debug!(
                "Discarding commentary for round {} (current round {}, {:?})",
                round,
                self.round,
                self.phase
            );
            return false;
        }
        self.commentary = CommentaryState::Ready(text);
        true
    }

    fn end_round(&mut self, score: u32) {
        self.phase = Phase::GameOver;
        let prior_high = self.scores.finish_round(score);
        if score > prior_high {
            log::info!("New high score: {}", score);
        }
        save_high_score(&mut self.storage, self.scores.high);

        self.commentary = CommentaryState::Loading;
        self.outbox = Some(CommentaryRequest {
            round: self.round,
            score,
            prior_high,
        });
    }
}

impl<S: Storage> EventSink for Controller<S> {
    fn on_event(&mut self, event: &SimEvent) {
        if self.phase != Phase::Playing {
            log::debug!("Ignoring {:?} outside a round", event);
            return;
        }
        match *event {
            SimEvent::ScoreChanged(score) => self.scores.current = score,
            SimEvent::RoundEnded { score, .. } => self.end_round(score),
        }
    }
}
