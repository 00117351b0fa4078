//! Timed round lifecycle and scoring
//!
//! Idle → Running → Over. Transitions are reported to the caller as
//! `RoundEvent`s instead of callbacks; the caller reacts synchronously.

use serde::{Deserialize, Serialize};

use super::timer::IntervalTimer;
use crate::consts::COUNTDOWN_INTERVAL_MS;
use crate::highscores::HighScore;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Not started yet
    Idle,
    /// Countdown running, enemies spawning
    Running,
    /// Time ran out (or the round was aborted); terminal until restarted
    Over,
}

/// Phase transitions the owner must react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundEvent {
    Started {
        time_limit_secs: i32,
        high_score: u64,
    },
    Ended {
        score: u64,
        high_score: u64,
        new_record: bool,
    },
}

#[derive(Debug)]
pub struct RoundClock {
    phase: RoundPhase,
    score: u64,
    remaining_secs: i32,
    time_limit_secs: i32,
    countdown: Option<IntervalTimer>,
    high_score: HighScore,
}

impl RoundClock {
    /// A non-positive limit is accepted; such a round ends on its first countdown tick
    pub fn new(high_score: HighScore, time_limit_secs: i32) -> Self {
        Self {
            phase: RoundPhase::Idle,
            score: 0,
            remaining_secs: time_limit_secs,
            time_limit_secs,
            countdown: None,
            high_score,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == RoundPhase::Over
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.value()
    }

    pub fn remaining_secs(&self) -> i32 {
        self.remaining_secs
    }

    pub fn time_limit_secs(&self) -> i32 {
        self.time_limit_secs
    }

    /// Begin a round with the configured time limit
    pub fn start(&mut self) -> RoundEvent {
        self.start_with_limit(self.time_limit_secs)
    }

    pub fn start_with_limit(&mut self, time_limit_secs: i32) -> RoundEvent {
        if self.phase == RoundPhase::Running {
            log::warn!("Round restarted while running");
        }
        self.time_limit_secs = time_limit_secs;
        self.remaining_secs = time_limit_secs;
        self.score = 0;
        let high_score = self.high_score.reload();
        self.countdown = Some(IntervalTimer::new(COUNTDOWN_INTERVAL_MS));
        self.phase = RoundPhase::Running;
        log::info!(
            "Round started ({}s, high score {})",
            time_limit_secs,
            high_score
        );
        RoundEvent::Started {
            time_limit_secs,
            high_score,
        }
    }

    /// Drive the countdown; returns `Ended` on the tick that runs out the clock
    pub fn advance(&mut self, elapsed_ms: f64) -> Option<RoundEvent> {
        if self.phase != RoundPhase::Running {
            return None;
        }
        let fires = self.countdown.as_mut()?.advance(elapsed_ms);
        for _ in 0..fires {
            self.remaining_secs -= 1;
            if self.remaining_secs <= 0 {
                return Some(self.finish());
            }
        }
        None
    }

    /// Add to the score; ignored unless the round is running
    pub fn add_score(&mut self, delta: u64) -> bool {
        if self.phase != RoundPhase::Running {
            return false;
        }
        self.score = self.score.saturating_add(delta);
        true
    }

    /// End a running round immediately
    pub fn abort(&mut self) -> Option<RoundEvent> {
        if self.phase != RoundPhase::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.min(0);
        Some(self.finish())
    }

    fn finish(&mut self) -> RoundEvent {
        self.phase = RoundPhase::Over;
        self.countdown = None;
        let new_record = match self.high_score.commit(self.score) {
            Ok(new_record) => new_record,
            Err(e) => {
                log::error!("Failed to save high score: {}", e);
                false
            }
        };
        log::info!("Round over with score {}", self.score);
        RoundEvent::Ended {
            score: self.score,
            high_score: self.high_score.value(),
            new_record,
        }
    }
}
