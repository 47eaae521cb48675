//! Runtime game settings.
//!
//! Every value defaults to the matching constant in [`crate::config::game`]; a
//! presentation layer may override any subset of them from JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::game::*;
use crate::error::{GameError, Result};

/// Tunable parameters of one match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub rows: usize,
    pub cols: usize,
    pub hit_count: usize,
    pub bust_count: usize,
    /// Cooperative turn budget.
    pub turns: i32,
    /// Per-team clock budget in seconds.
    pub time_limit_secs: u64,
    pub input_wait_secs: u64,
    pub suggestion_timeout_secs: u64,
    pub ask_amount_timeout_secs: u64,
    pub max_word_len: usize,
    pub live_log_cap: usize,
    pub countdown_tick_millis: u64,
    pub refresh_interval_secs: u64,
    pub resend_interval_secs: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            hit_count: DEFAULT_HIT_COUNT,
            bust_count: DEFAULT_BUST_COUNT,
            turns: DEFAULT_TURNS,
            time_limit_secs: TIME_LIMIT_SECS,
            input_wait_secs: INPUT_WAIT_SECS,
            suggestion_timeout_secs: SUGGESTION_TIMEOUT_SECS,
            ask_amount_timeout_secs: ASK_AMOUNT_TIMEOUT_SECS,
            max_word_len: MAX_WORD_LEN,
            live_log_cap: LIVE_LOG_CAP,
            countdown_tick_millis: COUNTDOWN_TICK_MILLIS,
            refresh_interval_secs: REFRESH_INTERVAL_SECS,
            resend_interval_secs: RESEND_INTERVAL_SECS,
        }
    }
}

impl GameSettings {
    /// Parse settings from JSON; missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: GameSettings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the invariants a board and the clocks rely on.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_ROWS).contains(&self.rows) || !(1..=MAX_COLS).contains(&self.cols) {
            return Err(GameError::InvalidBoardSize {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let cells = self.rows * self.cols;
        if self.hit_count + self.bust_count > cells {
            return Err(GameError::TooManySpecialTiles {
                hit: self.hit_count,
                bust: self.bust_count,
                cells,
            });
        }
        if self.hit_count == 0 {
            return Err(GameError::InvalidSettings("hit_count must be at least 1".into()));
        }
        if self.time_limit_secs == 0 {
            return Err(GameError::InvalidSettings("time_limit_secs must be positive".into()));
        }
        if self.live_log_cap == 0 || self.live_log_cap > LIVE_LOG_CAP {
            return Err(GameError::InvalidSettings(format!(
                "live_log_cap must be within 1..={}",
                LIVE_LOG_CAP
            )));
        }
        if self.countdown_tick_millis == 0 {
            return Err(GameError::InvalidSettings("countdown_tick_millis must be positive".into()));
        }
        Ok(())
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_secs)
    }

    pub fn input_wait(&self) -> Duration {
        Duration::from_secs(self.input_wait_secs)
    }

    pub fn suggestion_timeout(&self) -> Duration {
        Duration::from_secs(self.suggestion_timeout_secs)
    }

    pub fn ask_amount_timeout(&self) -> Duration {
        Duration::from_secs(self.ask_amount_timeout_secs)
    }

    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_millis)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn resend_interval(&self) -> Duration {
        Duration::from_secs(self.resend_interval_secs)
    }
}
