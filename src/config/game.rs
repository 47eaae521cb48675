/// Game configuration constants.
///
/// This module defines the main gameplay parameters such as grid dimensions,
/// tile counts, the cooperative turn budget, clock limits and wait timeouts.
pub const DEFAULT_ROWS: usize = 5; // Rows of the keyword grid.

/// Columns of the keyword grid.
pub const DEFAULT_COLS: usize = 5;

/// Largest grid the presentation layer can render (5 x 5 = 25 choices).
pub const MAX_ROWS: usize = 5;
pub const MAX_COLS: usize = 5;

/// Hit tiles per board pair.
pub const DEFAULT_HIT_COUNT: usize = 8;

/// Bust tiles per board pair.
pub const DEFAULT_BUST_COUNT: usize = 3;

/// Turns granted in cooperative mode before the game ends without a win.
pub const DEFAULT_TURNS: i32 = 8;

/// Per-team clock budget in seconds (7 minutes).
pub const TIME_LIMIT_SECS: u64 = 7 * 60;

/// Generic wait for player input before the wait is re-armed.
pub const INPUT_WAIT_SECS: u64 = 3600;

/// Lifetime of an undecided hint suggestion.
pub const SUGGESTION_TIMEOUT_SECS: u64 = 3600;

/// How long a hinter gets to answer "how many keywords?".
pub const ASK_AMOUNT_TIMEOUT_SECS: u64 = 20;

/// Longest word (in characters) accepted onto the board.
pub const MAX_WORD_LEN: usize = 5;

/// Hard ceiling of options in a bounded-choice list (live log, suggestions).
pub const LIVE_LOG_CAP: usize = 25;

/// Smallest team that can be formed.
pub const MIN_TEAM_SIZE: usize = 2;

/// Poll period of a running countdown.
pub const COUNTDOWN_TICK_MILLIS: u64 = 100;

/// Period of the acting team's clock refresh.
pub const REFRESH_INTERVAL_SECS: u64 = 2;

/// Period of the full re-render of every player.
pub const RESEND_INTERVAL_SECS: u64 = 890;

/// Options offered when the hinter is asked for an amount.
pub const AMOUNT_OPTIONS: std::ops::RangeInclusive<u32> = 1..=9;

/// Options offered to a hinter for a suggestion.
pub const APPROVE: &str = "approve";
pub const REJECT: &str = "reject";
