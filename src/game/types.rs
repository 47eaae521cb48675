use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Index of a team inside its game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub usize);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SuggestionId(pub u32);

/// Identity of a participant, handed in by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub display_name: String,
}

impl PlayerInfo {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(),
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Hidden category of a tile, fixed at board creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Hit,
    Bust,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Hinter,
    Guesser,
}

/// One half of a board pair. Players keep their side for the whole match,
/// even when cooperative play swaps their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Cooperative,
    Versus,
    BattleRoyale,
}

impl GameMode {
    /// Mode implied by the number of formed teams.
    pub fn for_team_count(teams: usize) -> Option<Self> {
        match teams {
            0 => None,
            1 => Some(GameMode::Cooperative),
            2 => Some(GameMode::Versus),
            _ => Some(GameMode::BattleRoyale),
        }
    }

    pub fn accepts(self, teams: usize) -> bool {
        match self {
            GameMode::Cooperative => teams == 1,
            GameMode::Versus => teams == 2,
            GameMode::BattleRoyale => teams >= 3,
        }
    }

    pub fn is_competitive(self) -> bool {
        !matches!(self, GameMode::Cooperative)
    }
}

/// Result of one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuessOutcome {
    Hit,
    Bust,
    Neutral,
    Rival,
}

impl From<Category> for GuessOutcome {
    fn from(category: Category) -> Self {
        match category {
            Category::Hit => GuessOutcome::Hit,
            Category::Bust => GuessOutcome::Bust,
            Category::Neutral => GuessOutcome::Neutral,
        }
    }
}

/// The clue on the table for the current turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub hinter: PlayerId,
    pub text: String,
    pub count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    AwaitingHint,
    /// Hint text arrived without a numeral; the hinter is being asked for the amount.
    AwaitingAmount { hinter: PlayerId, text: String },
    AwaitingGuess,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    AllHitsFound,
    BustRevealed,
    ClockExpired,
    TurnBudgetExhausted,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Option<TeamId>,
    pub loser: Option<TeamId>,
    pub reason: EndReason,
}
