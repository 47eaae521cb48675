//! Error types.
//!
//! [`GameError`] covers configuration failures that abort game construction.
//! [`Rejection`] covers actions a player was not entitled to perform; those are
//! logged and dropped by the session, never surfaced as failures.

use thiserror::Error;
use uuid::Uuid;

use crate::game::types::GameMode;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Not enough players to form teams: {found} found, {needed} needed")]
    InsufficientPlayers { found: usize, needed: usize },
    #[error("Word pool exhausted: {needed} words needed, {available} usable")]
    WordPoolExhausted { needed: usize, available: usize },
    #[error("Invalid board size {rows}x{cols}")]
    InvalidBoardSize { rows: usize, cols: usize },
    #[error("{hit} hit and {bust} bust tiles do not fit on {cells} cells")]
    TooManySpecialTiles { hit: usize, bust: usize, cells: usize },
    #[error("{mode:?} mode cannot be played with {teams} team(s)")]
    TeamCountMismatch { mode: GameMode, teams: usize },
    #[error("Team {team} needs at least one hinter and one guesser")]
    IncompleteTeam { team: usize },
    #[error("Player {0} appears more than once")]
    DuplicatePlayer(Uuid),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("Failed to read word source: {0}")]
    WordSource(#[from] std::io::Error),
    #[error("Malformed settings: {0}")]
    SettingsFormat(#[from] serde_json::Error),
    #[error("Game session {0} not found")]
    GameNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, GameError>;

/// Why an action was ignored.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Game already ended, no new actions are accepted")]
    GameOver,
    #[error("Game has not started yet")]
    NotStarted,
    #[error("Game already started")]
    AlreadyStarted,
    #[error("Player is not part of this game")]
    UnknownPlayer,
    #[error("Player's role does not allow this action")]
    WrongRole,
    #[error("Player's team is not on turn")]
    NotOnTurn,
    #[error("Action does not fit the current phase")]
    WrongPhase,
    #[error("Coordinates are outside the board")]
    OutOfBounds,
    #[error("Tile was already revealed")]
    AlreadyRevealed,
    #[error("Suggestion does not exist")]
    UnknownSuggestion,
    #[error("Suggestion no longer accepts votes")]
    SuggestionClosed,
    #[error("Empty text")]
    EmptyText,
    #[error("Answer belongs to an earlier turn")]
    StaleAnswer,
}
