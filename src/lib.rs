//! Engine for a team word-deduction party game.
//!
//! Hinters see which hidden keywords belong to their team and give one-word
//! hints; guessers pick tiles on their own copy of the board. Teams race a
//! per-team chess clock, guessers can propose hints for their hinters to
//! approve, and every turn is kept for a post-game review.
//!
//! [`game`] holds the rules as plain state transitions, [`session`] runs a
//! match as an actix actor and talks to players through a [`session::Notifier`].

pub mod config;
pub mod error;
pub mod game;
pub mod session;
pub mod timer;

pub use config::GameSettings;
pub use error::{GameError, Rejection, Result};
pub use game::{Game, new_game};
