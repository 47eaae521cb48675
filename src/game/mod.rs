//! Game rules and state, free of I/O.

pub mod board;
pub mod hint;
pub mod lobby;
pub mod state;
pub mod suggestion;
pub mod team;
pub mod turn_log;
pub mod types;
pub mod view;
pub mod words;

pub use state::{Audience, Effect, Game, new_game};
pub use view::{Notice, PlayerView};
