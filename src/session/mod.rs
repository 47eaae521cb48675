//! Actor layer: one `GameSession` per match, registered with a `GameSessionManager`.

pub mod messages;
pub mod notifier;
pub mod server;
pub mod wait;

pub use notifier::{Answer, Notifier, Question};
pub use server::{CreateGame, GameSession, GameSessionManager, GetGameSession, RemoveGame};
