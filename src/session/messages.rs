use actix::prelude::*;

use crate::game::types::{GameResult, PlayerId, PlayerInfo, SuggestionId, TeamId};
use crate::game::view::PlayerView;

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct StartGame;

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct EndGame {
    pub winner: Option<TeamId>,
    pub loser: Option<TeamId>,
}

/// Raw hint text typed by a hinter.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct HintText {
    pub player: PlayerId,
    pub text: String,
}

/// Free text routed by the player's suggest mode.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct PlayerText {
    pub player: PlayerId,
    pub text: String,
}

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct TileSelected {
    pub player: PlayerId,
    pub row: usize,
    pub col: usize,
}

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct EndTurn {
    pub player: PlayerId,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct Suggest {
    pub player: PlayerId,
    pub word: String,
}

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct Vote {
    pub suggestion: SuggestionId,
    pub player: PlayerId,
    pub approve: bool,
}

/// Returns the new mode, or `None` for players outside the teams.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "Option<bool>")]
pub struct ToggleSuggestMode {
    pub player: PlayerId,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "bool")]
pub struct Spectate {
    pub info: PlayerInfo,
}

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "Option<PlayerView>")]
pub struct GetView {
    pub player: PlayerId,
}

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "Option<GameResult>")]
pub struct GetResult;
