//! Structured state handed to the presentation layer.
//!
//! The engine never formats messages. A refresh hands the notifier a
//! `PlayerView` for one participant; a `Notice` describes a single event.

use serde::{Deserialize, Serialize};

use crate::game::state::Game;
use crate::game::turn_log::LiveEntry;
use crate::game::types::{
    Category, Coord, GameMode, GameResult, GuessOutcome, Hint, Phase, PlayerId, Role, Side, SuggestionId, TeamId,
};

/// One event worth telling players about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    GameStarted {
        mode: GameMode,
        teams: usize,
    },
    HintGiven {
        team: TeamId,
        hinter: PlayerId,
        text: String,
        count: Option<u32>,
    },
    GuessResolved {
        team: TeamId,
        player: PlayerId,
        coord: Coord,
        word: String,
        outcome: GuessOutcome,
    },
    TurnAdvanced {
        team: TeamId,
        turn: u32,
        remaining_turns: Option<i32>,
    },
    SuggestionProposed {
        id: SuggestionId,
        proposer: PlayerId,
        label: String,
    },
    GameOver(GameResult),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub word: String,
    /// Hidden (`None`) unless the viewer is a hinter, the tile is revealed or the game is over.
    pub category: Option<Category>,
    pub revealed: bool,
    pub contested: bool,
    pub failed_neutral: bool,
    pub selectable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionView {
    pub id: SuggestionId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub player: PlayerId,
    /// `None` for spectators.
    pub team: Option<TeamId>,
    pub role: Option<Role>,
    pub side: Side,
    pub mode: GameMode,
    pub phase: Phase,
    pub acting_team: TeamId,
    pub on_turn: bool,
    pub hint: Option<Hint>,
    pub rows: usize,
    pub cols: usize,
    pub tiles: Vec<TileView>,
    pub remaining_hits: usize,
    pub remaining_turns: Option<i32>,
    pub clock_remaining_secs: u64,
    pub live_log: Vec<LiveEntry>,
    pub suggestions: Vec<SuggestionView>,
    pub suggest_mode: bool,
    pub result: Option<GameResult>,
}

impl Game {
    /// View of `player`, or `None` when they neither play nor watch.
    /// Spectators follow the acting team's guesser side.
    pub fn view_for(&self, player: PlayerId) -> Option<PlayerView> {
        let acting = self.current_team();
        let (team, role, side, suggest_mode) = match self.team_of(player) {
            Some(team) => {
                let t = &self.teams()[team.0];
                let member = t.player(player)?;
                (Some(team), t.role_of(player), member.side?, member.suggest_mode)
            }
            None if self.is_spectator(player) => (None, None, Side::B, false),
            None => return None,
        };
        let pair = team.unwrap_or(acting);
        let on_turn = team == Some(acting) && !self.is_over();
        let can_pick = on_turn && role == Some(Role::Guesser) && *self.phase() == Phase::AwaitingGuess;
        let sees_all = role == Some(Role::Hinter) || self.is_over();

        let board = self.boards().board(self.boards().board_id(pair.0, side));
        let tiles = board
            .tiles()
            .iter()
            .map(|t| TileView {
                word: t.word.clone(),
                category: (sees_all || t.revealed).then_some(t.category),
                revealed: t.revealed,
                contested: t.contested,
                failed_neutral: t.failed_neutral,
                selectable: can_pick && !t.revealed,
            })
            .collect();

        let suggestions = self
            .suggestions()
            .visible(self.log().turn_count(), self.settings().live_log_cap)
            .into_iter()
            .map(|s| SuggestionView {
                id: s.id,
                label: s.label(),
            })
            .collect();

        Some(PlayerView {
            player,
            team,
            role,
            side,
            mode: self.mode(),
            phase: self.phase().clone(),
            acting_team: acting,
            on_turn,
            hint: self.hint().cloned(),
            rows: board.rows(),
            cols: board.cols(),
            tiles,
            remaining_hits: self.remaining_hits(pair),
            remaining_turns: self.remaining_turns(),
            clock_remaining_secs: self.teams()[pair.0].clock_remaining_secs,
            live_log: self.log().live().entries().cloned().collect(),
            suggestions,
            suggest_mode,
            result: self.result(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameSettings;
    use crate::game::team::Team;
    use crate::game::types::PlayerInfo;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn started() -> Game {
        let mut rng = StdRng::seed_from_u64(21);
        let teams = vec![
            Team::with_players(TeamId(0), [PlayerInfo::new("a"), PlayerInfo::new("b")]),
            Team::with_players(TeamId(1), [PlayerInfo::new("c"), PlayerInfo::new("d")]),
        ];
        let mut game = Game::with_settings(GameMode::Versus, teams, None, GameSettings::default(), &mut rng).unwrap();
        game.start().unwrap();
        game
    }

    #[test]
    fn hinters_see_categories_guessers_do_not() {
        let game = started();
        let hinter = game.teams()[0].hinters[0];
        let guesser = game.teams()[0].guessers[0];

        let view = game.view_for(hinter).unwrap();
        assert!(view.tiles.iter().all(|t| t.category.is_some()));
        assert!(view.on_turn);

        let view = game.view_for(guesser).unwrap();
        assert!(view.tiles.iter().all(|t| t.category.is_none()));
        // No hint yet, nothing to pick.
        assert!(view.tiles.iter().all(|t| !t.selectable));
    }

    #[test]
    fn guessers_can_pick_once_a_hint_is_given() {
        let mut game = started();
        let hinter = game.teams()[0].hinters[0];
        game.submit_hint(hinter, "ねこ1").unwrap();
        let view = game.view_for(game.teams()[0].guessers[0]).unwrap();
        assert!(view.tiles.iter().all(|t| t.selectable));
        assert_eq!(view.hint.unwrap().count, Some(1));

        let other = game.view_for(game.teams()[1].guessers[0]).unwrap();
        assert!(!other.on_turn);
        assert!(other.tiles.iter().all(|t| !t.selectable));
    }

    #[test]
    fn spectators_follow_the_acting_team() {
        let mut game = started();
        let watcher = PlayerInfo::new("watcher");
        let id = watcher.id;
        assert!(game.add_spectator(watcher));
        let view = game.view_for(id).unwrap();
        assert_eq!(view.team, None);
        assert_eq!(view.side, Side::B);
        assert_eq!(view.acting_team, TeamId(0));
        assert!(view.tiles.iter().all(|t| t.category.is_none() && !t.selectable));

        assert!(game.view_for(PlayerId::new()).is_none());
    }
}
