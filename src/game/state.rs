//! Turn controller.
//!
//! `Game` owns the boards, the teams, the hint and the logs, and implements the
//! hint → guess → advance state machine. It performs no I/O: every operation
//! returns the list of [`Effect`]s the session has to carry out (arm a clock,
//! ask a hinter, refresh views). Actions a player is not entitled to perform
//! come back as a [`Rejection`] and leave the state untouched.

use std::collections::HashSet;

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameSettings;
use crate::error::{GameError, Rejection, Result};
use crate::game::board::{BoardSet, TileRef};
use crate::game::hint::{parse_count, parse_hint};
use crate::game::turn_log::TurnLog;
use crate::game::suggestion::{SuggestionBook, VoteOutcome};
use crate::game::team::Team;
use crate::game::types::{
    Category, Coord, EndReason, GameMode, GameResult, GuessOutcome, Hint, Phase, PlayerId, PlayerInfo, Role,
    SuggestionId, TeamId,
};
use crate::game::view::Notice;
use crate::game::words::{default_words, screen_words};

/// Who has to re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
    Player(PlayerId),
    Team(TeamId),
    Everyone,
}

/// Work the session performs on behalf of the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Arm (or resume) the team's clock.
    StartClock(TeamId),
    /// Stop the team's clock, keeping its remaining budget.
    StopClock(TeamId),
    /// Arm the hint input wait for the acting team.
    AwaitHint(TeamId),
    /// Ask the hinter how many keywords the hint covers.
    AskAmount { hinter: PlayerId, text: String, epoch: u32 },
    /// Ask every listed hinter to approve or reject a suggestion.
    OpenSuggestion {
        id: SuggestionId,
        word: String,
        proposer: PlayerId,
        hinters: Vec<PlayerId>,
    },
    /// Drop the vote waits of these suggestions.
    CloseSuggestions(Vec<SuggestionId>),
    Notify(Audience, Notice),
    Refresh(Audience),
    GameOver(GameResult),
}

pub type Outcome = std::result::Result<Vec<Effect>, Rejection>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    mode: GameMode,
    settings: GameSettings,
    teams: Vec<Team>,
    boards: BoardSet,
    /// Index of the acting team.
    current: usize,
    phase: Phase,
    hint: Option<Hint>,
    /// Cooperative turn budget; unused by competitive modes.
    remaining_turns: i32,
    result: Option<GameResult>,
    log: TurnLog,
    suggestions: SuggestionBook,
    spectators: Vec<PlayerInfo>,
}

/// Build a game with default timings, drawing words from `words` or the built-in pool.
pub fn new_game(
    mode: GameMode,
    teams: Vec<Team>,
    words: Option<Vec<String>>,
    rows: usize,
    cols: usize,
    hit_count: usize,
    bust_count: usize,
) -> Result<Game> {
    let settings = GameSettings {
        rows,
        cols,
        hit_count,
        bust_count,
        ..GameSettings::default()
    };
    Game::with_settings(mode, teams, words, settings, &mut rand::rng())
}

impl Game {
    pub fn with_settings<R: Rng + ?Sized>(
        mode: GameMode,
        mut teams: Vec<Team>,
        words: Option<Vec<String>>,
        settings: GameSettings,
        rng: &mut R,
    ) -> Result<Self> {
        settings.validate()?;
        if !mode.accepts(teams.len()) {
            return Err(GameError::TeamCountMismatch {
                mode,
                teams: teams.len(),
            });
        }

        let mut seen = HashSet::new();
        for (index, team) in teams.iter_mut().enumerate() {
            team.id = TeamId(index);
            team.on_turn = false;
            team.clock_remaining_secs = settings.time_limit_secs;
            for id in team.player_ids() {
                if !seen.insert(id) {
                    return Err(GameError::DuplicatePlayer(id.0));
                }
            }
            team.allocate_roles();
            if !team.is_complete() {
                return Err(GameError::IncompleteTeam { team: index });
            }
        }

        let pool = words.unwrap_or_else(default_words);
        let cells = settings.rows * settings.cols;
        let picked = screen_words(&pool, cells, settings.max_word_len, rng)?;
        let boards = BoardSet::generate(
            &picked,
            settings.rows,
            settings.cols,
            settings.hit_count,
            settings.bust_count,
            teams.len(),
            rng,
        )?;

        info!(
            "[Game] New {:?} game: {} team(s), {}x{} board",
            mode,
            teams.len(),
            settings.rows,
            settings.cols
        );
        Ok(Self {
            mode,
            remaining_turns: settings.turns,
            log: TurnLog::new(settings.live_log_cap),
            settings,
            teams,
            boards,
            current: 0,
            phase: Phase::Setup,
            hint: None,
            result: None,
            suggestions: SuggestionBook::new(),
            spectators: Vec::new(),
        })
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(id.0)
    }

    pub fn boards(&self) -> &BoardSet {
        &self.boards
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn hint(&self) -> Option<&Hint> {
        self.hint.as_ref()
    }

    pub fn log(&self) -> &TurnLog {
        &self.log
    }

    pub fn suggestions(&self) -> &SuggestionBook {
        &self.suggestions
    }

    pub fn spectators(&self) -> &[PlayerInfo] {
        &self.spectators
    }

    pub fn current_team(&self) -> TeamId {
        TeamId(self.current)
    }

    pub fn remaining_turns(&self) -> Option<i32> {
        (self.mode == GameMode::Cooperative).then_some(self.remaining_turns)
    }

    pub fn remaining_hits(&self, team: TeamId) -> usize {
        self.boards.remaining_hits(team.0)
    }

    pub fn is_started(&self) -> bool {
        self.phase != Phase::Setup
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn team_of(&self, player: PlayerId) -> Option<TeamId> {
        self.teams.iter().position(|t| t.contains(player)).map(TeamId)
    }

    pub fn is_spectator(&self, player: PlayerId) -> bool {
        self.spectators.iter().any(|s| s.id == player)
    }

    /// Team members followed by spectators.
    pub fn participants(&self) -> Vec<PlayerId> {
        self.teams
            .iter()
            .flat_map(Team::player_ids)
            .chain(self.spectators.iter().map(|s| s.id))
            .collect()
    }

    pub fn add_spectator(&mut self, info: PlayerInfo) -> bool {
        if self.team_of(info.id).is_some() || self.is_spectator(info.id) {
            return false;
        }
        debug!("[Game] Spectator joined: {}", info.display_name);
        self.spectators.push(info);
        true
    }

    /// Record the clock reading pushed by the team's countdown.
    pub fn record_clock(&mut self, team: TeamId, remaining_secs: u64) {
        if let Some(team) = self.teams.get_mut(team.0) {
            team.clock_remaining_secs = remaining_secs;
        }
    }

    fn ensure_active(&self) -> std::result::Result<(), Rejection> {
        if self.is_over() {
            Err(Rejection::GameOver)
        } else if self.phase == Phase::Setup {
            Err(Rejection::NotStarted)
        } else {
            Ok(())
        }
    }

    /// Role of `player`, who must belong to the acting team.
    fn acting_member(&self, player: PlayerId) -> std::result::Result<Role, Rejection> {
        let team = self.team_of(player).ok_or(Rejection::UnknownPlayer)?;
        if team.0 != self.current {
            return Err(Rejection::NotOnTurn);
        }
        self.teams[team.0].role_of(player).ok_or(Rejection::WrongRole)
    }

    pub fn start(&mut self) -> Outcome {
        if self.is_over() {
            return Err(Rejection::GameOver);
        }
        if self.is_started() {
            return Err(Rejection::AlreadyStarted);
        }
        self.current = 0;
        self.teams[0].on_turn = true;
        self.phase = Phase::AwaitingHint;
        info!("[Game] Started, {} on turn", self.current_team());
        Ok(vec![
            Effect::Notify(
                Audience::Everyone,
                Notice::GameStarted {
                    mode: self.mode,
                    teams: self.teams.len(),
                },
            ),
            Effect::StartClock(self.current_team()),
            Effect::AwaitHint(self.current_team()),
            Effect::Refresh(Audience::Everyone),
        ])
    }

    /// Hint intake: parse `raw` into text and count, or ask for the count.
    pub fn submit_hint(&mut self, player: PlayerId, raw: &str) -> Outcome {
        self.ensure_active()?;
        if self.acting_member(player)? != Role::Hinter {
            return Err(Rejection::WrongRole);
        }
        if self.phase != Phase::AwaitingHint {
            return Err(Rejection::WrongPhase);
        }
        let parsed = parse_hint(raw);
        if parsed.text.is_empty() {
            return Err(Rejection::EmptyText);
        }
        match parsed.count {
            Some(count) => Ok(self.apply_hint(player, parsed.text, Some(count))),
            None => {
                debug!("[Game] Hint '{}' has no amount, asking {}", parsed.text, player);
                self.phase = Phase::AwaitingAmount {
                    hinter: player,
                    text: parsed.text.clone(),
                };
                Ok(vec![
                    Effect::AskAmount {
                        hinter: player,
                        text: parsed.text,
                        epoch: self.log.turn_count(),
                    },
                    Effect::Refresh(Audience::Team(self.current_team())),
                ])
            }
        }
    }

    /// Finish an amount request. `None` (timeout or no answer) leaves the count unset.
    pub fn resolve_amount(&mut self, hinter: PlayerId, epoch: u32, answer: Option<&str>) -> Outcome {
        self.ensure_active()?;
        if epoch != self.log.turn_count() {
            return Err(Rejection::StaleAnswer);
        }
        let text = match &self.phase {
            Phase::AwaitingAmount { hinter: asked, text } if *asked == hinter => text.clone(),
            _ => return Err(Rejection::StaleAnswer),
        };
        let count = answer.and_then(|a| {
            let chars: Vec<char> = a.trim().chars().collect();
            parse_count(&chars)
        });
        Ok(self.apply_hint(hinter, text, count))
    }

    fn apply_hint(&mut self, hinter: PlayerId, text: String, count: Option<u32>) -> Vec<Effect> {
        let team = self.current_team();
        info!("[Game] {} hint: '{}' ({:?})", team, text, count);
        self.log.add_hint(hinter, &text, count);
        self.hint = Some(Hint {
            hinter,
            text: text.clone(),
            count,
        });
        self.phase = Phase::AwaitingGuess;

        let mut effects = Vec::new();
        let retired = self.suggestions.retire_all();
        if !retired.is_empty() {
            effects.push(Effect::CloseSuggestions(retired));
        }
        effects.push(Effect::Notify(
            Audience::Everyone,
            Notice::HintGiven {
                team,
                hinter,
                text,
                count,
            },
        ));
        effects.push(Effect::Refresh(Audience::Everyone));
        effects
    }

    /// Resolve a tile pick by `player` at `coord` on the player's own board.
    pub fn select_tile(&mut self, player: PlayerId, coord: Coord) -> Outcome {
        self.ensure_active()?;
        let team = self.team_of(player).ok_or(Rejection::UnknownPlayer)?;
        let side = self.teams[team.0].side_of(player).ok_or(Rejection::UnknownPlayer)?;
        let board = self.boards.board_id(team.0, side);
        let at = self.boards.tile_ref(board, coord).ok_or(Rejection::OutOfBounds)?;

        let entitled = if team.0 != self.current {
            Err(Rejection::NotOnTurn)
        } else if self.teams[team.0].role_of(player) != Some(Role::Guesser) {
            Err(Rejection::WrongRole)
        } else if self.phase != Phase::AwaitingGuess {
            Err(Rejection::WrongPhase)
        } else {
            Ok(())
        };
        if let Err(rejection) = entitled {
            let tile = self.boards.tile(at);
            let (word, outcome) = (tile.word.clone(), GuessOutcome::from(tile.category));
            self.log.add_answer(player, &word, outcome, false);
            return Err(rejection);
        }
        if self.boards.tile(at).revealed {
            return Err(Rejection::AlreadyRevealed);
        }

        let outcome = self.resolve_pick(team, at);
        let word = self.boards.tile(at).word.clone();
        debug!("[Game] {} picked '{}' at {:?}: {:?}", player, word, coord, outcome);
        self.log.add_answer(player, &word, outcome, true);

        let mut effects = vec![Effect::Notify(
            Audience::Everyone,
            Notice::GuessResolved {
                team,
                player,
                coord,
                word,
                outcome,
            },
        )];
        match outcome {
            GuessOutcome::Hit if self.remaining_hits(team) == 0 => {
                effects.extend(self.end_with(Some(team), None, EndReason::AllHitsFound));
            }
            GuessOutcome::Hit => effects.push(Effect::Refresh(Audience::Everyone)),
            GuessOutcome::Bust => {
                effects.extend(self.end_with(None, Some(team), EndReason::BustRevealed));
            }
            GuessOutcome::Neutral | GuessOutcome::Rival => effects.extend(self.advance_turn()?),
        }
        Ok(effects)
    }

    /// Board side of a pick: Hit, then Bust, then Rival, then Neutral.
    fn resolve_pick(&mut self, team: TeamId, at: TileRef) -> GuessOutcome {
        let category = self.boards.tile(at).category;
        if category == Category::Neutral && self.mode.is_competitive() {
            let rival = (0..self.teams.len())
                .filter(|&other| other != team.0)
                .find(|&other| self.boards.is_solved(other, at.index));
            if let Some(other) = rival {
                debug!("[Game] {} picked a cell already solved by {}", team, TeamId(other));
                self.boards.mark_contested(at);
                return GuessOutcome::Rival;
            }
        }
        self.boards.reveal(at).category.into()
    }

    pub fn end_turn(&mut self, player: PlayerId) -> Outcome {
        self.ensure_active()?;
        if self.acting_member(player)? != Role::Guesser {
            return Err(Rejection::WrongRole);
        }
        if self.phase != Phase::AwaitingGuess {
            return Err(Rejection::WrongPhase);
        }
        self.advance_turn()
    }

    /// Close the turn and hand it to the next team, or swap roles in cooperative mode.
    pub fn advance_turn(&mut self) -> Outcome {
        self.ensure_active()?;
        let outgoing = self.current_team();
        self.hint = None;
        self.log.on_advance_turn();
        self.teams[outgoing.0].on_turn = false;

        let mut effects = vec![Effect::StopClock(outgoing)];
        let retired = self.suggestions.retire_all();
        if !retired.is_empty() {
            effects.push(Effect::CloseSuggestions(retired));
        }

        if self.mode == GameMode::Cooperative {
            self.remaining_turns -= 1;
            if self.remaining_turns < 0 {
                info!("[Game] Turn budget exhausted");
                effects.extend(self.end_with(None, Some(outgoing), EndReason::TurnBudgetExhausted));
                return Ok(effects);
            }
            self.teams[outgoing.0].swap_roles();
        } else {
            self.current = (self.current + 1) % self.teams.len();
        }

        let incoming = self.current_team();
        self.teams[incoming.0].on_turn = true;
        self.phase = Phase::AwaitingHint;
        debug!("[Game] Turn {} goes to {}", self.log.turn_count(), incoming);
        effects.extend([
            Effect::StartClock(incoming),
            Effect::AwaitHint(incoming),
            Effect::Notify(
                Audience::Everyone,
                Notice::TurnAdvanced {
                    team: incoming,
                    turn: self.log.turn_count(),
                    remaining_turns: self.remaining_turns(),
                },
            ),
            Effect::Refresh(Audience::Everyone),
        ]);
        Ok(effects)
    }

    /// The team's clock ran out while it was on turn: it loses the match.
    pub fn expire_clock(&mut self, team: TeamId) -> Outcome {
        self.ensure_active()?;
        if !self.teams.get(team.0).is_some_and(|t| t.on_turn) {
            return Err(Rejection::NotOnTurn);
        }
        info!("[Game] {} ran out of time", team);
        self.record_clock(team, 0);
        Ok(self.end_with(None, Some(team), EndReason::ClockExpired))
    }

    pub fn suggest(&mut self, player: PlayerId, word: &str) -> Outcome {
        self.ensure_active()?;
        if self.acting_member(player)? != Role::Guesser {
            return Err(Rejection::WrongRole);
        }
        if self.phase != Phase::AwaitingHint {
            return Err(Rejection::WrongPhase);
        }
        let word = word.trim();
        if word.is_empty() {
            return Err(Rejection::EmptyText);
        }
        let team = self.current_team();
        let id = self.suggestions.propose(player, word, self.log.turn_count());
        let label = self.suggestions.get(id).map(|s| s.label()).unwrap_or_default();
        debug!("[Game] {} suggested '{}'", player, word);
        Ok(vec![
            Effect::OpenSuggestion {
                id,
                word: word.to_owned(),
                proposer: player,
                hinters: self.teams[team.0].hinters.clone(),
            },
            Effect::Notify(
                Audience::Team(team),
                Notice::SuggestionProposed {
                    id,
                    proposer: player,
                    label,
                },
            ),
            Effect::Refresh(Audience::Team(team)),
        ])
    }

    /// A hinter's vote. The first approval runs the word through hint intake.
    pub fn vote(&mut self, id: SuggestionId, player: PlayerId, approve: bool) -> Outcome {
        self.ensure_active()?;
        if self.acting_member(player)? != Role::Hinter {
            return Err(Rejection::WrongRole);
        }
        if self.phase != Phase::AwaitingHint {
            return Err(Rejection::WrongPhase);
        }
        match self.suggestions.vote(id, player, approve)? {
            VoteOutcome::Adopted {
                word,
                hinter,
                mut retired,
            } => {
                info!("[Game] Suggestion '{}' adopted by {}", word, hinter);
                retired.push(id);
                let mut effects = vec![Effect::CloseSuggestions(retired)];
                effects.extend(self.submit_hint(hinter, &word)?);
                Ok(effects)
            }
            VoteOutcome::Tallied { .. } => Ok(vec![Effect::Refresh(Audience::Team(self.current_team()))]),
        }
    }

    /// The vote wait of a suggestion ran out.
    pub fn expire_suggestion(&mut self, id: SuggestionId) -> Outcome {
        if !self.suggestions.expire(id) {
            return Err(Rejection::SuggestionClosed);
        }
        debug!("[Game] Suggestion {:?} expired", id);
        Ok(vec![Effect::Refresh(Audience::Team(self.current_team()))])
    }

    /// Flip where the player's free text goes. Returns the new mode.
    pub fn toggle_suggest_mode(&mut self, player: PlayerId) -> std::result::Result<bool, Rejection> {
        let team = self.team_of(player).ok_or(Rejection::UnknownPlayer)?;
        let member = self.teams[team.0].player_mut(player).ok_or(Rejection::UnknownPlayer)?;
        member.suggest_mode = !member.suggest_mode;
        Ok(member.suggest_mode)
    }

    /// Free text from a player: a suggestion in suggest mode, hint text otherwise.
    pub fn route_text(&mut self, player: PlayerId, text: &str) -> Outcome {
        let team = self.team_of(player).ok_or(Rejection::UnknownPlayer)?;
        let suggest_mode = self.teams[team.0].player(player).is_some_and(|p| p.suggest_mode);
        if suggest_mode {
            self.suggest(player, text)
        } else {
            self.submit_hint(player, text)
        }
    }

    /// End the match from outside (host abort, administrative end).
    pub fn end(&mut self, winner: Option<TeamId>, loser: Option<TeamId>) -> Vec<Effect> {
        self.end_with(winner, loser, EndReason::Aborted)
    }

    /// Move to `Over` once; later calls return no effects.
    pub fn end_with(&mut self, winner: Option<TeamId>, loser: Option<TeamId>, reason: EndReason) -> Vec<Effect> {
        if self.is_over() {
            return Vec::new();
        }
        let result = GameResult { winner, loser, reason };
        self.result = Some(result);
        let was_started = self.is_started();
        self.phase = Phase::Over;
        self.hint = None;
        self.log.close();
        for team in &mut self.teams {
            team.on_turn = false;
        }
        info!(
            "[Game] Over: winner={:?} loser={:?} reason={:?}, {} turn(s) in review",
            winner,
            loser,
            reason,
            self.log.review().history().len()
        );

        let mut effects = Vec::new();
        if was_started {
            effects.push(Effect::StopClock(self.current_team()));
        }
        let retired = self.suggestions.retire_all();
        if !retired.is_empty() {
            effects.push(Effect::CloseSuggestions(retired));
        }
        effects.extend([
            Effect::Notify(Audience::Everyone, Notice::GameOver(result)),
            Effect::GameOver(result),
            Effect::Refresh(Audience::Everyone),
        ]);
        effects
    }
}
