//! Pre-game lobby.
//!
//! Collects players, deals them into random teams on every join and decides
//! the mode from the number of teams unless the host pinned one.

use log::debug;
use rand::Rng;

use crate::config::GameSettings;
use crate::error::{GameError, Result};
use crate::game::state::Game;
use crate::game::team::{Team, form_teams};
use crate::game::types::{GameMode, PlayerId, PlayerInfo};

#[derive(Debug, Clone)]
pub struct Lobby {
    players: Vec<PlayerInfo>,
    teams: Vec<Team>,
    specified_mode: Option<GameMode>,
    words: Option<Vec<String>>,
}

impl Lobby {
    /// Open a lobby hosted by `host`, who is its first player.
    pub fn new(host: PlayerInfo) -> Self {
        Self {
            players: vec![host],
            teams: Vec::new(),
            specified_mode: None,
            words: None,
        }
    }

    pub fn host(&self) -> Option<&PlayerInfo> {
        self.players.first()
    }

    pub fn players(&self) -> &[PlayerInfo] {
        &self.players
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Add a player. Joining twice is ignored and returns false.
    pub fn join<R: Rng + ?Sized>(&mut self, info: PlayerInfo, rng: &mut R) -> bool {
        if self.contains(info.id) {
            debug!("[Lobby] {} already joined", info.display_name);
            return false;
        }
        debug!("[Lobby] {} joined", info.display_name);
        self.players.push(info);
        if self.specified_mode.is_none() {
            self.reform(rng);
        }
        true
    }

    pub fn leave<R: Rng + ?Sized>(&mut self, id: PlayerId, rng: &mut R) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        if self.players.len() == before {
            return false;
        }
        debug!("[Lobby] {} left", id);
        self.reform(rng);
        true
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    /// Deal the current players into fresh random teams.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.teams = form_teams(&self.players, rng)?;
        Ok(())
    }

    fn reform<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Err(e) = self.shuffle(rng) {
            debug!("[Lobby] No teams yet: {}", e);
            self.teams.clear();
        }
    }

    /// Pin the mode; `None` goes back to deriving it from the team count.
    pub fn specify_mode(&mut self, mode: Option<GameMode>) {
        self.specified_mode = mode;
    }

    pub fn set_words(&mut self, words: Option<Vec<String>>) {
        self.words = words;
    }

    pub fn current_mode(&self) -> Result<GameMode> {
        if let Some(mode) = self.specified_mode {
            return Ok(mode);
        }
        GameMode::for_team_count(self.teams.len()).ok_or(GameError::InsufficientPlayers {
            found: self.players.len(),
            needed: crate::config::game::MIN_TEAM_SIZE,
        })
    }

    /// Give up the lobby and keep only its teams.
    pub fn into_teams(self) -> Vec<Team> {
        self.teams
    }

    /// Hand the teams over to a new game.
    pub fn into_game<R: Rng + ?Sized>(self, settings: GameSettings, rng: &mut R) -> Result<Game> {
        let mode = self.current_mode()?;
        Game::with_settings(mode, self.teams, self.words, settings, rng)
    }
}
