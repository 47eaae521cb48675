//! Teams and role allocation.

use std::collections::HashSet;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::config::game::MIN_TEAM_SIZE;
use crate::error::{GameError, Result};
use crate::game::types::{PlayerId, PlayerInfo, Role, Side, TeamId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub info: PlayerInfo,
    /// Board side, fixed at first allocation.
    pub side: Option<Side>,
    /// Free text goes to the suggestion box instead of the hint intake.
    pub suggest_mode: bool,
}

impl Player {
    pub fn new(info: PlayerInfo) -> Self {
        Self {
            info,
            side: None,
            suggest_mode: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.info.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub players: Vec<Player>,
    pub hinters: Vec<PlayerId>,
    pub guessers: Vec<PlayerId>,
    pub on_turn: bool,
    /// Last clock reading pushed by the team's countdown.
    pub clock_remaining_secs: u64,
}

impl Team {
    pub fn new(id: TeamId) -> Self {
        Self {
            id,
            players: Vec::new(),
            hinters: Vec::new(),
            guessers: Vec::new(),
            on_turn: false,
            clock_remaining_secs: 0,
        }
    }

    pub fn with_players(id: TeamId, infos: impl IntoIterator<Item = PlayerInfo>) -> Self {
        let mut team = Self::new(id);
        for info in infos {
            team.push_player(info);
        }
        team
    }

    pub fn push_player(&mut self, info: PlayerInfo) {
        if !self.contains(info.id) {
            self.players.push(Player::new(info));
        }
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id() == id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id() == id)
    }

    pub fn role_of(&self, id: PlayerId) -> Option<Role> {
        if self.hinters.contains(&id) {
            Some(Role::Hinter)
        } else if self.guessers.contains(&id) {
            Some(Role::Guesser)
        } else {
            None
        }
    }

    pub fn side_of(&self, id: PlayerId) -> Option<Side> {
        self.player(id).and_then(|p| p.side)
    }

    /// Give every unallocated player the smaller sub-role; ties go to Hinter.
    pub fn allocate_roles(&mut self) {
        let mut seen: HashSet<PlayerId> = self.hinters.iter().chain(&self.guessers).copied().collect();
        for player in self.players.iter_mut() {
            if !seen.insert(player.id()) {
                continue;
            }
            let side = if self.hinters.len() > self.guessers.len() {
                self.guessers.push(player.id());
                Side::B
            } else {
                self.hinters.push(player.id());
                Side::A
            };
            player.side.get_or_insert(side);
        }
    }

    /// Exchange hinters and guessers wholesale.
    pub fn swap_roles(&mut self) {
        std::mem::swap(&mut self.hinters, &mut self.guessers);
        debug!("[Team] {} swapped roles", self.id);
    }

    pub fn is_complete(&self) -> bool {
        !self.hinters.is_empty() && !self.guessers.is_empty()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().map(Player::id)
    }
}

/// Deal players into random teams of two; a single leftover joins the last team.
pub fn form_teams<R: Rng + ?Sized>(players: &[PlayerInfo], rng: &mut R) -> Result<Vec<Team>> {
    if players.len() < MIN_TEAM_SIZE {
        return Err(GameError::InsufficientPlayers {
            found: players.len(),
            needed: MIN_TEAM_SIZE,
        });
    }
    let mut pool = players.to_vec();
    pool.shuffle(rng);

    let mut teams: Vec<Team> = Vec::new();
    while pool.len() >= MIN_TEAM_SIZE {
        let mut team = Team::new(TeamId(teams.len()));
        for info in pool.drain(..MIN_TEAM_SIZE) {
            team.push_player(info);
        }
        if pool.len() == 1 {
            if let Some(info) = pool.pop() {
                team.push_player(info);
            }
        }
        team.allocate_roles();
        teams.push(team);
    }
    Ok(teams)
}
