//! Hint suggestions and hinter voting.
//!
//! Guessers in suggest mode propose candidate hint words. Every suggestion
//! keeps its own tally; the first approval by a hinter adopts it and retires
//! the rest. Nothing changes a suggestion once it has left the `Open` state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Rejection;
use crate::game::types::{PlayerId, SuggestionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionState {
    Open,
    Adopted,
    /// Vote wait ran out without an approval.
    Expired,
    /// Closed by an adoption, a turn advance or the end of the game.
    Retired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: SuggestionId,
    pub word: String,
    pub proposer: PlayerId,
    pub turn: u32,
    pub state: SuggestionState,
    votes: HashMap<PlayerId, bool>,
}

impl Suggestion {
    pub fn approvals(&self) -> usize {
        self.votes.values().filter(|&&v| v).count()
    }

    pub fn rejections(&self) -> usize {
        self.votes.values().filter(|&&v| !v).count()
    }

    pub fn is_open(&self) -> bool {
        self.state == SuggestionState::Open
    }

    /// Display label; the tally tells duplicate words apart.
    pub fn label(&self) -> String {
        format!("{} 👍:{}, 👎:{}", self.word, self.approvals(), self.rejections())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The word now goes through hint intake as if `hinter` typed it.
    Adopted {
        word: String,
        hinter: PlayerId,
        retired: Vec<SuggestionId>,
    },
    Tallied { approvals: usize, rejections: usize },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestionBook {
    next_id: u32,
    suggestions: Vec<Suggestion>,
}

impl SuggestionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn propose(&mut self, proposer: PlayerId, word: &str, turn: u32) -> SuggestionId {
        let id = SuggestionId(self.next_id);
        self.next_id += 1;
        self.suggestions.push(Suggestion {
            id,
            word: word.to_owned(),
            proposer,
            turn,
            state: SuggestionState::Open,
            votes: HashMap::new(),
        });
        id
    }

    pub fn get(&self, id: SuggestionId) -> Option<&Suggestion> {
        self.suggestions.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: SuggestionId) -> Option<&mut Suggestion> {
        self.suggestions.iter_mut().find(|s| s.id == id)
    }

    /// Register a vote. The caller has already checked the voter is an acting hinter.
    pub fn vote(&mut self, id: SuggestionId, voter: PlayerId, approve: bool) -> Result<VoteOutcome, Rejection> {
        let suggestion = self.get_mut(id).ok_or(Rejection::UnknownSuggestion)?;
        if !suggestion.is_open() {
            return Err(Rejection::SuggestionClosed);
        }
        suggestion.votes.insert(voter, approve);
        if !approve {
            return Ok(VoteOutcome::Tallied {
                approvals: suggestion.approvals(),
                rejections: suggestion.rejections(),
            });
        }
        suggestion.state = SuggestionState::Adopted;
        let word = suggestion.word.clone();
        let retired = self.retire_all();
        Ok(VoteOutcome::Adopted {
            word,
            hinter: voter,
            retired,
        })
    }

    /// Mark an undecided suggestion inert. Returns false if it was already closed.
    pub fn expire(&mut self, id: SuggestionId) -> bool {
        match self.get_mut(id) {
            Some(s) if s.is_open() => {
                s.state = SuggestionState::Expired;
                true
            }
            _ => false,
        }
    }

    /// Close every open suggestion; returns the ids that were still open.
    pub fn retire_all(&mut self) -> Vec<SuggestionId> {
        self.suggestions
            .iter_mut()
            .filter(|s| s.is_open())
            .map(|s| {
                s.state = SuggestionState::Retired;
                s.id
            })
            .collect()
    }

    pub fn open(&self) -> impl Iterator<Item = &Suggestion> {
        self.suggestions.iter().filter(|s| s.is_open())
    }

    pub fn by_proposer(&self, proposer: PlayerId) -> impl Iterator<Item = &Suggestion> {
        self.suggestions.iter().filter(move |s| s.proposer == proposer)
    }

    /// Most recent open or expired suggestions of `turn`, at most `cap` of them.
    pub fn visible(&self, turn: u32, cap: usize) -> Vec<&Suggestion> {
        let current: Vec<&Suggestion> = self
            .suggestions
            .iter()
            .filter(|s| s.turn == turn)
            .filter(|s| matches!(s.state, SuggestionState::Open | SuggestionState::Expired))
            .collect();
        let skip = current.len().saturating_sub(cap);
        current.into_iter().skip(skip).collect()
    }
}
