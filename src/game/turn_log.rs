//! Turn logs.
//!
//! Two logs are fed from the same events. The live log is what players see
//! during the match and is capped to the number of options a bounded choice
//! list can hold. The review log keeps every turn for the post-game summary.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::game::types::{GuessOutcome, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintRecord {
    pub turn: u32,
    /// `None` for the bare turn marker opened by a guess that preceded any hint.
    pub hinter: Option<PlayerId>,
    pub text: Option<String>,
    pub count: Option<u32>,
    /// Labels the hinter picked after giving the hint.
    pub intentions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub label: String,
    pub outcome: GuessOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerSummary {
    /// Every guess of the player was a hit: shown as `label × count`.
    AllCorrect { player: PlayerId, count: usize },
    Detailed { player: PlayerId, answers: Vec<AnswerRecord> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerSummary {
    AllPlayersAllCorrect,
    Players(Vec<PlayerSummary>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub hint: Option<HintRecord>,
    pub answers: AnswerSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiveEntry {
    Hint(HintRecord),
    Answer {
        turn: u32,
        player: PlayerId,
        label: String,
        outcome: GuessOutcome,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveLog {
    cap: usize,
    entries: VecDeque<LiveEntry>,
}

impl LiveLog {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            entries: VecDeque::with_capacity(cap),
        }
    }

    fn push(&mut self, entry: LiveEntry) {
        if self.entries.len() == self.cap {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LiveEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewLog {
    turn_count: u32,
    current_hint: Option<HintRecord>,
    current_answers: Vec<(PlayerId, Vec<AnswerRecord>)>,
    history: Vec<TurnRecord>,
}

impl Default for ReviewLog {
    fn default() -> Self {
        Self {
            turn_count: 1,
            current_hint: None,
            current_answers: Vec::new(),
            history: Vec::new(),
        }
    }
}

impl ReviewLog {
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn current_hint(&self) -> Option<&HintRecord> {
        self.current_hint.as_ref()
    }

    fn add_hint(&mut self, hinter: Option<PlayerId>, text: Option<String>, count: Option<u32>) -> HintRecord {
        let record = HintRecord {
            turn: self.turn_count,
            hinter,
            text,
            count,
            intentions: Vec::new(),
        };
        self.current_hint = Some(record.clone());
        record
    }

    /// Returns true when the answer was folded into the hint line as an intention.
    fn add_answer(&mut self, player: PlayerId, label: &str, outcome: GuessOutcome) -> bool {
        let turn = self.turn_count;
        let hint = self.current_hint.get_or_insert_with(|| HintRecord {
            turn,
            hinter: None,
            text: None,
            count: None,
            intentions: Vec::new(),
        });
        if hint.hinter == Some(player) {
            hint.intentions.push(label.to_owned());
            return true;
        }
        let record = AnswerRecord {
            label: label.to_owned(),
            outcome,
        };
        match self.current_answers.iter_mut().find(|(p, _)| *p == player) {
            Some((_, answers)) => answers.push(record),
            None => self.current_answers.push((player, vec![record])),
        }
        false
    }

    pub fn summarize_answers(&self) -> AnswerSummary {
        let mut all_players_correct = true;
        let mut players = Vec::with_capacity(self.current_answers.len());
        for (player, answers) in &self.current_answers {
            if answers.iter().all(|a| a.outcome == GuessOutcome::Hit) {
                players.push(PlayerSummary::AllCorrect {
                    player: *player,
                    count: answers.len(),
                });
            } else {
                all_players_correct = false;
                players.push(PlayerSummary::Detailed {
                    player: *player,
                    answers: answers.clone(),
                });
            }
        }
        if all_players_correct && players.len() > 1 {
            AnswerSummary::AllPlayersAllCorrect
        } else {
            AnswerSummary::Players(players)
        }
    }

    fn on_advance_turn(&mut self) {
        let answers = self.summarize_answers();
        self.history.push(TurnRecord {
            turn: self.turn_count,
            hint: self.current_hint.take(),
            answers,
        });
        self.current_answers.clear();
        self.turn_count += 1;
    }
}

/// Live and review logs written together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnLog {
    live: LiveLog,
    review: ReviewLog,
}

impl TurnLog {
    pub fn new(live_cap: usize) -> Self {
        Self {
            live: LiveLog::new(live_cap),
            review: ReviewLog::default(),
        }
    }

    pub fn live(&self) -> &LiveLog {
        &self.live
    }

    pub fn review(&self) -> &ReviewLog {
        &self.review
    }

    pub fn turn_count(&self) -> u32 {
        self.review.turn_count
    }

    pub fn add_hint(&mut self, hinter: PlayerId, text: &str, count: Option<u32>) {
        let record = self.review.add_hint(Some(hinter), Some(text.to_owned()), count);
        self.live.push(LiveEntry::Hint(record));
    }

    /// Record a pick. Only picks that took effect on the board (`entitled`)
    /// reach the live log; intentions of the acting hinter stay in review.
    pub fn add_answer(&mut self, player: PlayerId, label: &str, outcome: GuessOutcome, entitled: bool) {
        let folded = self.review.add_answer(player, label, outcome);
        if entitled && !folded {
            self.live.push(LiveEntry::Answer {
                turn: self.review.turn_count,
                player,
                label: label.to_owned(),
                outcome,
            });
        }
    }

    pub fn on_advance_turn(&mut self) {
        self.review.on_advance_turn();
    }

    /// Close the running turn so the review covers the final turn too.
    pub fn close(&mut self) {
        if self.review.current_hint.is_some() || !self.review.current_answers.is_empty() {
            self.review.on_advance_turn();
        }
    }
}
