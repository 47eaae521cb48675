//! Presentation-layer seam.
//!
//! The session never renders or delivers anything itself. It hands structured
//! views and notices to a `Notifier`, and asks bounded-choice questions
//! through it.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::game::{AMOUNT_OPTIONS, APPROVE, REJECT};
use crate::game::types::{PlayerId, SuggestionId};
use crate::game::view::{Notice, PlayerView};

/// A question with a fixed set of accepted answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Question {
    /// How many keywords the hint covers.
    HintAmount { text: String, options: Vec<String> },
    /// Whether to adopt a proposed hint word.
    AdoptSuggestion {
        id: SuggestionId,
        label: String,
        options: Vec<String>,
    },
}

impl Question {
    pub fn hint_amount(text: impl Into<String>) -> Self {
        Question::HintAmount {
            text: text.into(),
            options: AMOUNT_OPTIONS.map(|n| n.to_string()).collect(),
        }
    }

    pub fn adopt_suggestion(id: SuggestionId, label: impl Into<String>) -> Self {
        Question::AdoptSuggestion {
            id,
            label: label.into(),
            options: vec![APPROVE.to_owned(), REJECT.to_owned()],
        }
    }

    pub fn options(&self) -> &[String] {
        match self {
            Question::HintAmount { options, .. } | Question::AdoptSuggestion { options, .. } => options,
        }
    }

    /// True when `answer` is one of the offered options.
    pub fn accepts(&self, answer: &str) -> bool {
        self.options().iter().any(|o| o == answer)
    }
}

/// Answer to a question; `None` when the player did not pick an option.
pub type Answer = Pin<Box<dyn Future<Output = Option<String>>>>;

pub trait Notifier: Send + Sync {
    /// Re-render the player's board and actions from `view`.
    fn refresh(&self, player: PlayerId, view: &PlayerView);

    fn send(&self, player: PlayerId, notice: &Notice);

    /// Ask `player` to choose one of the question's options within `timeout`.
    fn ask(&self, player: PlayerId, question: Question, timeout: Duration) -> Answer;
}
