#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use codeword::config::GameSettings;
use codeword::game::team::Team;
use codeword::game::types::{Category, Coord, GameMode, PlayerId, PlayerInfo, TeamId};
use codeword::game::{Game, Notice, PlayerView};
use codeword::session::{Answer, Notifier, Question};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Records everything the session delivers and answers questions from a script.
/// An exhausted script leaves questions unanswered.
#[derive(Default)]
pub struct RecordingNotifier {
    pub refreshes: Mutex<Vec<PlayerId>>,
    pub notices: Mutex<Vec<(PlayerId, Notice)>>,
    pub questions: Mutex<Vec<(PlayerId, Question)>>,
    script: Mutex<VecDeque<String>>,
}

impl RecordingNotifier {
    pub fn scripted(answers: &[&str]) -> Self {
        Self {
            script: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn notices_for(&self, player: PlayerId) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| *p == player)
            .map(|(_, n)| n.clone())
            .collect()
    }

    pub fn question_count(&self) -> usize {
        self.questions.lock().unwrap().len()
    }
}

impl Notifier for RecordingNotifier {
    fn refresh(&self, player: PlayerId, _view: &PlayerView) {
        self.refreshes.lock().unwrap().push(player);
    }

    fn send(&self, player: PlayerId, notice: &Notice) {
        self.notices.lock().unwrap().push((player, notice.clone()));
    }

    fn ask(&self, player: PlayerId, question: Question, _timeout: Duration) -> Answer {
        self.questions.lock().unwrap().push((player, question));
        match self.script.lock().unwrap().pop_front() {
            Some(answer) => Box::pin(async move { Some(answer) }) as Answer,
            None => Box::pin(std::future::pending::<Option<String>>()),
        }
    }
}

pub fn team(id: usize, names: &[&str]) -> Team {
    Team::with_players(TeamId(id), names.iter().map(|n| PlayerInfo::new(*n)))
}

pub fn versus(settings: GameSettings, seed: u64) -> Game {
    let mut rng = StdRng::seed_from_u64(seed);
    Game::with_settings(
        GameMode::Versus,
        vec![team(0, &["a", "b"]), team(1, &["c", "d"])],
        None,
        settings,
        &mut rng,
    )
    .unwrap()
}

pub fn hinter(game: &Game, team: TeamId) -> PlayerId {
    game.teams()[team.0].hinters[0]
}

pub fn guesser(game: &Game, team: TeamId) -> PlayerId {
    game.teams()[team.0].guessers[0]
}

/// First tile of `category` on the board `player` picks from.
pub fn first_tile(game: &Game, player: PlayerId, category: Category) -> Coord {
    let team = game.team_of(player).unwrap();
    let side = game.teams()[team.0].side_of(player).unwrap();
    let board = game.boards().board(game.boards().board_id(team.0, side));
    let index = board.tiles().iter().position(|t| t.category == category).unwrap();
    board.coord_of(index)
}

pub async fn settle() {
    actix::clock::sleep(Duration::from_millis(50)).await;
}
