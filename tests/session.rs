mod common;

use std::sync::Arc;
use std::time::Duration;

use actix::prelude::*;
use uuid::Uuid;

use codeword::config::GameSettings;
use codeword::error::GameError;
use codeword::game::Notice;
use codeword::game::types::{Category, EndReason, GameMode, Phase, PlayerInfo, TeamId};
use codeword::session::messages::{
    EndGame, EndTurn, GetResult, GetView, HintText, Spectate, StartGame, Suggest, TileSelected, ToggleSuggestMode,
};
use codeword::session::{CreateGame, GameSession, GameSessionManager, GetGameSession, Notifier, RemoveGame};
use codeword::timer::{Clock, ManualClock};

use common::*;

fn start_session(notifier: &Arc<RecordingNotifier>, settings: GameSettings, seed: u64) -> (Addr<GameSession>, codeword::Game) {
    let game = versus(settings, seed);
    let snapshot = game.clone();
    let notifier: Arc<dyn Notifier> = notifier.clone();
    (GameSession::new(Uuid::new_v4(), game, notifier).start(), snapshot)
}

#[actix::test]
async fn bust_pick_ends_the_match_for_the_picking_team() {
    init_logger();
    let notifier = Arc::new(RecordingNotifier::default());
    let (session, game) = start_session(&notifier, GameSettings::default(), 1);
    let (h, g) = (hinter(&game, TeamId(0)), guesser(&game, TeamId(0)));
    let bust = first_tile(&game, g, Category::Bust);

    session.send(StartGame).await.unwrap();
    session.send(HintText { player: h, text: "ねこ2".into() }).await.unwrap();
    session
        .send(TileSelected { player: g, row: bust.row, col: bust.col })
        .await
        .unwrap();

    let result = session.send(GetResult).await.unwrap().unwrap();
    assert_eq!(result.loser, Some(TeamId(0)));
    assert_eq!(result.reason, EndReason::BustRevealed);
    for player in game.participants() {
        assert!(notifier.notices_for(player).contains(&Notice::GameOver(result)));
    }
}

#[actix::test]
async fn out_of_turn_input_is_dropped() {
    init_logger();
    let notifier = Arc::new(RecordingNotifier::default());
    let (session, game) = start_session(&notifier, GameSettings::default(), 2);
    let rival_hinter = hinter(&game, TeamId(1));

    session.send(StartGame).await.unwrap();
    session
        .send(HintText { player: rival_hinter, text: "いぬ1".into() })
        .await
        .unwrap();

    let view = session.send(GetView { player: rival_hinter }).await.unwrap().unwrap();
    assert_eq!(view.phase, Phase::AwaitingHint);
    assert!(view.hint.is_none());
    assert!(session.send(GetResult).await.unwrap().is_none());
}

#[actix::test]
async fn hint_without_a_numeral_asks_the_hinter_for_the_amount() {
    init_logger();
    let notifier = Arc::new(RecordingNotifier::scripted(&["3"]));
    let (session, game) = start_session(&notifier, GameSettings::default(), 3);
    let (h, g) = (hinter(&game, TeamId(0)), guesser(&game, TeamId(0)));

    session.send(StartGame).await.unwrap();
    session.send(HintText { player: h, text: "ねこ".into() }).await.unwrap();
    settle().await;

    let view = session.send(GetView { player: g }).await.unwrap().unwrap();
    let hint = view.hint.unwrap();
    assert_eq!((hint.text.as_str(), hint.count), ("ねこ", Some(3)));
    assert_eq!(view.phase, Phase::AwaitingGuess);
    assert_eq!(notifier.question_count(), 1);
}

#[actix::test]
async fn unanswered_amount_question_leaves_the_count_open() {
    init_logger();
    let notifier = Arc::new(RecordingNotifier::default());
    let settings = GameSettings {
        ask_amount_timeout_secs: 1,
        ..GameSettings::default()
    };
    let (session, game) = start_session(&notifier, settings, 4);
    let h = hinter(&game, TeamId(0));

    session.send(StartGame).await.unwrap();
    session.send(HintText { player: h, text: "ねこ".into() }).await.unwrap();
    let view = session.send(GetView { player: h }).await.unwrap().unwrap();
    assert!(matches!(view.phase, Phase::AwaitingAmount { .. }));

    actix::clock::sleep(Duration::from_millis(1300)).await;
    let view = session.send(GetView { player: h }).await.unwrap().unwrap();
    assert_eq!(view.phase, Phase::AwaitingGuess);
    assert_eq!(view.hint.unwrap().count, None);
}

#[actix::test]
async fn approved_suggestion_becomes_the_hint() {
    init_logger();
    let notifier = Arc::new(RecordingNotifier::scripted(&["approve", "2"]));
    let (session, game) = start_session(&notifier, GameSettings::default(), 5);
    let (h, g) = (hinter(&game, TeamId(0)), guesser(&game, TeamId(0)));

    session.send(StartGame).await.unwrap();
    session.send(Suggest { player: g, word: "ねこ".into() }).await.unwrap();
    settle().await;

    let view = session.send(GetView { player: g }).await.unwrap().unwrap();
    let hint = view.hint.unwrap();
    assert_eq!(hint.hinter, h);
    assert_eq!((hint.text.as_str(), hint.count), ("ねこ", Some(2)));
    assert!(view.suggestions.is_empty());

    let questions = notifier.questions.lock().unwrap();
    assert_eq!(questions.len(), 2);
    assert!(questions.iter().all(|(asked, _)| *asked == h));
}

#[actix::test]
async fn team_clocks_run_only_while_on_turn() {
    init_logger();
    let clock = Arc::new(ManualClock::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let settings = GameSettings {
        time_limit_secs: 5,
        countdown_tick_millis: 10,
        ..GameSettings::default()
    };
    let game = versus(settings, 6);
    let (h, g) = (hinter(&game, TeamId(0)), guesser(&game, TeamId(0)));
    let shared: Arc<dyn Clock> = clock.clone();
    let session = GameSession::new(Uuid::new_v4(), game, notifier.clone())
        .with_clock(shared)
        .start();

    session.send(StartGame).await.unwrap();
    settle().await;
    clock.advance(Duration::from_secs(3));
    settle().await;
    session.send(HintText { player: h, text: "ねこ1".into() }).await.unwrap();
    session.send(EndTurn { player: g }).await.unwrap();
    settle().await;

    clock.advance(Duration::from_secs(3));
    settle().await;
    assert!(session.send(GetResult).await.unwrap().is_none());
    let view = session.send(GetView { player: h }).await.unwrap().unwrap();
    assert_eq!(view.clock_remaining_secs, 2);

    clock.advance(Duration::from_secs(3));
    settle().await;
    let result = session.send(GetResult).await.unwrap().unwrap();
    assert_eq!((result.loser, result.reason), (Some(TeamId(1)), EndReason::ClockExpired));
}

#[actix::test]
async fn ending_twice_keeps_the_first_result() {
    init_logger();
    let notifier = Arc::new(RecordingNotifier::default());
    let (session, _) = start_session(&notifier, GameSettings::default(), 7);

    session.send(StartGame).await.unwrap();
    session
        .send(EndGame { winner: Some(TeamId(1)), loser: None })
        .await
        .unwrap();
    session
        .send(EndGame { winner: None, loser: Some(TeamId(1)) })
        .await
        .unwrap();

    let result = session.send(GetResult).await.unwrap().unwrap();
    assert_eq!((result.winner, result.reason), (Some(TeamId(1)), EndReason::Aborted));
}

#[actix::test]
async fn spectators_get_a_view_once() {
    init_logger();
    let notifier = Arc::new(RecordingNotifier::default());
    let (session, game) = start_session(&notifier, GameSettings::default(), 8);
    let watcher = PlayerInfo::new("watcher");
    let id = watcher.id;

    assert!(session.send(Spectate { info: watcher.clone() }).await.unwrap());
    assert!(!session.send(Spectate { info: watcher }).await.unwrap());
    let view = session.send(GetView { player: id }).await.unwrap().unwrap();
    assert_eq!(view.team, None);
    assert!(view.tiles.iter().all(|t| t.category.is_none()));

    assert_eq!(session.send(ToggleSuggestMode { player: id }).await.unwrap(), None);
    let g = guesser(&game, TeamId(0));
    assert_eq!(session.send(ToggleSuggestMode { player: g }).await.unwrap(), Some(true));
}

#[actix::test]
async fn manager_creates_finds_and_removes_sessions() {
    init_logger();
    let manager = GameSessionManager::new().start();
    let notifier: Arc<dyn Notifier> = Arc::new(RecordingNotifier::default());

    let game_id = manager
        .send(CreateGame {
            mode: GameMode::Versus,
            teams: vec![team(0, &["a", "b"]), team(1, &["c", "d"])],
            words: None,
            settings: GameSettings::default(),
            notifier: notifier.clone(),
        })
        .await
        .unwrap()
        .unwrap();
    let session = manager.send(GetGameSession { game_id }).await.unwrap().unwrap();
    session.send(StartGame).await.unwrap();

    assert!(manager.send(RemoveGame { game_id }).await.unwrap());
    assert!(!manager.send(RemoveGame { game_id }).await.unwrap());
    assert!(matches!(
        manager.send(GetGameSession { game_id }).await.unwrap(),
        Err(GameError::GameNotFound(id)) if id == game_id
    ));

    let mismatch = manager
        .send(CreateGame {
            mode: GameMode::Cooperative,
            teams: vec![team(0, &["a", "b"]), team(1, &["c", "d"])],
            words: None,
            settings: GameSettings::default(),
            notifier,
        })
        .await
        .unwrap();
    assert!(matches!(mismatch, Err(GameError::TeamCountMismatch { .. })));
}
