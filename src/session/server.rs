use std::collections::HashMap;
use std::sync::Arc;

use actix::prelude::*;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::config::game::{APPROVE, REJECT};
use crate::config::settings::GameSettings;
use crate::error::GameError;
use crate::game::state::{Audience, Effect, Game, Outcome};
use crate::game::team::Team;
use crate::game::types::{Coord, GameMode, GameResult, Phase, PlayerId, SuggestionId, TeamId};
use crate::game::view::PlayerView;
use crate::session::messages::{
    EndGame, EndTurn, GetResult, GetView, HintText, PlayerText, Spectate, StartGame, Suggest, TileSelected,
    ToggleSuggestMode, Vote,
};
use crate::session::notifier::{Notifier, Question};
use crate::session::wait::{PendingWait, RetryPolicy};
use crate::timer::actor::{Arm, CountdownActor, CountdownExpired, CountdownTick, Disarm, Shutdown};
use crate::timer::clock::{Clock, SystemClock};

/// Outstanding approval questions for one suggestion.
struct VoteWait {
    asks: Vec<SpawnHandle>,
    expiry: PendingWait,
}

/// Runs one match: feeds player input to the [`Game`] and carries out the
/// effects it returns (clocks, waits, questions and deliveries).
pub struct GameSession {
    pub game_id: Uuid,
    game: Game,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    clocks: Vec<Addr<CountdownActor>>,
    clock_runs: Vec<u64>,
    hint_wait: PendingWait,
    amount_ask: Option<SpawnHandle>,
    votes: HashMap<SuggestionId, VoteWait>,
    intervals: Vec<SpawnHandle>,
}

impl GameSession {
    pub fn new(game_id: Uuid, game: Game, notifier: Arc<dyn Notifier>) -> Self {
        let hint_wait = PendingWait::new("hint input", game.settings().input_wait(), RetryPolicy::forever());
        Self {
            game_id,
            game,
            notifier,
            clock: Arc::new(SystemClock),
            clocks: Vec::new(),
            clock_runs: Vec::new(),
            hint_wait,
            amount_ask: None,
            votes: HashMap::new(),
            intervals: Vec::new(),
        }
    }

    /// Drive the team clocks from `clock` instead of the system clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    fn handle_outcome(&mut self, action: &str, outcome: Outcome, ctx: &mut Context<Self>) {
        match outcome {
            Ok(effects) => self.apply(effects, ctx),
            Err(rejection) => debug!("[GameSession] {} ignored: {}", action, rejection),
        }
    }

    fn apply(&mut self, effects: Vec<Effect>, ctx: &mut Context<Self>) {
        for effect in effects {
            match effect {
                Effect::StartClock(team) => self.arm_clock(team),
                Effect::StopClock(team) => self.disarm_clock(team),
                Effect::AwaitHint(team) => {
                    debug!("[GameSession] Waiting for a hint from {}", team);
                    self.hint_wait.arm(ctx, |act, ctx| act.hint_wait_elapsed(ctx));
                }
                Effect::AskAmount { hinter, text, epoch } => self.ask_amount(hinter, text, epoch, ctx),
                Effect::OpenSuggestion { id, word, hinters, .. } => {
                    debug!("[GameSession] Opening vote on '{}'", word);
                    self.open_vote(id, hinters, ctx);
                }
                Effect::CloseSuggestions(ids) => {
                    for id in ids {
                        self.close_vote(id, ctx);
                    }
                }
                Effect::Notify(audience, notice) => {
                    for player in self.audience(audience) {
                        self.notifier.send(player, &notice);
                    }
                }
                Effect::Refresh(audience) => self.refresh(audience),
                Effect::GameOver(result) => self.wind_down(result, ctx),
            }
        }
    }

    fn audience(&self, audience: Audience) -> Vec<PlayerId> {
        match audience {
            Audience::Player(player) => vec![player],
            Audience::Team(team) => self
                .game
                .team(team)
                .map(|t| t.player_ids().collect())
                .unwrap_or_default(),
            Audience::Everyone => self.game.participants(),
        }
    }

    fn refresh(&self, audience: Audience) {
        for player in self.audience(audience) {
            if let Some(view) = self.game.view_for(player) {
                self.notifier.refresh(player, &view);
            }
        }
    }

    fn arm_clock(&mut self, team: TeamId) {
        let (Some(run), Some(clock)) = (self.clock_runs.get_mut(team.0), self.clocks.get(team.0)) else {
            warn!("[GameSession] No clock for {}", team);
            return;
        };
        *run += 1;
        clock.do_send(Arm { run: *run });
    }

    fn disarm_clock(&mut self, team: TeamId) {
        if let (Some(run), Some(clock)) = (self.clock_runs.get_mut(team.0), self.clocks.get(team.0)) {
            *run += 1;
            clock.do_send(Disarm);
        }
    }

    fn hint_wait_elapsed(&mut self, ctx: &mut Context<Self>) {
        self.hint_wait.fired();
        if self.game.is_over() {
            return;
        }
        if !matches!(self.game.phase(), Phase::AwaitingHint | Phase::AwaitingAmount { .. }) {
            return;
        }
        let team = self.game.current_team();
        debug!("[GameSession] Still no hint from {}", team);
        if self.hint_wait.reschedule(ctx, |act, ctx| act.hint_wait_elapsed(ctx)) {
            self.refresh(Audience::Team(team));
        }
    }

    fn ask_amount(&mut self, hinter: PlayerId, text: String, epoch: u32, ctx: &mut Context<Self>) {
        let question = Question::hint_amount(text);
        let timeout = self.game.settings().ask_amount_timeout();
        let answer = self.notifier.ask(hinter, question.clone(), timeout);
        let fut = async move { tokio::time::timeout(timeout, answer).await.ok().flatten() }
            .into_actor(self)
            .map(move |answer, act, ctx| {
                act.amount_ask = None;
                let answer = answer.filter(|a| question.accepts(a));
                if answer.is_none() {
                    debug!("[GameSession] No amount from {}, hint stays open", hinter);
                }
                let outcome = act.game.resolve_amount(hinter, epoch, answer.as_deref());
                act.handle_outcome("amount answer", outcome, ctx);
            });
        if let Some(previous) = self.amount_ask.replace(ctx.spawn(fut)) {
            ctx.cancel_future(previous);
        }
    }

    fn open_vote(&mut self, id: SuggestionId, hinters: Vec<PlayerId>, ctx: &mut Context<Self>) {
        let label = self
            .game
            .suggestions()
            .get(id)
            .map(|s| s.label())
            .unwrap_or_default();
        let timeout = self.game.settings().suggestion_timeout();
        let mut asks = Vec::with_capacity(hinters.len());
        for hinter in hinters {
            let answer = self
                .notifier
                .ask(hinter, Question::adopt_suggestion(id, label.clone()), timeout);
            let fut = async move { tokio::time::timeout(timeout, answer).await.ok().flatten() }
                .into_actor(self)
                .map(move |answer, act, ctx| {
                    let approve = match answer.as_deref() {
                        Some(APPROVE) => true,
                        Some(REJECT) => false,
                        _ => {
                            debug!("[GameSession] {} left suggestion {:?} unanswered", hinter, id);
                            return;
                        }
                    };
                    let outcome = act.game.vote(id, hinter, approve);
                    act.handle_outcome("vote", outcome, ctx);
                });
            asks.push(ctx.spawn(fut));
        }
        let mut expiry = PendingWait::new("suggestion vote", timeout, RetryPolicy::never());
        expiry.arm(ctx, move |act, ctx| act.vote_wait_elapsed(id, ctx));
        if let Some(old) = self.votes.insert(id, VoteWait { asks, expiry }) {
            Self::cancel_vote(old, ctx);
        }
    }

    fn vote_wait_elapsed(&mut self, id: SuggestionId, ctx: &mut Context<Self>) {
        if let Some(mut wait) = self.votes.remove(&id) {
            wait.expiry.fired();
            Self::cancel_vote(wait, ctx);
        }
        if self.game.is_over() {
            return;
        }
        let outcome = self.game.expire_suggestion(id);
        self.handle_outcome("suggestion expiry", outcome, ctx);
    }

    fn close_vote(&mut self, id: SuggestionId, ctx: &mut Context<Self>) {
        if let Some(wait) = self.votes.remove(&id) {
            Self::cancel_vote(wait, ctx);
        }
    }

    fn cancel_vote(mut wait: VoteWait, ctx: &mut Context<Self>) {
        wait.expiry.cancel(ctx);
        for handle in wait.asks {
            ctx.cancel_future(handle);
        }
    }

    fn wind_down(&mut self, result: GameResult, ctx: &mut Context<Self>) {
        self.hint_wait.cancel(ctx);
        if let Some(handle) = self.amount_ask.take() {
            ctx.cancel_future(handle);
        }
        for (_, wait) in self.votes.drain() {
            Self::cancel_vote(wait, ctx);
        }
        for clock in &self.clocks {
            clock.do_send(Shutdown);
        }
        for handle in self.intervals.drain(..) {
            ctx.cancel_future(handle);
        }
        info!(
            "[GameSession] Game {} over: winner={:?} loser={:?} ({:?})",
            self.game_id, result.winner, result.loser, result.reason
        );
    }
}

impl Actor for GameSession {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let settings = self.game.settings().clone();
        let team_ids: Vec<TeamId> = self.game.teams().iter().map(|t| t.id).collect();
        for team in team_ids {
            let clock = CountdownActor::new(
                team,
                settings.time_limit_secs,
                settings.countdown_tick(),
                self.clock.clone(),
                ctx.address().recipient(),
                ctx.address().recipient(),
            )
            .start();
            self.clocks.push(clock);
            self.clock_runs.push(0);
        }

        let refresh = ctx.run_interval(settings.refresh_interval(), |act, _| {
            if act.game.is_started() && !act.game.is_over() {
                act.refresh(Audience::Team(act.game.current_team()));
            }
        });
        let resend = ctx.run_interval(settings.resend_interval(), |act, _| {
            if act.game.is_started() {
                act.refresh(Audience::Everyone);
            }
        });
        self.intervals = vec![refresh, resend];
        info!(
            "[GameSession] Session {} ready with {} team clock(s)",
            self.game_id,
            self.clocks.len()
        );
    }

    fn stopped(&mut self, _: &mut Self::Context) {
        for clock in &self.clocks {
            clock.do_send(Shutdown);
        }
        debug!("[GameSession] Session {} stopped", self.game_id);
    }
}

impl Handler<StartGame> for GameSession {
    type Result = ();

    fn handle(&mut self, _: StartGame, ctx: &mut Context<Self>) -> Self::Result {
        let outcome = self.game.start();
        self.handle_outcome("start", outcome, ctx);
    }
}

impl Handler<EndGame> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: EndGame, ctx: &mut Context<Self>) -> Self::Result {
        let effects = self.game.end(msg.winner, msg.loser);
        self.apply(effects, ctx);
    }
}

impl Handler<HintText> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: HintText, ctx: &mut Context<Self>) -> Self::Result {
        let outcome = self.game.submit_hint(msg.player, &msg.text);
        self.handle_outcome("hint", outcome, ctx);
    }
}

impl Handler<PlayerText> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: PlayerText, ctx: &mut Context<Self>) -> Self::Result {
        let outcome = self.game.route_text(msg.player, &msg.text);
        self.handle_outcome("text", outcome, ctx);
    }
}

impl Handler<TileSelected> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: TileSelected, ctx: &mut Context<Self>) -> Self::Result {
        let outcome = self.game.select_tile(msg.player, Coord::new(msg.row, msg.col));
        self.handle_outcome("tile selection", outcome, ctx);
    }
}

impl Handler<EndTurn> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: EndTurn, ctx: &mut Context<Self>) -> Self::Result {
        let outcome = self.game.end_turn(msg.player);
        self.handle_outcome("end turn", outcome, ctx);
    }
}

impl Handler<Suggest> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: Suggest, ctx: &mut Context<Self>) -> Self::Result {
        let outcome = self.game.suggest(msg.player, &msg.word);
        self.handle_outcome("suggestion", outcome, ctx);
    }
}

impl Handler<Vote> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: Vote, ctx: &mut Context<Self>) -> Self::Result {
        let outcome = self.game.vote(msg.suggestion, msg.player, msg.approve);
        self.handle_outcome("vote", outcome, ctx);
    }
}

impl Handler<ToggleSuggestMode> for GameSession {
    type Result = Option<bool>;

    fn handle(&mut self, msg: ToggleSuggestMode, _: &mut Context<Self>) -> Self::Result {
        match self.game.toggle_suggest_mode(msg.player) {
            Ok(mode) => {
                self.refresh(Audience::Player(msg.player));
                Some(mode)
            }
            Err(rejection) => {
                debug!("[GameSession] suggest mode toggle ignored: {}", rejection);
                None
            }
        }
    }
}

impl Handler<Spectate> for GameSession {
    type Result = bool;

    fn handle(&mut self, msg: Spectate, _: &mut Context<Self>) -> Self::Result {
        let player = msg.info.id;
        let added = self.game.add_spectator(msg.info);
        if added {
            self.refresh(Audience::Player(player));
        }
        added
    }
}

impl Handler<GetView> for GameSession {
    type Result = Option<PlayerView>;

    fn handle(&mut self, msg: GetView, _: &mut Context<Self>) -> Self::Result {
        self.game.view_for(msg.player)
    }
}

impl Handler<GetResult> for GameSession {
    type Result = Option<GameResult>;

    fn handle(&mut self, _: GetResult, _: &mut Context<Self>) -> Self::Result {
        self.game.result()
    }
}

impl Handler<CountdownTick> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: CountdownTick, _: &mut Context<Self>) -> Self::Result {
        if self.clock_runs.get(msg.team.0) == Some(&msg.run) {
            self.game.record_clock(msg.team, msg.remaining_secs);
        }
    }
}

impl Handler<CountdownExpired> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: CountdownExpired, ctx: &mut Context<Self>) -> Self::Result {
        if self.game.is_over() {
            return;
        }
        if self.clock_runs.get(msg.team.0) != Some(&msg.run) {
            debug!("[GameSession] Stale expiry for {} (run {}) dropped", msg.team, msg.run);
            return;
        }
        let outcome = self.game.expire_clock(msg.team);
        self.handle_outcome("clock expiry", outcome, ctx);
    }
}

/// Registry of running sessions.
#[derive(Default)]
pub struct GameSessionManager {
    sessions: HashMap<Uuid, Addr<GameSession>>,
    clock: Option<Arc<dyn Clock>>,
}

impl GameSessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions created from now on use `clock` for their team clocks.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: HashMap::new(),
            clock: Some(clock),
        }
    }

    pub fn create_game(
        &mut self,
        mode: GameMode,
        teams: Vec<Team>,
        words: Option<Vec<String>>,
        settings: GameSettings,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Uuid, GameError> {
        let game = Game::with_settings(mode, teams, words, settings, &mut rand::rng())?;
        let game_id = Uuid::new_v4();
        let mut session = GameSession::new(game_id, game, notifier);
        if let Some(clock) = &self.clock {
            session = session.with_clock(clock.clone());
        }
        self.sessions.insert(game_id, session.start());
        info!("[GameSessionManager] Created game {}", game_id);
        Ok(game_id)
    }
}

impl Actor for GameSessionManager {
    type Context = Context<Self>;
}

#[derive(Message)]
#[rtype(result = "Result<Uuid, GameError>")]
pub struct CreateGame {
    pub mode: GameMode,
    pub teams: Vec<Team>,
    pub words: Option<Vec<String>>,
    pub settings: GameSettings,
    pub notifier: Arc<dyn Notifier>,
}

impl Handler<CreateGame> for GameSessionManager {
    type Result = Result<Uuid, GameError>;

    fn handle(&mut self, msg: CreateGame, _: &mut Context<Self>) -> Self::Result {
        self.create_game(msg.mode, msg.teams, msg.words, msg.settings, msg.notifier)
    }
}

#[derive(Message)]
#[rtype(result = "Result<Addr<GameSession>, GameError>")]
pub struct GetGameSession {
    pub game_id: Uuid,
}

impl Handler<GetGameSession> for GameSessionManager {
    type Result = Result<Addr<GameSession>, GameError>;

    fn handle(&mut self, msg: GetGameSession, _: &mut Context<Self>) -> Self::Result {
        self.sessions
            .get(&msg.game_id)
            .cloned()
            .ok_or(GameError::GameNotFound(msg.game_id))
    }
}

/// Forget a session. Returns false for unknown ids.
#[derive(Message)]
#[rtype(result = "bool")]
pub struct RemoveGame {
    pub game_id: Uuid,
}

impl Handler<RemoveGame> for GameSessionManager {
    type Result = bool;

    fn handle(&mut self, msg: RemoveGame, _: &mut Context<Self>) -> Self::Result {
        let removed = self.sessions.remove(&msg.game_id).is_some();
        if removed {
            info!("[GameSessionManager] Removed game {}", msg.game_id);
        }
        removed
    }
}
