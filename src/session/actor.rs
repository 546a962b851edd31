//! The per-session actor.
//!
//! Each session runs as one tokio task that owns its `GameState` and
//! drains a command mailbox, so requests against one session are applied
//! strictly one at a time while separate sessions run in parallel.
//!
//! ## Bot turns
//!
//! When the turn lands on a bot the actor does not block. It spawns a
//! timer task that sleeps for the bot's thinking pause and posts a
//! `BotRoll` back into the mailbox; a successful roll schedules a
//! `BotMove` the same way. Each scheduled step carries a generation
//! number and is dropped if anything else was scheduled since, or if the
//! turn no longer belongs to a bot. Together the two steps are
//! `Bot::decide` split across the mailbox.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::bot::{Bot, BotProfile};
use crate::core::{GameRng, GameState, Player, PlayerId, Seat, SeatMap, TokenId};
use crate::error::GameError;
use crate::rating::{RatingChange, RatingService};
use crate::rules::{parse_token, LudoRules, MoveOutcome, RollOutcome};
use crate::storage::{MatchHistoryEntry, MatchResult, UserStore};

use super::events::{EndReason, SeatSummary, SessionEvent, SessionSummary};
use super::registry::SessionRegistry;
use super::SessionId;

type Reply<T> = oneshot::Sender<Result<T, GameError>>;

/// Messages accepted by a session actor.
#[derive(Debug)]
pub(crate) enum Command {
    Roll { player: PlayerId, reply: Reply<RollOutcome> },
    Move { player: PlayerId, token: u8, reply: Reply<MoveOutcome> },
    Disconnect { player: PlayerId, reply: Reply<()> },
    Reconnect { player: PlayerId, reply: Reply<GameState> },
    Snapshot { reply: oneshot::Sender<GameState> },
    BotRoll { generation: u64 },
    BotMove { generation: u64 },
}

#[derive(Clone, Copy, Debug)]
enum BotStep {
    Roll,
    Move,
}

/// Everything an actor needs at start.
pub(crate) struct ActorSetup {
    pub id: SessionId,
    pub roster: Vec<Player>,
    pub ranked: bool,
    pub rng: GameRng,
    pub bot_think_scale: f64,
    pub inbox: mpsc::Receiver<Command>,
    pub mailbox: mpsc::WeakSender<Command>,
    pub events: broadcast::Sender<SessionEvent>,
    pub registry: Arc<SessionRegistry>,
    pub store: Arc<dyn UserStore>,
    pub rating: RatingService,
}

pub(crate) struct SessionActor {
    id: SessionId,
    ranked: bool,
    state: GameState,
    rules: LudoRules,
    dice_rng: GameRng,
    bot_rng: GameRng,
    bots: SeatMap<Option<Bot>>,
    connected: SeatMap<bool>,
    bot_generation: u64,
    inbox: mpsc::Receiver<Command>,
    mailbox: mpsc::WeakSender<Command>,
    events: broadcast::Sender<SessionEvent>,
    registry: Arc<SessionRegistry>,
    store: Arc<dyn UserStore>,
    rating: RatingService,
}

impl SessionActor {
    pub(crate) fn new(setup: ActorSetup) -> Self {
        let state = GameState::new(setup.roster);
        let bots = SeatMap::new(state.player_count(), |seat| {
            state.player(seat).difficulty().map(|difficulty| {
                Bot::from_profile(
                    BotProfile::for_difficulty(difficulty).with_think_scale(setup.bot_think_scale),
                )
            })
        });
        let connected = SeatMap::with_value(state.player_count(), true);

        Self {
            id: setup.id,
            ranked: setup.ranked,
            dice_rng: setup.rng.for_context("dice"),
            bot_rng: setup.rng.for_context("bot"),
            state,
            rules: LudoRules::new(),
            bots,
            connected,
            bot_generation: 0,
            inbox: setup.inbox,
            mailbox: setup.mailbox,
            events: setup.events,
            registry: setup.registry,
            store: setup.store,
            rating: setup.rating,
        }
    }

    /// Process commands until the game ends.
    pub(crate) async fn run(mut self) {
        info!(
            session_id = %self.id,
            players = self.state.player_count(),
            ranked = self.ranked,
            bots = self.state.has_bots(),
            "session started"
        );
        self.emit_snapshot();
        self.schedule_bot(BotStep::Roll);

        while let Some(command) = self.inbox.recv().await {
            self.handle(command).await;
            if self.state.is_finished() {
                break;
            }
        }

        debug!(session_id = %self.id, "session actor stopped");
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Roll { player, reply } => {
                let result = self.roll(&player);
                let passed = matches!(&result, Ok(outcome) if outcome.is_pass());
                let _ = reply.send(result);
                if passed {
                    self.hand_over().await;
                }
            }
            Command::Move { player, token, reply } => {
                let result = parse_token(token).and_then(|token| self.move_token(&player, token));
                let moved = result.is_ok();
                let _ = reply.send(result);
                if moved {
                    self.hand_over().await;
                }
            }
            Command::Disconnect { player, reply } => {
                let result = self.disconnect(&player).await;
                let _ = reply.send(result);
            }
            Command::Reconnect { player, reply } => {
                let _ = reply.send(self.reconnect(&player));
            }
            Command::Snapshot { reply } => {
                self.emit_snapshot();
                let _ = reply.send(self.state.clone());
            }
            Command::BotRoll { generation } => self.bot_roll(generation).await,
            Command::BotMove { generation } => self.bot_move(generation).await,
        }
    }

    // === Requests ===

    fn roll(&mut self, player: &PlayerId) -> Result<RollOutcome, GameError> {
        let outcome = self
            .rules
            .roll_dice(&mut self.state, player, &mut self.dice_rng)
            .inspect_err(|e| debug!(session_id = %self.id, player = %player, error = %e, "roll rejected"))?;

        debug!(
            session_id = %self.id,
            player = %player,
            value = outcome.value,
            passed = ?outcome.passed,
            "rolled"
        );
        self.emit(SessionEvent::RollOutcome(outcome.clone()));
        Ok(outcome)
    }

    fn move_token(&mut self, player: &PlayerId, token: TokenId) -> Result<MoveOutcome, GameError> {
        let outcome = self
            .rules
            .move_token(&mut self.state, player, token)
            .inspect_err(|e| debug!(session_id = %self.id, player = %player, error = %e, "move rejected"))?;

        debug!(
            session_id = %self.id,
            player = %player,
            token = %token,
            to = ?outcome.to,
            captured = outcome.captured.len(),
            extra_turn = outcome.extra_turn,
            "moved"
        );
        self.emit(SessionEvent::MoveOutcome(outcome.clone()));
        Ok(outcome)
    }

    async fn disconnect(&mut self, player: &PlayerId) -> Result<(), GameError> {
        let seat = self.seat_of(player)?;
        if !self.connected[seat] {
            return Ok(());
        }
        self.connected[seat] = false;
        info!(session_id = %self.id, player = %player, %seat, "player disconnected");
        self.emit(SessionEvent::PlayerDisconnected { player: player.clone() });

        // Bot tables wait for their human to come back.
        if self.state.has_bots() {
            return Ok(());
        }

        let remaining: Vec<Seat> = self.connected_seats().collect();
        if let [last] = remaining[..] {
            self.finalize(last, EndReason::OpponentsLeft).await;
        } else if self.state.current == seat {
            self.skip_disconnected();
        }
        Ok(())
    }

    fn reconnect(&mut self, player: &PlayerId) -> Result<GameState, GameError> {
        let seat = self.seat_of(player)?;
        if !self.connected[seat] {
            self.connected[seat] = true;
            info!(session_id = %self.id, player = %player, %seat, "player reconnected");
            self.emit(SessionEvent::PlayerReconnected { player: player.clone() });
        }
        Ok(self.state.clone())
    }

    // === Turn flow ===

    /// Called after a move or a passing roll.
    async fn hand_over(&mut self) {
        if let Some(winner) = self.state.winner {
            self.finalize(winner, EndReason::Completed).await;
            return;
        }
        self.skip_disconnected();
        self.schedule_bot(BotStep::Roll);
    }

    /// Hand the turn past disconnected players at human-only tables.
    fn skip_disconnected(&mut self) {
        if self.state.has_bots() || !self.state.is_playing() {
            return;
        }
        for _ in 0..self.state.player_count() {
            if self.connected[self.state.current] {
                break;
            }
            let skipped = self.state.current_player().id().clone();
            self.state.advance_turn();
            let next = self.state.current_player().id().clone();
            info!(session_id = %self.id, skipped = %skipped, next = %next, "turn skipped");
            self.emit(SessionEvent::TurnSkipped { player: skipped, next });
        }
    }

    fn schedule_bot(&mut self, step: BotStep) {
        if !self.state.is_playing() {
            return;
        }
        let Some(bot) = self.bots[self.state.current].as_ref() else {
            return;
        };

        self.bot_generation += 1;
        let generation = self.bot_generation;
        let delay = bot.think_time(&mut self.bot_rng);
        let command = match step {
            BotStep::Roll => Command::BotRoll { generation },
            BotStep::Move => Command::BotMove { generation },
        };
        let mailbox = self.mailbox.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = mailbox.upgrade() {
                let _ = tx.send(command).await;
            }
        });
    }

    /// The bot player whose scheduled step is still current.
    fn live_bot_turn(&self, generation: u64) -> Option<PlayerId> {
        let current = self.state.current_player();
        if generation != self.bot_generation || !current.is_bot() || !self.state.is_playing() {
            debug!(session_id = %self.id, generation, "dropping stale bot step");
            return None;
        }
        Some(current.id().clone())
    }

    async fn bot_roll(&mut self, generation: u64) {
        let Some(player) = self.live_bot_turn(generation) else {
            return;
        };
        match self.roll(&player) {
            Ok(outcome) if outcome.is_pass() => self.hand_over().await,
            Ok(_) => self.schedule_bot(BotStep::Move),
            Err(e) => warn!(session_id = %self.id, player = %player, error = %e, "bot roll failed"),
        }
    }

    async fn bot_move(&mut self, generation: u64) {
        let Some(player) = self.live_bot_turn(generation) else {
            return;
        };
        let legal = self.rules.available_moves(&self.state, &player);
        let choice = self.bots[self.state.current]
            .as_ref()
            .and_then(|bot| bot.choose(&self.state, &legal, &mut self.bot_rng));

        let Some(token) = choice else {
            warn!(session_id = %self.id, player = %player, "bot had no move to make");
            return;
        };
        match self.move_token(&player, token) {
            Ok(_) => self.hand_over().await,
            Err(e) => warn!(session_id = %self.id, player = %player, error = %e, "bot move failed"),
        }
    }

    // === Termination ===

    async fn finalize(&mut self, winner: Seat, reason: EndReason) {
        if self.state.winner.is_none() {
            self.state.declare_winner(winner);
        }
        let winner_id = self.state.player(winner).id().clone();
        let vs_bots = self.state.has_bots();

        let rating_changes = if self.ranked && !vs_bots {
            let losers: Vec<PlayerId> = self
                .state
                .seats()
                .filter(|&seat| seat != winner)
                .map(|seat| self.state.player(seat).id().clone())
                .collect();
            match self.rating.settle(self.store.as_ref(), &winner_id, &losers, reason).await {
                Ok(changes) => Some(changes),
                Err(e) => {
                    warn!(session_id = %self.id, error = %e, "rating update failed");
                    None
                }
            }
        } else {
            None
        };

        self.record_history(winner, reason, rating_changes.as_deref()).await;
        self.registry.remove(self.id).await;

        let seats = self
            .state
            .seats()
            .map(|seat| SeatSummary {
                player: self.state.player(seat).id().clone(),
                seat,
                stats: self.state.stats[seat],
            })
            .collect();

        info!(
            session_id = %self.id,
            winner = %winner_id,
            %reason,
            turns = self.state.turn_number,
            rated = rating_changes.is_some(),
            "session ended"
        );
        self.emit(SessionEvent::SessionEnded(SessionSummary {
            session_id: self.id,
            winner: winner_id,
            reason,
            turns: self.state.turn_number,
            seats,
            rating_changes,
        }));
    }

    async fn record_history(&self, winner: Seat, reason: EndReason, changes: Option<&[RatingChange]>) {
        let ended_at = Utc::now();
        let vs_bots = self.state.has_bots();

        for seat in self.state.seats() {
            let player = self.state.player(seat);
            if player.is_bot() {
                continue;
            }
            let entry = MatchHistoryEntry {
                session_id: self.id,
                result: if seat == winner { MatchResult::Won } else { MatchResult::Lost },
                ranked: self.ranked,
                vs_bots,
                opponents: self
                    .state
                    .roster()
                    .iter()
                    .filter(|p| p.id() != player.id())
                    .map(|p| p.id().clone())
                    .collect(),
                rating_delta: changes
                    .and_then(|c| c.iter().find(|change| &change.player == player.id()))
                    .map(|change| change.delta),
                stats: self.state.stats[seat],
                reason,
                ended_at,
            };
            if let Err(e) = self.store.append_match_history(player.id(), entry).await {
                warn!(session_id = %self.id, player = %player.id(), error = %e, "match history write failed");
            }
        }
    }

    // === Helpers ===

    fn seat_of(&self, player: &PlayerId) -> Result<Seat, GameError> {
        self.state
            .seat_of(player)
            .ok_or_else(|| GameError::NotInSession(player.clone()))
    }

    fn connected_seats(&self) -> impl Iterator<Item = Seat> + '_ {
        self.connected.iter().filter(|&(_, &up)| up).map(|(seat, _)| seat)
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    fn emit_snapshot(&self) {
        let connected = self
            .connected_seats()
            .map(|seat| self.state.player(seat).id().clone())
            .collect();
        self.emit(SessionEvent::StateSnapshot {
            session_id: self.id,
            state: Box::new(self.state.clone()),
            connected,
        });
    }
}
