//! Public entry point for running sessions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;

use crate::config::{ServiceConfig, SessionConfig};
use crate::core::{GameRng, GameState, Player, PlayerId};
use crate::error::GameError;
use crate::rating::RatingService;
use crate::rules::{MoveOutcome, RollOutcome};
use crate::storage::UserStore;

use super::actor::{ActorSetup, Command, SessionActor};
use super::events::SessionEvent;
use super::registry::{SessionHandle, SessionRegistry};
use super::roster::seat_roster;
use super::{SessionId, SessionSpec};

/// Commands queued per session before senders wait.
const COMMAND_BUFFER: usize = 32;

/// A freshly started session.
#[derive(Debug)]
pub struct StartedSession {
    pub id: SessionId,
    /// Players in seat order.
    pub roster: Vec<Player>,
    /// Subscribed before the first event, so the opening snapshot is
    /// never missed.
    pub events: broadcast::Receiver<SessionEvent>,
}

/// Starts sessions and routes requests to their actors.
pub struct SessionController {
    registry: Arc<SessionRegistry>,
    store: Arc<dyn UserStore>,
    rating: RatingService,
    config: SessionConfig,
    started: AtomicU64,
}

impl SessionController {
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>, store: Arc<dyn UserStore>, config: SessionConfig) -> Self {
        Self {
            registry,
            store,
            rating: RatingService::default(),
            config,
            started: AtomicU64::new(0),
        }
    }

    /// Controller wired from a loaded [`ServiceConfig`].
    #[must_use]
    pub fn from_config(
        config: &ServiceConfig,
        registry: Arc<SessionRegistry>,
        store: Arc<dyn UserStore>,
    ) -> Self {
        Self::new(registry, store, config.session.clone())
            .with_rating(RatingService::new(config.rating.k_factor))
    }

    #[must_use]
    pub fn with_rating(mut self, rating: RatingService) -> Self {
        self.rating = rating;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Seat the roster, spawn the session actor and register it.
    pub async fn start_session(&self, spec: SessionSpec) -> Result<StartedSession, GameError> {
        let roster = seat_roster(spec.players)?;
        let id = SessionId::new();

        let (commands, inbox) = mpsc::channel(COMMAND_BUFFER);
        let (events, receiver) = broadcast::channel(self.config.event_buffer.max(1));

        let actor = SessionActor::new(ActorSetup {
            id,
            roster: roster.clone(),
            ranked: spec.ranked,
            rng: self.session_rng(),
            bot_think_scale: self.config.bot_think_scale,
            inbox,
            mailbox: commands.downgrade(),
            events: events.clone(),
            registry: Arc::clone(&self.registry),
            store: Arc::clone(&self.store),
            rating: self.rating,
        });

        self.registry
            .insert(SessionHandle::new(id, commands, events, roster.clone(), spec.ranked))
            .await;
        tokio::spawn(actor.run());

        Ok(StartedSession {
            id,
            roster,
            events: receiver,
        })
    }

    /// Deterministic per-session stream when a base seed is configured.
    fn session_rng(&self) -> GameRng {
        match self.config.seed {
            Some(seed) => {
                let n = self.started.fetch_add(1, Ordering::Relaxed);
                GameRng::new(seed).for_context(&format!("session-{n}"))
            }
            None => GameRng::from_entropy(),
        }
    }

    pub async fn request_roll(&self, id: SessionId, player: &PlayerId) -> Result<RollOutcome, GameError> {
        let player = player.clone();
        self.call(id, |reply| Command::Roll { player, reply }).await
    }

    /// Move a token. `token` is the raw index sent by the client.
    pub async fn request_move(
        &self,
        id: SessionId,
        player: &PlayerId,
        token: u8,
    ) -> Result<MoveOutcome, GameError> {
        let player = player.clone();
        self.call(id, |reply| Command::Move { player, token, reply }).await
    }

    pub async fn player_disconnected(&self, id: SessionId, player: &PlayerId) -> Result<(), GameError> {
        let player = player.clone();
        self.call(id, |reply| Command::Disconnect { player, reply }).await
    }

    /// Mark a player connected again and return the current state.
    pub async fn player_reconnected(&self, id: SessionId, player: &PlayerId) -> Result<GameState, GameError> {
        let player = player.clone();
        self.call(id, |reply| Command::Reconnect { player, reply }).await
    }

    /// Current state. Also broadcast as a `StateSnapshot` event.
    pub async fn snapshot(&self, id: SessionId) -> Result<GameState, GameError> {
        let handle = self.handle(id).await?;
        let (reply, rx) = oneshot::channel();
        handle
            .commands
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| GameError::SessionNotFound(id))?;
        rx.await.map_err(|_| GameError::SessionNotFound(id))
    }

    pub async fn subscribe(&self, id: SessionId) -> Result<broadcast::Receiver<SessionEvent>, GameError> {
        Ok(self.handle(id).await?.subscribe())
    }

    async fn handle(&self, id: SessionId) -> Result<SessionHandle, GameError> {
        self.registry.get(id).await.ok_or(GameError::SessionNotFound(id))
    }

    /// Send a command and wait for the actor's reply. A session that ends
    /// while the request is queued reads as not found.
    async fn call<T>(
        &self,
        id: SessionId,
        command: impl FnOnce(oneshot::Sender<Result<T, GameError>>) -> Command,
    ) -> Result<T, GameError> {
        let handle = self.handle(id).await?;
        let (reply, rx) = oneshot::channel();
        handle.commands.send(command(reply)).await.map_err(|_| {
            debug!(session_id = %id, "session mailbox closed");
            GameError::SessionNotFound(id)
        })?;
        rx.await.map_err(|_| GameError::SessionNotFound(id))?
    }
}
