//! Registry of live sessions.
//!
//! Injected into the controller rather than held globally, so tests and
//! embedders can run several independent registries side by side.

use rustc_hash::FxHashMap;
use tokio::sync::{broadcast, mpsc, RwLock};

use crate::core::{Player, PlayerId};

use super::actor::Command;
use super::events::SessionEvent;
use super::SessionId;

/// Addressing information for one running session.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    pub id: SessionId,
    pub(crate) commands: mpsc::Sender<Command>,
    events: broadcast::Sender<SessionEvent>,
    roster: Vec<Player>,
    ranked: bool,
}

impl SessionHandle {
    pub(crate) fn new(
        id: SessionId,
        commands: mpsc::Sender<Command>,
        events: broadcast::Sender<SessionEvent>,
        roster: Vec<Player>,
        ranked: bool,
    ) -> Self {
        Self {
            id,
            commands,
            events,
            roster,
            ranked,
        }
    }

    /// Listen to this session's events from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Players in seat order.
    #[must_use]
    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    #[must_use]
    pub fn ranked(&self) -> bool {
        self.ranked
    }

    #[must_use]
    pub fn contains(&self, player: &PlayerId) -> bool {
        self.roster.iter().any(|p| p.id() == player)
    }
}

/// Live sessions by id.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<FxHashMap<SessionId, SessionHandle>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, handle: SessionHandle) {
        self.sessions.write().await.insert(handle.id, handle);
    }

    pub async fn get(&self, id: SessionId) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: SessionId) -> Option<SessionHandle> {
        self.sessions.write().await.remove(&id)
    }

    pub async fn contains(&self, id: SessionId) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// The live session a player is seated in, if any.
    pub async fn find_by_player(&self, player: &PlayerId) -> Option<SessionId> {
        self.sessions
            .read()
            .await
            .values()
            .find(|handle| handle.contains(player))
            .map(|handle| handle.id)
    }
}
