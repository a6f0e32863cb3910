use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use autobiz_core::domain::account::UserId;
use autobiz_core::domain::conversation::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One consultation thread.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatSession {
    pub id: SessionId,
    pub user_id: Option<UserId>,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(user_id: Option<UserId>) -> Self {
        Self { id: SessionId::new(), user_id, messages: Vec::new(), created_at: Utc::now() }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Exclusive handle on one session for the length of a chat turn.
pub type SessionGuard = OwnedMutexGuard<ChatSession>;

/// In-process session registry keyed by [`SessionId`].
///
/// Each session sits behind its own lock, so two turns on the same session run
/// one after the other while turns on different sessions proceed in parallel.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, Arc<Mutex<ChatSession>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the stored session, registering a fresh one when `id` is unknown
    /// or absent. Changes made through the guard are visible once it drops.
    pub async fn checkout(&self, id: Option<SessionId>, user_id: Option<UserId>) -> SessionGuard {
        let entry = {
            let mut sessions = self.sessions.lock().await;
            match id.and_then(|id| sessions.get(&id)) {
                Some(entry) => entry.clone(),
                None => {
                    let mut session = ChatSession::new(user_id);
                    if let Some(id) = id {
                        session.id = id;
                    }
                    let session_id = session.id;
                    let entry = Arc::new(Mutex::new(session));
                    sessions.insert(session_id, entry.clone());
                    entry
                }
            }
        };
        entry.lock_owned().await
    }

    pub async fn get(&self, id: SessionId) -> Option<ChatSession> {
        let entry = self.sessions.lock().await.get(&id).cloned()?;
        let session = entry.lock().await;
        Some(session.clone())
    }

    /// Sessions opened by `user_id`, oldest first.
    pub async fn for_user(&self, user_id: UserId) -> Vec<ChatSession> {
        let entries = self.sessions.lock().await.values().cloned().collect::<Vec<_>>();

        let mut owned = Vec::new();
        for entry in entries {
            let session = entry.lock().await;
            if session.user_id == Some(user_id) {
                owned.push(session.clone());
            }
        }
        owned.sort_by_key(|session| session.created_at);
        owned
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use autobiz_core::domain::account::UserId;
    use autobiz_core::domain::conversation::ChatMessage;

    use super::{SessionId, SessionStore};

    #[tokio::test]
    async fn store_keeps_changes_and_registers_unknown_ids() {
        let store = SessionStore::new();
        let requested = SessionId::new();

        {
            let mut session = store.checkout(Some(requested), None).await;
            assert_eq!(session.id, requested);
            assert!(session.is_empty());
            session.push(ChatMessage::user("hello"));
        }

        let again = store.checkout(Some(requested), None).await;
        assert_eq!(again.len(), 1);
        drop(again);
        assert_eq!(store.len().await, 1);

        let fresh_id = store.checkout(None, None).await.id;
        assert_ne!(fresh_id, requested);
        assert_eq!(store.len().await, 2);
        assert!(store.get(fresh_id).await.is_some_and(|session| session.is_empty()));
        assert!(store.get(SessionId::new()).await.is_none());
    }

    #[tokio::test]
    async fn concurrent_turns_on_one_session_keep_every_message() {
        let store = Arc::new(SessionStore::new());
        let id = store.checkout(None, None).await.id;

        let turns = (0..8)
            .map(|turn| {
                let store = store.clone();
                tokio::spawn(async move {
                    let mut session = store.checkout(Some(id), None).await;
                    let seen = session.len();
                    tokio::task::yield_now().await;
                    assert_eq!(session.len(), seen);
                    session.push(ChatMessage::user(format!("turn {turn}")));
                })
            })
            .collect::<Vec<_>>();
        for turn in turns {
            turn.await.expect("turn should finish");
        }

        let session = store.get(id).await.expect("session stored");
        assert_eq!(session.len(), 8);
    }

    #[tokio::test]
    async fn sessions_are_listed_per_user_oldest_first() {
        let store = SessionStore::new();
        let owner = UserId::new();

        let first = store.checkout(None, Some(owner)).await.id;
        let _ = store.checkout(None, Some(UserId::new())).await;
        let _ = store.checkout(None, None).await;
        let second = store.checkout(None, Some(owner)).await.id;

        let listed = store.for_user(owner).await;
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|session| session.id == first));
        assert!(listed.iter().any(|session| session.id == second));
        assert!(listed.windows(2).all(|pair| pair[0].created_at <= pair[1].created_at));
        assert!(store.for_user(UserId::new()).await.is_empty());
    }
}
