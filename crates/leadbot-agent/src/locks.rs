// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation turn serialization.

use std::sync::Arc;

use dashmap::DashMap;
use leadbot_core::ConversationId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed async mutexes, one per active conversation.
///
/// Entries are created on first use and removed when the last holder or
/// waiter releases them, so idle conversations cost nothing.
#[derive(Clone, Default)]
pub struct SessionLocks {
    inner: Arc<DashMap<ConversationId, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other turn holds `conversation_id`.
    pub async fn acquire(&self, conversation_id: &ConversationId) -> SessionGuard {
        let mutex = self
            .inner
            .entry(conversation_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_owned().await;
        SessionGuard {
            key: conversation_id.clone(),
            guard: Some(guard),
            locks: self.inner.clone(),
        }
    }

    /// Number of conversations currently holding or waiting on a lock.
    pub fn active(&self) -> usize {
        self.inner.len()
    }
}

/// Held for the duration of one turn.
pub struct SessionGuard {
    key: ConversationId,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<DashMap<ConversationId, Arc<Mutex<()>>>>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map's own handle left: nobody holds or waits on it.
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_conversation_is_serialized() {
        let locks = SessionLocks::new();
        let id = ConversationId::from("chat-1");

        let first = locks.acquire(&id).await;
        let locks2 = locks.clone();
        let id2 = id.clone();
        let waiter = tokio::spawn(async move {
            let _g = locks2.acquire(&id2).await;
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(first);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should acquire after release")
            .unwrap();
    }

    #[tokio::test]
    async fn different_conversations_do_not_contend() {
        let locks = SessionLocks::new();
        let _a = locks.acquire(&ConversationId::from("a")).await;
        let b = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(&ConversationId::from("b")),
        )
        .await;
        assert!(b.is_ok());
        assert_eq!(locks.active(), 2);
    }

    #[tokio::test]
    async fn idle_entries_are_reclaimed() {
        let locks = SessionLocks::new();
        {
            let _g = locks.acquire(&ConversationId::from("a")).await;
            assert_eq!(locks.active(), 1);
        }
        assert_eq!(locks.active(), 0);
    }
}
