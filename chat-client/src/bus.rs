//! Process-local pub/sub for side-channel notifications.
//!
//! Publishing is fire-and-forget: handlers run synchronously on the
//! publisher's thread and nothing is acknowledged.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, PoisonError, Weak,
        atomic::{AtomicU64, Ordering},
    },
};

use chat_contract::{RagSourcesUpdate, SidebarUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    UpdateSidebar,
    UpdateRagSources,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::UpdateSidebar => "updateSidebar",
            Topic::UpdateRagSources => "updateRagSources",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Sidebar(SidebarUpdate),
    RagSources(RagSourcesUpdate),
}

impl Notification {
    pub fn topic(&self) -> Topic {
        match self {
            Notification::Sidebar(_) => Topic::UpdateSidebar,
            Notification::RagSources(_) => Topic::UpdateRagSources,
        }
    }
}

type Handler = Arc<dyn Fn(&Notification) + Send + Sync>;

#[derive(Default)]
struct Registry {
    handlers: HashMap<Topic, Vec<(u64, Handler)>>,
}

#[derive(Clone, Default)]
pub struct NotificationBus {
    registry: Arc<Mutex<Registry>>,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus").finish_non_exhaustive()
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `topic`; dropping the returned value unsubscribes.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> Subscription
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handlers
            .entry(topic)
            .or_default()
            .push((id, Arc::new(handler)));
        Subscription {
            registry: Arc::downgrade(&self.registry),
            topic,
            id,
        }
    }

    /// Deliver to every current subscriber of the notification's topic;
    /// returns how many handlers ran.
    pub fn publish(&self, notification: Notification) -> usize {
        // Snapshot so handlers may (un)subscribe without deadlocking.
        let handlers: Vec<Handler> = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handlers
            .get(&notification.topic())
            .map(|hs| hs.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();

        for h in &handlers {
            h(&notification);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handlers
            .get(&topic)
            .map_or(0, Vec::len)
    }
}

/// Live registration on a [`NotificationBus`].
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    topic: Topic,
    id: u64,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("id", &self.id)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut reg = registry.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(hs) = reg.handlers.get_mut(&self.topic) {
                hs.retain(|(id, _)| *id != self.id);
            }
        }
    }
}
