//! Display-side consumers of the notification bus.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
};

use chat_contract::{RagSourcesUpdate, SidebarUpdate};

use crate::bus::{Notification, NotificationBus, Subscription, Topic};

/// Items each panel keeps.
pub const PANEL_CAPACITY: usize = 15;

/// Identity used for de-duplication.
pub trait Keyed {
    fn key(&self) -> String;
}

impl Keyed for SidebarUpdate {
    fn key(&self) -> String {
        self.id.clone()
    }
}

impl Keyed for RagSourcesUpdate {
    fn key(&self) -> String {
        let ids: Vec<&str> = self.sources.iter().map(|s| s.id.as_str()).collect();
        format!("{}|{}", self.query, ids.join(","))
    }
}

/// FIFO of at most `cap` items; the oldest is evicted first and items whose
/// key is already present are ignored.
#[derive(Debug, Clone)]
pub struct BoundedFeed<T> {
    items: VecDeque<T>,
    cap: usize,
}

impl<T: Keyed> BoundedFeed<T> {
    pub fn new(cap: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(cap),
            cap: cap.max(1),
        }
    }

    /// Returns `false` for a duplicate.
    pub fn push(&mut self, item: T) -> bool {
        let key = item.key();
        if self.items.iter().any(|i| i.key() == key) {
            return false;
        }
        if self.items.len() == self.cap {
            self.items.pop_front();
        }
        self.items.push_back(item);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

type SharedFeed<T> = Arc<Mutex<BoundedFeed<T>>>;

fn snapshot<T: Keyed + Clone>(feed: &SharedFeed<T>) -> Vec<T> {
    feed.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .cloned()
        .collect()
}

/// Left panel: reasoning trace, mood and categories per reply.
#[derive(Debug)]
pub struct ThinkingPanel {
    feed: SharedFeed<SidebarUpdate>,
    _sub: Subscription,
}

impl ThinkingPanel {
    pub fn mount(bus: &NotificationBus) -> Self {
        let feed: SharedFeed<SidebarUpdate> = Arc::new(Mutex::new(BoundedFeed::new(PANEL_CAPACITY)));
        let sink = Arc::clone(&feed);
        let sub = bus.subscribe(Topic::UpdateSidebar, move |n| {
            if let Notification::Sidebar(update) = n {
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(update.clone());
            }
        });
        Self { feed, _sub: sub }
    }

    pub fn items(&self) -> Vec<SidebarUpdate> {
        snapshot(&self.feed)
    }
}

/// Right panel: sources retrieved per query.
#[derive(Debug)]
pub struct SourcesPanel {
    feed: SharedFeed<RagSourcesUpdate>,
    _sub: Subscription,
}

impl SourcesPanel {
    pub fn mount(bus: &NotificationBus) -> Self {
        let feed: SharedFeed<RagSourcesUpdate> =
            Arc::new(Mutex::new(BoundedFeed::new(PANEL_CAPACITY)));
        let sink = Arc::clone(&feed);
        let sub = bus.subscribe(Topic::UpdateRagSources, move |n| {
            if let Notification::RagSources(update) = n {
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(update.clone());
            }
        });
        Self { feed, _sub: sub }
    }

    pub fn items(&self) -> Vec<RagSourcesUpdate> {
        snapshot(&self.feed)
    }
}

/// Panel feature flags, read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiConfig {
    pub include_left_sidebar: bool,
    pub include_right_sidebar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            include_left_sidebar: true,
            include_right_sidebar: true,
        }
    }
}

impl UiConfig {
    /// - `INCLUDE_LEFT_SIDEBAR`  (true)
    /// - `INCLUDE_RIGHT_SIDEBAR` (true)
    pub fn from_env() -> Self {
        Self::from_lookup(&|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let flag = |k: &str, dflt: bool| match lookup(k).map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if matches!(v.as_str(), "true" | "1" | "yes" | "on") => true,
            Some(v) if matches!(v.as_str(), "false" | "0" | "no" | "off") => false,
            _ => dflt,
        };
        let dflt = Self::default();
        Self {
            include_left_sidebar: flag("INCLUDE_LEFT_SIDEBAR", dflt.include_left_sidebar),
            include_right_sidebar: flag("INCLUDE_RIGHT_SIDEBAR", dflt.include_right_sidebar),
        }
    }
}

/// Mounted panels; a disabled panel is never subscribed.
#[derive(Debug)]
pub struct PanelHost {
    pub thinking: Option<ThinkingPanel>,
    pub sources: Option<SourcesPanel>,
}

impl PanelHost {
    pub fn mount(bus: &NotificationBus, cfg: &UiConfig) -> Self {
        Self {
            thinking: cfg.include_left_sidebar.then(|| ThinkingPanel::mount(bus)),
            sources: cfg.include_right_sidebar.then(|| SourcesPanel::mount(bus)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_contract::{DebugFlags, UserMood};

    fn sidebar(id: usize) -> Notification {
        Notification::Sidebar(SidebarUpdate {
            id: format!("reply-{id}"),
            content: format!("thinking {id}"),
            user_mood: UserMood::Neutral,
            matched_categories: vec![],
            debug: DebugFlags::default(),
        })
    }

    #[test]
    fn keeps_fifteen_most_recent() {
        let bus = NotificationBus::new();
        let panel = ThinkingPanel::mount(&bus);
        for i in 1..=16 {
            bus.publish(sidebar(i));
        }
        let ids: Vec<String> = panel.items().into_iter().map(|u| u.id).collect();
        assert_eq!(ids.len(), 15);
        assert_eq!(ids.first().map(String::as_str), Some("reply-2"));
        assert_eq!(ids.last().map(String::as_str), Some("reply-16"));
    }

    #[test]
    fn duplicate_ids_are_ignored() {
        let bus = NotificationBus::new();
        let panel = ThinkingPanel::mount(&bus);
        bus.publish(sidebar(1));
        bus.publish(sidebar(1));
        assert_eq!(panel.items().len(), 1);
    }

    #[test]
    fn disabled_panels_are_not_mounted() {
        let bus = NotificationBus::new();
        let cfg = UiConfig::from_lookup(&|k| (k == "INCLUDE_RIGHT_SIDEBAR").then(|| "false".into()));
        let host = PanelHost::mount(&bus, &cfg);
        assert!(host.thinking.is_some());
        assert!(host.sources.is_none());
        assert_eq!(bus.subscriber_count(Topic::UpdateRagSources), 0);
        assert_eq!(bus.subscriber_count(Topic::UpdateSidebar), 1);
    }

    #[test]
    fn feed_reports_duplicates() {
        let mut feed = BoundedFeed::new(2);
        let u = |q: &str| RagSourcesUpdate {
            sources: vec![],
            query: q.into(),
            debug: DebugFlags::default(),
        };
        assert!(feed.push(u("a")));
        assert!(!feed.push(u("a")));
        assert!(feed.push(u("b")));
        assert!(feed.push(u("c")));
        let qs: Vec<_> = feed.iter().map(|x| x.query.as_str()).collect();
        assert_eq!(qs, ["b", "c"]);
    }
}
