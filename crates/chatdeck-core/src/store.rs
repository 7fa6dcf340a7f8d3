//! The in-memory chat store.
//!
//! [`ChatStore`] owns the ordered chat list and the active selection. It is a
//! plain single-owner value: every operation takes `&self` or `&mut self` and
//! runs to completion. Callers that share it across threads wrap the whole
//! store in one lock so that the list and the active id change together.
//!
//! Mutations on ids that do not exist are no-ops. They still report whether
//! anything happened through their return value so that callers can surface a
//! "not found" without a second lookup.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::chat::{title_prefix, Chat, ChatMessage, ChatRole, DEFAULT_CHAT_TITLE};
use crate::clock::Clock;
use crate::grouping::{group_chats, ChatGroup};
use crate::ids::{ChatId, MessageId};
use crate::seed::seed_chats;

/// A change that has been applied to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    ChatCreated {
        chat_id: ChatId,
    },
    ChatDeleted {
        chat_id: ChatId,
    },
    ChatRenamed {
        chat_id: ChatId,
        title: String,
    },
    MessageAdded {
        chat_id: ChatId,
        message_id: MessageId,
        role: ChatRole,
    },
    ActiveChanged {
        chat_id: Option<ChatId>,
    },
}

impl StoreEvent {
    /// Snake-case event name, matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::ChatCreated { .. } => "chat_created",
            StoreEvent::ChatDeleted { .. } => "chat_deleted",
            StoreEvent::ChatRenamed { .. } => "chat_renamed",
            StoreEvent::MessageAdded { .. } => "message_added",
            StoreEvent::ActiveChanged { .. } => "active_changed",
        }
    }

    /// The chat this event concerns, if any.
    pub fn chat_id(&self) -> Option<&ChatId> {
        match self {
            StoreEvent::ChatCreated { chat_id }
            | StoreEvent::ChatDeleted { chat_id }
            | StoreEvent::ChatRenamed { chat_id, .. }
            | StoreEvent::MessageAdded { chat_id, .. } => Some(chat_id),
            StoreEvent::ActiveChanged { chat_id } => chat_id.as_ref(),
        }
    }
}

/// Handle returned by [`ChatStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback invoked after each effective mutation.
pub type Listener = Box<dyn Fn(&StoreEvent) + Send + Sync>;

pub struct ChatStore {
    chats: Vec<Chat>,
    active_chat_id: Option<ChatId>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    clock: Arc<dyn Clock>,
}

impl ChatStore {
    /// Create an empty store.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            chats: Vec::new(),
            active_chat_id: None,
            listeners: Vec::new(),
            next_subscription: 0,
            clock,
        }
    }

    /// Create a store holding the demo conversations, with nothing selected.
    pub fn seeded(clock: Arc<dyn Clock>) -> Self {
        let mut store = Self::new(clock);
        store.chats = seed_chats(store.clock.now());
        store
    }

    /// All chats, newest created first.
    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn active_chat_id(&self) -> Option<&ChatId> {
        self.active_chat_id.as_ref()
    }

    /// The active chat, if one is selected.
    pub fn active_chat(&self) -> Option<&Chat> {
        self.active_chat_id.as_ref().and_then(|id| self.chat(id))
    }

    /// Look up a chat by id.
    pub fn chat(&self, id: &ChatId) -> Option<&Chat> {
        self.chats.iter().find(|chat| &chat.id == id)
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    /// Create a chat at the front of the list and make it active.
    ///
    /// The title is the first 60 characters of `first_message`, or the
    /// default title when that is absent or empty.
    pub fn create_chat(&mut self, first_message: Option<&str>) -> Chat {
        let title = first_message
            .map(title_prefix)
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| DEFAULT_CHAT_TITLE.to_string());

        let chat = Chat::new(title, self.clock.now());
        self.chats.insert(0, chat.clone());
        self.active_chat_id = Some(chat.id.clone());

        self.emit(&StoreEvent::ChatCreated {
            chat_id: chat.id.clone(),
        });
        self.emit(&StoreEvent::ActiveChanged {
            chat_id: Some(chat.id.clone()),
        });
        chat
    }

    /// Remove a chat, clearing the selection if it was active.
    ///
    /// Returns the removed chat, or `None` when no chat has this id.
    pub fn delete_chat(&mut self, id: &ChatId) -> Option<Chat> {
        let index = self.position(id)?;
        let removed = self.chats.remove(index);

        self.emit(&StoreEvent::ChatDeleted {
            chat_id: removed.id.clone(),
        });
        if self.active_chat_id.as_ref() == Some(id) {
            self.active_chat_id = None;
            self.emit(&StoreEvent::ActiveChanged { chat_id: None });
        }
        Some(removed)
    }

    /// Set a chat's title. Any string is accepted, including an empty one.
    pub fn rename_chat(&mut self, id: &ChatId, title: impl Into<String>) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let title = title.into();
        self.chats[index].title = title.clone();

        self.emit(&StoreEvent::ChatRenamed {
            chat_id: id.clone(),
            title,
        });
        true
    }

    /// Append a single-part text message and bump the chat's `updated_at`.
    ///
    /// When this is the chat's first message and it comes from the user, the
    /// title becomes the first 60 characters of `text`, replacing whatever
    /// title the chat was created with.
    pub fn add_message(
        &mut self,
        chat_id: &ChatId,
        role: ChatRole,
        text: impl Into<String>,
    ) -> Option<&ChatMessage> {
        let index = self.position(chat_id)?;
        let now = self.clock.now();

        let chat = &mut self.chats[index];
        let message = ChatMessage::new(role, text);
        let message_id = message.id.clone();
        let retitle = chat.messages.is_empty() && role == ChatRole::User;
        if retitle {
            chat.title = title_prefix(&message.text());
        }
        chat.messages.push(message);
        chat.updated_at = now.max(chat.updated_at);
        let title = chat.title.clone();

        self.emit(&StoreEvent::MessageAdded {
            chat_id: chat_id.clone(),
            message_id,
            role,
        });
        if retitle {
            self.emit(&StoreEvent::ChatRenamed {
                chat_id: chat_id.clone(),
                title,
            });
        }
        self.chats[index].last_message()
    }

    /// Make an existing chat the active one. Unknown ids change nothing.
    pub fn select_chat(&mut self, id: &ChatId) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        if self.active_chat_id.as_ref() != Some(id) {
            self.active_chat_id = Some(id.clone());
            self.emit(&StoreEvent::ActiveChanged {
                chat_id: Some(id.clone()),
            });
        }
        true
    }

    pub fn clear_selection(&mut self) {
        if self.active_chat_id.take().is_some() {
            self.emit(&StoreEvent::ActiveChanged { chat_id: None });
        }
    }

    /// Chats grouped by recency in the machine's local time zone.
    ///
    /// Computed on every call, so results follow the wall clock across
    /// midnight without any invalidation.
    pub fn grouped_chats(&self) -> Vec<ChatGroup<'_>> {
        self.grouped_chats_in(&Local)
    }

    /// Chats grouped by recency with day boundaries taken in `tz`.
    pub fn grouped_chats_in<Tz: TimeZone>(&self, tz: &Tz) -> Vec<ChatGroup<'_>> {
        let now: DateTime<Tz> = self.clock.now().with_timezone(tz);
        group_chats(&self.chats, &now)
    }

    /// Register a listener for store events.
    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn position(&self, id: &ChatId) -> Option<usize> {
        self.chats.iter().position(|chat| &chat.id == id)
    }

    fn emit(&self, event: &StoreEvent) {
        for (_, listener) in &self.listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for ChatStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatStore")
            .field("chats", &self.chats.len())
            .field("active_chat_id", &self.active_chat_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
