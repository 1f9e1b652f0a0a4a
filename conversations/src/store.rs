//! Conversation store: authoritative in-memory list mirrored to storage.
//!
//! DESIGN
//! ======
//! The store is driven from one logical thread. A send is split in two:
//! [`ConversationStore::begin_send`] records the user message and a loading
//! placeholder and hands back a [`PendingSend`]; once the transport resolves,
//! [`ConversationStore::complete_send`] swaps the placeholder (located by id,
//! in the conversation it was created in) for the answer or an error
//! message. Between the two the list stays navigable, but a second send is
//! a no-op until the first completes.
//!
//! Every mutation re-sorts by `updated_at` (most recent first) and writes
//! the full list to the [`StateStore`]. Nothing is written before
//! [`ConversationStore::hydrate`] has run, so the empty pre-hydration state
//! can never clobber what an earlier session stored.

use std::fmt;

use tracing::{debug, warn};

use crate::codec;
use crate::message::{ChatReply, ChatTurn, Conversation, DEFAULT_TITLE, Message, derive_title, now};
use crate::storage::StateStore;
use crate::transport::ChatTransport;

/// Handle for a send that has been recorded but not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    conversation_id: String,
    placeholder_id: String,
    turns: Vec<ChatTurn>,
}

impl PendingSend {
    /// Conversation the answer belongs to, regardless of what is active later.
    #[must_use]
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Id shared by the placeholder and the message that replaces it.
    #[must_use]
    pub fn placeholder_id(&self) -> &str {
        &self.placeholder_id
    }

    /// Turns to forward to the proxy: prior non-placeholder messages plus
    /// the new user message.
    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }
}

pub struct ConversationStore<S: StateStore> {
    storage: S,
    conversations: Vec<Conversation>,
    active_id: Option<String>,
    hydrated: bool,
    sending: bool,
}

impl<S: StateStore> ConversationStore<S> {
    /// An unhydrated, empty store. Call [`Self::hydrate`] before use.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self { storage, conversations: Vec::new(), active_id: None, hydrated: false, sending: false }
    }

    /// Build and hydrate in one step.
    #[must_use]
    pub fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.hydrate();
        store
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Conversations, most recently updated first.
    #[must_use]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    #[must_use]
    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    #[must_use]
    pub fn active(&self) -> Option<&Conversation> {
        self.active_id.as_deref().and_then(|id| self.conversation(id))
    }

    /// True while a send is in flight.
    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // =========================================================================
    // HYDRATE / PERSIST
    // =========================================================================

    /// Restore conversations from storage. Runs once; later calls are ignored.
    ///
    /// Missing, unreadable, or malformed state is discarded in favour of one
    /// fresh conversation. Malformed state is never reported to the user.
    pub fn hydrate(&mut self) {
        if self.hydrated {
            return;
        }

        let restored = match self.storage.load() {
            Ok(Some(raw)) => codec::decode_conversations(&raw).unwrap_or_else(|e| {
                debug!(error = %e, "discarding stored conversations");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                debug!(error = %e, "conversation storage unreadable");
                Vec::new()
            }
        };

        if restored.is_empty() {
            let fresh = Conversation::empty();
            self.active_id = Some(fresh.id.clone());
            self.conversations = vec![fresh];
        } else {
            self.conversations = restored;
            sort_by_most_recent(&mut self.conversations);
            self.active_id = self.conversations.first().map(|c| c.id.clone());
        }

        debug!(count = self.conversations.len(), "conversations hydrated");
        self.hydrated = true;
        self.persist();
    }

    fn persist(&self) {
        if !self.hydrated {
            return;
        }
        let payload = match codec::encode_conversations(&self.conversations) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "failed to encode conversations");
                return;
            }
        };
        if let Err(e) = self.storage.save(&payload) {
            warn!(error = %e, "failed to persist conversations");
        }
    }

    fn after_mutation(&mut self) {
        sort_by_most_recent(&mut self.conversations);
        self.persist();
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    /// Insert a new empty conversation at the front and make it active.
    /// Returns its id. The list is not re-sorted, so the new conversation
    /// stays first even if a stored one carries a later `updated_at`.
    pub fn create_conversation(&mut self) -> String {
        let fresh = Conversation::empty();
        let id = fresh.id.clone();
        self.conversations.insert(0, fresh);
        self.active_id = Some(id.clone());
        self.persist();
        id
    }

    /// Make `id` the active conversation. Unknown ids are ignored.
    pub fn select_conversation(&mut self, id: &str) -> bool {
        if self.conversation(id).is_none() {
            return false;
        }
        self.active_id = Some(id.to_owned());
        true
    }

    /// Reset the active conversation's title and messages, keeping its id.
    pub fn clear_active(&mut self) {
        let Some(active_id) = self.active_id.clone() else {
            return;
        };
        let Some(conversation) = self.conversations.iter_mut().find(|c| c.id == active_id) else {
            return;
        };
        conversation.title = DEFAULT_TITLE.to_owned();
        conversation.messages.clear();
        conversation.updated_at = now();
        self.after_mutation();
    }

    /// Replace every conversation with one fresh, active conversation.
    pub fn clear_all(&mut self) {
        let fresh = Conversation::empty();
        self.active_id = Some(fresh.id.clone());
        self.conversations = vec![fresh];
        self.after_mutation();
    }

    // =========================================================================
    // SEND
    // =========================================================================

    /// Record `input` and a loading placeholder in the active conversation.
    ///
    /// Returns `None` (and changes nothing) for blank input, while another
    /// send is in flight, or when no conversation is active.
    pub fn begin_send(&mut self, input: &str) -> Option<PendingSend> {
        if input.trim().is_empty() || self.sending {
            return None;
        }
        let conversation_id = self.active_id.clone()?;
        let conversation = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)?;

        let ts = now();
        let user = Message::user(input, ts);
        let placeholder = Message::placeholder(ts);
        let placeholder_id = placeholder.id.clone();

        let mut turns = conversation.turns();
        turns.push(user.to_turn());

        if conversation.title == DEFAULT_TITLE && !conversation.has_user_messages() {
            conversation.title = derive_title(input);
        }
        conversation.messages.push(user);
        conversation.messages.push(placeholder);
        conversation.updated_at = ts;

        self.sending = true;
        self.after_mutation();

        debug!(conversation = %conversation_id, turns = turns.len(), "send started");
        Some(PendingSend { conversation_id, placeholder_id, turns })
    }

    /// Resolve a pending send with the transport's outcome.
    ///
    /// The placeholder is replaced by id in its original conversation, even
    /// if another conversation is active now. If the placeholder is gone
    /// (its conversation was cleared meanwhile) only the busy flag is reset.
    pub fn complete_send<E: fmt::Display>(&mut self, pending: PendingSend, outcome: Result<ChatReply, E>) {
        self.sending = false;

        let ts = now();
        let replacement = match outcome {
            Ok(reply) => Message::answer(pending.placeholder_id.clone(), reply, ts),
            Err(e) => {
                warn!(error = %e, conversation = %pending.conversation_id, "send failed");
                Message::failure(pending.placeholder_id.clone(), &e.to_string(), ts)
            }
        };

        let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == pending.conversation_id)
        else {
            debug!(conversation = %pending.conversation_id, "conversation gone before reply arrived");
            return;
        };
        let Some(slot) = conversation
            .messages
            .iter_mut()
            .find(|m| m.id == pending.placeholder_id)
        else {
            debug!(placeholder = %pending.placeholder_id, "placeholder gone before reply arrived");
            return;
        };

        *slot = replacement;
        conversation.updated_at = ts;
        self.after_mutation();
    }

    /// Begin a send, await the transport, and apply the result.
    ///
    /// Returns `false` when the send was rejected as a no-op.
    pub async fn send_message<T>(&mut self, input: &str, transport: &T) -> bool
    where
        T: ChatTransport + ?Sized,
    {
        let Some(pending) = self.begin_send(input) else {
            return false;
        };
        let outcome = transport.send(pending.turns()).await;
        self.complete_send(pending, outcome);
        true
    }
}

fn sort_by_most_recent(conversations: &mut [Conversation]) {
    conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
