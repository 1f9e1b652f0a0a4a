//! Conversation model, persistence, and optimistic send flow for docchat.
//!
//! This crate owns the wire types shared by the `docchat` proxy and its
//! clients (`ChatTurn`, `ChatReply`) together with the client-side
//! [`ConversationStore`]. The store keeps an ordered list of conversations
//! mirrored to an injectable [`StateStore`] and drives a single in-flight
//! send at a time through a [`ChatTransport`].

pub mod codec;
pub mod message;
pub mod storage;
pub mod store;
pub mod time;
pub mod transport;

pub use message::{ChatReply, ChatRequest, ChatTurn, Conversation, DEFAULT_TITLE, Message, Role, derive_title};
pub use storage::{FileStore, MemoryStore, StateStore, StorageError};
pub use store::{ConversationStore, PendingSend};
pub use time::format_relative_time;
pub use transport::{ChatTransport, TransportError};
