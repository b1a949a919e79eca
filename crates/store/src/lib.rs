//! In-memory conversation store for the chat window.
//!
//! State is published as immutable [`ChatState`] snapshots. Every mutation is a
//! pure transition from the previous snapshot to the next one, and [`ChatStore`]
//! notifies its subscribers once per transition.

pub mod ids;
pub mod state;
pub mod store;
pub mod types;

pub use ids::ConversationId;
pub use state::ChatState;
pub use store::{ChatStore, SubscriptionId};
pub use types::{
    AttachedFile, BOT_REPLY_CONTENT, Conversation, DEFAULT_CONVERSATION_TITLE,
    FILE_IMPORT_PREFIX, Message,
};
