use std::fmt;

use uuid::Uuid;

/// Opaque identifier of one conversation.
///
/// Fresh ids are time-ordered UUIDs, so two conversations created in the same
/// process never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationId(pub Uuid);

impl ConversationId {
    pub fn new_v7() -> Self {
        Self(Uuid::now_v7())
    }

    /// Send target used when no conversation is selected.
    ///
    /// The nil UUID is never handed out by [`ConversationId::new_v7`], so
    /// mutations addressed to it never match a conversation.
    pub const fn placeholder() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_placeholder(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<Uuid> for ConversationId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<ConversationId> for Uuid {
    fn from(value: ConversationId) -> Self {
        value.0
    }
}
