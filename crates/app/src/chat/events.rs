use videochat_store::{AttachedFile, ConversationId};

/// Emitted when a sidebar row is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationSelected {
    pub conversation_id: ConversationId,
}

/// Emitted by the delete control nested in a sidebar row.
///
/// The row itself is not selected by the same click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeleteConversationRequested {
    pub conversation_id: ConversationId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewConversationRequested;

/// Emitted when the user submits non-blank text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submit {
    pub content: String,
}

impl Submit {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Emitted after the user picked a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttached {
    pub file: AttachedFile,
}
