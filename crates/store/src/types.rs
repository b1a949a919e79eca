use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::ids::ConversationId;

/// Title shown for a conversation that has no message yet.
pub const DEFAULT_CONVERSATION_TITLE: &str = "Nouvelle discussion";
/// Canned content of the simulated bot reply.
pub const BOT_REPLY_CONTENT: &str = "Réponse automatique du bot. [Prévisualisation vidéo ici]";
/// Prefix of the message describing an attached file.
pub const FILE_IMPORT_PREFIX: &str = "Fichier importé: ";

const DISPLAY_TIME_FORMAT: &str = "%H:%M";

/// Locally selected file attached to a message.
///
/// Only the display name and the local path are kept; the file content is
/// never read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    pub name: String,
    pub path: PathBuf,
}

impl AttachedFile {
    /// Builds the reference from a picked path, using its file name for display.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self { name, path }
    }
}

/// One immutable unit of conversation content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub content: String,
    pub is_bot: bool,
    pub timestamp: DateTime<Local>,
    pub file: Option<AttachedFile>,
}

impl Message {
    pub fn new(
        content: impl Into<String>,
        is_bot: bool,
        timestamp: DateTime<Local>,
        file: Option<AttachedFile>,
    ) -> Self {
        Self {
            content: content.into(),
            is_bot,
            timestamp,
            file,
        }
    }

    /// Text typed by the user.
    pub fn user(content: impl Into<String>, timestamp: DateTime<Local>) -> Self {
        Self::new(content, false, timestamp, None)
    }

    /// The canned automatic reply.
    pub fn bot_reply(timestamp: DateTime<Local>) -> Self {
        Self::new(BOT_REPLY_CONTENT, true, timestamp, None)
    }

    /// User message announcing an attached file and carrying its reference.
    pub fn file_import(file: AttachedFile, timestamp: DateTime<Local>) -> Self {
        let content = format!("{FILE_IMPORT_PREFIX}{}", file.name);
        Self::new(content, false, timestamp, Some(file))
    }

    /// Hour and minute of the timestamp, e.g. `09:41`.
    pub fn display_time(&self) -> String {
        self.timestamp.format(DISPLAY_TIME_FORMAT).to_string()
    }
}

/// Ordered thread of messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: ConversationId,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new(id: ConversationId) -> Self {
        Self {
            id,
            messages: Vec::new(),
        }
    }

    /// First message content, or the default title while the thread is empty.
    pub fn title(&self) -> &str {
        self.messages
            .first()
            .map(|message| message.content.as_str())
            .unwrap_or(DEFAULT_CONVERSATION_TITLE)
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.messages.first().map(|message| message.timestamp)
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
