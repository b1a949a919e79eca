use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use videochat_store::{AttachedFile, ConversationId, Message};

/// Playback reference for one displayed file message.
///
/// On desktop this is only the name and path handed to the system player;
/// no file or player resource is held open.
#[derive(Debug, PartialEq, Eq)]
pub struct PlaybackHandle {
    name: String,
    path: PathBuf,
}

impl PlaybackHandle {
    fn open(file: &AttachedFile) -> Self {
        tracing::trace!(path = ?file.path, "preview handle opened");
        Self {
            name: file.name.clone(),
            path: file.path.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Playback handles for the file messages currently on screen.
///
/// Handles are keyed by message position, which is stable because messages
/// are only ever appended. Switching conversation drops every handle.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    conversation_id: Option<ConversationId>,
    handles: HashMap<usize, PlaybackHandle>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync(&mut self, conversation_id: Option<ConversationId>, messages: &[Message]) {
        if self.conversation_id != conversation_id {
            self.handles.clear();
            self.conversation_id = conversation_id;
        }

        let mut displayed = HashSet::new();
        for (index, message) in messages.iter().enumerate() {
            let Some(file) = message.file.as_ref() else {
                continue;
            };
            self.handles
                .entry(index)
                .or_insert_with(|| PlaybackHandle::open(file));
            displayed.insert(index);
        }

        self.handles.retain(|index, _| displayed.contains(index));
    }

    pub fn handle(&self, index: usize) -> Option<&PlaybackHandle> {
        self.handles.get(&index)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;

    fn file_message(name: &str) -> Message {
        Message::file_import(
            AttachedFile::from_path(format!("/videos/{name}")),
            Local::now(),
        )
    }

    #[test]
    fn only_file_messages_get_handles() {
        let mut registry = PreviewRegistry::new();
        let messages = vec![
            Message::user("salut", Local::now()),
            file_message("a.mp4"),
            Message::bot_reply(Local::now()),
            file_message("b.mov"),
        ];

        registry.sync(Some(ConversationId::new_v7()), &messages);

        assert_eq!(registry.len(), 2);
        assert!(registry.handle(0).is_none());
        assert_eq!(registry.handle(1).map(PlaybackHandle::name), Some("a.mp4"));
        assert_eq!(
            registry.handle(3).map(PlaybackHandle::path),
            Some(Path::new("/videos/b.mov"))
        );
    }

    #[test]
    fn switching_conversation_releases_handles() {
        let mut registry = PreviewRegistry::new();
        registry.sync(Some(ConversationId::new_v7()), &[file_message("a.mp4")]);
        assert_eq!(registry.len(), 1);

        registry.sync(
            Some(ConversationId::new_v7()),
            &[Message::user("hello", Local::now())],
        );
        assert!(registry.is_empty());

        registry.sync(None, &[]);
        assert!(registry.is_empty());
    }

    #[test]
    fn appending_keeps_existing_handles() {
        let id = ConversationId::new_v7();
        let mut registry = PreviewRegistry::new();
        let mut messages = vec![file_message("a.mp4")];
        registry.sync(Some(id), &messages);

        messages.push(Message::bot_reply(Local::now()));
        messages.push(file_message("b.mp4"));
        registry.sync(Some(id), &messages);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.handle(0).map(PlaybackHandle::name), Some("a.mp4"));
        assert_eq!(registry.handle(2).map(PlaybackHandle::name), Some("b.mp4"));
    }
}
