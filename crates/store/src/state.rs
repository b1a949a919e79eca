use crate::ids::ConversationId;
use crate::types::{Conversation, Message};

/// Immutable snapshot of every conversation plus the current selection.
///
/// The selection is kept as an id and resolved against `conversations` on
/// read, so the list entry and the current conversation can never diverge,
/// and removing a conversation can never leave the selection dangling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    conversations: Vec<Conversation>,
    current: Option<ConversationId>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conversations ordered newest first.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn conversation(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations
            .iter()
            .find(|conversation| conversation.id == id)
    }

    pub fn current_conversation(&self) -> Option<&Conversation> {
        self.current.and_then(|id| self.conversation(id))
    }

    pub fn current_conversation_id(&self) -> Option<ConversationId> {
        self.current_conversation().map(|conversation| conversation.id)
    }

    /// Prepends an empty conversation and selects it.
    ///
    /// An id that is already present leaves the snapshot untouched so ids stay
    /// unique.
    pub fn create_new_conversation(mut self, id: ConversationId) -> Self {
        if self.conversation(id).is_some() {
            tracing::warn!(%id, "conversation id already present; keeping snapshot");
            return self;
        }

        self.conversations.insert(0, Conversation::new(id));
        self.current = Some(id);
        tracing::debug!(%id, total = self.conversations.len(), "conversation created");
        self
    }

    /// Selects the matching conversation, or clears the selection when `id` is unknown.
    pub fn select_conversation(mut self, id: ConversationId) -> Self {
        self.current = self.conversation(id).map(|conversation| conversation.id);
        if self.current.is_none() {
            tracing::debug!(%id, "selected conversation not found; selection cleared");
        }
        self
    }

    /// Appends `message` to the matching conversation; unknown ids are ignored.
    pub fn add_message(mut self, conversation_id: ConversationId, message: Message) -> Self {
        let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|conversation| conversation.id == conversation_id)
        else {
            tracing::debug!(%conversation_id, "message dropped; no matching conversation");
            return self;
        };

        conversation.messages.push(message);
        tracing::debug!(
            %conversation_id,
            messages = conversation.messages.len(),
            "message appended"
        );
        self
    }

    /// Removes the matching conversation and clears the selection if it pointed there.
    pub fn delete_conversation(mut self, id: ConversationId) -> Self {
        let before = self.conversations.len();
        self.conversations.retain(|conversation| conversation.id != id);

        if self.conversations.len() == before {
            tracing::debug!(%id, "conversation to delete not found");
            return self;
        }

        if self.current == Some(id) {
            self.current = None;
        }
        tracing::debug!(%id, remaining = self.conversations.len(), "conversation deleted");
        self
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Local, TimeZone};

    use super::*;
    use crate::types::{AttachedFile, BOT_REPLY_CONTENT};

    fn at(minute: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 5, 17, 14, minute, 0)
            .single()
            .expect("unambiguous local time")
    }

    fn with_conversations(count: usize) -> (ChatState, Vec<ConversationId>) {
        let mut state = ChatState::new();
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = ConversationId::new_v7();
            state = state.create_new_conversation(id);
            ids.push(id);
        }
        (state, ids)
    }

    #[test]
    fn create_prepends_and_selects() {
        let (state, ids) = with_conversations(3);

        let listed = state
            .conversations()
            .iter()
            .map(|conversation| conversation.id)
            .collect::<Vec<_>>();
        assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);
        assert_eq!(state.current_conversation_id(), Some(ids[2]));
        assert!(
            state
                .current_conversation()
                .is_some_and(|conversation| conversation.messages.is_empty())
        );
    }

    #[test]
    fn create_with_duplicate_id_keeps_state() {
        let (state, ids) = with_conversations(2);
        let next = state.clone().create_new_conversation(ids[0]);

        assert_eq!(next, state);
    }

    #[test]
    fn many_creations_keep_ids_unique() {
        let (state, _) = with_conversations(64);
        let conversations = state.conversations();

        for (index, conversation) in conversations.iter().enumerate() {
            assert!(
                conversations[index + 1..]
                    .iter()
                    .all(|other| other.id != conversation.id)
            );
        }
    }

    #[test]
    fn select_unknown_clears_selection() {
        let (state, _) = with_conversations(2);
        let state = state.select_conversation(ConversationId::new_v7());

        assert_eq!(state.current_conversation(), None);
        assert_eq!(state.conversations().len(), 2);
    }

    #[test]
    fn select_twice_matches_select_once() {
        let (state, ids) = with_conversations(3);
        let once = state.clone().select_conversation(ids[0]);
        let twice = state.select_conversation(ids[0]).select_conversation(ids[0]);

        assert_eq!(once, twice);
        assert_eq!(twice.current_conversation_id(), Some(ids[0]));
    }

    #[test]
    fn add_to_unknown_conversation_is_a_no_op() {
        let (state, _) = with_conversations(2);
        let next = state
            .clone()
            .add_message(ConversationId::new_v7(), Message::user("perdu", at(1)));

        assert_eq!(next, state);
    }

    #[test]
    fn add_to_placeholder_is_dropped() {
        let state = ChatState::new();
        let next = state
            .clone()
            .add_message(ConversationId::placeholder(), Message::user("hi", at(1)));

        assert_eq!(next, state);
        assert!(next.conversations().is_empty());
    }

    #[test]
    fn add_keeps_list_and_current_consistent() {
        let (state, ids) = with_conversations(2);
        let message = Message::user("hi", at(2));
        let state = state.add_message(ids[1], message.clone());

        let listed = state.conversation(ids[1]).expect("conversation listed");
        let current = state.current_conversation().expect("conversation selected");
        assert_eq!(listed.messages.last(), Some(&message));
        assert_eq!(current.messages, listed.messages);
    }

    #[test]
    fn add_to_background_conversation_leaves_current_untouched() {
        let (state, ids) = with_conversations(2);
        let state = state.add_message(ids[0], Message::bot_reply(at(3)));

        assert_eq!(state.current_conversation_id(), Some(ids[1]));
        assert!(
            state
                .current_conversation()
                .is_some_and(|conversation| conversation.messages.is_empty())
        );
        assert_eq!(
            state
                .conversation(ids[0])
                .map(|conversation| conversation.messages.len()),
            Some(1)
        );
    }

    #[test]
    fn delete_removes_only_the_match_in_order() {
        let (state, ids) = with_conversations(4);
        let state = state.select_conversation(ids[3]).delete_conversation(ids[1]);

        let listed = state
            .conversations()
            .iter()
            .map(|conversation| conversation.id)
            .collect::<Vec<_>>();
        assert_eq!(listed, vec![ids[3], ids[2], ids[0]]);
        assert_eq!(state.current_conversation_id(), Some(ids[3]));
    }

    #[test]
    fn delete_current_clears_selection() {
        let (state, ids) = with_conversations(1);
        let state = state.delete_conversation(ids[0]);

        assert!(state.conversations().is_empty());
        assert_eq!(state.current_conversation(), None);
    }

    #[test]
    fn delete_unknown_is_a_no_op() {
        let (state, _) = with_conversations(2);
        let next = state.clone().delete_conversation(ConversationId::new_v7());

        assert_eq!(next, state);
    }

    #[test]
    fn deleting_older_conversation_keeps_newer_selected() {
        let (state, ids) = with_conversations(2);
        let (older, newer) = (ids[0], ids[1]);
        let state = state.delete_conversation(older);

        assert_eq!(state.conversations().len(), 1);
        assert_eq!(state.conversations()[0].id, newer);
        assert_eq!(state.current_conversation_id(), Some(newer));
    }

    #[test]
    fn user_message_then_bot_reply_scenario() {
        let (state, ids) = with_conversations(1);
        let state = state.add_message(ids[0], Message::user("hi", at(4)));

        let messages = &state.current_conversation().expect("selected").messages;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "hi");
        assert!(!messages[0].is_bot);

        let state = state.add_message(ids[0], Message::bot_reply(at(4)));
        let messages = &state.current_conversation().expect("selected").messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, BOT_REPLY_CONTENT);
        assert!(messages[1].is_bot);
    }

    #[test]
    fn delayed_reply_lands_in_the_captured_conversation() {
        let (state, ids) = with_conversations(1);
        let captured = ids[0];
        let state = state.add_message(captured, Message::user("hi", at(5)));

        // The user moves on before the reply arrives.
        let other = ConversationId::new_v7();
        let state = state
            .create_new_conversation(other)
            .add_message(captured, Message::bot_reply(at(5)));

        assert_eq!(state.current_conversation_id(), Some(other));
        assert_eq!(
            state
                .conversation(captured)
                .map(|conversation| conversation.messages.len()),
            Some(2)
        );
        assert!(
            state
                .current_conversation()
                .is_some_and(|conversation| conversation.messages.is_empty())
        );
    }

    #[test]
    fn file_message_keeps_its_reference() {
        let (state, ids) = with_conversations(1);
        let file = AttachedFile::from_path("/home/me/clip.webm");
        let state = state.add_message(ids[0], Message::file_import(file.clone(), at(6)));

        let message = state
            .current_conversation()
            .and_then(|conversation| conversation.last_message())
            .expect("message appended");
        assert_eq!(message.file.as_ref(), Some(&file));
        assert_eq!(message.content, "Fichier importé: clip.webm");
    }
}
