use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use gpui::*;
use videochat_store::{AttachedFile, ChatState, ChatStore, ConversationId, Message};

/// Delay before the canned bot reply is appended.
pub const BOT_REPLY_DELAY_MS: u64 = 1000;

/// Owns the [`ChatStore`] for the window.
///
/// Every mutation publishes one snapshot and notifies observers once.
pub struct ConversationState {
    store: ChatStore,
}

impl ConversationState {
    pub fn new(cx: &mut App) -> Entity<Self> {
        cx.new(|_| {
            let mut store = ChatStore::new();
            store.subscribe(|state| {
                tracing::debug!(
                    conversations = state.conversations().len(),
                    current = ?state.current_conversation_id(),
                    "chat snapshot published"
                );
            });
            Self { store }
        })
    }

    pub fn snapshot(&self) -> Arc<ChatState> {
        self.store.snapshot()
    }

    pub fn current_conversation_id(&self) -> Option<ConversationId> {
        self.store.state().current_conversation_id()
    }

    pub fn create_new_conversation(&mut self, cx: &mut Context<Self>) -> ConversationId {
        let id = self.store.create_new_conversation();
        cx.notify();
        id
    }

    pub fn select_conversation(&mut self, id: ConversationId, cx: &mut Context<Self>) {
        self.store.select_conversation(id);
        cx.notify();
    }

    pub fn add_message(
        &mut self,
        conversation_id: ConversationId,
        message: Message,
        cx: &mut Context<Self>,
    ) {
        self.store.add_message(conversation_id, message);
        cx.notify();
    }

    pub fn delete_conversation(&mut self, id: ConversationId, cx: &mut Context<Self>) {
        self.store.delete_conversation(id);
        cx.notify();
    }

    /// Appends the user's text and schedules the bot reply. Returns the target id.
    ///
    /// With nothing selected the target is the placeholder id, so both the
    /// message and the reply are dropped by the store.
    pub fn send_user_message(
        &mut self,
        content: impl Into<String>,
        cx: &mut Context<Self>,
    ) -> ConversationId {
        let target = self.message_target();
        self.add_message(target, Message::user(content, Local::now()), cx);
        self.schedule_bot_reply(target, cx);
        target
    }

    /// Appends the "file imported" message to the current conversation.
    pub fn attach_file(&mut self, file: AttachedFile, cx: &mut Context<Self>) -> ConversationId {
        let target = self.message_target();
        self.add_message(target, Message::file_import(file, Local::now()), cx);
        target
    }

    fn message_target(&self) -> ConversationId {
        self.current_conversation_id().unwrap_or_else(|| {
            tracing::debug!("no conversation selected, message will be dropped");
            ConversationId::placeholder()
        })
    }

    /// The target is fixed at send time, so switching conversations in between
    /// does not redirect the reply.
    fn schedule_bot_reply(&mut self, target: ConversationId, cx: &mut Context<Self>) {
        cx.spawn(async move |this, cx| {
            cx.background_executor()
                .timer(Duration::from_millis(BOT_REPLY_DELAY_MS))
                .await;

            if let Err(error) = this.update(cx, |state, cx| {
                state.add_message(target, Message::bot_reply(Local::now()), cx);
            }) {
                tracing::debug!("bot reply dropped: {error}");
            }
        })
        .detach();
    }
}
