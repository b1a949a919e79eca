use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
    v_flex,
};
use videochat_store::{ConversationId, DEFAULT_CONVERSATION_TITLE};

use crate::chat::events::{
    ConversationSelected, DeleteConversationRequested, FileAttached, NewConversationRequested,
    Submit,
};
use crate::chat::{ChatSidebar, ConversationState, MessageInput, MessageList, sidebar_rows};
use crate::settings::{ThemeChanged, ThemeState};

pub const DELETE_CONFIRMATION: &str = "Êtes-vous sûr de vouloir supprimer cette conversation ?";
const DELETE_CONFIRM_ANSWER: &str = "Supprimer";
const DELETE_CANCEL_ANSWER: &str = "Annuler";
const LIGHT_MODE_TOOLTIP: &str = "Mode clair";
const DARK_MODE_TOOLTIP: &str = "Mode sombre";

/// Parent coordinator for sidebar, message list, input and theme.
pub struct ChatView {
    conversation_state: Entity<ConversationState>,
    theme_state: Entity<ThemeState>,
    sidebar: Entity<ChatSidebar>,
    message_list: Entity<MessageList>,
    message_input: Entity<MessageInput>,
}

impl ChatView {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let conversation_state = ConversationState::new(cx);
        let theme_state = ThemeState::new(cx);
        let sidebar = cx.new(|cx| ChatSidebar::new(window, cx));
        let message_list = cx.new(MessageList::new);
        let message_input = cx.new(|cx| MessageInput::new(window, cx));

        cx.observe(&conversation_state, |this, _, cx| {
            this.sync_from_state(cx);
        })
        .detach();

        cx.subscribe(&theme_state, |_, _, event: &ThemeChanged, cx| {
            tracing::debug!(dark_mode = event.dark_mode, "theme changed");
            cx.notify();
        })
        .detach();

        cx.subscribe(&sidebar, |this, _, _event: &NewConversationRequested, cx| {
            this.create_conversation(cx);
        })
        .detach();

        cx.subscribe(&sidebar, |this, _, event: &ConversationSelected, cx| {
            this.select_conversation(event.conversation_id, cx);
        })
        .detach();

        cx.subscribe_in(
            &sidebar,
            window,
            |this, _, event: &DeleteConversationRequested, window, cx| {
                this.confirm_delete(event.conversation_id, window, cx);
            },
        )
        .detach();

        cx.subscribe(&message_input, |this, _, event: &Submit, cx| {
            this.handle_submit(event.clone(), cx);
        })
        .detach();

        cx.subscribe(&message_input, |this, _, event: &FileAttached, cx| {
            this.handle_file_attached(event.clone(), cx);
        })
        .detach();

        let mut this = Self {
            conversation_state,
            theme_state,
            sidebar,
            message_list,
            message_input,
        };
        this.sync_from_state(cx);
        this
    }

    pub fn sidebar(&self) -> &Entity<ChatSidebar> {
        &self.sidebar
    }

    pub fn create_conversation(&mut self, cx: &mut Context<Self>) {
        let id = self
            .conversation_state
            .update(cx, |state, cx| state.create_new_conversation(cx));
        tracing::info!(conversation_id = %id, "conversation created");
    }

    pub fn select_conversation(&mut self, id: ConversationId, cx: &mut Context<Self>) {
        self.conversation_state
            .update(cx, |state, cx| state.select_conversation(id, cx));
    }

    pub fn toggle_theme(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.theme_state
            .update(cx, |theme, cx| theme.toggle(window, cx));
    }

    fn handle_submit(&mut self, event: Submit, cx: &mut Context<Self>) {
        self.conversation_state.update(cx, |state, cx| {
            state.send_user_message(event.content, cx);
        });
    }

    fn handle_file_attached(&mut self, event: FileAttached, cx: &mut Context<Self>) {
        self.conversation_state.update(cx, |state, cx| {
            state.attach_file(event.file, cx);
        });
    }

    fn confirm_delete(&mut self, id: ConversationId, window: &mut Window, cx: &mut Context<Self>) {
        let answer = window.prompt(
            PromptLevel::Warning,
            DELETE_CONFIRMATION,
            None,
            &[DELETE_CONFIRM_ANSWER, DELETE_CANCEL_ANSWER],
            cx,
        );

        cx.spawn(async move |this, cx| {
            if !matches!(answer.await, Ok(0)) {
                tracing::debug!(conversation_id = %id, "deletion cancelled");
                return;
            }

            if let Err(error) = this.update(cx, |this, cx| {
                this.conversation_state
                    .update(cx, |state, cx| state.delete_conversation(id, cx));
                tracing::info!(conversation_id = %id, "conversation deleted");
            }) {
                tracing::debug!(conversation_id = %id, "deletion dropped: {error}");
            }
        })
        .detach();
    }

    fn sync_from_state(&mut self, cx: &mut Context<Self>) {
        let snapshot = self.conversation_state.read(cx).snapshot();
        let rows = sidebar_rows(&snapshot);
        let (conversation_id, messages) = snapshot
            .current_conversation()
            .map(|conversation| (Some(conversation.id), conversation.messages.clone()))
            .unwrap_or_default();

        self.sidebar
            .update(cx, |sidebar, cx| sidebar.set_rows(rows, cx));
        self.message_list.update(cx, |list, cx| {
            list.set_messages(conversation_id, messages, cx);
        });
        cx.notify();
    }

    fn render_header(&mut self, cx: &mut Context<Self>) -> impl IntoElement {
        let title = self
            .conversation_state
            .read(cx)
            .snapshot()
            .current_conversation()
            .map(|conversation| conversation.title().to_string())
            .unwrap_or_else(|| DEFAULT_CONVERSATION_TITLE.to_string());
        let dark_mode = self.theme_state.read(cx).is_dark();
        let theme = cx.theme();

        h_flex()
            .id("chat-view-header")
            .w_full()
            .flex_shrink_0()
            .h(px(48.))
            .px_4()
            .items_center()
            .justify_between()
            .border_b_1()
            .border_color(theme.border)
            .child(
                div()
                    .flex_1()
                    .min_w_0()
                    .truncate()
                    .child(Label::new(title).font_weight(FontWeight::SEMIBOLD)),
            )
            .child(
                Button::new("toggle-theme")
                    .ghost()
                    .small()
                    .icon(if dark_mode {
                        IconName::Sun
                    } else {
                        IconName::Moon
                    })
                    .tooltip(if dark_mode {
                        LIGHT_MODE_TOOLTIP
                    } else {
                        DARK_MODE_TOOLTIP
                    })
                    .on_click(cx.listener(|this, _, window, cx| {
                        this.toggle_theme(window, cx);
                    })),
            )
    }
}

impl Render for ChatView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let header = self.render_header(cx);
        let theme = cx.theme();

        v_flex()
            .id("chat-view")
            .relative()
            .size_full()
            .min_h_0()
            .overflow_hidden()
            .bg(theme.background)
            .child(header)
            .child(
                div()
                    .id("chat-view-message-list")
                    .flex_1()
                    .min_h_0()
                    .child(self.message_list.clone()),
            )
            .child(
                div()
                    .id("chat-view-message-input")
                    .flex_shrink_0()
                    .w_full()
                    .child(self.message_input.clone()),
            )
    }
}
