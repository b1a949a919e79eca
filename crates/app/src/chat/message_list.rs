use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{
    ActiveTheme, Icon, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
    v_flex,
};
use videochat_store::{ConversationId, Message};

use crate::chat::preview::PreviewRegistry;
use crate::chat::scroll_manager::ScrollManager;

const BUBBLE_MAX_WIDTH: Pixels = px(540.);
const BUBBLE_PADDING_X: Pixels = px(14.);
const BUBBLE_PADDING_Y: Pixels = px(10.);
const PREVIEW_CARD_WIDTH: Pixels = px(320.);
const BOT_LABEL: &str = "Bot";
const OPEN_PREVIEW_LABEL: &str = "Ouvrir";
const EMPTY_CONVERSATION_LABEL: &str = "Aucun message pour le moment";

/// Renders the current conversation and follows its newest message.
pub struct MessageList {
    conversation_id: Option<ConversationId>,
    messages: Vec<Message>,
    previews: PreviewRegistry,
    scroll_manager: ScrollManager,
}

impl MessageList {
    pub fn new(_cx: &mut Context<Self>) -> Self {
        Self {
            conversation_id: None,
            messages: Vec::new(),
            previews: PreviewRegistry::new(),
            scroll_manager: ScrollManager::new(),
        }
    }

    pub fn set_messages(
        &mut self,
        conversation_id: Option<ConversationId>,
        messages: Vec<Message>,
        cx: &mut Context<Self>,
    ) {
        if displayed_list_changed(
            self.conversation_id,
            self.messages.len(),
            conversation_id,
            messages.len(),
        ) {
            self.scroll_manager.request_scroll_to_bottom();
        }

        self.conversation_id = conversation_id;
        self.messages = messages;
        self.previews.sync(conversation_id, &self.messages);
        cx.notify();
    }

    fn render_message_row(&self, message: &Message, index: usize, cx: &App) -> AnyElement {
        let preview = self.render_preview(index, cx);
        let theme = cx.theme();
        let (bubble_bg, bubble_fg) = if message.is_bot {
            (theme.muted, theme.foreground)
        } else {
            (theme.accent, theme.accent_foreground)
        };
        let content = if message.content.is_empty() {
            " ".to_string()
        } else {
            message.content.clone()
        };

        v_flex()
            .id(("message-row", index))
            .w_full()
            .gap_1()
            .when(message.is_bot, |row| row.items_start())
            .when(!message.is_bot, |row| row.items_end())
            .when(message.is_bot, |row| {
                row.child(
                    Label::new(BOT_LABEL)
                        .text_xs()
                        .text_color(theme.foreground.opacity(0.5)),
                )
            })
            .child(
                v_flex()
                    .max_w(BUBBLE_MAX_WIDTH)
                    .px(BUBBLE_PADDING_X)
                    .py(BUBBLE_PADDING_Y)
                    .gap_2()
                    .rounded_lg()
                    .bg(bubble_bg)
                    .text_color(bubble_fg)
                    .child(Label::new(content).text_sm())
                    .when_some(preview, |bubble, preview| bubble.child(preview)),
            )
            .child(
                Label::new(message.display_time())
                    .text_xs()
                    .text_color(theme.foreground.opacity(0.45)),
            )
            .into_any_element()
    }

    fn render_preview(&self, index: usize, cx: &App) -> Option<AnyElement> {
        let handle = self.previews.handle(index)?;
        let theme = cx.theme();
        let path = handle.path().to_path_buf();

        Some(
            h_flex()
                .id(("message-preview", index))
                .w(PREVIEW_CARD_WIDTH)
                .gap_2()
                .p_2()
                .items_center()
                .rounded_md()
                .border_1()
                .border_color(theme.border)
                .bg(theme.background)
                .child(
                    Icon::new(IconName::File)
                        .size(px(18.))
                        .text_color(theme.foreground),
                )
                .child(
                    div()
                        .flex_1()
                        .min_w_0()
                        .truncate()
                        .child(
                            Label::new(handle.name().to_string())
                                .text_sm()
                                .text_color(theme.foreground),
                        ),
                )
                .child(
                    Button::new(("open-preview", index))
                        .ghost()
                        .small()
                        .icon(IconName::ExternalLink)
                        .child(OPEN_PREVIEW_LABEL)
                        .on_click(move |_, _, cx| {
                            cx.open_with_system(&path);
                        }),
                )
                .into_any_element(),
        )
    }

    fn render_empty_state(&self, cx: &App) -> AnyElement {
        let theme = cx.theme();

        v_flex()
            .size_full()
            .items_center()
            .justify_center()
            .child(
                Label::new(EMPTY_CONVERSATION_LABEL)
                    .text_sm()
                    .text_color(theme.foreground.opacity(0.55)),
            )
            .into_any_element()
    }
}

impl Render for MessageList {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if self.messages.is_empty() {
            return self.render_empty_state(cx);
        }

        self.scroll_manager.apply_pending_scroll();
        let rows = self
            .messages
            .iter()
            .enumerate()
            .map(|(index, message)| self.render_message_row(message, index, cx))
            .collect::<Vec<_>>();

        div()
            .id("message-list")
            .size_full()
            .min_h_0()
            .overflow_y_scroll()
            .track_scroll(self.scroll_manager.handle())
            .child(v_flex().w_full().px_4().py_3().gap_4().children(rows))
            .into_any_element()
    }
}

/// True when the pane shows another conversation or a different number of messages.
pub fn displayed_list_changed(
    previous_conversation: Option<ConversationId>,
    previous_len: usize,
    next_conversation: Option<ConversationId>,
    next_len: usize,
) -> bool {
    previous_conversation != next_conversation || previous_len != next_len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appended_message_changes_the_list() {
        let id = ConversationId::new_v7();
        assert!(displayed_list_changed(Some(id), 1, Some(id), 2));
        assert!(!displayed_list_changed(Some(id), 2, Some(id), 2));
    }

    #[test]
    fn switching_conversation_changes_the_list() {
        let first = ConversationId::new_v7();
        let second = ConversationId::new_v7();
        assert!(displayed_list_changed(Some(first), 0, Some(second), 0));
        assert!(displayed_list_changed(Some(first), 3, None, 0));
        assert!(!displayed_list_changed(None, 0, None, 0));
    }
}
