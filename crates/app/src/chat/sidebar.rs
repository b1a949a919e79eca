use std::rc::Rc;

use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable, VirtualListScrollHandle,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
    list::ListItem,
    v_flex, v_virtual_list,
};
use videochat_store::{ChatState, ConversationId, DEFAULT_CONVERSATION_TITLE};

use crate::chat::events::{
    ConversationSelected, DeleteConversationRequested, NewConversationRequested,
};

const CONVERSATION_ROW_HEIGHT: f32 = 44.0;
const APP_LOGO: &str = "VideoChat 1.0";
const HISTORY_TITLE: &str = "Historique";
const DELETE_TOOLTIP: &str = "Supprimer la conversation";
const EMPTY_HISTORY_LABEL: &str = "Aucune discussion";

/// One conversation as listed in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarRow {
    pub id: ConversationId,
    pub title: String,
    pub time_label: String,
    pub is_active: bool,
}

/// Builds the sidebar rows for a snapshot, newest conversation first.
pub fn sidebar_rows(state: &ChatState) -> Vec<SidebarRow> {
    let current = state.current_conversation_id();

    state
        .conversations()
        .iter()
        .map(|conversation| SidebarRow {
            id: conversation.id,
            title: conversation.title().to_string(),
            time_label: conversation
                .messages
                .first()
                .map(|message| message.display_time())
                .unwrap_or_default(),
            is_active: current == Some(conversation.id),
        })
        .collect()
}

pub struct ChatSidebar {
    rows: Vec<SidebarRow>,
    item_sizes: Rc<Vec<Size<Pixels>>>,
    scroll_handle: VirtualListScrollHandle,
}

impl EventEmitter<ConversationSelected> for ChatSidebar {}
impl EventEmitter<DeleteConversationRequested> for ChatSidebar {}
impl EventEmitter<NewConversationRequested> for ChatSidebar {}

impl ChatSidebar {
    pub fn new(_window: &mut Window, _cx: &mut Context<Self>) -> Self {
        Self {
            rows: Vec::new(),
            item_sizes: Rc::new(Vec::new()),
            scroll_handle: VirtualListScrollHandle::new(),
        }
    }

    pub fn set_rows(&mut self, rows: Vec<SidebarRow>, cx: &mut Context<Self>) {
        if self.rows == rows {
            return;
        }

        self.item_sizes = Rc::new(
            rows.iter()
                .map(|_| size(px(0.), px(CONVERSATION_ROW_HEIGHT)))
                .collect(),
        );
        self.rows = rows;
        cx.notify();
    }

    fn render_header(&mut self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .w_full()
            .min_w_0()
            .gap_3()
            .px_3()
            .pt(px(8.))
            .pb_2()
            .child(
                div()
                    .text_lg()
                    .font_weight(FontWeight::SEMIBOLD)
                    .text_color(theme.foreground)
                    .child(APP_LOGO),
            )
            .child(
                Button::new("new-conversation")
                    .w_full()
                    .small()
                    .primary()
                    .icon(IconName::Plus)
                    .child(DEFAULT_CONVERSATION_TITLE)
                    .on_click(cx.listener(|_, _, _window, cx| {
                        cx.emit(NewConversationRequested);
                    })),
            )
            .child(
                Label::new(HISTORY_TITLE)
                    .text_xs()
                    .text_color(theme.foreground.opacity(0.5)),
            )
    }

    fn render_empty_state(&mut self, cx: &mut Context<Self>) -> AnyElement {
        let theme = cx.theme();

        v_flex()
            .flex_1()
            .items_center()
            .justify_center()
            .px_4()
            .child(
                Label::new(EMPTY_HISTORY_LABEL)
                    .text_sm()
                    .text_color(theme.foreground.opacity(0.55)),
            )
            .into_any_element()
    }

    fn render_history_list(&mut self, cx: &mut Context<Self>) -> AnyElement {
        if self.rows.is_empty() {
            return self.render_empty_state(cx);
        }

        let item_sizes = self.item_sizes.clone();
        let rows = self.rows.clone();

        v_flex()
            .flex_1()
            .min_h_0()
            .child(
                v_virtual_list(
                    cx.entity().clone(),
                    "conversation-list",
                    item_sizes,
                    move |_this, visible_range, _window, cx| {
                        let theme = cx.theme();

                        visible_range
                            .filter_map(|index| rows.get(index).map(|row| (index, row)))
                            .map(|(index, row)| {
                                let conversation_id = row.id;
                                // Keep the press from reaching the row so deleting
                                // never selects it.
                                let delete_control = div()
                                    .id(("conversation-delete-area", index))
                                    .on_mouse_down(MouseButton::Left, |_, _, cx| {
                                        cx.stop_propagation()
                                    })
                                    .child(
                                        Button::new(("conversation-delete", index))
                                            .ghost()
                                            .xsmall()
                                            .icon(IconName::Delete)
                                            .tooltip(DELETE_TOOLTIP)
                                            .on_click(cx.listener(
                                                move |_this, _event: &ClickEvent, _window, cx| {
                                                    cx.stop_propagation();
                                                    cx.emit(DeleteConversationRequested {
                                                        conversation_id,
                                                    });
                                                },
                                            )),
                                    );

                                div()
                                    .w_full()
                                    .h(px(CONVERSATION_ROW_HEIGHT))
                                    .px_2()
                                    .child(
                                        ListItem::new(("conversation", index))
                                            .w_full()
                                            .h_full()
                                            .px_3()
                                            .py_2()
                                            .rounded_md()
                                            .selected(row.is_active)
                                            .on_click(cx.listener(
                                                move |_this, _event: &ClickEvent, _window, cx| {
                                                    cx.emit(ConversationSelected {
                                                        conversation_id,
                                                    });
                                                },
                                            ))
                                            .child(
                                                h_flex()
                                                    .w_full()
                                                    .gap_2()
                                                    .items_center()
                                                    .child(
                                                        div().flex_1().min_w_0().truncate().child(
                                                            Label::new(row.title.clone()).text_sm(),
                                                        ),
                                                    )
                                                    .child(
                                                        Label::new(row.time_label.clone())
                                                            .text_xs()
                                                            .text_color(
                                                                theme.foreground.opacity(0.5),
                                                            ),
                                                    )
                                                    .child(delete_control),
                                            ),
                                    )
                                    .into_any_element()
                            })
                            .collect()
                    },
                )
                .w_full()
                .flex_1()
                .track_scroll(&self.scroll_handle),
            )
            .into_any_element()
    }
}

impl Render for ChatSidebar {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .size_full()
            .min_w_0()
            .overflow_hidden()
            .bg(theme.background)
            .child(self.render_header(cx))
            .child(self.render_history_list(cx))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};
    use videochat_store::Message;

    use super::*;

    #[test]
    fn rows_follow_snapshot_order_and_selection() {
        let first = ConversationId::new_v7();
        let second = ConversationId::new_v7();
        let sent_at = Local
            .with_ymd_and_hms(2024, 5, 17, 9, 41, 0)
            .single()
            .expect("unambiguous local time");

        let state = ChatState::new()
            .create_new_conversation(first)
            .add_message(first, Message::user("premier message", sent_at))
            .add_message(first, Message::bot_reply(sent_at))
            .create_new_conversation(second);

        let rows = sidebar_rows(&state);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, second);
        assert_eq!(rows[0].title, DEFAULT_CONVERSATION_TITLE);
        assert_eq!(rows[0].time_label, "");
        assert!(rows[0].is_active);

        assert_eq!(rows[1].id, first);
        assert_eq!(rows[1].title, "premier message");
        assert_eq!(rows[1].time_label, "09:41");
        assert!(!rows[1].is_active);
    }

    #[test]
    fn no_row_is_active_without_selection() {
        let id = ConversationId::new_v7();
        let state = ChatState::new()
            .create_new_conversation(id)
            .select_conversation(ConversationId::new_v7());

        let rows = sidebar_rows(&state);
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_active);
    }
}
