use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
};
use rfd::FileDialog;
use videochat_store::AttachedFile;

use crate::chat::events::{FileAttached, Submit};

const INPUT_PLACEHOLDER: &str = "Tapez votre message...";
const FILE_DIALOG_TITLE: &str = "Importer une vidéo";

/// Text buffer, file picker and send control.
pub struct MessageInput {
    input_state: Entity<InputState>,
}

impl EventEmitter<Submit> for MessageInput {}
impl EventEmitter<FileAttached> for MessageInput {}

impl MessageInput {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let input_state = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder(INPUT_PLACEHOLDER)
                .clean_on_escape()
        });

        cx.subscribe_in(
            &input_state,
            window,
            |this, _, event: &InputEvent, window, cx| {
                if let InputEvent::PressEnter { .. } = event {
                    this.handle_submit(window, cx);
                }
                // Re-render so the send button tracks the buffer.
                cx.notify();
            },
        )
        .detach();

        Self { input_state }
    }

    pub fn value(&self, cx: &App) -> String {
        self.input_state.read(cx).value().to_string()
    }

    pub fn clear(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            state.set_value("", window, cx);
        });
    }

    fn handle_submit(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let content = self.value(cx);
        if !can_submit(&content) {
            return;
        }

        cx.emit(Submit::new(content));
        self.clear(window, cx);
    }

    fn pick_file(&mut self, cx: &mut Context<Self>) {
        let Some(path) = FileDialog::new().set_title(FILE_DIALOG_TITLE).pick_file() else {
            tracing::debug!("file selection cancelled");
            return;
        };

        let file = AttachedFile::from_path(path);
        tracing::info!(name = %file.name, "file attached");
        cx.emit(FileAttached { file });
    }
}

impl Render for MessageInput {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let send_disabled = !can_submit(&self.value(cx));

        h_flex()
            .id("message-input")
            .w_full()
            .gap_2()
            .p_3()
            .items_center()
            .bg(theme.background)
            .border_t_1()
            .border_color(theme.border)
            .child(
                Button::new("attach")
                    .ghost()
                    .small()
                    .icon(IconName::FolderOpen)
                    .tooltip(FILE_DIALOG_TITLE)
                    .on_click(cx.listener(|this, _, _window, cx| {
                        this.pick_file(cx);
                    })),
            )
            .child(
                div()
                    .flex_1()
                    .min_w_0()
                    .px_3()
                    .py_1()
                    .rounded_lg()
                    .border_1()
                    .border_color(theme.border)
                    .bg(theme.background)
                    .child(Input::new(&self.input_state).w_full()),
            )
            .child(
                Button::new("send")
                    .small()
                    .primary()
                    .icon(IconName::ArrowUp)
                    .disabled(send_disabled)
                    .on_click(cx.listener(|this, _, window, cx| {
                        this.handle_submit(window, cx);
                    })),
            )
    }
}

/// The send control accepts any buffer that is not blank once trimmed.
pub fn can_submit(content: &str) -> bool {
    !content.trim().is_empty()
}
