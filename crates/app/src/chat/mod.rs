/// Event contracts for chat module wiring.
pub mod events;
pub mod message_input;
/// Message rows and file previews for the current conversation.
pub mod message_list;
pub mod preview;
pub mod scroll_manager;
pub mod sidebar;
/// UI entity owning the conversation store.
pub mod state;
pub mod view;

pub use events::{
    ConversationSelected, DeleteConversationRequested, FileAttached, NewConversationRequested,
    Submit,
};
pub use message_input::MessageInput;
pub use message_list::MessageList;
pub use preview::{PlaybackHandle, PreviewRegistry};
pub use scroll_manager::ScrollManager;
pub use sidebar::{ChatSidebar, SidebarRow, sidebar_rows};
pub use state::ConversationState;
pub use view::ChatView;
