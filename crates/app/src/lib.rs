#![deny(unsafe_code)]

/// Chat window shell and components.
///
/// Desktop chat front-end built with GPUI and gpui-component. Conversation
/// state lives in `videochat-store`; this crate renders it and maps user input
/// onto store mutations.
pub mod app;
/// Sidebar, message list, input and the coordinating chat view.
pub mod chat;
/// Theme flag persistence.
pub mod settings;
