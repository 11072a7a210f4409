//! Conversation UI components for the chat interface

pub mod commands;
pub mod composer;
pub mod history;
pub mod manager;
pub mod typing;

pub use commands::{get_help_text, parse_slash_command, SlashCommand};
pub use composer::{ComposerResult, ConversationComposer};
pub use history::MessageList;
pub use manager::{BackendState, ConversationAction, ConversationManager};
pub use typing::TypingIndicator;
