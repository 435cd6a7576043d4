//! Operator chat channel messages.

pub mod message;

pub use message::{ChatInfo, ChatMessage, ChatSender};
