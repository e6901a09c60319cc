//! Client side of the LegiMedTrav answer service.
//!
//! [`AskClient`] performs one bounded-wait call per question; [`ask_ai`]
//! drives a [`ResponseArea`] through the thinking / answer / error states and
//! [`copy_to_clipboard`] implements the copy control attached to answers.

pub mod client;
pub mod clipboard;
pub mod config;
pub mod page;
pub mod render;

pub use client::{AskClient, AskError};
pub use clipboard::{copy_to_clipboard, Clipboard, ClipboardError, CopyButton, MemoryClipboard};
pub use config::ClientSettings;
pub use page::{ask_ai, AreaContent, MemoryArea, Page, ResponseArea};
