//! Copy-to-clipboard control with timed confirmation feedback.

use crate::render::{COPIED_LABEL, COPY_FAILED_MESSAGE};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard write rejected: {0}")]
    WriteRejected(String),

    #[error("clipboard unavailable")]
    Unavailable,
}

impl ClipboardError {
    /// Message shown to the user when a copy fails.
    pub fn user_message(&self) -> &'static str {
        COPY_FAILED_MESSAGE
    }
}

/// Destination for copied text.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Process-local clipboard.
#[derive(Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut contents = self
            .contents
            .lock()
            .map_err(|_| ClipboardError::Unavailable)?;
        *contents = Some(text.to_string());
        Ok(())
    }
}

/// The button attached to a rendered answer.
pub struct CopyButton {
    label: Mutex<String>,
    disabled: AtomicBool,
}

impl CopyButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Mutex::new(label.into()),
            disabled: AtomicBool::new(false),
        }
    }

    pub fn label(&self) -> String {
        self.label
            .lock()
            .map(|l| l.clone())
            .unwrap_or_default()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    fn swap_label(&self, label: &str) -> String {
        match self.label.lock() {
            Ok(mut current) => std::mem::replace(&mut *current, label.to_string()),
            Err(_) => String::new(),
        }
    }
}

/// Copy `text` verbatim, then show the confirmation on `button` for
/// `feedback` before restoring its label and re-enabling it.
///
/// Returns the handle of the pending restore, or `None` when the button is
/// still disabled from a previous copy.
pub fn copy_to_clipboard(
    button: Arc<CopyButton>,
    clipboard: &dyn Clipboard,
    text: &str,
    feedback: Duration,
) -> Result<Option<JoinHandle<()>>, ClipboardError> {
    if button.is_disabled() {
        return Ok(None);
    }

    if let Err(e) = clipboard.write_text(text) {
        tracing::error!("Copy failed: {}", e);
        return Err(e);
    }

    let original = button.swap_label(COPIED_LABEL);
    button.disabled.store(true, Ordering::SeqCst);

    let handle = tokio::spawn(async move {
        tokio::time::sleep(feedback).await;
        button.swap_label(&original);
        button.disabled.store(false, Ordering::SeqCst);
    });

    Ok(Some(handle))
}
