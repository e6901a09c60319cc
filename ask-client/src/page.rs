//! Tabs, response areas and the ask flow that drives them.

use crate::client::AskClient;
use crate::render::{error_message, render_answer, NO_ANSWER_MESSAGE};
use std::sync::{Arc, Mutex};

/// What a response area currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaContent {
    /// Placeholder while a request is in flight.
    Thinking,
    /// Rendered answer; `text` is what the copy control copies.
    Answer { text: String, html: String },
    /// Plain-text failure message.
    Error(String),
}

/// Display target inside a tab.
pub trait ResponseArea: Send + Sync {
    fn show(&self, content: AreaContent);
}

/// Response area that records what it was asked to show.
#[derive(Default)]
pub struct MemoryArea {
    shown: Mutex<Vec<AreaContent>>,
}

impl MemoryArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<AreaContent> {
        self.shown.lock().ok().and_then(|s| s.last().cloned())
    }

    pub fn history(&self) -> Vec<AreaContent> {
        self.shown.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl ResponseArea for MemoryArea {
    fn show(&self, content: AreaContent) {
        if let Ok(mut shown) = self.shown.lock() {
            shown.push(content);
        }
    }
}

struct Tab {
    id: String,
    area: Option<Arc<dyn ResponseArea>>,
}

/// The set of tabs on the page; at most one is active.
#[derive(Default)]
pub struct Page {
    tabs: Vec<Tab>,
    active: Option<usize>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tab, optionally carrying a response area.
    pub fn add_tab(&mut self, id: impl Into<String>, area: Option<Arc<dyn ResponseArea>>) {
        self.tabs.push(Tab {
            id: id.into(),
            area,
        });
    }

    /// Make `id` the active tab. Returns false for an unknown id.
    pub fn activate(&mut self, id: &str) -> bool {
        match self.tabs.iter().position(|t| t.id == id) {
            Some(index) => {
                self.active = Some(index);
                true
            }
            None => false,
        }
    }

    /// Response area of the active tab, if there is one.
    pub fn active_area(&self) -> Option<Arc<dyn ResponseArea>> {
        self.active
            .and_then(|i| self.tabs.get(i))
            .and_then(|t| t.area.clone())
    }
}

/// Ask `question` and apply the outcome to the active tab's response area.
///
/// Without an active area nothing is sent. Each call is independent: when
/// asks overlap, whichever resolves last is what the area ends up showing.
pub async fn ask_ai(page: &Page, client: &AskClient, question: &str) {
    let Some(area) = page.active_area() else {
        tracing::warn!("No active response area, ask dropped");
        return;
    };

    area.show(AreaContent::Thinking);

    match client.ask(question).await {
        Ok(answer) => {
            let text = answer.unwrap_or_else(|| NO_ANSWER_MESSAGE.to_string());
            let html = render_answer(&text);
            area.show(AreaContent::Answer { text, html });
        }
        Err(e) => {
            tracing::warn!(error = %e, "Ask failed");
            area.show(AreaContent::Error(error_message(&e)));
        }
    }
}
