//! `ask`: put one question to the answer service from a terminal.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use ask_client::page::{ask_ai, AreaContent, Page, ResponseArea};
use ask_client::render::THINKING_MESSAGE;
use ask_client::{AskClient, ClientSettings};
use clap::Parser;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Ask LegiMedTrav-AI a question about Algerian occupational health law.
#[derive(Parser, Debug)]
#[command(name = "ask")]
#[command(version, about, long_about = None)]
struct Cli {
    /// The question to ask.
    question: String,

    /// URL of the `/ask` endpoint (overrides ASK__ENDPOINT).
    #[arg(long)]
    endpoint: Option<String>,

    /// Seconds to wait for an answer (overrides ASK__TIMEOUT_SECS).
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the rendered answer markup instead of the answer text.
    #[arg(long)]
    html: bool,
}

/// Writes area updates to the terminal.
struct TerminalArea {
    html: bool,
    failed: AtomicBool,
}

impl ResponseArea for TerminalArea {
    fn show(&self, content: AreaContent) {
        match content {
            AreaContent::Thinking => eprintln!("{THINKING_MESSAGE}"),
            AreaContent::Answer { text, html } => {
                if self.html {
                    println!("{html}");
                } else {
                    println!("{text}");
                }
            }
            AreaContent::Error(message) => {
                self.failed.store(true, Ordering::SeqCst);
                eprintln!("{message}");
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = match ClientSettings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: invalid ASK__* configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let endpoint = cli.endpoint.unwrap_or(settings.endpoint.clone());
    let timeout = cli
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| settings.timeout());
    let client = AskClient::new(endpoint, timeout);

    let area = Arc::new(TerminalArea {
        html: cli.html,
        failed: AtomicBool::new(false),
    });
    let mut page = Page::new();
    page.add_tab("terminal", Some(area.clone()));
    page.activate("terminal");

    ask_ai(&page, &client, &cli.question).await;

    if area.failed.load(Ordering::SeqCst) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
