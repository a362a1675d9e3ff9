mod app;
mod commands;
mod event;
mod session;
mod tui;
mod ui;
mod world;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use quill_core::markup::strip_markup;
use quill_core::{load_config, ChatConfig, ChatRouter};

use crate::session::Session;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "quill.json";

#[derive(Parser)]
#[command(name = "quill", about = "Terminal chat console with a slash-command tree")]
struct Cli {
    /// Chat config (JSON). Defaults to ./quill.json when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Feed each line of this file to the chat and print the log (non-interactive mode)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to file to avoid TUI conflicts
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    match std::fs::OpenOptions::new().create(true).append(true).open("quill.log") {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(e) => {
            eprintln!("Warning: Failed to open quill.log for logging: {e}");
            eprintln!("Diagnostics will be unavailable for this session.");
        }
    }

    let config = resolve_config(cli.config.as_deref())?;
    let router = commands::build_router(&config).context("Failed to build the command tree")?;
    let session = Session::new(&config);

    if let Some(script) = cli.script {
        run_script(&script, router, session)
    } else {
        run_tui(&config, router, session).await
    }
}

/// An explicit `--config` must load; the default file is optional.
fn resolve_config(explicit: Option<&Path>) -> Result<ChatConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    let default = Path::new(DEFAULT_CONFIG);
    if default.exists() {
        load_config(default)
    } else {
        tracing::info!("No {DEFAULT_CONFIG} found, using built-in chat config");
        Ok(ChatConfig::default())
    }
}

/// Non-interactive mode: run every line of `path` through the router and print the log.
fn run_script(path: &Path, mut router: ChatRouter<Session>, mut session: Session) -> Result<()> {
    let script = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;

    replay(&script, &mut router, &mut session);
    for entry in session.history.entries() {
        println!("{}", strip_markup(&entry.text));
    }
    Ok(())
}

/// Submits each non-blank line, stopping once a command asks to quit.
fn replay(script: &str, router: &mut ChatRouter<Session>, session: &mut Session) {
    for line in script.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let handled = router.receive_line(line, session);
        tracing::debug!("{line:?} -> {handled:?}");
        if session.should_quit {
            break;
        }
    }
}

/// Interactive TUI mode.
async fn run_tui(config: &ChatConfig, router: ChatRouter<Session>, mut session: Session) -> Result<()> {
    session.welcome(router.prefix());
    let mut app = app::App::new(config, router, session);

    let mut terminal = tui::Tui::enter()?;
    app.run(&mut terminal).await
}
