//! `roster`: terminal client for the Roster student directory.
//!
//! # Usage
//!
//! ```
//! roster                                  # interactive browser
//! roster --email jane@uni.edu --password secret privacy
//! roster students --campus <uuid> --year 2022
//! roster search "doe" --mode and
//! roster privacy set mobile private
//! roster ref campus add "North Campus"
//! roster --config ~/.config/roster/config.toml show <uuid>
//! ```

mod app;
mod client;
mod commands;
mod render;
mod toggle;
mod ui;

use std::{io, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::{ApiClient, ApiConfig};
use commands::Command;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "roster", about = "Terminal client for the Roster student directory")]
struct Args {
  /// Path to a TOML config file (url, email, password, token).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the roster server (default: http://localhost:8080).
  #[arg(long, env = "ROSTER_URL")]
  url: Option<String>,

  /// Account email for HTTP Basic authentication.
  #[arg(long, env = "ROSTER_EMAIL")]
  email: Option<String>,

  /// Account password (plaintext).
  #[arg(long, env = "ROSTER_PASSWORD")]
  password: Option<String>,

  /// Session token from `POST /api/auth/login`; used instead of email and
  /// password when set.
  #[arg(long, env = "ROSTER_TOKEN")]
  token: Option<String>,

  /// Run one command and exit; without one the interactive browser opens.
  #[command(subcommand)]
  command: Option<Command>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
  url:      String,
  email:    String,
  password: String,
  token:    String,
}

/// The flag if given, else the file value if non-empty.
fn pick(flag: Option<String>, file: &str) -> Option<String> {
  flag.or_else(|| (!file.is_empty()).then(|| file.to_string()))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: pick(args.url, &file_cfg.url)
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    token:    pick(args.token, &file_cfg.token).unwrap_or_default(),
    email:    pick(args.email, &file_cfg.email).unwrap_or_default(),
    password: pick(args.password, &file_cfg.password).unwrap_or_default(),
  };
  let client = ApiClient::new(api_config)?;

  if let Some(command) = args.command {
    // The TUI owns the terminal; only one-shot commands log.
    tracing_subscriber::fmt()
      .with_writer(io::stderr)
      .with_env_filter(
        EnvFilter::builder()
          .with_default_directive(LevelFilter::WARN.into())
          .from_env_lossy(),
      )
      .init();
    return commands::run(&client, command).await;
  }

  run_tui(client).await
}

async fn run_tui(client: ApiClient) -> Result<()> {
  let mut app = App::new(client);

  // Load before touching the terminal so connection errors print normally.
  app.load().await?;

  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flags_override_file_values() {
    assert_eq!(pick(Some("a".into()), "b").as_deref(), Some("a"));
    assert_eq!(pick(None, "b").as_deref(), Some("b"));
    assert_eq!(pick(None, ""), None);
  }

  #[test]
  fn config_file_fields_are_optional() {
    let cfg: ConfigFile = toml::from_str("url = \"http://dir.example.edu\"\n").unwrap();
    assert_eq!(cfg.url, "http://dir.example.edu");
    assert!(cfg.email.is_empty());
    assert!(cfg.token.is_empty());
  }

  #[test]
  fn subcommands_parse() {
    let args = Args::try_parse_from(["roster", "privacy", "set", "mobile", "private"]).unwrap();
    assert!(matches!(args.command, Some(Command::Privacy { action: Some(_) })));

    let args = Args::try_parse_from(["roster", "search", "doe", "--mode", "and"]).unwrap();
    assert!(matches!(args.command, Some(Command::Search { .. })));

    let args = Args::try_parse_from(["roster"]).unwrap();
    assert!(args.command.is_none());
  }
}
