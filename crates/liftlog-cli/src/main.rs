//! `liftlog`: terminal dashboard for body-weight and lift records.
//!
//! # Usage
//!
//! ```
//! liftlog --store ~/lifts.db --email kim@example.com
//! liftlog --config ~/.config/liftlog/liftlog.toml
//! liftlog grant-superadmin coach@example.com
//! ```

mod app;
mod ui;

use std::{
  fs::OpenOptions,
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use liftlog_store_sqlite::SqliteBackend;
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "liftlog", version, about = "Terminal dashboard for Liftlog")]
struct Args {
  /// Path to a TOML config file (store_path, public_base_url, log_file).
  #[arg(short, long, value_name = "FILE", default_value = "liftlog.toml")]
  config: PathBuf,

  /// SQLite store to open; overrides `store_path` from the config.
  #[arg(long, value_name = "PATH")]
  store: Option<PathBuf>,

  /// Pre-fill the sign-in form with this email.
  #[arg(long, env = "LIFTLOG_EMAIL")]
  email: Option<String>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Promote an existing account to superadmin and exit.
  GrantSuperadmin {
    /// Email the account was registered with.
    email: String,
  },
}

// ─── Settings ─────────────────────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct Settings {
  store_path:      PathBuf,
  public_base_url: String,
  log_file:        PathBuf,
}

impl Settings {
  /// Defaults, then the config file, then `LIFTLOG_*` variables, then flags.
  fn load(args: &Args) -> Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", "~/.local/share/liftlog/liftlog.db")?
      .set_default("public_base_url", "file://liftlog/storage")?
      .set_default("log_file", "liftlog.log")?
      .add_source(config::File::from(args.config.as_path()).required(false))
      .add_source(config::Environment::with_prefix("LIFTLOG"))
      .set_override_option(
        "store_path",
        args.store.as_ref().map(|p| p.to_string_lossy().into_owned()),
      )?
      .build()
      .context("failed to read config file")?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    settings.log_file = expand_tilde(&settings.log_file);
    Ok(settings)
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let settings = Settings::load(&args)?;

  // The terminal belongs to the TUI, so logs go to a file.
  let log_file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(&settings.log_file)
    .with_context(|| format!("opening log file {}", settings.log_file.display()))?;
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_ansi(false)
    .with_writer(Mutex::new(log_file))
    .init();

  if let Some(parent) = settings.store_path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("creating {}", parent.display()))?;
  }
  let backend = SqliteBackend::open(&settings.store_path, settings.public_base_url.clone())
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;
  tracing::info!(store = %settings.store_path.display(), "store opened");

  if let Some(Command::GrantSuperadmin { email }) = &args.command {
    let profile = backend
      .grant_superadmin(email)
      .await
      .with_context(|| format!("granting superadmin to {email}"))?;
    println!("{} ({}) is now a superadmin", profile.email, profile.user_id);
    return Ok(());
  }

  let mut app = App::new(backend, args.email.unwrap_or_default());
  app.start().await;

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let mut terminal = Terminal::new(CrosstermBackend::new(stdout)).context("creating terminal")?;

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
    app.poll_session().await;
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

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
