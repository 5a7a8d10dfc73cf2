//! `fras`: terminal client for the facial-recognition attendance system.
//!
//! # Usage
//!
//! ```text
//! fras
//! fras --config ~/.config/fras/fras.toml --seed 42
//! FRAS_STORE_PATH=/tmp/fras.db fras
//! ```

mod app;
mod app_config;
mod form;
mod screens;
mod ui;

use std::{
  fs::OpenOptions,
  io,
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use app_config::AppConfig;
use clap::Parser;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
  },
};
use fras_core::{accounts::AccountTable, session::SessionManager};
use fras_mock::MockSupplier;
use fras_store_sqlite::SqliteSlot;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "fras", about = "Terminal client for FRAS attendance records")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "fras.toml")]
  config: PathBuf,

  /// SQLite file holding the signed-in identity.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  /// Log file (the terminal is taken by the UI).
  #[arg(long, value_name = "FILE")]
  log: Option<PathBuf>,

  /// Seed for the generated attendance month.
  #[arg(long)]
  seed: Option<u64>,

  /// Simulated login round-trip, in milliseconds.
  #[arg(long)]
  login_latency_ms: Option<u64>,

  /// Simulated submit round-trip, in milliseconds.
  #[arg(long)]
  submit_latency_ms: Option<u64>,
}

impl Args {
  /// Flags win over the file and the environment.
  fn apply(&self, cfg: &mut AppConfig) {
    if let Some(store) = &self.store {
      cfg.store_path = app_config::expand_tilde(store);
    }
    if let Some(log) = &self.log {
      cfg.log_path = app_config::expand_tilde(log);
    }
    if self.seed.is_some() {
      cfg.seed = self.seed;
    }
    if let Some(ms) = self.login_latency_ms {
      cfg.login_latency_ms = ms;
    }
    if let Some(ms) = self.submit_latency_ms {
      cfg.submit_latency_ms = ms;
    }
  }
}

fn init_tracing(path: &Path) -> Result<()> {
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let mut cfg = AppConfig::load(&args.config)?;
  args.apply(&mut cfg);

  init_tracing(&cfg.log_path)?;
  tracing::info!(
    store = %cfg.store_path.display(),
    seed = ?cfg.seed,
    "starting fras"
  );

  let slot = SqliteSlot::open(&cfg.store_path)
    .await
    .with_context(|| format!("opening store {}", cfg.store_path.display()))?;
  let accounts = AccountTable::demo().with_latency(cfg.login_latency());
  let session = SessionManager::init(slot, accounts).await;
  let supplier = MockSupplier::new(cfg.seed).with_latency(cfg.submit_latency());

  let mut app = App::new(Arc::new(session), Arc::new(supplier));
  app.start().await?;

  // Set up the terminal.
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

  if let Err(e) = &run_result {
    tracing::error!(error = %e, "event loop failed");
  }
  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    app.poll_tasks().await?;
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
      && key.kind == KeyEventKind::Press
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}
