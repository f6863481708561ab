mod action;
mod app;
mod auth;
mod catalog;
mod config;
mod error;
mod event;
mod favorites;
mod feed;
mod store;
mod theme;
mod tmdb;
mod tui;
mod types;
mod ui;

use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::event::Event;
use crate::favorites::{FavoritesStore, JsonFavoritesStore, MemoryFavoritesStore};
use crate::feed::{FeedEvent, FeedSettings, MovieFeed};
use crate::store::StateDir;
use crate::tmdb::Tmdb;
use crate::tui::EventHandler;
use crate::types::Filter;

#[derive(Debug, Parser)]
#[command(name = "marquee", version, about = "Browse top rated movies from TMDB")]
struct Cli {
    /// Config file (default: <config dir>/marquee/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pages fetched concurrently per batch
    #[arg(long)]
    batch_size: Option<u32>,

    /// Start on the favorites list
    #[arg(long)]
    favorites: bool,

    /// Log filter, e.g. "marquee=debug" (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

/// Log to <cache dir>/marquee/marquee.log since the terminal belongs to the UI
fn log_writer() -> BoxMakeWriter {
    let file = dirs::cache_dir()
        .map(|d| d.join("marquee"))
        .and_then(|dir| {
            std::fs::create_dir_all(&dir).ok()?;
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("marquee.log"))
                .ok()
        });

    match file {
        Some(file) => BoxMakeWriter::new(std::sync::Mutex::new(file)),
        None => BoxMakeWriter::new(std::io::stderr),
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(log_writer()),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let mut config = Config::load(cli.config.as_deref());
    if let Some(batch_size) = cli.batch_size {
        config.general.batch_size = batch_size.max(1);
    }

    // Resolve the token before touching the terminal so errors print cleanly
    let token = auth::load_token(&config.api)?;
    let tmdb = Tmdb::new(config.api.base_url.clone(), token, config.api.timeout())?;

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(config, tmdb, cli.favorites).await;

    tui::restore()?;

    result
}

async fn run(
    config: Config,
    tmdb: Tmdb,
    start_on_favorites: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let state_dir = StateDir::default_location();
    let favorites_store: Box<dyn FavoritesStore> = match &state_dir {
        Some(dir) => Box::new(JsonFavoritesStore::new(dir.clone())),
        None => {
            tracing::warn!("no data directory, favorites will not be saved");
            Box::new(MemoryFavoritesStore::default())
        }
    };

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (feed_tx, mut feed_rx) = mpsc::unbounded_channel::<FeedEvent>();

    let feed = MovieFeed::new(
        Arc::new(tmdb),
        favorites_store,
        FeedSettings {
            batch_size: config.general.batch_size,
            lookahead: config.general.lookahead,
        },
        feed_tx,
    );

    let mut app = App::new(feed, &config.general, state_dir, action_tx.clone());
    if start_on_favorites {
        app.filter = Filter::Favorites;
    }
    tracing::info!(catalog = app.feed.catalog().name(), "starting");

    let mut terminal = tui::init()?;

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    action_tx.send(Action::FetchInitial)?;

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(feed_event) = feed_rx.recv() => {
                app.update(Action::Feed(feed_event));
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
