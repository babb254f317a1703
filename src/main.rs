mod action;
mod app;
mod client;
mod config;
mod countdown;
mod error;
mod event;
mod pagination;
mod query;
mod tui;
mod types;
mod ui;

use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::{Action, Tab};
use crate::app::App;
use crate::client::ArtClient;
use crate::config::Config;
use crate::event::Event;
use crate::tui::EventHandler;

#[derive(Debug, Parser)]
#[command(name = "atrium", version, about = "Browse museum exhibitions and artworks")]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the collection API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Tab to open on start: exhibitions or artworks
    #[arg(long, default_value = "exhibitions")]
    tab: Tab,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref());
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    let client = ArtClient::new(&config.api)?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    // Run the application
    let result = run(client, config, cli.tab).await;

    // Restore terminal
    tui::restore()?;

    result
}

async fn run(client: ArtClient, config: Config, tab: Tab) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize terminal
    let mut terminal = tui::init()?;

    // Create action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Create app state
    let mut app = App::new(Arc::new(client), &config, tab, action_tx.clone());
    let size = terminal.size()?;
    app.update(Action::Resize(size.height));

    // Create event handler
    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    // Main loop
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
