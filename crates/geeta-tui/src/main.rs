use std::io;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use geeta_core::Library;

mod app;
mod cli;
mod content;
mod focus;
mod handler;
mod logging;
mod overlay;
mod selection;
mod theme;
mod ticker;
mod tui;
mod ui;

#[cfg(test)]
mod testing;

use app::App;
use cli::Cli;
use tui::{EventHandler, Tui};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.wants_reader() {
        logging::init_stderr()?;
        return cli::run(&cli, &mut io::stdout().lock());
    }

    logging::init_file()?;

    let data_dir = cli.data_dir();
    let library = Library::load_dir(&data_dir)
        .with_context(|| format!("failed to load chapters from {}", data_dir.display()))?;
    log::info!(
        "loaded {} chapters from {}",
        library.chapters().len(),
        data_dir.display()
    );

    let config = cli.config_file()?;
    log::info!("config file: {}", config.path().display());
    let app = App::new(library, Box::new(config.clone()), Box::new(config));

    run_reader(app).await
}

async fn run_reader(mut app: App) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = event_loop(&mut terminal, &mut app).await;

    app.shutdown();
    tui::restore()?;

    if let Err(e) = &result {
        log::error!("reader stopped: {e:#}");
    }
    result
}

async fn event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        let deadline = app.ticker.deadline();
        tokio::select! {
            event = events.next() => match event {
                Some(event) => handler::handle_event(app, event),
                None => break,
            },
            _ = wait_until(deadline) => {
                app.on_timer(Instant::now());
            }
        }
    }

    Ok(())
}

/// Resolves at `deadline`, or never when there is none.
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(due) => tokio::time::sleep_until(tokio::time::Instant::from_std(due)).await,
        None => std::future::pending().await,
    }
}
