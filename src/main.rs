// Heroes - superhero catalogue client for a REST backend
//
// Browse, search, create, edit and delete heroes held by a remote service.
//
// Architecture:
// - Views: headless list/detail/form view-models, one per page
// - Gateway (reqwest): typed CRUD over `{api_url}/heroes`
// - Request pipeline: every gateway call runs through the loading tracker and
//   the error classifier, which feeds the notification center
// - Demo backend (axum): in-memory implementation of the same REST contract
// - CLI (clap): one subcommand per user-facing action

mod api;
mod app;
mod cli;
mod config;
mod hero;
mod logging;
mod notify;
mod server;
mod tracker;
mod views;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use app::{App, Status};
use cli::{Cli, Commands};
use config::Config;
use server::HeroStore;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Config management runs before anything reads the file
    if let Commands::Config {
        show,
        path,
        reset,
        edit,
    } = cli.command
    {
        cli::handle_config(show, path, reset, edit)?;
        return Ok(ExitCode::SUCCESS);
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let config = Config::load()?;

    // Keep the guard alive so the file appender flushes on exit
    let _log_guard = logging::init(&config.logging);

    match cli.command {
        Commands::Serve { bind, empty } => {
            let store = if empty {
                HeroStore::default()
            } else {
                HeroStore::seeded()
            };
            server::serve(bind.unwrap_or(config.bind_addr), store).await?;
            Ok(ExitCode::SUCCESS)
        }
        command => {
            let api_url = cli.api_url.unwrap_or_else(|| config.api_url.clone());
            let app = App::new(&api_url, &config)?;
            app.spawn_busy_indicator();

            let result = app.execute(command, &mut std::io::stdout().lock()).await;

            // Pending notifications are shown whatever the outcome
            for toast in app.drain_notifications() {
                eprintln!("{}", toast.line());
            }

            result.map(|status: Status| status.into())
        }
    }
}
