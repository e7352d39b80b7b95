mod app;
mod browse;
mod error_mapping;
mod render;
mod service;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use jma_core::{AppError, Config, ConfigError};

use app::App;
use browse::{resolve_selection, Selection};

#[derive(Debug, Parser)]
#[command(name = "jma-weather", version, about = "Japan Meteorological Agency forecasts")]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List forecast regions
    Areas,

    /// Fetch and show the forecast for one area code
    Forecast {
        area_code: String,

        /// One line per row instead of cards
        #[arg(long)]
        summary: bool,

        /// Print the projected rows as JSON
        #[arg(long, conflicts_with = "summary")]
        json: bool,

        /// Do not save the forecast to the local database
        #[arg(long)]
        no_store: bool,
    },

    /// Pick areas interactively from the catalog
    Browse {
        #[arg(long)]
        summary: bool,

        #[arg(long)]
        no_store: bool,
    },

    /// Show stored forecasts for an area code, or the stored areas without one
    History { area_code: Option<String> },
}

fn main() -> ExitCode {
    if let Err(e) = jma_core::init() {
        eprintln!("Failed to initialize logging: {:#}", e);
    }

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("エラー: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let (config, _) = Config::load_validated(cli.config.as_deref())
        .map_err(|e| AppError::Config(ConfigError::Invalid(format!("{:#}", e))))?;
    tracing::info!("Config directory: {}", config.config_dir.display());

    let app = App::new(config)?;

    match cli.command {
        Command::Areas => {
            let (catalog, err) = app.load_catalog();
            if let Some(e) = err {
                report(&e);
            }
            print!("{}", render::render_catalog(&catalog));
            Ok(())
        }
        Command::Forecast {
            area_code,
            summary,
            json,
            no_store,
        } => {
            let rows = app.fetch_rows(&area_code)?;
            if json {
                let out = render::render_json(&rows).map_err(anyhow::Error::from)?;
                println!("{}", out);
            } else {
                show(&rows, summary);
            }
            if !no_store {
                save(&app, &area_code, &rows)?;
            }
            Ok(())
        }
        Command::Browse { summary, no_store } => browse(&app, summary, no_store),
        Command::History {
            area_code: Some(area_code),
        } => {
            let stored = app.history(&area_code)?;
            print!("{}", render::render_history(&stored));
            Ok(())
        }
        Command::History { area_code: None } => {
            let (areas, count) = app.stored_areas()?;
            print!("{}", render::render_stored_areas(&areas, count));
            Ok(())
        }
    }
}

fn show(rows: &[jma_forecast::NormalizedForecastRow], summary: bool) {
    if summary {
        print!("{}", render::render_summary(rows));
    } else {
        print!("{}", render::render_cards(rows));
    }
}

fn save(app: &App, area_code: &str, rows: &[jma_forecast::NormalizedForecastRow]) -> Result<(), AppError> {
    let written = app.persist(area_code, rows)?;
    if written > 0 {
        tracing::info!("Saved {} rows to {}", written, app.config().database_path().display());
    }
    Ok(())
}

/// Print a non-fatal error and keep going.
fn report(e: &AppError) {
    tracing::warn!("{}", e);
    eprintln!("エラー: {}", e.user_message());
}

fn browse(app: &App, summary: bool, no_store: bool) -> Result<(), AppError> {
    let (catalog, err) = app.load_catalog();
    if let Some(e) = err {
        report(&e);
    }
    let choices = catalog.choices();
    print!("{}", render::render_catalog(&catalog));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("番号または地域コード (q で終了): ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let area_code = match resolve_selection(&line?, &choices) {
            Selection::Quit => break,
            Selection::Area(code) => code,
            Selection::Invalid(input) => {
                eprintln!("不明な選択です: {}", input);
                continue;
            }
        };

        // One fetch at a time; input resumes once the result is rendered.
        app.request_fetch(&area_code);
        match app.wait_fetch(&area_code) {
            Ok(rows) => {
                show(&rows, summary);
                if !no_store {
                    if let Err(e) = save(app, &area_code, &rows) {
                        report(&e);
                    }
                }
            }
            Err(e) => report(&e),
        }
    }
    Ok(())
}
