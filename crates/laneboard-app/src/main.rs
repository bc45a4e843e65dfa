//! Main application entry point (native).

mod report;

use clap::Parser;
use laneboard_core::{BoardPersistence, FileStorage, FilterContext, StorageResult};
use std::process::ExitCode;
use std::sync::Arc;

/// Project opened when none is given.
const DEFAULT_PROJECT: &str = "BIOGEMSE";

#[derive(Parser, Debug, Default, PartialEq)]
#[command(name = "laneboard", about = "Print a summary of a stored kanban board")]
struct Options {
    /// Project whose board is opened [default: BIOGEMSE]
    project: Option<String>,
    /// Only show tasks matching this text
    #[arg(long, default_value = "")]
    search: String,
    /// Saved view to apply
    #[arg(long)]
    view: Option<String>,
    /// Participant id matched by the "me" filter
    #[arg(long)]
    user: Option<String>,
    /// Drop the stored board before loading
    #[arg(long)]
    reset: bool,
}

fn run(options: Options) -> StorageResult<()> {
    let project = options.project.as_deref().unwrap_or(DEFAULT_PROJECT);
    let storage = FileStorage::default_location()?;
    log::info!("Using storage at {}", storage.base_path().display());
    let persistence = BoardPersistence::new(Arc::new(storage));

    if options.reset {
        persistence.clear(project)?;
        log::info!("Cleared stored board {}", project);
    }

    let loaded = persistence.load(project);
    if !loaded.defaulted.is_empty() {
        // First run or unreadable slices: write the defaults back.
        persistence.save_all(&loaded.board)?;
    }

    let ctx = FilterContext {
        current_user: options.user.unwrap_or_default(),
        today: None,
    };
    let view = options.view.as_deref().and_then(|id| {
        let view = loaded.board.view(id);
        if view.is_none() {
            log::warn!("Unknown view {}, showing all tasks", id);
        }
        view
    });
    print!("{}", report::render(&loaded.board, &options.search, view, &ctx));
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Laneboard");

    let options = Options::parse();
    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
