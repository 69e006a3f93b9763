mod core;
mod infra;

use crate::core::app::App;
use crate::core::registry::Registry;
use crate::core::models::Category;
use crate::infra::json_store::{JsonFileStore, StorePaths};
use crate::infra::terminal::TerminalInput;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() {
    // A missing .env is fine; real deployments set the env vars directly.
    let _ = dotenvy::dotenv();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trove=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    let args: Vec<String> = std::env::args().collect();
    let cli_mode = args.iter().any(|a| a == "--cli");

    if cli_mode {
        run_cli();
    } else {
        run_web();
    }
}

/// Open the JSON-backed catalog. Files live under DATA_DIR (default `data/`);
/// MOVIES_FILE, GAMES_FILE and BOOKS_FILE override individual paths.
fn open_registry() -> Registry<JsonFileStore> {
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".into());
    let file_for = |var: &str, category: Category| -> PathBuf {
        std::env::var(var)
            .map(PathBuf::from)
            .unwrap_or_else(|_| Path::new(&data_dir).join(category.file_name()))
    };
    let paths = StorePaths::new(
        file_for("MOVIES_FILE", Category::Movies),
        file_for("GAMES_FILE", Category::Games),
        file_for("BOOKS_FILE", Category::Books),
    );
    let store = JsonFileStore::with_paths(paths).expect("Failed to open data files");
    let registry = Registry::open(store).expect("Failed to load catalog");

    let report = registry.load_report();
    if !report.is_clean() {
        warn!(
            skipped = report.skipped.len(),
            "malformed records skipped during load"
        );
    }
    registry
}

/// Interactive terminal mode, kept as emergency / power-user access.
fn run_cli() {
    let registry = open_registry();
    let mut app = App::new(registry, TerminalInput);
    app.run();
}

/// Web server mode — default. Serves the REST API and the cover proxy.
fn run_web() {
    // The blocking cover client must exist before block_on: it owns a
    // runtime of its own and panics when built inside another one.
    let covers = infra::web::build_cover_fetcher();

    let registry = open_registry();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    let rt = tokio::runtime::Runtime::new().expect("Failed to create async runtime");
    rt.block_on(infra::web::start_server(registry, port, covers));
}
