// Event Planner
// Main entry point

use std::sync::Arc;

use anyhow::{Context, Result};

use event_planner::services::calendar_sync::DisconnectedProvider;
use event_planner::services::database::Database;
use event_planner::services::settings::{default_config_path, load_default_config, resolve_database_path};
use event_planner::services::Models;
use event_planner::ui_egui::{Application, PlannerApp};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Event Planner");

    let config = load_default_config()?;
    let db_path = resolve_database_path(&config)?;
    log::info!("Using database at {}", db_path.display());
    let database = Database::new(&db_path.to_string_lossy())?;
    database
        .initialize_schema()
        .context("Failed to prepare the database")?;

    // No calendar backend ships with the app; sign-in and sync report failure.
    let app = Application::new(&config, Models::new(database), Arc::new(DisconnectedProvider))
        .with_config_path(default_config_path());
    let size = app.window().size;
    let min_size = app.view_manager().get_min_size();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.window_title.clone())
            .with_inner_size(size.to_vec2())
            .with_min_inner_size(min_size.to_vec2())
            .with_decorations(false),
        ..Default::default()
    };

    eframe::run_native(
        &config.window_title,
        options,
        Box::new(move |_cc| Ok(Box::new(PlannerApp::new(app)))),
    )
    .map_err(|err| anyhow::anyhow!("Window loop failed: {}", err))
}
