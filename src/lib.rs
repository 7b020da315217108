// Three Body Problem - Interactive N-Body Gravity Sandbox
// Library core, plus the Tauri entry point when built with the `desktop` feature

pub mod config;
pub mod physics_engine;
pub mod placement;
pub mod registry;
pub mod scenarios;
pub mod state_manager;

#[cfg(feature = "desktop")]
mod commands;

pub use config::SimConfig;
pub use physics_engine::{Body, Integrator, MassModel, Vec2};
pub use placement::Placement;
pub use scenarios::ScenarioKind;
pub use state_manager::{start_simulation_loop, AppState, FrontendState, Simulation};

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::time::Duration;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimConfig::load().unwrap_or_else(|err| {
        log::warn!("falling back to default config: {:#}", err);
        SimConfig::default()
    });
    let frame_interval = Duration::from_millis(config.frame_interval_ms);
    let app_state = AppState::new(config);

    // Start background frame loop
    let sim_state = app_state.simulation.clone();
    let is_running = app_state.is_running.clone();
    *is_running.write() = true;
    start_simulation_loop(sim_state, is_running, frame_interval);

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(app_state)
        .invoke_handler(tauri::generate_handler![
            commands::get_snapshot,
            commands::place_body_pointer_down,
            commands::place_body_pointer_move,
            commands::place_body_pointer_up,
            commands::run_scenario,
            commands::list_scenarios,
            commands::set_running,
            commands::reset,
            commands::set_simulation_speed,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
