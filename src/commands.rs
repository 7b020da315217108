// Tauri Commands - Bridge between the canvas frontend and the simulation session

use serde::Serialize;
use tauri::State;

use crate::physics_engine::Vec2;
use crate::scenarios::ScenarioKind;
use crate::state_manager::{AppState, FrontendState};

#[tauri::command]
pub fn get_snapshot(state: State<AppState>) -> FrontendState {
    state.simulation.read().to_frontend()
}

#[tauri::command]
pub fn place_body_pointer_down(state: State<AppState>, x: f64, y: f64) {
    state
        .simulation
        .write()
        .place_body_pointer_down(Vec2::new(x, y));
}

#[tauri::command]
pub fn place_body_pointer_move(state: State<AppState>, x: f64, y: f64) {
    state
        .simulation
        .write()
        .place_body_pointer_move(Vec2::new(x, y));
}

/// Returns the new body's id once a placement completes
#[tauri::command]
pub fn place_body_pointer_up(state: State<AppState>) -> Option<u64> {
    state.simulation.write().place_body_pointer_up()
}

#[tauri::command]
pub fn run_scenario(state: State<AppState>, name: String) -> Result<(), String> {
    let kind: ScenarioKind = name.parse().map_err(|e: anyhow::Error| e.to_string())?;
    state.simulation.write().run_scenario(kind);
    Ok(())
}

#[derive(Serialize)]
pub struct ScenarioInfo {
    pub name: &'static str,
    pub description: &'static str,
}

#[tauri::command]
pub fn list_scenarios() -> Vec<ScenarioInfo> {
    ScenarioKind::ALL
        .iter()
        .map(|kind| ScenarioInfo {
            name: kind.name(),
            description: kind.description(),
        })
        .collect()
}

/// Returns whether the integrator is running after the request
#[tauri::command]
pub fn set_running(state: State<AppState>, running: bool) -> bool {
    state.simulation.write().set_running(running)
}

#[tauri::command]
pub fn reset(state: State<AppState>) {
    state.simulation.write().reset();
}

/// Returns the multiplier in effect after clamping
#[tauri::command]
pub fn set_simulation_speed(state: State<AppState>, multiplier: f64) -> f64 {
    state.simulation.write().set_simulation_speed(multiplier)
}
