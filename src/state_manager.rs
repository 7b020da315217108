// State Manager - Simulation session and thread-safe state handling
// Owns the registry, placement and run flag, and drives ticks from the frame loop

use log::{debug, info, warn};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::SimConfig;
use crate::physics_engine::{barycenter, calculate_total_energy, Body, Integrator, Vec2};
use crate::placement::Placement;
use crate::registry::{BodyRegistry, BodySeed};
use crate::scenarios::{ScenarioKind, PALETTE};

// =============================================================================
// SIMULATION SESSION
// =============================================================================

/// One sandbox session, from component mount to unmount.
///
/// Exactly one writer role is active at a time: the integrator while
/// `running`, otherwise placement and scenario loading.
pub struct Simulation {
    config: SimConfig,
    integrator: Integrator,
    registry: BodyRegistry,
    placement: Placement,
    running: bool,
    speed: f64,
    tick: u64,
    time: f64,
    initial_energy: f64,
    total_energy: f64,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            integrator: Integrator::new(&config),
            config,
            registry: BodyRegistry::new(),
            placement: Placement::Idle,
            running: false,
            speed: 1.0,
            tick: 0,
            time: 0.0,
            initial_energy: 0.0,
            total_energy: 0.0,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn simulation_speed(&self) -> f64 {
        self.speed
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn bodies(&self) -> &[Body] {
        self.registry.bodies()
    }

    /// Ordered copy of every body as of the last completed tick
    pub fn snapshot(&self) -> Vec<Body> {
        self.registry.bodies().to_vec()
    }

    pub fn time_step(&self) -> f64 {
        self.config.base_time_step * self.speed
    }

    // -------------------------------------------------------------------------
    // Placement
    // -------------------------------------------------------------------------

    pub fn place_body_pointer_down(&mut self, point: Vec2) {
        if self.running {
            return;
        }
        self.placement.pointer_down(point, &self.config);
        debug!("placement: {:?}", self.placement);
    }

    pub fn place_body_pointer_move(&mut self, point: Vec2) {
        if self.running {
            return;
        }
        self.placement.pointer_move(point, &self.config);
    }

    /// Returns the id of the new body when the release completes a placement
    pub fn place_body_pointer_up(&mut self) -> Option<u64> {
        if self.running {
            return None;
        }
        let Some(placed) = self.placement.pointer_up(&self.config) else {
            debug!("placement: {:?}", self.placement);
            return None;
        };

        let color = PALETTE[self.registry.len() % PALETTE.len()];
        let id = self.registry.append(
            BodySeed::new(placed.position, placed.velocity, placed.radius, color),
            &self.config.mass_model(),
        );
        debug!(
            "placed body {} at ({:.1}, {:.1}) radius {:.1}",
            id, placed.position.x, placed.position.y, placed.radius
        );
        Some(id)
    }

    // -------------------------------------------------------------------------
    // Session commands
    // -------------------------------------------------------------------------

    pub fn run_scenario(&mut self, kind: ScenarioKind) {
        self.run_scenario_with_seed(kind, rand::random());
    }

    pub fn run_scenario_with_seed(&mut self, kind: ScenarioKind, seed: u64) {
        let seeds = kind.generate(&self.config, seed);
        self.registry.replace(seeds, &self.config.mass_model());
        self.running = false;
        self.placement.cancel();
        self.reset_clock();
        info!("loaded scenario {} ({} bodies)", kind, self.registry.len());
    }

    /// Start or stop the integrator. Starting needs at least two bodies.
    pub fn set_running(&mut self, running: bool) -> bool {
        if running && self.registry.len() < 2 {
            debug!("ignoring run request with {} bodies", self.registry.len());
            return self.running;
        }
        if running && !self.running {
            self.placement.cancel();
            self.initial_energy = calculate_total_energy(self.registry.bodies(), &self.config);
            self.total_energy = self.initial_energy;
            info!("simulation started with {} bodies", self.registry.len());
        } else if !running && self.running {
            info!("simulation paused at tick {}", self.tick);
        }
        self.running = running;
        self.running
    }

    pub fn reset(&mut self) {
        self.registry.clear();
        self.running = false;
        self.placement.cancel();
        self.reset_clock();
        info!("simulation reset");
    }

    /// Clamp into the configured range and return the value in effect
    pub fn set_simulation_speed(&mut self, multiplier: f64) -> f64 {
        self.speed = self.config.clamp_speed(multiplier);
        self.speed
    }

    fn reset_clock(&mut self) {
        self.tick = 0;
        self.time = 0.0;
        self.initial_energy = 0.0;
        self.total_energy = 0.0;
    }

    // -------------------------------------------------------------------------
    // Frame tick
    // -------------------------------------------------------------------------

    /// Advance one step if running. Returns whether a step was taken.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        if self.registry.len() < 2 {
            self.running = false;
            return false;
        }

        let dt = self.time_step();
        if let Err(err) = self.integrator.step(self.registry.bodies_mut(), dt) {
            warn!("stopping run at tick {}: {:#}", self.tick, err);
            self.running = false;
            return false;
        }

        self.tick += 1;
        self.time += dt;
        self.total_energy = calculate_total_energy(self.registry.bodies(), &self.config);
        true
    }

    pub fn energy_drift(&self) -> f64 {
        if self.initial_energy.abs() > 1e-20 {
            (self.total_energy - self.initial_energy).abs() / self.initial_energy.abs()
        } else {
            0.0
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

// =============================================================================
// GLOBAL STATE
// =============================================================================

pub struct AppState {
    pub simulation: Arc<RwLock<Simulation>>,
    pub is_running: Arc<RwLock<bool>>,
}

impl AppState {
    pub fn new(config: SimConfig) -> Self {
        Self {
            simulation: Arc::new(RwLock::new(Simulation::new(config))),
            is_running: Arc::new(RwLock::new(false)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

// =============================================================================
// SIMULATION LOOP (runs in background thread)
// =============================================================================

/// Drive one tick per frame until `is_running` goes false.
///
/// The write lock is held for the whole tick, so snapshot readers never see
/// a partially updated body list.
pub fn start_simulation_loop(
    state: Arc<RwLock<Simulation>>,
    is_running: Arc<RwLock<bool>>,
    frame_interval: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || loop {
        let start = Instant::now();

        if !*is_running.read() {
            break;
        }

        state.write().tick();

        let elapsed = start.elapsed();
        if elapsed < frame_interval {
            thread::sleep(frame_interval - elapsed);
        }
    })
}

// =============================================================================
// SERIALIZABLE STATE FOR FRONTEND
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct FrontendBody {
    pub id: u64,
    pub position: [f64; 2],
    pub velocity: [f64; 2],
    pub mass: f64,
    pub radius: f64,
    pub color: String,
    pub trail: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrontendState {
    pub bodies: Vec<FrontendBody>,
    pub running: bool,
    pub simulation_speed: f64,
    pub tick: u64,
    pub time: f64,
    pub energy_drift: f64,
    pub body_count: usize,
    pub barycenter: Option<[f64; 2]>,
    pub placement: Placement,
    /// Velocity the pending body would launch with, while aiming
    pub launch_velocity: Option<[f64; 2]>,
}

impl From<&Body> for FrontendBody {
    fn from(b: &Body) -> Self {
        FrontendBody {
            id: b.id,
            position: [b.position.x, b.position.y],
            velocity: [b.velocity.x, b.velocity.y],
            mass: b.mass(),
            radius: b.visual_radius,
            color: b.color.clone(),
            trail: b.trail.iter().map(|p| [p.x, p.y]).collect(),
        }
    }
}

impl Simulation {
    pub fn to_frontend(&self) -> FrontendState {
        FrontendState {
            bodies: self.registry.bodies().iter().map(FrontendBody::from).collect(),
            running: self.running,
            simulation_speed: self.speed,
            tick: self.tick,
            time: self.time,
            energy_drift: self.energy_drift(),
            body_count: self.registry.len(),
            barycenter: (!self.registry.is_empty()).then(|| {
                let c = barycenter(self.registry.bodies());
                [c.x, c.y]
            }),
            placement: self.placement,
            launch_velocity: self
                .placement
                .preview_velocity(&self.config)
                .map(|v| [v.x, v.y]),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
