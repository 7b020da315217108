// Physics Engine - Planar N-Body Gravity
// Implements the mass model, softened pairwise gravity and the semi-implicit Euler step

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::SimConfig;

// =============================================================================
// DEFAULT CONSTANTS (simulation-plane units)
// =============================================================================

/// Gravitational constant shared by every generator and the integrator
pub const G: f64 = 0.5;

/// Added to squared distance so close passes never blow up the force
pub const SOFTENING: f64 = 500.0;

/// Simulated time advanced per tick at 1x speed
pub const BASE_TIME_STEP: f64 = 1.0;

/// Maximum number of past positions kept per body
pub const N_TRAIL: usize = 150;

/// Mass model: mass = MASS_BASE^radius * MASS_SCALE
pub const MASS_BASE: f64 = 1.15;
pub const MASS_SCALE: f64 = 0.5;

// =============================================================================
// 2D VECTOR MATHEMATICS
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Unit vector at `angle` radians from +x
    pub fn from_angle(angle: f64) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 1e-15 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    pub fn dot(&self, other: &Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Rotated 90 degrees counter-clockwise
    pub fn perpendicular(&self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    pub fn scale(&self, s: f64) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
        }
    }

    pub fn add(&self, other: &Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub fn sub(&self, other: &Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    pub fn distance(&self, other: &Vec2) -> f64 {
        self.sub(other).magnitude()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// =============================================================================
// MASS MODEL
// =============================================================================

/// Exponential radius-to-mass law.
///
/// Small changes in visual size give large changes in mass, which is what
/// lets the user feel how strongly gravity scales. Positive and strictly
/// increasing as long as `base > 1` and `scale > 0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MassModel {
    pub base: f64,
    pub scale: f64,
}

impl MassModel {
    pub fn new(base: f64, scale: f64) -> Self {
        Self { base, scale }
    }

    pub fn mass_of(&self, radius: f64) -> f64 {
        self.base.powf(radius) * self.scale
    }
}

impl Default for MassModel {
    fn default() -> Self {
        Self::new(MASS_BASE, MASS_SCALE)
    }
}

// =============================================================================
// BODY
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: u64,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Derived from `visual_radius`; only `Body::new` sets it
    mass: f64,
    pub visual_radius: f64,
    pub color: String,
    /// Oldest first
    pub trail: VecDeque<Vec2>,
}

impl Body {
    pub fn new(
        id: u64,
        position: Vec2,
        velocity: Vec2,
        visual_radius: f64,
        color: impl Into<String>,
        mass_model: &MassModel,
    ) -> Self {
        Self {
            id,
            position,
            velocity,
            mass: mass_model.mass_of(visual_radius),
            visual_radius,
            color: color.into(),
            trail: VecDeque::new(),
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Append a past position, dropping the oldest entries beyond `max_len`
    pub fn record_trail(&mut self, point: Vec2, max_len: usize) {
        self.trail.push_back(point);
        while self.trail.len() > max_len {
            self.trail.pop_front();
        }
    }
}

/// Mass-weighted center of a set of bodies
pub fn barycenter(bodies: &[Body]) -> Vec2 {
    let total: f64 = bodies.iter().map(|b| b.mass).sum();
    if total <= 0.0 {
        return Vec2::zero();
    }
    bodies
        .iter()
        .fold(Vec2::zero(), |acc, b| acc.add(&b.position.scale(b.mass)))
        .scale(1.0 / total)
}

// =============================================================================
// SEMI-IMPLICIT EULER INTEGRATOR
// =============================================================================

/// Explicit pairwise Newtonian gravity with a softened distance.
///
/// Velocities for the whole tick are updated before any position moves, and
/// positions then advance with the new velocities. Energy drifts slightly;
/// orbits stay visually stable.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    pub gravitational_constant: f64,
    pub softening: f64,
    pub trail_length: usize,
}

impl Integrator {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            gravitational_constant: config.gravitational_constant,
            softening: config.softening,
            trail_length: config.trail_length,
        }
    }

    /// Net softened gravitational force on every body
    pub fn net_forces(&self, bodies: &[Body]) -> Vec<Vec2> {
        let n = bodies.len();
        let mut forces = vec![Vec2::zero(); n];

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let delta = bodies[j].position.sub(&bodies[i].position);
                let dist_squared = delta.dot(&delta) + self.softening;
                let dist = dist_squared.sqrt();
                let force_mag =
                    self.gravitational_constant * bodies[i].mass * bodies[j].mass / dist_squared;
                forces[i] = forces[i].add(&delta.scale(force_mag / dist));
            }
        }

        forces
    }

    /// Advance all bodies by `dt`.
    ///
    /// The next state is staged first and only committed when every
    /// position and velocity is finite; on error the bodies are untouched.
    pub fn step(&self, bodies: &mut [Body], dt: f64) -> anyhow::Result<()> {
        if bodies.len() < 2 {
            return Ok(());
        }

        let forces = self.net_forces(bodies);

        let velocities: Vec<Vec2> = bodies
            .iter()
            .zip(forces.iter())
            .map(|(b, f)| b.velocity.add(&f.scale(dt / b.mass)))
            .collect();

        let positions: Vec<Vec2> = bodies
            .iter()
            .zip(velocities.iter())
            .map(|(b, v)| b.position.add(&v.scale(dt)))
            .collect();

        for ((body, v), p) in bodies.iter().zip(velocities.iter()).zip(positions.iter()) {
            if !v.is_finite() || !p.is_finite() {
                bail!("body {} reached a non-finite state", body.id);
            }
        }

        for ((body, v), p) in bodies.iter_mut().zip(velocities).zip(positions) {
            let previous = body.position;
            body.record_trail(previous, self.trail_length);
            body.velocity = v;
            body.position = p;
        }

        Ok(())
    }
}

// =============================================================================
// ENERGY CALCULATIONS (for drift monitoring)
// =============================================================================

/// Kinetic plus softened potential energy, consistent with the integrator's force law
pub fn calculate_total_energy(bodies: &[Body], config: &SimConfig) -> f64 {
    let mut kinetic = 0.0;
    let mut potential = 0.0;

    for body in bodies {
        let v = body.velocity.magnitude();
        kinetic += 0.5 * body.mass * v * v;
    }

    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let r_vec = bodies[i].position.sub(&bodies[j].position);
            let dist = (r_vec.dot(&r_vec) + config.softening).sqrt();
            potential -= config.gravitational_constant * bodies[i].mass * bodies[j].mass / dist;
        }
    }

    kinetic + potential
}

// =============================================================================
// TESTS
// =============================================================================
