// Scenario Generators - Canned initial conditions
// Every generator derives its velocities from the same G and mass model the integrator uses

use anyhow::anyhow;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::config::SimConfig;
use crate::physics_engine::Vec2;
use crate::registry::BodySeed;

/// Body colours, also cycled for user-placed bodies
pub const PALETTE: [&str; 8] = [
    "#ffd93d", "#4ecdc4", "#ff6b6b", "#a78bfa", "#6bcb77", "#f97316", "#60a5fa", "#f472b6",
];

/// Moore's figure-eight solution for G = m = 1 (Chenciner & Montgomery, 2000)
pub const FIGURE8_POSITION: (f64, f64) = (0.97000436, -0.24308753);
pub const FIGURE8_VELOCITY: (f64, f64) = (-0.93240737, -0.86473146);

// =============================================================================
// SCENARIO CATALOGUE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScenarioKind {
    OrbitalPair,
    BinarySystem,
    Figure8,
    LagrangeTriangle,
    ChaoticThreeBody,
    Slingshot,
    CollisionCourse,
    MultiPlanet,
    EccentricComet,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 9] = [
        ScenarioKind::OrbitalPair,
        ScenarioKind::BinarySystem,
        ScenarioKind::Figure8,
        ScenarioKind::LagrangeTriangle,
        ScenarioKind::ChaoticThreeBody,
        ScenarioKind::Slingshot,
        ScenarioKind::CollisionCourse,
        ScenarioKind::MultiPlanet,
        ScenarioKind::EccentricComet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::OrbitalPair => "orbitalPair",
            ScenarioKind::BinarySystem => "binarySystem",
            ScenarioKind::Figure8 => "figure8",
            ScenarioKind::LagrangeTriangle => "lagrangeTriangle",
            ScenarioKind::ChaoticThreeBody => "chaoticThreeBody",
            ScenarioKind::Slingshot => "slingshot",
            ScenarioKind::CollisionCourse => "collisionCourse",
            ScenarioKind::MultiPlanet => "multiPlanet",
            ScenarioKind::EccentricComet => "eccentricComet",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScenarioKind::OrbitalPair => "A planet on a circular orbit around a heavy star",
            ScenarioKind::BinarySystem => "Two stars circling their shared barycenter",
            ScenarioKind::Figure8 => "Three equal masses chasing each other along a figure eight",
            ScenarioKind::LagrangeTriangle => "Three bodies rotating as a rigid equilateral triangle",
            ScenarioKind::ChaoticThreeBody => "Randomized three-body start, sensitive to every digit",
            ScenarioKind::Slingshot => "A probe stealing momentum from an orbiting planet",
            ScenarioKind::CollisionCourse => "Two bodies falling straight into each other",
            ScenarioKind::MultiPlanet => "Several planets on circular orbits around one star",
            ScenarioKind::EccentricComet => "A comet on a stretched ellipse, fast at perihelion",
        }
    }

    /// Build the replacement body list. `seed` only affects the chaotic scenario.
    pub fn generate(&self, config: &SimConfig, seed: u64) -> Vec<BodySeed> {
        match self {
            ScenarioKind::OrbitalPair => orbital_pair(config),
            ScenarioKind::BinarySystem => binary_system(config),
            ScenarioKind::Figure8 => figure8(config),
            ScenarioKind::LagrangeTriangle => lagrange_triangle(config),
            ScenarioKind::ChaoticThreeBody => chaotic_three_body(config, seed),
            ScenarioKind::Slingshot => slingshot(config),
            ScenarioKind::CollisionCourse => collision_course(config),
            ScenarioKind::MultiPlanet => multi_planet(config),
            ScenarioKind::EccentricComet => eccentric_comet(config),
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScenarioKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| anyhow!("unknown scenario '{}'", s))
    }
}

// =============================================================================
// ORBITAL FORMULAS
// =============================================================================

/// Speed of a circular orbit at distance `r` around `central_mass`
pub fn circular_speed(config: &SimConfig, central_mass: f64, r: f64) -> f64 {
    (config.gravitational_constant * central_mass / r).sqrt()
}

/// Vis-viva speed at distance `r` on an orbit with semi-major axis `a`
pub fn vis_viva_speed(config: &SimConfig, central_mass: f64, r: f64, a: f64) -> f64 {
    (config.gravitational_constant * central_mass * (2.0 / r - 1.0 / a)).sqrt()
}

/// Body at `angle` around `center`, moving counter-clockwise with `speed`
fn orbiting(center: Vec2, distance: f64, angle: f64, speed: f64, radius: f64, color: &str) -> BodySeed {
    let direction = Vec2::from_angle(angle);
    BodySeed::new(
        center.add(&direction.scale(distance)),
        direction.perpendicular().scale(speed),
        radius,
        color,
    )
}

fn star(center: Vec2, radius: f64) -> BodySeed {
    BodySeed::new(center, Vec2::zero(), radius, PALETTE[0])
}

// =============================================================================
// GENERATORS
// =============================================================================

pub fn orbital_pair(config: &SimConfig) -> Vec<BodySeed> {
    let center = config.canvas_center();
    let central_mass = config.mass_model().mass_of(60.0);
    let distance = 200.0;
    let speed = circular_speed(config, central_mass, distance);

    vec![
        star(center, 60.0),
        orbiting(center, distance, 0.0, speed, 25.0, PALETTE[1]),
    ]
}

pub fn binary_system(config: &SimConfig) -> Vec<BodySeed> {
    let center = config.canvas_center();
    let model = config.mass_model();
    let (radius1, radius2) = (45.0, 38.0);
    let m1 = model.mass_of(radius1);
    let m2 = model.mass_of(radius2);
    let total = m1 + m2;
    let separation = 260.0;

    // m1 * r1 == m2 * r2 keeps the barycenter at the canvas center
    let r1 = separation * m2 / total;
    let r2 = separation * m1 / total;
    let omega = (config.gravitational_constant * total / separation.powi(3)).sqrt();

    vec![
        orbiting(center, r1, 0.0, omega * r1, radius1, PALETTE[0]),
        orbiting(center, r2, PI, omega * r2, radius2, PALETTE[2]),
    ]
}

pub fn figure8(config: &SimConfig) -> Vec<BodySeed> {
    let center = config.canvas_center();
    let radius = 40.0;
    let mass = config.mass_model().mass_of(radius);
    let length = 180.0;
    // Converts the dimensionless solution to canvas units for this G and mass
    let velocity_unit = (config.gravitational_constant * mass / length).sqrt();

    let (px, py) = FIGURE8_POSITION;
    let (vx, vy) = FIGURE8_VELOCITY;
    let outer_velocity = Vec2::new(-vx / 2.0, -vy / 2.0).scale(velocity_unit);

    vec![
        BodySeed::new(
            center.add(&Vec2::new(px, py).scale(length)),
            outer_velocity,
            radius,
            PALETTE[1],
        ),
        BodySeed::new(
            center.add(&Vec2::new(-px, -py).scale(length)),
            outer_velocity,
            radius,
            PALETTE[2],
        ),
        BodySeed::new(
            center,
            Vec2::new(vx, vy).scale(velocity_unit),
            radius,
            PALETTE[3],
        ),
    ]
}

pub fn lagrange_triangle(config: &SimConfig) -> Vec<BodySeed> {
    let center = config.canvas_center();
    let radius = 35.0;
    let mass = config.mass_model().mass_of(radius);
    let side = 240.0;
    let circumradius = side / 3f64.sqrt();
    let omega = (config.gravitational_constant * 3.0 * mass / side.powi(3)).sqrt();

    (0..3)
        .map(|i| {
            let angle = -PI / 2.0 + i as f64 * 2.0 * PI / 3.0;
            orbiting(
                center,
                circumradius,
                angle,
                omega * circumradius,
                radius,
                PALETTE[i + 1],
            )
        })
        .collect()
}

pub fn chaotic_three_body(config: &SimConfig, seed: u64) -> Vec<BodySeed> {
    let center = config.canvas_center();
    let mut rng = StdRng::seed_from_u64(seed);
    let spread = rng.gen_range(100.0..200.0);

    (0..3)
        .map(|i| {
            let angle = i as f64 * 2.0 * PI / 3.0 + rng.gen_range(-0.3..0.3);
            let position = center.add(&Vec2::from_angle(angle).scale(spread));
            let velocity = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            let radius = rng.gen_range(25.0..40.0);
            BodySeed::new(position, velocity, radius, PALETTE[i + 2])
        })
        .collect()
}

pub fn slingshot(config: &SimConfig) -> Vec<BodySeed> {
    let center = config.canvas_center();
    let star_mass = config.mass_model().mass_of(55.0);
    let planet_distance = 220.0;
    let planet_speed = circular_speed(config, star_mass, planet_distance);

    // Probe starts below-left of the planet's path, crossing ahead of it
    let probe_position = center.add(&Vec2::new(-planet_distance, planet_distance * 1.2));
    let probe_velocity = Vec2::new(0.35, -1.0).normalize().scale(planet_speed * 0.9);

    vec![
        star(center, 55.0),
        orbiting(center, planet_distance, -PI / 2.0, planet_speed, 28.0, PALETTE[6]),
        BodySeed::new(probe_position, probe_velocity, 10.0, PALETTE[7]),
    ]
}

pub fn collision_course(config: &SimConfig) -> Vec<BodySeed> {
    let center = config.canvas_center();
    let half_gap = 280.0;
    let speed = 0.8;

    vec![
        BodySeed::new(
            center.sub(&Vec2::new(half_gap, 0.0)),
            Vec2::new(speed, 0.0),
            35.0,
            PALETTE[2],
        ),
        BodySeed::new(
            center.add(&Vec2::new(half_gap, 0.0)),
            Vec2::new(-speed, 0.0),
            35.0,
            PALETTE[6],
        ),
    ]
}

pub fn multi_planet(config: &SimConfig) -> Vec<BodySeed> {
    let center = config.canvas_center();
    let star_mass = config.mass_model().mass_of(60.0);
    let planets = [(110.0, 14.0), (180.0, 18.0), (260.0, 22.0)];

    let mut bodies = vec![star(center, 60.0)];
    for (i, (distance, radius)) in planets.iter().enumerate() {
        let angle = i as f64 * 2.0 * PI / 3.0;
        let speed = circular_speed(config, star_mass, *distance);
        bodies.push(orbiting(center, *distance, angle, speed, *radius, PALETTE[i + 1]));
    }
    bodies
}

pub fn eccentric_comet(config: &SimConfig) -> Vec<BodySeed> {
    let center = config.canvas_center();
    let star_mass = config.mass_model().mass_of(60.0);
    let aphelion = 300.0;
    let eccentricity = 0.6;
    let semi_major = aphelion / (1.0 + eccentricity);
    let speed = vis_viva_speed(config, star_mass, aphelion, semi_major);

    vec![
        star(center, 60.0),
        orbiting(center, aphelion, PI, speed, 12.0, PALETTE[6]),
    ]
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_err(a: f64, b: f64) -> f64 {
        (a - b).abs() / b.abs()
    }

    #[test]
    fn test_every_scenario_has_at_least_two_bodies() {
        let config = SimConfig::default();
        for kind in ScenarioKind::ALL {
            let bodies = kind.generate(&config, 7);
            assert!(bodies.len() >= 2, "{} produced {} bodies", kind, bodies.len());
            assert!(bodies.iter().all(|b| b.radius >= config.min_radius && b.radius <= config.max_radius));
        }
    }

    #[test]
    fn test_names_round_trip() {
        for kind in ScenarioKind::ALL {
            assert_eq!(kind.name().parse::<ScenarioKind>().unwrap(), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
        assert!("warpDrive".parse::<ScenarioKind>().is_err());
    }

    #[test]
    fn test_orbital_pair_circular_speed() {
        let config = SimConfig::default();
        let bodies = orbital_pair(&config);
        let m_central = config.mass_model().mass_of(bodies[0].radius);
        let r = bodies[1].position.distance(&bodies[0].position);

        assert_eq!(bodies[0].velocity, Vec2::zero());
        assert!((r - 200.0).abs() < 1e-9);
        let expected = (config.gravitational_constant * m_central / r).sqrt();
        assert!(rel_err(bodies[1].velocity.magnitude(), expected) < 1e-9);

        // Tangential
        let radial = bodies[1].position.sub(&bodies[0].position);
        assert!(radial.dot(&bodies[1].velocity).abs() < 1e-9);
    }

    #[test]
    fn test_binary_barycenter_balanced() {
        let config = SimConfig::default();
        let model = config.mass_model();
        let bodies = binary_system(&config);
        let center = config.canvas_center();

        let m1 = model.mass_of(bodies[0].radius);
        let m2 = model.mass_of(bodies[1].radius);
        let r1 = bodies[0].position.distance(&center);
        let r2 = bodies[1].position.distance(&center);
        assert!(rel_err(m1 * r1, m2 * r2) < 1e-9);

        let separation = r1 + r2;
        let omega = (config.gravitational_constant * (m1 + m2) / separation.powi(3)).sqrt();
        assert!(rel_err(bodies[0].velocity.magnitude(), omega * r1) < 1e-9);
        assert!(rel_err(bodies[1].velocity.magnitude(), omega * r2) < 1e-9);

        // Zero total momentum keeps the barycenter fixed
        let p = bodies[0].velocity.scale(m1).add(&bodies[1].velocity.scale(m2));
        assert!(p.magnitude() < 1e-9);
    }

    #[test]
    fn test_figure8_uses_literature_constants() {
        let config = SimConfig::default();
        let bodies = figure8(&config);
        assert_eq!(bodies.len(), 3);
        assert!(bodies.iter().all(|b| b.radius == bodies[0].radius));

        let center = config.canvas_center();
        let offset = bodies[0].position.sub(&center);
        assert!(rel_err(offset.y / offset.x, FIGURE8_POSITION.1 / FIGURE8_POSITION.0) < 1e-9);

        // Outer bodies are point-symmetric about the middle one
        let mid = bodies[0].position.add(&bodies[1].position).scale(0.5);
        assert!(mid.distance(&center) < 1e-9);

        // v1 == v2 == -v3 / 2, so total momentum vanishes for equal masses
        let total = bodies
            .iter()
            .fold(Vec2::zero(), |acc, b| acc.add(&b.velocity));
        assert!(total.magnitude() < 1e-9);
        assert!(rel_err(bodies[2].velocity.y / bodies[2].velocity.x, FIGURE8_VELOCITY.1 / FIGURE8_VELOCITY.0) < 1e-9);
    }

    #[test]
    fn test_lagrange_triangle_is_equilateral_and_rotating() {
        let config = SimConfig::default();
        let bodies = lagrange_triangle(&config);
        let center = config.canvas_center();

        let d01 = bodies[0].position.distance(&bodies[1].position);
        let d12 = bodies[1].position.distance(&bodies[2].position);
        let d20 = bodies[2].position.distance(&bodies[0].position);
        assert!(rel_err(d01, 240.0) < 1e-9);
        assert!(rel_err(d12, 240.0) < 1e-9);
        assert!(rel_err(d20, 240.0) < 1e-9);

        let mass = config.mass_model().mass_of(bodies[0].radius);
        let omega = (config.gravitational_constant * 3.0 * mass / 240f64.powi(3)).sqrt();
        for b in &bodies {
            let radial = b.position.sub(&center);
            assert!(radial.dot(&b.velocity).abs() < 1e-9);
            assert!(rel_err(b.velocity.magnitude(), omega * radial.magnitude()) < 1e-9);
        }
    }

    #[test]
    fn test_chaotic_is_seeded() {
        let config = SimConfig::default();
        let a = chaotic_three_body(&config, 42);
        let b = chaotic_three_body(&config, 42);
        let c = chaotic_three_body(&config, 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 3);

        let center = config.canvas_center();
        let spread = a[0].position.distance(&center);
        assert!((100.0..200.0).contains(&spread));
        assert!(a.iter().all(|s| (s.position.distance(&center) - spread).abs() < 1e-9));
    }

    #[test]
    fn test_multi_planet_all_circular() {
        let config = SimConfig::default();
        let bodies = multi_planet(&config);
        let star_mass = config.mass_model().mass_of(bodies[0].radius);
        assert_eq!(bodies.len(), 4);

        for planet in &bodies[1..] {
            let r = planet.position.distance(&bodies[0].position);
            let expected = circular_speed(&config, star_mass, r);
            assert!(rel_err(planet.velocity.magnitude(), expected) < 1e-9);
        }
    }

    #[test]
    fn test_eccentric_comet_matches_vis_viva() {
        let config = SimConfig::default();
        let bodies = eccentric_comet(&config);
        let star_mass = config.mass_model().mass_of(bodies[0].radius);
        let r = bodies[1].position.distance(&bodies[0].position);
        let v = bodies[1].velocity.magnitude();

        // Specific orbital energy gives back the semi-major axis
        let mu = config.gravitational_constant * star_mass;
        let a = 1.0 / (2.0 / r - v * v / mu);
        assert!(rel_err(a, 300.0 / 1.6) < 1e-9);
        assert!(v < circular_speed(&config, star_mass, r));
    }

    #[test]
    fn test_collision_course_head_on() {
        let config = SimConfig::default();
        let bodies = collision_course(&config);
        let gap = bodies[1].position.sub(&bodies[0].position);
        let closing = bodies[0].velocity.sub(&bodies[1].velocity);

        assert!(closing.dot(&gap) > 0.0);
        assert!(gap.perpendicular().dot(&closing).abs() < 1e-12);
        assert!(bodies[0].velocity.add(&bodies[1].velocity).magnitude() < 1e-12);
    }

    #[test]
    fn test_slingshot_planet_circular() {
        let config = SimConfig::default();
        let bodies = slingshot(&config);
        let star_mass = config.mass_model().mass_of(bodies[0].radius);
        let r = bodies[1].position.distance(&bodies[0].position);

        assert_eq!(bodies.len(), 3);
        assert!(rel_err(bodies[1].velocity.magnitude(), circular_speed(&config, star_mass, r)) < 1e-9);
        assert!(bodies[2].radius < bodies[1].radius);
    }
}
