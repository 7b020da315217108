// Body Registry - The set of simulated bodies for one session
// Owns the id counter so ids stay unique regardless of clock resolution

use crate::physics_engine::{Body, MassModel, Vec2};

/// Initial conditions for a body before it is given an id and a mass
#[derive(Debug, Clone, PartialEq)]
pub struct BodySeed {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f64,
    pub color: String,
}

impl BodySeed {
    pub fn new(position: Vec2, velocity: Vec2, radius: f64, color: &str) -> Self {
        Self {
            position,
            velocity,
            radius,
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    bodies: Vec<Body>,
    next_id: u64,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn spawn(&mut self, seed: BodySeed, mass_model: &MassModel) -> Body {
        let id = self.allocate_id();
        Body::new(
            id,
            seed.position,
            seed.velocity,
            seed.radius,
            seed.color,
            mass_model,
        )
    }

    /// Add one body, returning its freshly allocated id
    pub fn append(&mut self, seed: BodySeed, mass_model: &MassModel) -> u64 {
        let body = self.spawn(seed, mass_model);
        let id = body.id;
        self.bodies.push(body);
        id
    }

    /// Replace every body with a new batch
    pub fn replace(&mut self, seeds: Vec<BodySeed>, mass_model: &MassModel) {
        self.bodies.clear();
        for seed in seeds {
            let body = self.spawn(seed, mass_model);
            self.bodies.push(body);
        }
    }

    /// Remove every body. Ids keep counting up, so none are ever handed out twice.
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn get(&self, id: u64) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }
}
