// Placement Protocol - Pointer-driven authoring of a new body
// Down sets the anchor, drag sets the radius, release then aim sets the velocity

use serde::Serialize;

use crate::config::SimConfig;
use crate::physics_engine::Vec2;

/// A finished placement, ready to be appended to the registry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedBody {
    pub position: Vec2,
    pub radius: f64,
    pub velocity: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Placement {
    #[default]
    Idle,
    PlacingPosition {
        anchor: Vec2,
        radius: f64,
    },
    PlacingVelocity {
        anchor: Vec2,
        radius: f64,
        target: Option<Vec2>,
    },
}

impl Placement {
    pub fn is_idle(&self) -> bool {
        matches!(self, Placement::Idle)
    }

    pub fn pointer_down(&mut self, point: Vec2, config: &SimConfig) {
        if let Placement::Idle = self {
            *self = Placement::PlacingPosition {
                anchor: point,
                radius: config.min_radius,
            };
        }
    }

    pub fn pointer_move(&mut self, point: Vec2, config: &SimConfig) {
        match self {
            Placement::PlacingPosition { anchor, radius } => {
                *radius = config.clamp_radius(point.distance(anchor));
            }
            Placement::PlacingVelocity { target, .. } => {
                *target = Some(point);
            }
            Placement::Idle => {}
        }
    }

    /// Advance on release; returns the body once the velocity phase completes
    pub fn pointer_up(&mut self, config: &SimConfig) -> Option<PlacedBody> {
        match *self {
            Placement::PlacingPosition { anchor, radius } => {
                *self = Placement::PlacingVelocity {
                    anchor,
                    radius,
                    target: None,
                };
                None
            }
            Placement::PlacingVelocity {
                anchor,
                radius,
                target,
            } => {
                *self = Placement::Idle;
                Some(PlacedBody {
                    position: anchor,
                    radius,
                    velocity: launch_velocity(anchor, target, config),
                })
            }
            Placement::Idle => None,
        }
    }

    /// Velocity the pending body would get if released now
    pub fn preview_velocity(&self, config: &SimConfig) -> Option<Vec2> {
        match *self {
            Placement::PlacingVelocity { anchor, target, .. } => {
                Some(launch_velocity(anchor, target, config))
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        *self = Placement::Idle;
    }
}

fn launch_velocity(anchor: Vec2, target: Option<Vec2>, config: &SimConfig) -> Vec2 {
    match target {
        Some(release) => release.sub(&anchor).scale(config.velocity_scale),
        None => Vec2::zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_placement_cycle() {
        let config = SimConfig::default();
        let mut placement = Placement::default();

        placement.pointer_down(Vec2::new(100.0, 100.0), &config);
        placement.pointer_move(Vec2::new(130.0, 140.0), &config);
        assert_eq!(
            placement,
            Placement::PlacingPosition {
                anchor: Vec2::new(100.0, 100.0),
                radius: 50.0
            }
        );

        assert!(placement.pointer_up(&config).is_none());
        placement.pointer_move(Vec2::new(200.0, 50.0), &config);
        let body = placement.pointer_up(&config).unwrap();

        assert!(placement.is_idle());
        assert_eq!(body.position, Vec2::new(100.0, 100.0));
        assert_eq!(body.radius, 50.0);
        assert!((body.velocity.x - 3.0).abs() < 1e-12);
        assert!((body.velocity.y + 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_radius_clamped() {
        let config = SimConfig::default();
        let mut placement = Placement::default();
        placement.pointer_down(Vec2::zero(), &config);

        placement.pointer_move(Vec2::new(500.0, 0.0), &config);
        assert!(matches!(placement, Placement::PlacingPosition { radius, .. } if radius == 100.0));

        placement.pointer_move(Vec2::new(1.0, 1.0), &config);
        assert!(matches!(placement, Placement::PlacingPosition { radius, .. } if radius == 10.0));
    }

    #[test]
    fn test_release_without_movement_gives_min_radius_and_rest() {
        let config = SimConfig::default();
        let mut placement = Placement::default();
        placement.pointer_down(Vec2::new(10.0, 20.0), &config);
        placement.pointer_up(&config);
        let body = placement.pointer_up(&config).unwrap();

        assert_eq!(body.radius, config.min_radius);
        assert_eq!(body.velocity, Vec2::zero());
    }

    #[test]
    fn test_out_of_phase_events_ignored() {
        let config = SimConfig::default();
        let mut placement = Placement::default();

        placement.pointer_move(Vec2::new(5.0, 5.0), &config);
        assert!(placement.pointer_up(&config).is_none());
        assert!(placement.is_idle());

        placement.pointer_down(Vec2::new(1.0, 1.0), &config);
        placement.pointer_down(Vec2::new(9.0, 9.0), &config);
        assert!(matches!(placement, Placement::PlacingPosition { anchor, .. } if anchor == Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_preview_velocity_only_while_aiming() {
        let config = SimConfig::default();
        let mut placement = Placement::default();
        assert!(placement.preview_velocity(&config).is_none());

        placement.pointer_down(Vec2::zero(), &config);
        placement.pointer_up(&config);
        placement.pointer_move(Vec2::new(100.0, 0.0), &config);
        let v = placement.preview_velocity(&config).unwrap();
        assert!((v.x - 3.0).abs() < 1e-12);
    }
}
