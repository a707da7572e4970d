// particle/types.rs
// The Particle record and its optional attachments

use ultraviolet::Vec2;
use crate::config;
use crate::element::Element;

/// Harmonic tether pulling a particle toward a fixed anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointRestraint {
    pub anchor: Vec2,
    pub k: f32,
}

/// External steering force applied to a single particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteeringField {
    pub direction: Vec2,
    pub intensity: f32,
}

/// A particle is identified by its slot in the `ParticleStore`, so it carries no id.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub element: Element,
    pub pos: Vec2,
    pub vel: Vec2,
    pub charge: f32,
    pub friction: f32,
    pub selected: bool,
    pub marked: bool,
    pub restraint: Option<PointRestraint>,
    pub field: Option<SteeringField>,
}

impl Particle {
    pub fn new(element: Element, pos: Vec2) -> Self {
        Self {
            element,
            pos,
            vel: Vec2::zero(),
            charge: 0.0,
            friction: config::DEFAULT_FRICTION,
            selected: false,
            marked: false,
            restraint: None,
            field: None,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_charge(mut self, charge: f32) -> Self {
        self.charge = charge;
        self
    }

    pub fn mass(&self) -> f32 {
        self.element.mass()
    }

    pub fn sigma(&self) -> f32 {
        self.element.sigma()
    }

    pub fn radius(&self) -> f32 {
        self.element.radius()
    }

    /// True when the two van der Waals discs, shrunk by `factor`, intersect.
    pub fn overlaps_at(&self, pos: Vec2, radius: f32, factor: f32) -> bool {
        let reach = factor * (self.radius() + radius);
        (self.pos - pos).mag_sq() < reach * reach
    }
}
