// obstacle.rs
// Rectangular obstacles with per-element permeability

use ultraviolet::Vec2;

use crate::element::{Element, ElementSet};

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    /// Lower-left corner
    pub min: Vec2,
    pub size: Vec2,
    /// Elements allowed to pass through
    pub permeable: ElementSet,
}

impl Obstacle {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size, permeable: ElementSet::EMPTY }
    }

    pub fn permeable_to(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        for e in elements {
            self.permeable.insert(e);
        }
        self
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }

    /// Disc/rectangle intersection test
    pub fn intersects_disc(&self, center: Vec2, radius: f32) -> bool {
        let closest = center.clamped(self.min, self.max());
        (closest - center).mag_sq() < radius * radius || self.contains_point(center)
    }

    /// Whether a particle of `element` at `pos` would sit inside this obstacle.
    pub fn blocks(&self, element: Element, pos: Vec2, radius: f32) -> bool {
        !self.permeable.contains(element) && self.intersects_disc(pos, radius)
    }

    /// Open-interval box overlap; touching edges do not count.
    pub fn intersects_box(&self, min: Vec2, max: Vec2) -> bool {
        let own_max = self.max();
        self.min.x < max.x && own_max.x > min.x && self.min.y < max.y && own_max.y > min.y
    }

    pub fn intersects(&self, other: &Obstacle) -> bool {
        self.intersects_box(other.min, other.max())
    }

    pub fn is_inside_box(&self, min: Vec2, max: Vec2) -> bool {
        let own_max = self.max();
        self.min.x >= min.x && self.min.y >= min.y && own_max.x <= max.x && own_max.y <= max.y
    }
}
