// boundary.rs
// Simulation box geometry and wrap mode

use serde::{Deserialize, Serialize};
use ultraviolet::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BoundaryMode {
    Reflecting,
    Periodic,
    /// Periodic with a sliding top/bottom: images across y are shifted by `shear` in x.
    LeesEdwards { shear: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boundary {
    pub origin: Vec2,
    pub size: Vec2,
    pub mode: BoundaryMode,
}

impl Boundary {
    pub fn new(origin: Vec2, size: Vec2, mode: BoundaryMode) -> Self {
        Self { origin, size, mode }
    }

    pub fn reflecting(width: f32, height: f32) -> Self {
        Self::new(Vec2::zero(), Vec2::new(width, height), BoundaryMode::Reflecting)
    }

    pub fn periodic(width: f32, height: f32) -> Self {
        Self::new(Vec2::zero(), Vec2::new(width, height), BoundaryMode::Periodic)
    }

    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    pub fn is_periodic(&self) -> bool {
        !matches!(self.mode, BoundaryMode::Reflecting)
    }

    pub fn shear(&self) -> f32 {
        match self.mode {
            BoundaryMode::LeesEdwards { shear } => shear,
            _ => 0.0,
        }
    }

    /// Reflecting walls need the whole disc inside; periodic boxes only the centre.
    pub fn contains(&self, pos: Vec2, radius: f32) -> bool {
        let margin = if self.is_periodic() { 0.0 } else { radius };
        let min = self.origin + Vec2::broadcast(margin);
        let max = self.max() - Vec2::broadcast(margin);
        pos.x >= min.x && pos.x <= max.x && pos.y >= min.y && pos.y <= max.y
    }

    pub fn contains_box(&self, min: Vec2, max: Vec2) -> bool {
        let own_max = self.max();
        min.x >= self.origin.x && min.y >= self.origin.y && max.x <= own_max.x && max.y <= own_max.y
    }

    /// Translation applied to an image that is `nx`, `ny` periods away.
    pub fn image_shift(&self, nx: i32, ny: i32) -> Vec2 {
        Vec2::new(
            nx as f32 * self.size.x + ny as f32 * self.shear(),
            ny as f32 * self.size.y,
        )
    }
}
