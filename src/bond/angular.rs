// bond/angular.rs
// Three-particle bends

use ultraviolet::Vec2;

#[derive(Clone, Debug, PartialEq)]
pub struct AngularBond {
    pub a: usize,
    pub b: usize,
    /// The particle at the apex of the angle
    pub vertex: usize,
    /// Equilibrium angle in radians
    pub angle: f32,
    pub strength: f32,
}

impl AngularBond {
    pub fn new(a: usize, b: usize, vertex: usize, angle: f32, strength: f32) -> Self {
        Self { a, b, vertex, angle, strength }
    }

    #[inline]
    pub fn ends(&self) -> [usize; 3] {
        [self.a, self.b, self.vertex]
    }

    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        self.a == i || self.b == i || self.vertex == i
    }

    #[inline]
    pub fn has_arm(&self, i: usize) -> bool {
        self.a == i || self.b == i
    }

    /// Same vertex, arms in either order
    pub fn matches(&self, a: usize, b: usize, vertex: usize) -> bool {
        self.vertex == vertex && ((self.a == a && self.b == b) || (self.a == b && self.b == a))
    }

    pub fn relabeled(&self, a: usize, b: usize, vertex: usize) -> Self {
        Self { a, b, vertex, ..self.clone() }
    }
}

/// Angle at `vertex` between the arms to `a` and `b`, by the law of cosines.
pub fn bend_angle(a: Vec2, b: Vec2, vertex: Vec2) -> f32 {
    let side_a = (a - vertex).mag();
    let side_b = (b - vertex).mag();
    let opposite_sq = (a - b).mag_sq();
    if side_a == 0.0 || side_b == 0.0 {
        return 0.0;
    }
    let cos = (side_a * side_a + side_b * side_b - opposite_sq) / (2.0 * side_a * side_b);
    cos.clamp(-1.0, 1.0).acos()
}
