// bond/radial.rs
// Two-particle bonds and their drawing/driving parameters

use palette::Srgb;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BondStyle {
    #[default]
    StandardStick,
    LongSpring,
    ShortSpring,
    SolidLine,
    UnicolorStick,
    Ghost,
    DoubleBond,
    TripleBond,
}

/// Periodic modulation of the rest length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oscillation {
    pub amplitude: f32,
    pub period: f32,
    pub phase: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TorquePivot {
    First,
    Second,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BondTorque {
    pub magnitude: f32,
    pub pivot: TorquePivot,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RadialBond {
    pub a: usize,
    pub b: usize,
    pub length: f32,
    pub strength: f32,
    pub style: BondStyle,
    pub color: Option<Srgb<u8>>,
    pub visible: bool,
    pub oscillation: Option<Oscillation>,
    pub torque: Option<BondTorque>,
}

impl RadialBond {
    pub fn new(a: usize, b: usize, length: f32, strength: f32) -> Self {
        Self {
            a,
            b,
            length,
            strength,
            style: BondStyle::default(),
            color: None,
            visible: true,
            oscillation: None,
            torque: None,
        }
    }

    #[inline]
    pub fn ends(&self) -> [usize; 2] {
        [self.a, self.b]
    }

    /// Order-independent endpoint match
    #[inline]
    pub fn connects(&self, i: usize, j: usize) -> bool {
        (self.a == i && self.b == j) || (self.a == j && self.b == i)
    }

    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        self.a == i || self.b == i
    }

    pub fn partner(&self, i: usize) -> Option<usize> {
        if self.a == i {
            Some(self.b)
        } else if self.b == i {
            Some(self.a)
        } else {
            None
        }
    }

    /// Same bond with its endpoints moved to new slots
    pub fn relabeled(&self, a: usize, b: usize) -> Self {
        Self { a, b, ..self.clone() }
    }
}
