// edit/insertion.rs
// Building blocks for insertions: velocity assignment and molecule templates

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use ultraviolet::Vec2;

use crate::bond::{bend_angle, AngularBond, RadialBond};
use crate::config::{self, EditorConfig};
use crate::element::Element;
use crate::error::EditError;
use crate::particle::Particle;

/// How newly inserted particles get their initial velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VelocityPolicy {
    /// Whatever velocity the caller supplied
    Keep,
    Zero,
    /// Heat-bath draw at the given temperature (kT units)
    MaxwellBoltzmann { temperature: f32 },
}

impl VelocityPolicy {
    pub fn from_config(config: &EditorConfig) -> Self {
        match config.insertion_temperature {
            Some(temperature) => VelocityPolicy::MaxwellBoltzmann { temperature },
            None => VelocityPolicy::Keep,
        }
    }

    pub fn apply<R: Rng + ?Sized>(&self, particle: &mut Particle, rng: &mut R) {
        match *self {
            VelocityPolicy::Keep => {}
            VelocityPolicy::Zero => particle.vel = Vec2::zero(),
            VelocityPolicy::MaxwellBoltzmann { temperature } => {
                particle.vel = sample_velocity(particle.mass(), temperature, rng);
            }
        }
    }
}

/// Maxwell-Boltzmann velocity: each component normal with variance kT/m.
pub fn sample_velocity<R: Rng + ?Sized>(mass: f32, temperature: f32, rng: &mut R) -> Vec2 {
    let sigma = (temperature / mass).sqrt();
    let vx: f64 = StandardNormal.sample(rng);
    let vy: f64 = StandardNormal.sample(rng);
    Vec2::new(vx as f32 * sigma, vy as f32 * sigma)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemplateAtom {
    pub element: Element,
    /// Position relative to the insertion point
    pub offset: Vec2,
}

/// A reusable molecule shape. Bond rest lengths and bend angles are taken from
/// the template geometry when it is instantiated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoleculeTemplate {
    pub atoms: Vec<TemplateAtom>,
    /// Pairs of atom indices
    pub bonds: Vec<(usize, usize)>,
    /// `(a, b, vertex)` atom indices
    pub bends: Vec<(usize, usize, usize)>,
    pub bond_strength: f32,
    pub bend_strength: f32,
}

impl MoleculeTemplate {
    pub fn new() -> Self {
        Self {
            bond_strength: config::DEFAULT_BOND_STRENGTH,
            bend_strength: config::DEFAULT_BEND_STRENGTH,
            ..Self::default()
        }
    }

    pub fn atom(mut self, element: Element, offset: Vec2) -> Self {
        self.atoms.push(TemplateAtom { element, offset });
        self
    }

    pub fn bond(mut self, a: usize, b: usize) -> Self {
        self.bonds.push((a, b));
        self
    }

    pub fn bend(mut self, a: usize, b: usize, vertex: usize) -> Self {
        self.bends.push((a, b, vertex));
        self
    }

    /// Straight chain along +x, bent at every interior atom.
    pub fn chain(element: Element, length: usize, spacing: f32) -> Self {
        let points: Vec<Vec2> = (0..length).map(|i| Vec2::new(i as f32 * spacing, 0.0)).collect();
        Self::outline(element, &points, false)
    }

    /// Regular polygon of `count` atoms around the insertion point.
    pub fn ring(element: Element, count: usize, radius: f32) -> Self {
        let points: Vec<Vec2> = (0..count)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::TAU / count as f32;
                Vec2::new(angle.cos(), angle.sin()) * radius
            })
            .collect();
        Self::outline(element, &points, true)
    }

    /// Atoms on each point, bonded in order (and back to the start when `closed`),
    /// with a bend at every atom that has two neighbours.
    pub fn outline(element: Element, points: &[Vec2], closed: bool) -> Self {
        let n = points.len();
        let mut template = Self::new();
        for &p in points {
            template = template.atom(element, p);
        }
        for i in 1..n {
            template = template.bond(i - 1, i);
        }
        if closed && n >= 3 {
            template = template.bond(n - 1, 0);
            for i in 0..n {
                template = template.bend((i + n - 1) % n, (i + 1) % n, i);
            }
        } else {
            for i in 1..n.saturating_sub(1) {
                template = template.bend(i - 1, i + 1, i);
            }
        }
        template
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Concrete particles, bonds and bends for a copy placed at `origin`
    /// whose first atom will occupy `first_slot`.
    pub fn instantiate(
        &self,
        origin: Vec2,
        first_slot: usize,
    ) -> Result<(Vec<Particle>, Vec<RadialBond>, Vec<AngularBond>), EditError> {
        let n = self.atoms.len();
        let slot = |i: usize| first_slot + i;
        let particles: Vec<Particle> = self
            .atoms
            .iter()
            .map(|atom| Particle::new(atom.element, origin + atom.offset))
            .collect();

        let mut bonds: Vec<RadialBond> = Vec::with_capacity(self.bonds.len());
        for &(a, b) in &self.bonds {
            if a >= n || b >= n {
                return Err(EditError::invalid_bond(&[slot(a), slot(b)], "template atom index out of range"));
            }
            if a == b {
                return Err(EditError::invalid_bond(&[slot(a)], "a particle cannot bond to itself"));
            }
            if bonds.iter().any(|bond| bond.connects(slot(a), slot(b))) {
                return Err(EditError::DuplicateBond { a: slot(a), b: slot(b) });
            }
            let length = (particles[a].pos - particles[b].pos).mag();
            bonds.push(RadialBond::new(slot(a), slot(b), length, self.bond_strength));
        }

        let mut bends: Vec<AngularBond> = Vec::with_capacity(self.bends.len());
        for &(a, b, vertex) in &self.bends {
            let ends = [slot(a), slot(b), slot(vertex)];
            if a >= n || b >= n || vertex >= n {
                return Err(EditError::invalid_bond(&ends, "template atom index out of range"));
            }
            if a == b || a == vertex || b == vertex {
                return Err(EditError::invalid_bond(&ends, "bend needs three distinct particles"));
            }
            for arm in [a, b] {
                if !bonds.iter().any(|bond| bond.connects(slot(arm), slot(vertex))) {
                    return Err(EditError::missing_bond(&[slot(arm), slot(vertex)]));
                }
            }
            let angle = bend_angle(particles[a].pos, particles[b].pos, particles[vertex].pos);
            bends.push(AngularBond::new(slot(a), slot(b), slot(vertex), angle, self.bend_strength));
        }
        Ok((particles, bonds, bends))
    }
}
