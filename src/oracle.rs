// oracle.rs
// The single placement predicate every structural edit consults before committing.

use rayon::prelude::*;
use smallvec::SmallVec;
use ultraviolet::Vec2;

use crate::bond::RadialBond;
use crate::boundary::Boundary;
use crate::config::{self, EditorConfig};
use crate::element::Element;
use crate::error::{EditError, OverlapKind};
use crate::mirror::MirrorSet;
use crate::molecule::MoleculeIndex;
use crate::obstacle::Obstacle;
use crate::particle::Particle;
use crate::profile_scope;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tolerance {
    /// No van der Waals overlap allowed
    Exact,
    /// Partial overlap allowed, for growth heuristics
    Relaxed,
}

#[derive(Clone, Copy, Debug)]
pub enum Candidate<'a> {
    Particle(&'a Particle),
    Molecule(&'a [Particle]),
    Obstacle(&'a Obstacle),
}

pub struct OverlapOracle<'w> {
    particles: &'w [Particle],
    molecules: &'w MoleculeIndex,
    obstacles: &'w [Obstacle],
    boundary: &'w Boundary,
    mirrors: MirrorSet,
    ignored: SmallVec<[usize; 8]>,
    ignored_obstacle: Option<usize>,
    relaxed_factor: f32,
    parallel_threshold: usize,
}

impl<'w> OverlapOracle<'w> {
    /// Ghost images are generated here, once per oracle, when the boundary wraps.
    pub fn new(
        particles: &'w [Particle],
        bonds: &'w [RadialBond],
        molecules: &'w MoleculeIndex,
        obstacles: &'w [Obstacle],
        boundary: &'w Boundary,
        settings: &EditorConfig,
    ) -> Self {
        let mirrors = if boundary.is_periodic() {
            MirrorSet::generate(boundary, particles, bonds, mirror_threshold(settings))
        } else {
            MirrorSet::default()
        };
        Self {
            particles,
            molecules,
            obstacles,
            boundary,
            mirrors,
            ignored: SmallVec::new(),
            ignored_obstacle: None,
            relaxed_factor: settings.relaxed_overlap_factor,
            parallel_threshold: settings.parallel_scan_threshold,
        }
    }

    /// Treat these live slots as absent (the particles being dragged).
    pub fn ignoring(mut self, slots: impl IntoIterator<Item = usize>) -> Self {
        self.ignored.extend(slots);
        self.ignored.sort_unstable();
        self.ignored.dedup();
        self
    }

    /// Treat this obstacle as absent (the obstacle being resized).
    pub fn ignoring_obstacle(mut self, index: usize) -> Self {
        self.ignored_obstacle = Some(index);
        self
    }

    pub fn mirrors(&self) -> &MirrorSet {
        &self.mirrors
    }

    pub fn may_place(&self, candidate: &Candidate<'_>, tolerance: Tolerance) -> bool {
        self.check(candidate, tolerance).is_ok()
    }

    pub fn check(&self, candidate: &Candidate<'_>, tolerance: Tolerance) -> Result<(), EditError> {
        profile_scope!("overlap_check");
        let factor = match tolerance {
            Tolerance::Exact => config::EXACT_OVERLAP_FACTOR,
            Tolerance::Relaxed => self.relaxed_factor,
        };
        match candidate {
            Candidate::Particle(p) => self.check_particle(p, factor),
            Candidate::Molecule(members) => self.check_molecule(members, factor),
            Candidate::Obstacle(o) => self.check_obstacle(o),
        }
    }

    fn is_ignored(&self, slot: usize) -> bool {
        self.ignored.binary_search(&slot).is_ok()
    }

    fn active_obstacles(&self) -> impl Iterator<Item = &Obstacle> + '_ {
        self.obstacles
            .iter()
            .enumerate()
            .filter(move |(i, _)| Some(*i) != self.ignored_obstacle)
            .map(|(_, o)| o)
    }

    fn check_bounds(&self, p: &Particle) -> Result<(), EditError> {
        if self.boundary.contains(p.pos, p.radius()) {
            Ok(())
        } else {
            Err(EditError::OutOfBounds { x: p.pos.x, y: p.pos.y })
        }
    }

    fn check_particle(&self, p: &Particle, factor: f32) -> Result<(), EditError> {
        self.check_bounds(p)?;
        if self.active_obstacles().any(|o| o.blocks(p.element, p.pos, p.radius())) {
            return Err(EditError::overlap(OverlapKind::Obstacle));
        }
        self.check_neighbors(p, factor)
    }

    /// Particle-vs-particle (including ghosts) and particle-vs-surface tests.
    fn check_neighbors(&self, p: &Particle, factor: f32) -> Result<(), EditError> {
        if self.overlaps_particles(p.pos, p.radius(), factor) {
            return Err(EditError::overlap(OverlapKind::Particle));
        }
        if self.inside_closed_surface(p.pos) {
            return Err(EditError::overlap(OverlapKind::Surface));
        }
        Ok(())
    }

    fn overlaps_particles(&self, pos: Vec2, radius: f32, factor: f32) -> bool {
        let hit = |(slot, q): (usize, &Particle)| !self.is_ignored(slot) && q.overlaps_at(pos, radius, factor);
        let live = if self.particles.len() >= self.parallel_threshold {
            self.particles.par_iter().enumerate().any(hit)
        } else {
            self.particles.iter().enumerate().any(hit)
        };
        live || self.mirrors.particles.iter().any(|g| {
            if self.is_ignored(g.source) {
                return false;
            }
            let reach = factor * (self.particles[g.source].radius() + radius);
            (g.pos - pos).mag_sq() < reach * reach
        })
    }

    fn inside_closed_surface(&self, pos: Vec2) -> bool {
        self.molecules.closed_surfaces().any(|m| {
            let ring = m.ring().unwrap_or(&[]);
            if ring.iter().any(|&slot| self.is_ignored(slot)) {
                return false;
            }
            let polygon: Vec<Vec2> = ring.iter().map(|&slot| self.particles[slot].pos).collect();
            point_in_polygon(pos, &polygon)
        })
    }

    fn check_molecule(&self, members: &[Particle], factor: f32) -> Result<(), EditError> {
        for p in members {
            self.check_bounds(p)?;
        }
        let (min, max) = disc_bounds(members);
        if self.active_obstacles().any(|o| o.intersects_box(min, max)) {
            return Err(EditError::overlap(OverlapKind::Obstacle));
        }
        for p in members {
            self.check_neighbors(p, factor)?;
        }
        Ok(())
    }

    fn check_obstacle(&self, o: &Obstacle) -> Result<(), EditError> {
        if !self.boundary.contains_box(o.min, o.max()) {
            return Err(EditError::OutOfBounds { x: o.min.x, y: o.min.y });
        }
        if self.active_obstacles().any(|other| other.intersects(o)) {
            return Err(EditError::overlap(OverlapKind::Obstacle));
        }
        let covers_particle = self
            .particles
            .iter()
            .enumerate()
            .any(|(slot, p)| !self.is_ignored(slot) && o.blocks(p.element, p.pos, p.radius()));
        if covers_particle {
            return Err(EditError::overlap(OverlapKind::Particle));
        }
        Ok(())
    }
}

/// Ghost distance: no particle farther than this from every edge can touch
/// anything across the boundary.
pub fn mirror_threshold(settings: &EditorConfig) -> f32 {
    let widest = Element::ALL.iter().map(|e| e.sigma()).fold(0.0, f32::max);
    settings.mirror_wrap_factor * widest
}

fn disc_bounds(members: &[Particle]) -> (Vec2, Vec2) {
    let mut min = Vec2::broadcast(f32::INFINITY);
    let mut max = Vec2::broadcast(f32::NEG_INFINITY);
    for p in members {
        let r = Vec2::broadcast(p.radius());
        min = min.min_by_component(p.pos - r);
        max = max.max_by_component(p.pos + r);
    }
    (min, max)
}

/// Validate a free-form surface or ribbon outline: vertices must be at least
/// `min_spacing` apart and no two non-adjacent edges may cross.
pub fn check_outline(points: &[Vec2], closed: bool, min_spacing: f32) -> Result<(), EditError> {
    let n = points.len();
    for i in 0..n {
        for j in i + 1..n {
            let spacing = (points[i] - points[j]).mag();
            if spacing < min_spacing {
                return Err(EditError::DegenerateOutline { first: i, second: j, spacing, minimum: min_spacing });
            }
        }
    }

    let edges = match (closed, n) {
        (_, 0 | 1) => 0,
        (true, _) => n,
        (false, _) => n - 1,
    };
    let edge = |i: usize| (points[i], points[(i + 1) % n]);
    for i in 0..edges {
        for j in i + 2..edges {
            if closed && i == 0 && j == edges - 1 {
                continue;
            }
            let (p1, p2) = edge(i);
            let (q1, q2) = edge(j);
            if segments_intersect(p1, p2, q1, q2) {
                return Err(EditError::SelfCrossingGeometry { first: i, second: j });
            }
        }
    }
    Ok(())
}

fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn on_segment(p: Vec2, q: Vec2, r: Vec2) -> bool {
    r.x >= p.x.min(q.x) && r.x <= p.x.max(q.x) && r.y >= p.y.min(q.y) && r.y <= p.y.max(q.y)
}

/// Closed-segment intersection, collinear overlaps included.
pub fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0)) && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0)) {
        return true;
    }
    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// Even-odd ray casting
pub fn point_in_polygon(p: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
