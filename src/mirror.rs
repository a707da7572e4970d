// mirror.rs
// Ghost images of particles and bonds across periodic boundaries.
// Always derived on demand, never stored alongside the live graph.

use ultraviolet::Vec2;

use crate::bond::RadialBond;
use crate::boundary::Boundary;
use crate::particle::Particle;
use crate::profile_scope;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostParticle {
    /// Live slot this ghost mirrors
    pub source: usize,
    pub pos: Vec2,
}

/// A bond that wraps around the box, drawn from one real end to the other end's image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostBond {
    /// Index into the radial bond list
    pub bond: usize,
    pub a: Vec2,
    pub b: Vec2,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MirrorSet {
    pub particles: Vec<GhostParticle>,
    pub bonds: Vec<GhostBond>,
}

impl MirrorSet {
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty() && self.bonds.is_empty()
    }

    /// Ghosts for every particle within `threshold` of an edge and every bond
    /// stretched across the box. Reflecting boundaries have no ghosts.
    pub fn generate(boundary: &Boundary, particles: &[Particle], bonds: &[RadialBond], threshold: f32) -> Self {
        profile_scope!("generate_mirrors");
        let mut set = MirrorSet::default();
        if !boundary.is_periodic() {
            return set;
        }

        let min = boundary.origin;
        let max = boundary.max();
        for (slot, p) in particles.iter().enumerate() {
            let mut xs: smallvec::SmallVec<[i32; 3]> = smallvec::smallvec![0];
            let mut ys: smallvec::SmallVec<[i32; 3]> = smallvec::smallvec![0];
            if p.pos.x - min.x < threshold {
                xs.push(1);
            }
            if max.x - p.pos.x < threshold {
                xs.push(-1);
            }
            if p.pos.y - min.y < threshold {
                ys.push(1);
            }
            if max.y - p.pos.y < threshold {
                ys.push(-1);
            }
            for &ny in &ys {
                for &nx in &xs {
                    if nx == 0 && ny == 0 {
                        continue;
                    }
                    set.particles.push(GhostParticle {
                        source: slot,
                        pos: p.pos + boundary.image_shift(nx, ny),
                    });
                }
            }
        }

        for (index, bond) in bonds.iter().enumerate() {
            let pa = particles[bond.a].pos;
            let pb = particles[bond.b].pos;
            let (nx, ny) = nearest_image(boundary, pa, pb);
            if nx == 0 && ny == 0 {
                continue;
            }
            let shift = boundary.image_shift(nx, ny);
            set.bonds.push(GhostBond { bond: index, a: pa, b: pb + shift });
            set.bonds.push(GhostBond { bond: index, a: pa - shift, b: pb });
        }
        set
    }
}

/// Image counts that bring `b` closest to `a`.
fn nearest_image(boundary: &Boundary, a: Vec2, b: Vec2) -> (i32, i32) {
    let size = boundary.size;
    let ny = -((b.y - a.y) / size.y).round() as i32;
    let dx = b.x + ny as f32 * boundary.shear() - a.x;
    let nx = -(dx / size.x).round() as i32;
    (nx, ny)
}
