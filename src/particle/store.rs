// particle/store.rs
// Fixed-capacity, densely packed particle storage. Live particles always occupy [0, len).

use std::ops::Index;
use ultraviolet::Vec2;

use super::{KinematicsMut, Particle};
use crate::error::EditError;

pub struct ParticleStore {
    particles: Vec<Particle>,
    capacity: usize,
}

impl ParticleStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of live particles
    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn free_slots(&self) -> usize {
        self.capacity - self.particles.len()
    }

    #[inline]
    pub fn is_live(&self, slot: usize) -> bool {
        slot < self.particles.len()
    }

    pub fn get(&self, slot: usize) -> Option<&Particle> {
        self.particles.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Particle> {
        self.particles.get_mut(slot)
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// Positions and velocities for the integrator; nothing structural is reachable.
    pub fn kinematics_mut(&mut self) -> KinematicsMut<'_> {
        KinematicsMut::new(&mut self.particles)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn pos(&self, slot: usize) -> Vec2 {
        self.particles[slot].pos
    }

    /// Fails with `CapacityExceeded` without touching the store when full.
    pub fn ensure_room(&self, requested: usize) -> Result<(), EditError> {
        if requested > self.free_slots() {
            return Err(EditError::CapacityExceeded {
                capacity: self.capacity,
                requested,
            });
        }
        Ok(())
    }

    pub fn push(&mut self, particle: Particle) -> Result<usize, EditError> {
        self.ensure_room(1)?;
        self.particles.push(particle);
        Ok(self.particles.len() - 1)
    }

    /// Append a batch, all or nothing. Returns the first new slot.
    pub fn extend(&mut self, batch: Vec<Particle>) -> Result<usize, EditError> {
        self.ensure_room(batch.len())?;
        let first = self.particles.len();
        self.particles.extend(batch);
        Ok(first)
    }

    /// Drop every particle at or after `len`, returning them in slot order.
    pub fn truncate(&mut self, len: usize) -> Vec<Particle> {
        assert!(len <= self.particles.len(), "truncate to {} beyond live count {}", len, self.particles.len());
        self.particles.split_off(len)
    }

    /// Move the particle at slot `i` to slot `destination[i]`.
    ///
    /// Panics unless `destination` is a permutation of the live range.
    pub fn reorder(&mut self, destination: &[usize]) {
        assert_eq!(destination.len(), self.particles.len(), "reorder needs one target per live slot");
        let mut placed: Vec<Option<Particle>> = vec![None; destination.len()];
        for (particle, &to) in self.particles.drain(..).zip(destination) {
            assert!(placed[to].is_none(), "slot {} targeted twice", to);
            placed[to] = Some(particle);
        }
        self.particles.extend(placed.into_iter().flatten());
    }

    pub(super) fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    /// Largest sigma among live particles
    pub fn max_sigma(&self) -> f32 {
        self.particles.iter().map(|p| p.sigma()).fold(0.0, f32::max)
    }
}

impl Index<usize> for ParticleStore {
    type Output = Particle;

    fn index(&self, slot: usize) -> &Particle {
        &self.particles[slot]
    }
}
