// particle/kinematics.rs
// Integrator view of the live particles: positions and velocities only

use ultraviolet::Vec2;

use super::Particle;
use crate::element::Element;

/// One particle as the integrator sees it. Element is read-only.
pub struct KinematicState<'p> {
    pub pos: &'p mut Vec2,
    pub vel: &'p mut Vec2,
    pub element: Element,
}

pub struct KinematicsMut<'a> {
    particles: &'a mut [Particle],
}

impl<'a> KinematicsMut<'a> {
    pub(crate) fn new(particles: &'a mut [Particle]) -> Self {
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn element(&self, slot: usize) -> Element {
        self.particles[slot].element
    }

    pub fn pos(&self, slot: usize) -> Vec2 {
        self.particles[slot].pos
    }

    pub fn vel(&self, slot: usize) -> Vec2 {
        self.particles[slot].vel
    }

    pub fn set_pos(&mut self, slot: usize, pos: Vec2) {
        self.particles[slot].pos = pos;
    }

    pub fn set_vel(&mut self, slot: usize, vel: Vec2) {
        self.particles[slot].vel = vel;
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = KinematicState<'_>> + '_ {
        self.particles.iter_mut().map(|p| KinematicState {
            pos: &mut p.pos,
            vel: &mut p.vel,
            element: p.element,
        })
    }
}
