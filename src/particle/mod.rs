// particle/mod.rs
// Re-exports for the particle module

mod types;
mod store;
mod deletion;
mod kinematics;

pub use types::*;
pub use store::ParticleStore;
pub use deletion::{DeletionRecord, ParticleBuffer, SlotFate, SlotRef};
pub use kinematics::{KinematicState, KinematicsMut};
