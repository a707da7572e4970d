// bond/mod.rs
// Re-exports for the bond module

mod radial;
mod angular;
mod graph;
mod delegate;

pub use radial::*;
pub use angular::{bend_angle, AngularBond};
pub use graph::{BondGraph, RemovedRadial};
pub use delegate::{BondCapture, DeadBend, DeadBond};
