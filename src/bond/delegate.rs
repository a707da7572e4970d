// bond/delegate.rs
// Bonds and bends orphaned by a bulk deletion, captured for replay on undo.
//
// Each endpoint is classified independently as still live (at its compacted
// slot) or buffered, so every mix of survivors and casualties for a bond
// (3 cases) or bend (7 cases) is represented by the same two types.

use super::{AngularBond, BondGraph, RadialBond};
use crate::particle::{DeletionRecord, SlotRef};
use crate::profile_scope;

#[derive(Clone, Debug, PartialEq)]
pub struct DeadBond {
    /// Bond parameters as captured. Its endpoint fields keep the pre-deletion slots.
    pub bond: RadialBond,
    pub ends: [SlotRef; 2],
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeadBend {
    pub bend: AngularBond,
    /// `[a, b, vertex]`
    pub ends: [SlotRef; 3],
}

impl DeadBond {
    /// Endpoints in the legacy `+capacity` integer encoding
    pub fn encoded(&self, capacity: usize) -> [usize; 2] {
        self.ends.map(|e| e.encode(capacity))
    }

    pub fn revive(&self, record: &DeletionRecord) -> RadialBond {
        let [a, b] = self.ends.map(|e| e.resolve(record));
        self.bond.relabeled(a, b)
    }
}

impl DeadBend {
    pub fn encoded(&self, capacity: usize) -> [usize; 3] {
        self.ends.map(|e| e.encode(capacity))
    }

    pub fn revive(&self, record: &DeletionRecord) -> AngularBond {
        let [a, b, vertex] = self.ends.map(|e| e.resolve(record));
        self.bend.relabeled(a, b, vertex)
    }
}

/// Bonds and bends removed as a side effect of one deletion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BondCapture {
    pub dead_bonds: Vec<DeadBond>,
    pub dead_bends: Vec<DeadBend>,
}

impl BondCapture {
    pub fn is_empty(&self) -> bool {
        self.dead_bonds.is_empty() && self.dead_bends.is_empty()
    }
}

impl BondGraph {
    /// Rewrite bonds whose endpoints all survived; capture the rest.
    pub fn apply_deletion(&mut self, record: &DeletionRecord) -> BondCapture {
        profile_scope!("capture_dead_bonds");
        let mut capture = BondCapture::default();
        if record.is_noop() {
            return capture;
        }

        let (radial, angular) = self.take_all();
        for bond in radial {
            match bond.ends().map(|i| record.locate(i)) {
                [SlotRef::Live(a), SlotRef::Live(b)] => self.push_radial_unchecked(bond.relabeled(a, b)),
                ends => capture.dead_bonds.push(DeadBond { bond, ends }),
            }
        }
        for bend in angular {
            match bend.ends().map(|i| record.locate(i)) {
                [SlotRef::Live(a), SlotRef::Live(b), SlotRef::Live(v)] => {
                    self.push_angular_unchecked(bend.relabeled(a, b, v))
                }
                ends => capture.dead_bends.push(DeadBend { bend, ends }),
            }
        }
        log::debug!(
            "deletion of {} particles captured {} bonds and {} bends",
            record.removed_count(),
            capture.dead_bonds.len(),
            capture.dead_bends.len()
        );
        capture
    }

    /// Re-insert captured bonds after `record` has been restored into the store.
    pub fn replay(&mut self, capture: &BondCapture, record: &DeletionRecord) {
        profile_scope!("replay_dead_bonds");
        for dead in &capture.dead_bonds {
            let bond = dead.revive(record);
            assert!(
                self.find_radial(bond.a, bond.b).is_none(),
                "replayed bond ({}, {}) already exists",
                bond.a,
                bond.b
            );
            self.push_radial_unchecked(bond);
        }
        for dead in &capture.dead_bends {
            let bend = dead.revive(record);
            self.push_angular_unchecked(bend);
        }
    }

    /// Empty both collections, handing their contents back.
    fn take_all(&mut self) -> (Vec<RadialBond>, Vec<AngularBond>) {
        self.retain_below(0)
    }
}
