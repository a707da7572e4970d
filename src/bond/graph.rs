// bond/graph.rs
// Radial and angular bond collections with direct add/remove validation

use smallvec::SmallVec;

use super::{AngularBond, RadialBond};
use crate::error::EditError;

/// A removed radial bond together with the bends that depended on it.
#[derive(Clone, Debug, PartialEq)]
pub struct RemovedRadial {
    pub bond: RadialBond,
    pub dependents: Vec<AngularBond>,
}

#[derive(Clone, Debug, Default)]
pub struct BondGraph {
    radial: Vec<RadialBond>,
    angular: Vec<AngularBond>,
}

impl BondGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn radial(&self) -> &[RadialBond] {
        &self.radial
    }

    pub fn angular(&self) -> &[AngularBond] {
        &self.angular
    }

    pub fn is_empty(&self) -> bool {
        self.radial.is_empty() && self.angular.is_empty()
    }

    pub fn find_radial(&self, i: usize, j: usize) -> Option<usize> {
        self.radial.iter().position(|b| b.connects(i, j))
    }

    pub fn find_angular(&self, a: usize, b: usize, vertex: usize) -> Option<usize> {
        self.angular.iter().position(|bend| bend.matches(a, b, vertex))
    }

    /// Particles radially bonded to `i`
    pub fn partners(&self, i: usize) -> SmallVec<[usize; 4]> {
        self.radial.iter().filter_map(|b| b.partner(i)).collect()
    }

    pub fn add_radial(&mut self, bond: RadialBond, live_count: usize) -> Result<usize, EditError> {
        if bond.a == bond.b {
            return Err(EditError::invalid_bond(&bond.ends(), "a particle cannot bond to itself"));
        }
        if bond.a >= live_count || bond.b >= live_count {
            return Err(EditError::invalid_bond(&bond.ends(), "endpoint is not a live particle"));
        }
        if self.find_radial(bond.a, bond.b).is_some() {
            return Err(EditError::DuplicateBond { a: bond.a, b: bond.b });
        }
        self.radial.push(bond);
        Ok(self.radial.len() - 1)
    }

    /// Bends that exist only because of `bond`: the vertex is one endpoint and
    /// the other endpoint is one of the bend's arms.
    pub fn dependents_of(&self, bond: &RadialBond) -> Vec<usize> {
        self.angular
            .iter()
            .enumerate()
            .filter(|(_, bend)| {
                (bend.vertex == bond.a && bend.has_arm(bond.b))
                    || (bend.vertex == bond.b && bend.has_arm(bond.a))
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Remove a radial bond and every bend that depends on it.
    pub fn remove_radial(&mut self, index: usize) -> RemovedRadial {
        let dependents_idx = self.dependents_of(&self.radial[index]);
        let bond = self.radial.remove(index);
        let mut dependents: Vec<AngularBond> = Vec::with_capacity(dependents_idx.len());
        for &i in dependents_idx.iter().rev() {
            dependents.push(self.angular.remove(i));
        }
        dependents.reverse();
        RemovedRadial { bond, dependents }
    }

    /// Both arms of the bend must already be radial bonds to the vertex.
    pub fn add_angular(&mut self, bend: AngularBond, live_count: usize) -> Result<usize, EditError> {
        let ends = bend.ends();
        if bend.a == bend.b || bend.a == bend.vertex || bend.b == bend.vertex {
            return Err(EditError::invalid_bond(&ends, "bend needs three distinct particles"));
        }
        if ends.iter().any(|&i| i >= live_count) {
            return Err(EditError::invalid_bond(&ends, "endpoint is not a live particle"));
        }
        for arm in [bend.a, bend.b] {
            if self.find_radial(arm, bend.vertex).is_none() {
                return Err(EditError::missing_bond(&[arm, bend.vertex]));
            }
        }
        if self.find_angular(bend.a, bend.b, bend.vertex).is_some() {
            return Err(EditError::invalid_bond(&ends, "bend already exists"));
        }
        self.angular.push(bend);
        Ok(self.angular.len() - 1)
    }

    pub fn remove_angular(&mut self, index: usize) -> AngularBond {
        self.angular.remove(index)
    }

    /// Re-insert a bond captured earlier, skipping validation.
    pub(crate) fn push_radial_unchecked(&mut self, bond: RadialBond) {
        self.radial.push(bond);
    }

    pub(crate) fn push_angular_unchecked(&mut self, bend: AngularBond) {
        self.angular.push(bend);
    }

    /// Drop every bond and bend touching a slot at or beyond `live_count`.
    pub fn retain_below(&mut self, live_count: usize) -> (Vec<RadialBond>, Vec<AngularBond>) {
        let (kept, dropped): (Vec<_>, Vec<_>) = std::mem::take(&mut self.radial)
            .into_iter()
            .partition(|b| b.a < live_count && b.b < live_count);
        self.radial = kept;
        let (kept_bends, dropped_bends): (Vec<_>, Vec<_>) = std::mem::take(&mut self.angular)
            .into_iter()
            .partition(|bend| bend.ends().iter().all(|&i| i < live_count));
        self.angular = kept_bends;
        (dropped, dropped_bends)
    }

    /// Relabel every endpoint `i` as `destination[i]`.
    pub fn remap(&mut self, destination: &[usize]) {
        for bond in &mut self.radial {
            *bond = bond.relabeled(destination[bond.a], destination[bond.b]);
        }
        for bend in &mut self.angular {
            *bend = bend.relabeled(destination[bend.a], destination[bend.b], destination[bend.vertex]);
        }
    }

    /// Panics when a bond refers to a dead slot or a pair is bonded twice.
    pub fn check_invariants(&self, live_count: usize) {
        for (n, bond) in self.radial.iter().enumerate() {
            assert!(
                bond.a < live_count && bond.b < live_count,
                "radial bond {} references dead slot ({}, {}), live count {}",
                n,
                bond.a,
                bond.b,
                live_count
            );
            assert!(
                self.radial[n + 1..].iter().all(|other| !other.connects(bond.a, bond.b)),
                "particles {} and {} are bonded twice",
                bond.a,
                bond.b
            );
        }
        for (n, bend) in self.angular.iter().enumerate() {
            assert!(
                bend.ends().iter().all(|&i| i < live_count),
                "angular bond {} references a dead slot {:?}, live count {}",
                n,
                bend.ends(),
                live_count
            );
        }
    }
}
