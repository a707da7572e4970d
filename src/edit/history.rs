// edit/history.rs
// Undoable structural edits and the bounded undo/redo stacks that hold them.

use std::collections::VecDeque;
use ultraviolet::Vec2;

use crate::bond::{AngularBond, BondCapture, BondGraph, RadialBond, RemovedRadial};
use crate::obstacle::Obstacle;
use crate::oracle::Tolerance;
use crate::particle::{DeletionRecord, Particle, ParticleStore};

/// The authoritative structural collections an edit acts on.
pub struct Structure {
    pub store: ParticleStore,
    pub bonds: BondGraph,
    pub obstacles: Vec<Obstacle>,
}

impl Structure {
    pub fn new(capacity: usize) -> Self {
        Self {
            store: ParticleStore::new(capacity),
            bonds: BondGraph::new(),
            obstacles: Vec::new(),
        }
    }

    fn radial_index(&self, bond: &RadialBond) -> usize {
        self.bonds
            .find_radial(bond.a, bond.b)
            .unwrap_or_else(|| panic!("bond ({}, {}) is missing from the graph", bond.a, bond.b))
    }

    fn angular_index(&self, bend: &AngularBond) -> usize {
        self.bonds
            .find_angular(bend.a, bend.b, bend.vertex)
            .unwrap_or_else(|| panic!("bend {:?} is missing from the graph", bend.ends()))
    }

    pub(crate) fn set_positions(&mut self, slots: &[usize], positions: &[Vec2]) {
        for (&slot, &pos) in slots.iter().zip(positions) {
            match self.store.get_mut(slot) {
                Some(p) => p.pos = pos,
                None => panic!("moved particle {} is no longer live", slot),
            }
        }
    }
}

/// One undoable structural change, holding everything needed to replay it in
/// either direction.
#[derive(Clone, Debug)]
pub enum Edit {
    /// Particles appended at `first_slot`, with the bonds and bends that
    /// reach them. `tolerance` is the one they were placed with.
    Insertion {
        label: &'static str,
        first_slot: usize,
        particles: Vec<Particle>,
        bonds: Vec<RadialBond>,
        bends: Vec<AngularBond>,
        tolerance: Tolerance,
    },
    Deletion {
        record: DeletionRecord,
        capture: BondCapture,
    },
    RadialBondAdded(RadialBond),
    RadialBondRemoved(RemovedRadial),
    AngularBondAdded(AngularBond),
    AngularBondRemoved(AngularBond),
    ObstacleAdded { index: usize, obstacle: Obstacle },
    ObstacleRemoved { index: usize, obstacle: Obstacle },
    ObstacleResized { index: usize, before: Obstacle, after: Obstacle },
    ParticlesMoved {
        slots: Vec<usize>,
        before: Vec<Vec2>,
        after: Vec<Vec2>,
    },
    /// Several edits made by one gesture; undone in reverse order.
    Compound { label: &'static str, parts: Vec<Edit> },
}

impl Edit {
    pub fn label(&self) -> &'static str {
        match self {
            Edit::Insertion { label, .. } | Edit::Compound { label, .. } => *label,
            Edit::Deletion { .. } => "Deletion",
            Edit::RadialBondAdded(_) => "Adding Bond",
            Edit::RadialBondRemoved(_) => "Removing Bond",
            Edit::AngularBondAdded(_) => "Adding Bend",
            Edit::AngularBondRemoved(_) => "Removing Bend",
            Edit::ObstacleAdded { .. } => "Adding Obstacle",
            Edit::ObstacleRemoved { .. } => "Removing Obstacle",
            Edit::ObstacleResized { .. } => "Resizing Obstacle",
            Edit::ParticlesMoved { .. } => "Moving",
        }
    }

    pub fn undo(&mut self, s: &mut Structure) {
        match self {
            Edit::Insertion { first_slot, particles, bonds, bends, .. } => {
                assert_eq!(
                    s.store.len(),
                    *first_slot + particles.len(),
                    "store changed since the insertion being undone"
                );
                // keep the latest state so redo puts things back where they were
                let (dropped_bonds, dropped_bends) = s.bonds.retain_below(*first_slot);
                *bonds = dropped_bonds;
                *bends = dropped_bends;
                *particles = s.store.truncate(*first_slot);
            }
            Edit::Deletion { record, capture } => {
                s.store.restore_particles(record);
                s.bonds.replay(capture, record);
                let original = record.original_slots();
                s.store.reorder(&original);
                s.bonds.remap(&original);
            }
            Edit::RadialBondAdded(bond) => {
                let index = s.radial_index(bond);
                let removed = s.bonds.remove_radial(index);
                debug_assert!(removed.dependents.is_empty(), "bends outlived the bond they depend on");
            }
            Edit::RadialBondRemoved(removed) => {
                s.bonds.push_radial_unchecked(removed.bond.clone());
                for bend in &removed.dependents {
                    s.bonds.push_angular_unchecked(bend.clone());
                }
            }
            Edit::AngularBondAdded(bend) => {
                let index = s.angular_index(bend);
                s.bonds.remove_angular(index);
            }
            Edit::AngularBondRemoved(bend) => s.bonds.push_angular_unchecked(bend.clone()),
            Edit::ObstacleAdded { index, .. } => {
                s.obstacles.remove(*index);
            }
            Edit::ObstacleRemoved { index, obstacle } => s.obstacles.insert(*index, obstacle.clone()),
            Edit::ObstacleResized { index, before, .. } => s.obstacles[*index] = before.clone(),
            Edit::ParticlesMoved { slots, before, .. } => s.set_positions(slots, before),
            Edit::Compound { parts, .. } => {
                for part in parts.iter_mut().rev() {
                    part.undo(s);
                }
            }
        }
    }

    pub fn redo(&mut self, s: &mut Structure) {
        match self {
            Edit::Insertion { first_slot, particles, bonds, bends, .. } => {
                let first = s.store.extend(particles.clone());
                assert_eq!(first, Ok(*first_slot), "insertion replayed out of order");
                for bond in bonds.iter() {
                    s.bonds.push_radial_unchecked(bond.clone());
                }
                for bend in bends.iter() {
                    s.bonds.push_angular_unchecked(bend.clone());
                }
            }
            Edit::Deletion { record, capture } => {
                let doomed: Vec<usize> = record.removed().map(|(old, _)| old).collect();
                *record = s.store.delete_particles(doomed);
                *capture = s.bonds.apply_deletion(record);
            }
            Edit::RadialBondAdded(bond) => s.bonds.push_radial_unchecked(bond.clone()),
            Edit::RadialBondRemoved(removed) => {
                let index = s.radial_index(&removed.bond);
                *removed = s.bonds.remove_radial(index);
            }
            Edit::AngularBondAdded(bend) => s.bonds.push_angular_unchecked(bend.clone()),
            Edit::AngularBondRemoved(bend) => {
                let index = s.angular_index(bend);
                s.bonds.remove_angular(index);
            }
            Edit::ObstacleAdded { index, obstacle } => s.obstacles.insert(*index, obstacle.clone()),
            Edit::ObstacleRemoved { index, .. } => {
                s.obstacles.remove(*index);
            }
            Edit::ObstacleResized { index, after, .. } => s.obstacles[*index] = after.clone(),
            Edit::ParticlesMoved { slots, after, .. } => s.set_positions(slots, after),
            Edit::Compound { parts, .. } => {
                for part in parts.iter_mut() {
                    part.redo(s);
                }
            }
        }
    }

    /// Everything this edit would place when replayed in `direction`.
    ///
    /// Undo puts back a state that once passed some check, possibly a relaxed
    /// one, so restored particles are held to the relaxed tolerance. Redo
    /// repeats a gesture and uses the tolerance it was first placed with.
    pub fn placements(&self, direction: Replay) -> Vec<Placement<'_>> {
        match (self, direction) {
            (Edit::Insertion { particles, bonds, tolerance, .. }, Replay::Redo) => vec![Placement::Particles {
                particles: particles.clone(),
                bonded: !bonds.is_empty(),
                tolerance: *tolerance,
            }],
            (Edit::Deletion { record, .. }, Replay::Undo) => vec![Placement::Particles {
                particles: record.buffer().write_order().map(|(_, p)| p.clone()).collect(),
                bonded: false,
                tolerance: Tolerance::Relaxed,
            }],
            (Edit::ObstacleAdded { obstacle, .. }, Replay::Redo) | (Edit::ObstacleRemoved { obstacle, .. }, Replay::Undo) => {
                vec![Placement::Obstacle { obstacle, replacing: None }]
            }
            (Edit::ObstacleResized { index, before, .. }, Replay::Undo) => {
                vec![Placement::Obstacle { obstacle: before, replacing: Some(*index) }]
            }
            (Edit::ObstacleResized { index, after, .. }, Replay::Redo) => {
                vec![Placement::Obstacle { obstacle: after, replacing: Some(*index) }]
            }
            (Edit::ParticlesMoved { slots, before, .. }, Replay::Undo) => vec![Placement::Moved {
                slots,
                positions: before,
                tolerance: Tolerance::Relaxed,
            }],
            (Edit::ParticlesMoved { slots, after, .. }, Replay::Redo) => vec![Placement::Moved {
                slots,
                positions: after,
                tolerance: Tolerance::Exact,
            }],
            (Edit::Compound { parts, .. }, Replay::Undo) => {
                parts.iter().rev().flat_map(|p| p.placements(direction)).collect()
            }
            (Edit::Compound { parts, .. }, Replay::Redo) => parts.iter().flat_map(|p| p.placements(direction)).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Replay {
    Undo,
    Redo,
}

/// Something a replayed edit would put into the structure. Checked against
/// the structure as it is before the replay.
#[derive(Debug)]
pub enum Placement<'e> {
    /// Particles entering the store; `bonded` batches are placed as one molecule
    Particles {
        particles: Vec<Particle>,
        bonded: bool,
        tolerance: Tolerance,
    },
    /// Live particles put at new positions
    Moved {
        slots: &'e [usize],
        positions: &'e [Vec2],
        tolerance: Tolerance,
    },
    /// An obstacle coming back, or replacing the one at `replacing`
    Obstacle {
        obstacle: &'e Obstacle,
        replacing: Option<usize>,
    },
}

/// Bounded undo stack plus redo stack. Committing a new edit clears redo.
pub struct EditHistory {
    undo: VecDeque<Edit>,
    redo: Vec<Edit>,
    limit: usize,
}

impl EditHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    pub fn push(&mut self, edit: Edit) {
        self.redo.clear();
        if self.limit == 0 {
            return;
        }
        self.undo.push_back(edit);
        while self.undo.len() > self.limit {
            if let Some(oldest) = self.undo.pop_front() {
                log::debug!("undo limit {} reached, forgetting '{}'", self.limit, oldest.label());
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_label(&self) -> Option<&'static str> {
        self.undo.back().map(Edit::label)
    }

    pub fn redo_label(&self) -> Option<&'static str> {
        self.redo.last().map(Edit::label)
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn next_undo(&self) -> Option<&Edit> {
        self.undo.back()
    }

    pub fn next_redo(&self) -> Option<&Edit> {
        self.redo.last()
    }

    /// Revert the most recent edit. Returns its label.
    pub fn undo(&mut self, s: &mut Structure) -> Option<&'static str> {
        let mut edit = self.undo.pop_back()?;
        edit.undo(s);
        let label = edit.label();
        self.redo.push(edit);
        Some(label)
    }

    /// Re-apply the most recently undone edit. Returns its label.
    pub fn redo(&mut self, s: &mut Structure) -> Option<&'static str> {
        let mut edit = self.redo.pop()?;
        edit.redo(s);
        let label = edit.label();
        self.undo.push_back(edit);
        Some(label)
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
