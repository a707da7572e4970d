// molecule.rs
// Molecules are derived data: connected components of the radial bond graph,
// rebuilt after every structural edit.

use std::collections::HashMap;

use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;
use ultraviolet::Vec2;

use crate::bond::BondGraph;
use crate::element::Element;
use crate::particle::ParticleStore;
use crate::profile_scope;

#[derive(Clone, Debug, PartialEq)]
pub enum MoleculeKind {
    /// Any bonded cluster that is not made purely of surface particles
    Chain,
    /// Open strand of surface particles
    Ribbon,
    /// Closed loop of surface particles. `ring` lists the slots in walking order.
    ClosedSurface { ring: Vec<usize> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Molecule {
    pub kind: MoleculeKind,
    /// Member slots, ascending
    pub particles: Vec<usize>,
    /// Indices into `BondGraph::radial`
    pub radial: Vec<usize>,
    /// Indices into `BondGraph::angular`
    pub angular: Vec<usize>,
}

impl Molecule {
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.particles.binary_search(&slot).is_ok()
    }

    pub fn ring(&self) -> Option<&[usize]> {
        match &self.kind {
            MoleculeKind::ClosedSurface { ring } => Some(ring),
            _ => None,
        }
    }

    /// Polygon traced by a closed surface, in ring order
    pub fn outline(&self, store: &ParticleStore) -> Option<Vec<Vec2>> {
        self.ring().map(|ring| ring.iter().map(|&slot| store.pos(slot)).collect())
    }

    /// Axis-aligned box around the member discs, as (min, max)
    pub fn bounding_box(&self, store: &ParticleStore) -> (Vec2, Vec2) {
        let mut min = Vec2::broadcast(f32::INFINITY);
        let mut max = Vec2::broadcast(f32::NEG_INFINITY);
        for &slot in &self.particles {
            let p = &store[slot];
            let r = Vec2::broadcast(p.radius());
            min = min.min_by_component(p.pos - r);
            max = max.max_by_component(p.pos + r);
        }
        (min, max)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MoleculeIndex {
    molecules: Vec<Molecule>,
    owner: Vec<Option<usize>>,
}

impl MoleculeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }

    pub fn molecule_of(&self, slot: usize) -> Option<&Molecule> {
        self.owner.get(slot).copied().flatten().map(|m| &self.molecules[m])
    }

    pub fn closed_surfaces(&self) -> impl Iterator<Item = &Molecule> + '_ {
        self.molecules.iter().filter(|m| m.ring().is_some())
    }

    pub fn recompute(&mut self, store: &ParticleStore, bonds: &BondGraph) {
        profile_scope!("recompute_molecules");
        let n = store.len();
        let mut components = UnionFind::<usize>::new(n);
        for bond in bonds.radial() {
            components.union(bond.a, bond.b);
        }
        let labels = components.into_labeling();

        // group members by component, components ordered by their lowest slot
        let mut sizes: HashMap<usize, usize> = HashMap::new();
        for &label in &labels {
            *sizes.entry(label).or_default() += 1;
        }
        let mut slot_of_label: HashMap<usize, usize> = HashMap::new();
        let mut molecules: Vec<Molecule> = Vec::new();
        let mut owner = vec![None; n];
        for (slot, &label) in labels.iter().enumerate() {
            if sizes[&label] < 2 {
                continue;
            }
            let m = *slot_of_label.entry(label).or_insert_with(|| {
                molecules.push(Molecule {
                    kind: MoleculeKind::Chain,
                    particles: Vec::new(),
                    radial: Vec::new(),
                    angular: Vec::new(),
                });
                molecules.len() - 1
            });
            molecules[m].particles.push(slot);
            owner[slot] = Some(m);
        }

        for (i, bond) in bonds.radial().iter().enumerate() {
            if let Some(m) = owner[bond.a] {
                molecules[m].radial.push(i);
            }
        }
        for (i, bend) in bonds.angular().iter().enumerate() {
            let ends = bend.ends();
            if let Some(m) = owner[bend.vertex] {
                if ends.iter().all(|&e| owner[e] == Some(m)) {
                    molecules[m].angular.push(i);
                }
            }
        }
        for molecule in &mut molecules {
            molecule.kind = classify(molecule, store, bonds);
        }

        log::debug!("recomputed {} molecules over {} particles", molecules.len(), n);
        self.molecules = molecules;
        self.owner = owner;
    }

    /// Panics when a molecule references a dead slot, a foreign bond, or shares a particle.
    pub fn check_invariants(&self, store: &ParticleStore, bonds: &BondGraph) {
        let mut seen = vec![false; store.len()];
        for (m, molecule) in self.molecules.iter().enumerate() {
            for &slot in &molecule.particles {
                assert!(slot < store.len(), "molecule {} references dead slot {}", m, slot);
                assert!(!seen[slot], "slot {} belongs to two molecules", slot);
                seen[slot] = true;
            }
            for &i in &molecule.radial {
                let bond = &bonds.radial()[i];
                assert!(
                    molecule.contains(bond.a) && molecule.contains(bond.b),
                    "molecule {} lists bond {} that leaves it",
                    m,
                    i
                );
            }
            for &i in &molecule.angular {
                assert!(
                    bonds.angular()[i].ends().iter().all(|&e| molecule.contains(e)),
                    "molecule {} lists bend {} that leaves it",
                    m,
                    i
                );
            }
        }
    }
}

fn classify(molecule: &Molecule, store: &ParticleStore, bonds: &BondGraph) -> MoleculeKind {
    if !molecule.particles.iter().all(|&slot| store[slot].element == Element::Sp) {
        return MoleculeKind::Chain;
    }
    let mut neighbors: HashMap<usize, SmallVec<[usize; 2]>> = HashMap::new();
    for &i in &molecule.radial {
        let bond = &bonds.radial()[i];
        neighbors.entry(bond.a).or_default().push(bond.b);
        neighbors.entry(bond.b).or_default().push(bond.a);
    }
    let is_cycle = molecule.len() >= 3
        && molecule.radial.len() == molecule.len()
        && molecule.particles.iter().all(|slot| neighbors.get(slot).map_or(0, |n| n.len()) == 2);
    if !is_cycle {
        return MoleculeKind::Ribbon;
    }

    let start = molecule.particles[0];
    let mut ring = Vec::with_capacity(molecule.len());
    let mut prev = start;
    let mut current = neighbors[&start].iter().copied().min().unwrap_or(start);
    ring.push(start);
    while current != start {
        ring.push(current);
        let next = neighbors[&current].iter().copied().find(|&n| n != prev).unwrap_or(start);
        prev = current;
        current = next;
    }
    MoleculeKind::ClosedSurface { ring }
}
