// edit/editor.rs
// StructureEditor: the single owner of the particle store, bond graph and
// obstacles. Every structural mutation goes through here, is gated by the
// overlap oracle, and lands on the undo stack as one `Edit`.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::SeedableRng;
use ultraviolet::Vec2;

use super::context::EditContext;
use super::events::{EditEvent, EditEventKind, Listeners};
use super::history::{Edit, EditHistory, Placement, Replay, Structure};
use super::insertion::{MoleculeTemplate, VelocityPolicy};
use crate::bond::{bend_angle, AngularBond, BondGraph, RadialBond, RemovedRadial};
use crate::boundary::Boundary;
use crate::config::{self, EditorConfig};
use crate::element::Element;
use crate::error::EditError;
use crate::mirror::MirrorSet;
use crate::molecule::{Molecule, MoleculeIndex};
use crate::obstacle::Obstacle;
use crate::oracle::{self, Candidate, OverlapOracle, Tolerance};
use crate::particle::{KinematicsMut, Particle, ParticleStore};
use crate::profile_scope;

/// Read-only copy of everything the renderer needs for one frame.
#[derive(Clone, Debug)]
pub struct EditorSnapshot {
    pub particles: Vec<Particle>,
    pub radial: Vec<RadialBond>,
    pub angular: Vec<AngularBond>,
    pub molecules: Vec<Molecule>,
    pub obstacles: Vec<Obstacle>,
    pub mirrors: MirrorSet,
    pub boundary: Boundary,
    pub capacity: usize,
    pub undo_label: Option<&'static str>,
    pub redo_label: Option<&'static str>,
}

pub struct StructureEditor {
    structure: Structure,
    molecules: MoleculeIndex,
    boundary: Boundary,
    config: EditorConfig,
    history: EditHistory,
    velocity: VelocityPolicy,
    rng: StdRng,
    listeners: Listeners,
}

impl StructureEditor {
    pub fn new(boundary: Boundary, config: EditorConfig) -> Self {
        Self {
            structure: Structure::new(config.capacity),
            molecules: MoleculeIndex::new(),
            boundary,
            history: EditHistory::new(config.undo_limit),
            velocity: VelocityPolicy::from_config(&config),
            rng: StdRng::seed_from_u64(config.seed),
            listeners: Listeners::default(),
            config,
        }
    }

    // ====================
    // Read access
    // ====================

    pub fn store(&self) -> &ParticleStore {
        &self.structure.store
    }

    pub fn bonds(&self) -> &BondGraph {
        &self.structure.bonds
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.structure.obstacles
    }

    pub fn molecules(&self) -> &MoleculeIndex {
        &self.molecules
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn velocity_policy(&self) -> VelocityPolicy {
        self.velocity
    }

    pub fn set_velocity_policy(&mut self, policy: VelocityPolicy) {
        self.velocity = policy;
    }

    /// Placement predicate over the current structure.
    pub fn oracle(&self) -> OverlapOracle<'_> {
        OverlapOracle::new(
            self.structure.store.as_slice(),
            self.structure.bonds.radial(),
            &self.molecules,
            &self.structure.obstacles,
            &self.boundary,
            &self.config,
        )
    }

    /// Fresh ghost images for the current positions.
    pub fn mirrors(&self) -> MirrorSet {
        MirrorSet::generate(
            &self.boundary,
            self.structure.store.as_slice(),
            self.structure.bonds.radial(),
            oracle::mirror_threshold(&self.config),
        )
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        profile_scope!("snapshot");
        EditorSnapshot {
            particles: self.structure.store.as_slice().to_vec(),
            radial: self.structure.bonds.radial().to_vec(),
            angular: self.structure.bonds.angular().to_vec(),
            molecules: self.molecules.molecules().to_vec(),
            obstacles: self.structure.obstacles.clone(),
            mirrors: self.mirrors(),
            boundary: self.boundary,
            capacity: self.structure.store.capacity(),
            undo_label: self.history.undo_label(),
            redo_label: self.history.redo_label(),
        }
    }

    /// Positions and velocities for the integrator. Structure stays untouched.
    pub fn kinematics_mut(&mut self) -> KinematicsMut<'_> {
        self.structure.store.kinematics_mut()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&EditEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ====================
    // Insertion
    // ====================

    pub fn insert_particle(&mut self, ctx: EditContext, particle: Particle) -> Result<usize, EditError> {
        profile_scope!("insert_particle");
        self.structure.store.ensure_room(1)?;
        self.oracle().check(&Candidate::Particle(&particle), Tolerance::Exact)?;
        let range = self.insert_batch(ctx, "Inserting Atom", vec![particle], Vec::new(), Vec::new(), Tolerance::Exact)?;
        Ok(range.start)
    }

    /// Place a copy of `template` with its origin at `origin`.
    pub fn insert_molecule(
        &mut self,
        ctx: EditContext,
        template: &MoleculeTemplate,
        origin: Vec2,
    ) -> Result<Range<usize>, EditError> {
        profile_scope!("insert_molecule");
        self.structure.store.ensure_room(template.len())?;
        let (particles, bonds, bends) = template.instantiate(origin, self.structure.store.len())?;
        self.oracle().check(&Candidate::Molecule(&particles), Tolerance::Exact)?;
        self.insert_batch(ctx, "Inserting Molecule", particles, bonds, bends, Tolerance::Exact)
    }

    /// Free-form surface (closed) or ribbon (open) of surface particles on the
    /// outline vertices.
    pub fn insert_surface(
        &mut self,
        ctx: EditContext,
        outline: &[Vec2],
        closed: bool,
    ) -> Result<Range<usize>, EditError> {
        profile_scope!("insert_surface");
        let needed = if closed { 3 } else { 2 };
        if outline.len() < needed {
            return Err(EditError::TooFewVertices { count: outline.len(), minimum: needed });
        }
        let min_spacing = self.config.surface_spacing_factor * Element::Sp.sigma();
        oracle::check_outline(outline, closed, min_spacing)?;

        let template = MoleculeTemplate::outline(Element::Sp, outline, closed);
        self.structure.store.ensure_room(template.len())?;
        let (particles, bonds, bends) = template.instantiate(Vec2::zero(), self.structure.store.len())?;
        self.oracle().check(&Candidate::Molecule(&particles), Tolerance::Exact)?;
        let label = if closed { "Inserting Surface" } else { "Inserting Ribbon" };
        self.insert_batch(ctx, label, particles, bonds, bends, Tolerance::Exact)
    }

    /// Fill the rectangle `[min, max]` with a square lattice of `element`,
    /// skipping blocked sites. Stops early when the store is full.
    pub fn fill_lattice(
        &mut self,
        ctx: EditContext,
        element: Element,
        min: Vec2,
        max: Vec2,
        spacing: f32,
    ) -> Result<Range<usize>, EditError> {
        profile_scope!("fill_lattice");
        self.structure.store.ensure_room(1)?;
        let spacing = spacing.max(element.sigma());
        let room = self.structure.store.free_slots();
        let radius = element.radius();

        let mut accepted: Vec<Particle> = Vec::new();
        let mut rejected = 0usize;
        let mut rejected_in_a_row = 0usize;
        {
            let oracle = self.oracle();
            let mut y = min.y;
            'rows: while y <= max.y {
                let mut x = min.x;
                while x <= max.x {
                    if accepted.len() == room {
                        log::warn!("lattice fill stopped: store is full after {} sites", accepted.len());
                        break 'rows;
                    }
                    let candidate = Particle::new(element, Vec2::new(x, y));
                    let clear = oracle.may_place(&Candidate::Particle(&candidate), Tolerance::Exact)
                        && !accepted
                            .iter()
                            .any(|p| p.overlaps_at(candidate.pos, radius, config::EXACT_OVERLAP_FACTOR));
                    if clear {
                        accepted.push(candidate);
                        rejected_in_a_row = 0;
                    } else {
                        rejected += 1;
                        rejected_in_a_row += 1;
                        if rejected_in_a_row >= config::LATTICE_MAX_REJECTIONS {
                            log::warn!("lattice fill gave up after {} blocked sites in a row", rejected_in_a_row);
                            break 'rows;
                        }
                    }
                    x += spacing;
                }
                y += spacing;
            }
        }
        if rejected > 0 {
            log::warn!("lattice fill skipped {} blocked sites", rejected);
        }
        if accepted.is_empty() {
            let at = self.structure.store.len();
            return Ok(at..at);
        }
        self.insert_batch(ctx, "Filling Lattice", accepted, Vec::new(), Vec::new(), Tolerance::Exact)
    }

    /// Append validated particles plus their internal bonds, as one edit.
    fn insert_batch(
        &mut self,
        ctx: EditContext,
        label: &'static str,
        mut particles: Vec<Particle>,
        bonds: Vec<RadialBond>,
        bends: Vec<AngularBond>,
        tolerance: Tolerance,
    ) -> Result<Range<usize>, EditError> {
        for particle in &mut particles {
            self.velocity.apply(particle, &mut self.rng);
        }
        let count = particles.len();
        let first_slot = self.structure.store.extend(particles.clone())?;
        for bond in &bonds {
            self.structure.bonds.push_radial_unchecked(bond.clone());
        }
        for bend in &bends {
            self.structure.bonds.push_angular_unchecked(bend.clone());
        }
        self.commit(
            ctx,
            Edit::Insertion {
                label,
                first_slot,
                particles,
                bonds,
                bends,
                tolerance,
            },
        );
        Ok(first_slot..first_slot + count)
    }

    /// Copy `slots` shifted by `offset`, with every bond and bend lying wholly
    /// inside the selection. The copy is placed as one molecule.
    ///
    /// Panics if a slot is not live.
    pub fn duplicate_particles(
        &mut self,
        ctx: EditContext,
        slots: &[usize],
        offset: Vec2,
    ) -> Result<Range<usize>, EditError> {
        profile_scope!("duplicate_particles");
        let mut slots = slots.to_vec();
        slots.sort_unstable();
        slots.dedup();
        if slots.is_empty() {
            let at = self.structure.store.len();
            return Ok(at..at);
        }
        self.structure.store.ensure_room(slots.len())?;
        let store = &self.structure.store;
        let first_slot = store.len();
        let copies: Vec<Particle> = slots
            .iter()
            .map(|&slot| {
                let mut p = store
                    .get(slot)
                    .unwrap_or_else(|| panic!("cannot duplicate slot {}: only {} live particles", slot, store.len()))
                    .clone();
                p.pos += offset;
                p.selected = false;
                if let Some(restraint) = p.restraint.as_mut() {
                    restraint.anchor += offset;
                }
                p
            })
            .collect();

        let copy_of = |slot: usize| slots.binary_search(&slot).ok().map(|i| first_slot + i);
        let bonds: Vec<RadialBond> = self
            .structure
            .bonds
            .radial()
            .iter()
            .filter_map(|b| Some(b.relabeled(copy_of(b.a)?, copy_of(b.b)?)))
            .collect();
        let bends: Vec<AngularBond> = self
            .structure
            .bonds
            .angular()
            .iter()
            .filter_map(|b| Some(b.relabeled(copy_of(b.a)?, copy_of(b.b)?, copy_of(b.vertex)?)))
            .collect();

        {
            let oracle = self.oracle();
            if bonds.is_empty() {
                for p in &copies {
                    oracle.check(&Candidate::Particle(p), Tolerance::Exact)?;
                }
            } else {
                oracle.check(&Candidate::Molecule(&copies), Tolerance::Exact)?;
            }
        }
        self.insert_batch(ctx, "Duplicating", copies, bonds, bends, Tolerance::Exact)
    }

    /// Append one `element` atom bonded to `end`, one bond length away along
    /// `direction`. When `end` is the tip of a chain the new atom also gets a
    /// bend at `end`. Growth is placed with the relaxed tolerance so the new
    /// atom can sit closer than contact to its partner.
    pub fn grow_chain(
        &mut self,
        ctx: EditContext,
        end: usize,
        element: Element,
        direction: Vec2,
    ) -> Result<usize, EditError> {
        profile_scope!("grow_chain");
        self.require_live(&[end])?;
        if direction.mag_sq() == 0.0 {
            return Err(EditError::invalid_bond(&[end], "growth direction is zero"));
        }
        self.structure.store.ensure_room(1)?;

        let store = &self.structure.store;
        let end_pos = store.pos(end);
        let length = config::GROWTH_SPACING_FACTOR * 0.5 * (store[end].sigma() + element.sigma());
        let particle = Particle::new(element, end_pos + direction.normalized() * length);
        self.oracle()
            .check(&Candidate::Molecule(std::slice::from_ref(&particle)), Tolerance::Relaxed)?;

        let slot = store.len();
        let mut bends = Vec::new();
        if let [prev] = self.structure.bonds.partners(end).as_slice() {
            let angle = bend_angle(store.pos(*prev), particle.pos, end_pos);
            bends.push(AngularBond::new(*prev, slot, end, angle, config::DEFAULT_BEND_STRENGTH));
        }
        let bonds = vec![RadialBond::new(end, slot, length, config::DEFAULT_BOND_STRENGTH)];
        let range = self.insert_batch(ctx, "Growing Chain", vec![particle], bonds, bends, Tolerance::Relaxed)?;
        Ok(range.start)
    }

    // ====================
    // Deletion
    // ====================

    /// Delete the given live slots. Returns how many particles were removed.
    ///
    /// Panics if a slot is not live.
    pub fn delete_particles(&mut self, ctx: EditContext, slots: &[usize]) -> usize {
        profile_scope!("delete_particles_edit");
        let record = self.structure.store.delete_particles(slots.iter().copied());
        if record.is_noop() {
            return 0;
        }
        let capture = self.structure.bonds.apply_deletion(&record);
        let removed = record.removed_count();
        self.commit(ctx, Edit::Deletion { record, capture });
        removed
    }

    /// Delete every particle centred in `[min, max]` and every obstacle lying
    /// wholly inside it, as a single undoable gesture.
    /// Returns `(particles removed, obstacles removed)`.
    pub fn delete_region(&mut self, ctx: EditContext, min: Vec2, max: Vec2) -> (usize, usize) {
        profile_scope!("delete_region");
        let doomed: Vec<usize> = self
            .structure
            .store
            .iter()
            .enumerate()
            .filter(|(_, p)| p.pos.x >= min.x && p.pos.x <= max.x && p.pos.y >= min.y && p.pos.y <= max.y)
            .map(|(slot, _)| slot)
            .collect();
        let doomed_obstacles: Vec<usize> = self
            .structure
            .obstacles
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_inside_box(min, max))
            .map(|(index, _)| index)
            .collect();
        if doomed.is_empty() && doomed_obstacles.is_empty() {
            return (0, 0);
        }

        let record = self.structure.store.delete_particles(doomed);
        let capture = self.structure.bonds.apply_deletion(&record);
        let removed = record.removed_count();
        let mut parts = vec![Edit::Deletion { record, capture }];
        for &index in doomed_obstacles.iter().rev() {
            let obstacle = self.structure.obstacles.remove(index);
            parts.push(Edit::ObstacleRemoved { index, obstacle });
        }
        self.commit(ctx, Edit::Compound { label: "Deletion", parts });
        (removed, doomed_obstacles.len())
    }

    // ====================
    // Bonds
    // ====================

    fn require_live(&self, slots: &[usize]) -> Result<(), EditError> {
        if slots.iter().all(|&s| self.structure.store.is_live(s)) {
            Ok(())
        } else {
            Err(EditError::invalid_bond(slots, "endpoint is not a live particle"))
        }
    }

    /// Bond two particles at their current separation with the default strength.
    pub fn bond_particles(&mut self, ctx: EditContext, a: usize, b: usize) -> Result<usize, EditError> {
        self.require_live(&[a, b])?;
        let length = (self.structure.store.pos(a) - self.structure.store.pos(b)).mag();
        self.add_radial_bond(ctx, RadialBond::new(a, b, length, config::DEFAULT_BOND_STRENGTH))
    }

    pub fn add_radial_bond(&mut self, ctx: EditContext, bond: RadialBond) -> Result<usize, EditError> {
        let index = self.structure.bonds.add_radial(bond.clone(), self.structure.store.len())?;
        self.commit(ctx, Edit::RadialBondAdded(bond));
        Ok(index)
    }

    /// Remove the bond between `a` and `b` together with the bends built on it.
    pub fn remove_radial_bond(&mut self, ctx: EditContext, a: usize, b: usize) -> Result<RemovedRadial, EditError> {
        let index = self
            .structure
            .bonds
            .find_radial(a, b)
            .ok_or_else(|| EditError::missing_bond(&[a, b]))?;
        let removed = self.structure.bonds.remove_radial(index);
        self.commit(ctx, Edit::RadialBondRemoved(removed.clone()));
        Ok(removed)
    }

    /// Bend at `vertex` between its bonds to `a` and `b`. The equilibrium angle
    /// is the current one.
    pub fn bend_bonds(&mut self, ctx: EditContext, a: usize, vertex: usize, b: usize) -> Result<usize, EditError> {
        self.require_live(&[a, b, vertex])?;
        let store = &self.structure.store;
        let angle = bend_angle(store.pos(a), store.pos(b), store.pos(vertex));
        let bend = AngularBond::new(a, b, vertex, angle, config::DEFAULT_BEND_STRENGTH);
        let index = self.structure.bonds.add_angular(bend.clone(), self.structure.store.len())?;
        self.commit(ctx, Edit::AngularBondAdded(bend));
        Ok(index)
    }

    pub fn remove_angular_bond(
        &mut self,
        ctx: EditContext,
        a: usize,
        b: usize,
        vertex: usize,
    ) -> Result<AngularBond, EditError> {
        let index = self
            .structure
            .bonds
            .find_angular(a, b, vertex)
            .ok_or_else(|| EditError::missing_bond(&[a, b, vertex]))?;
        let bend = self.structure.bonds.remove_angular(index);
        self.commit(ctx, Edit::AngularBondRemoved(bend.clone()));
        Ok(bend)
    }

    // ====================
    // Obstacles
    // ====================

    pub fn add_obstacle(&mut self, ctx: EditContext, obstacle: Obstacle) -> Result<usize, EditError> {
        self.oracle().check(&Candidate::Obstacle(&obstacle), Tolerance::Exact)?;
        let index = self.structure.obstacles.len();
        self.structure.obstacles.push(obstacle.clone());
        self.commit(ctx, Edit::ObstacleAdded { index, obstacle });
        Ok(index)
    }

    pub fn remove_obstacle(&mut self, ctx: EditContext, index: usize) -> Result<Obstacle, EditError> {
        if index >= self.structure.obstacles.len() {
            return Err(EditError::UnknownObstacle { index });
        }
        let obstacle = self.structure.obstacles.remove(index);
        self.commit(ctx, Edit::ObstacleRemoved { index, obstacle: obstacle.clone() });
        Ok(obstacle)
    }

    /// Move/resize an obstacle. A rejected resize leaves it untouched.
    pub fn resize_obstacle(&mut self, ctx: EditContext, index: usize, min: Vec2, size: Vec2) -> Result<(), EditError> {
        let before = self
            .structure
            .obstacles
            .get(index)
            .cloned()
            .ok_or(EditError::UnknownObstacle { index })?;
        let after = Obstacle { min, size, ..before.clone() };
        self.oracle()
            .ignoring_obstacle(index)
            .check(&Candidate::Obstacle(&after), Tolerance::Exact)?;
        self.structure.obstacles[index] = after.clone();
        self.commit(ctx, Edit::ObstacleResized { index, before, after });
        Ok(())
    }

    // ====================
    // Moves
    // ====================

    /// Translate a group of particles by `delta` (drag finalisation). Each moved
    /// particle is checked against everything outside the group; on rejection
    /// nothing moves.
    ///
    /// Panics if a slot is not live.
    pub fn move_particles(&mut self, ctx: EditContext, slots: &[usize], delta: Vec2) -> Result<(), EditError> {
        profile_scope!("move_particles");
        let mut slots = slots.to_vec();
        slots.sort_unstable();
        slots.dedup();
        if slots.is_empty() {
            return Ok(());
        }
        let store = &self.structure.store;
        let moved: Vec<Particle> = slots
            .iter()
            .map(|&slot| {
                let mut p = store
                    .get(slot)
                    .unwrap_or_else(|| panic!("cannot move slot {}: only {} live particles", slot, store.len()))
                    .clone();
                p.pos += delta;
                p
            })
            .collect();
        {
            let oracle = self.oracle().ignoring(slots.iter().copied());
            for p in &moved {
                oracle.check(&Candidate::Particle(p), Tolerance::Exact)?;
            }
        }
        let before: Vec<Vec2> = slots.iter().map(|&slot| self.structure.store.pos(slot)).collect();
        let after: Vec<Vec2> = moved.iter().map(|p| p.pos).collect();
        self.structure.set_positions(&slots, &after);
        self.commit(ctx, Edit::ParticlesMoved { slots, before, after });
        Ok(())
    }

    // ====================
    // Undo / redo
    // ====================

    /// Revert the latest recorded edit. Returns its label, or `None` when
    /// there is nothing to undo. Whatever the undo would put back is checked
    /// first; a refused undo stays on the undo stack and changes nothing.
    pub fn undo(&mut self) -> Result<Option<&'static str>, EditError> {
        profile_scope!("undo");
        if let Some(edit) = self.history.next_undo() {
            self.check_replay(edit, Replay::Undo)?;
        }
        let Some(label) = self.history.undo(&mut self.structure) else {
            return Ok(None);
        };
        self.settle(EditEventKind::Undone, label);
        Ok(Some(label))
    }

    /// Re-apply the latest undone edit, checked like [`undo`](Self::undo).
    pub fn redo(&mut self) -> Result<Option<&'static str>, EditError> {
        profile_scope!("redo");
        if let Some(edit) = self.history.next_redo() {
            self.check_replay(edit, Replay::Redo)?;
        }
        let Some(label) = self.history.redo(&mut self.structure) else {
            return Ok(None);
        };
        self.settle(EditEventKind::Redone, label);
        Ok(Some(label))
    }

    fn check_replay(&self, edit: &Edit, direction: Replay) -> Result<(), EditError> {
        let placements = edit.placements(direction);
        let incoming: usize = placements
            .iter()
            .map(|placement| match placement {
                Placement::Particles { particles, .. } => particles.len(),
                _ => 0,
            })
            .sum();
        self.structure.store.ensure_room(incoming)?;

        let store = &self.structure.store;
        for placement in &placements {
            match placement {
                Placement::Particles { particles, bonded: true, tolerance } => {
                    self.oracle().check(&Candidate::Molecule(particles), *tolerance)?;
                }
                Placement::Particles { particles, bonded: false, tolerance } => {
                    let oracle = self.oracle();
                    for p in particles {
                        oracle.check(&Candidate::Particle(p), *tolerance)?;
                    }
                }
                Placement::Moved { slots, positions, tolerance } => {
                    let oracle = self.oracle().ignoring(slots.iter().copied());
                    for (&slot, &pos) in slots.iter().zip(positions.iter()) {
                        let moved = Particle { pos, ..store[slot].clone() };
                        oracle.check(&Candidate::Particle(&moved), *tolerance)?;
                    }
                }
                Placement::Obstacle { obstacle, replacing: None } => {
                    self.oracle().check(&Candidate::Obstacle(obstacle), Tolerance::Exact)?;
                }
                Placement::Obstacle { obstacle, replacing: Some(index) } => {
                    self.oracle()
                        .ignoring_obstacle(*index)
                        .check(&Candidate::Obstacle(obstacle), Tolerance::Exact)?;
                }
            }
        }
        Ok(())
    }

    // ====================
    // Commit
    // ====================

    fn commit(&mut self, ctx: EditContext, edit: Edit) {
        let label = edit.label();
        if ctx.record_undo {
            self.history.push(edit);
        } else if self.history.can_undo() || self.history.can_redo() {
            log::debug!("unrecorded '{}' invalidates the undo history", label);
            self.history.clear();
        }
        self.settle(EditEventKind::Committed, label);
    }

    fn settle(&mut self, kind: EditEventKind, label: &'static str) {
        self.molecules.recompute(&self.structure.store, &self.structure.bonds);
        if cfg!(debug_assertions) {
            self.check_invariants();
        }
        let event = EditEvent {
            kind,
            label,
            live_count: self.structure.store.len(),
            molecule_count: self.molecules.len(),
        };
        self.listeners.fire(&event);
    }

    /// Panics when bonds or molecules reference dead slots, pairs are bonded
    /// twice, or molecules overlap.
    pub fn check_invariants(&self) {
        let live = self.structure.store.len();
        assert!(live <= self.structure.store.capacity(), "live count {} exceeds capacity", live);
        self.structure.bonds.check_invariants(live);
        self.molecules.check_invariants(&self.structure.store, &self.structure.bonds);
    }
}
