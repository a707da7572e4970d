use std::ops::Range;
use std::sync::Arc;

use crossbeam::channel::{bounded, Sender};
use parking_lot::{RwLock, RwLockReadGuard};
use ultraviolet::Vec2;

use super::command_loop::{EditCommand, EditOutcome};
use super::EditorRequest;
use crate::edit::{EditContext, EditorSnapshot, MoleculeTemplate};
use crate::error::EditError;
use crate::particle::{KinematicsMut, Particle};

/// Cloneable front end to the editor thread. Requests block until the editor
/// replies; reads go to the last published snapshot and never block on edits.
#[derive(Clone)]
pub struct EditorHandle {
    tx: Sender<EditorRequest>,
    snapshot: Arc<RwLock<EditorSnapshot>>,
}

impl EditorHandle {
    pub(crate) fn new(tx: Sender<EditorRequest>, snapshot: Arc<RwLock<EditorSnapshot>>) -> Self {
        Self { tx, snapshot }
    }

    pub fn request(&self, ctx: EditContext, command: EditCommand) -> Result<EditOutcome, EditError> {
        let (reply, rx) = bounded(1);
        self.tx
            .send(EditorRequest::Edit { ctx, command, reply })
            .map_err(|_| EditError::Disconnected)?;
        rx.recv().map_err(|_| EditError::Disconnected)?
    }

    pub fn insert_particle(&self, ctx: EditContext, particle: Particle) -> Result<usize, EditError> {
        match self.request(ctx, EditCommand::InsertParticle { particle })? {
            EditOutcome::Inserted(range) => Ok(range.start),
            other => panic!("insert_particle answered with {:?}", other),
        }
    }

    pub fn insert_molecule(
        &self,
        ctx: EditContext,
        template: MoleculeTemplate,
        origin: Vec2,
    ) -> Result<Range<usize>, EditError> {
        match self.request(ctx, EditCommand::InsertMolecule { template, origin })? {
            EditOutcome::Inserted(range) => Ok(range),
            other => panic!("insert_molecule answered with {:?}", other),
        }
    }

    /// Copy `slots` shifted by `offset`. Stale slots are dropped.
    pub fn duplicate_particles(
        &self,
        ctx: EditContext,
        slots: Vec<usize>,
        offset: Vec2,
    ) -> Result<Range<usize>, EditError> {
        match self.request(ctx, EditCommand::DuplicateParticles { slots, offset })? {
            EditOutcome::Inserted(range) => Ok(range),
            other => panic!("duplicate_particles answered with {:?}", other),
        }
    }

    pub fn delete_particles(&self, ctx: EditContext, slots: Vec<usize>) -> Result<usize, EditError> {
        match self.request(ctx, EditCommand::DeleteParticles { slots })? {
            EditOutcome::Deleted { particles, .. } => Ok(particles),
            other => panic!("delete_particles answered with {:?}", other),
        }
    }

    pub fn undo(&self) -> Result<Option<&'static str>, EditError> {
        let (reply, rx) = bounded(1);
        self.tx
            .send(EditorRequest::Undo { reply })
            .map_err(|_| EditError::Disconnected)?;
        rx.recv().map_err(|_| EditError::Disconnected)?
    }

    pub fn redo(&self) -> Result<Option<&'static str>, EditError> {
        let (reply, rx) = bounded(1);
        self.tx
            .send(EditorRequest::Redo { reply })
            .map_err(|_| EditError::Disconnected)?;
        rx.recv().map_err(|_| EditError::Disconnected)?
    }

    /// Queue an integrator step against the live particles. Does not wait.
    pub fn update_kinematics<F>(&self, apply: F) -> Result<(), EditError>
    where
        F: FnOnce(KinematicsMut<'_>) + Send + 'static,
    {
        self.tx
            .send(EditorRequest::Kinematics { apply: Box::new(apply) })
            .map_err(|_| EditError::Disconnected)
    }

    /// Owned copy of the last published state.
    pub fn snapshot(&self) -> EditorSnapshot {
        self.snapshot.read().clone()
    }

    pub fn read_snapshot(&self) -> RwLockReadGuard<'_, EditorSnapshot> {
        self.snapshot.read()
    }

    pub fn shutdown(&self) {
        if self.tx.send(EditorRequest::Shutdown).is_err() {
            log::debug!("editor thread already stopped");
        }
    }
}
