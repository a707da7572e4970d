use std::ops::Range;

use ultraviolet::Vec2;

use crate::bond::{AngularBond, RemovedRadial};
use crate::edit::{EditContext, MoleculeTemplate, StructureEditor};
use crate::element::Element;
use crate::error::EditError;
use crate::obstacle::Obstacle;
use crate::particle::Particle;
use crate::profile_scope;

/// Structural edits accepted by the editor thread.
#[derive(Clone, Debug)]
pub enum EditCommand {
    InsertParticle { particle: Particle },
    InsertMolecule { template: MoleculeTemplate, origin: Vec2 },
    InsertSurface { outline: Vec<Vec2>, closed: bool },
    FillLattice { element: Element, min: Vec2, max: Vec2, spacing: f32 },
    DuplicateParticles { slots: Vec<usize>, offset: Vec2 },
    GrowChain { end: usize, element: Element, direction: Vec2 },
    DeleteParticles { slots: Vec<usize> },
    DeleteRegion { min: Vec2, max: Vec2 },
    BondParticles { a: usize, b: usize },
    RemoveRadialBond { a: usize, b: usize },
    BendBonds { a: usize, vertex: usize, b: usize },
    RemoveAngularBond { a: usize, b: usize, vertex: usize },
    AddObstacle { obstacle: Obstacle },
    RemoveObstacle { index: usize },
    ResizeObstacle { index: usize, min: Vec2, size: Vec2 },
    MoveParticles { slots: Vec<usize>, delta: Vec2 },
}

/// What a successful command produced.
#[derive(Clone, Debug, PartialEq)]
pub enum EditOutcome {
    Inserted(Range<usize>),
    Deleted { particles: usize, obstacles: usize },
    BondAdded(usize),
    BondRemoved(RemovedRadial),
    BendAdded(usize),
    BendRemoved(AngularBond),
    ObstacleAdded(usize),
    ObstacleRemoved(Obstacle),
    Done,
}

pub fn handle_command(
    command: EditCommand,
    ctx: EditContext,
    editor: &mut StructureEditor,
) -> Result<EditOutcome, EditError> {
    profile_scope!("command_handling");
    let outcome = match command {
        EditCommand::InsertParticle { particle } => {
            let slot = editor.insert_particle(ctx, particle)?;
            EditOutcome::Inserted(slot..slot + 1)
        }
        EditCommand::InsertMolecule { template, origin } => {
            EditOutcome::Inserted(editor.insert_molecule(ctx, &template, origin)?)
        }
        EditCommand::InsertSurface { outline, closed } => {
            EditOutcome::Inserted(editor.insert_surface(ctx, &outline, closed)?)
        }
        EditCommand::FillLattice { element, min, max, spacing } => {
            EditOutcome::Inserted(editor.fill_lattice(ctx, element, min, max, spacing)?)
        }
        EditCommand::DuplicateParticles { slots, offset } => {
            let live = editor.store().len();
            let slots: Vec<usize> = slots.into_iter().filter(|&s| s < live).collect();
            EditOutcome::Inserted(editor.duplicate_particles(ctx, &slots, offset)?)
        }
        EditCommand::GrowChain { end, element, direction } => {
            let slot = editor.grow_chain(ctx, end, element, direction)?;
            EditOutcome::Inserted(slot..slot + 1)
        }
        EditCommand::DeleteParticles { slots } => {
            // stale slots from a lagging UI are dropped, not fatal
            let live = editor.store().len();
            let slots: Vec<usize> = slots.into_iter().filter(|&s| s < live).collect();
            let particles = editor.delete_particles(ctx, &slots);
            EditOutcome::Deleted { particles, obstacles: 0 }
        }
        EditCommand::DeleteRegion { min, max } => {
            let (particles, obstacles) = editor.delete_region(ctx, min, max);
            EditOutcome::Deleted { particles, obstacles }
        }
        EditCommand::BondParticles { a, b } => EditOutcome::BondAdded(editor.bond_particles(ctx, a, b)?),
        EditCommand::RemoveRadialBond { a, b } => EditOutcome::BondRemoved(editor.remove_radial_bond(ctx, a, b)?),
        EditCommand::BendBonds { a, vertex, b } => EditOutcome::BendAdded(editor.bend_bonds(ctx, a, vertex, b)?),
        EditCommand::RemoveAngularBond { a, b, vertex } => {
            EditOutcome::BendRemoved(editor.remove_angular_bond(ctx, a, b, vertex)?)
        }
        EditCommand::AddObstacle { obstacle } => EditOutcome::ObstacleAdded(editor.add_obstacle(ctx, obstacle)?),
        EditCommand::RemoveObstacle { index } => EditOutcome::ObstacleRemoved(editor.remove_obstacle(ctx, index)?),
        EditCommand::ResizeObstacle { index, min, size } => {
            editor.resize_obstacle(ctx, index, min, size)?;
            EditOutcome::Done
        }
        EditCommand::MoveParticles { slots, delta } => {
            let live = editor.store().len();
            let slots: Vec<usize> = slots.into_iter().filter(|&s| s < live).collect();
            editor.move_particles(ctx, &slots, delta)?;
            EditOutcome::Done
        }
    };
    Ok(outcome)
}
