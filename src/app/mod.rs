// app/mod.rs
// The editor thread: one owner of the structure, driven over channels by any
// number of handles (UI, integrator, scene loader).

use crossbeam::channel::Sender;

use crate::edit::EditContext;
use crate::error::EditError;
use crate::particle::KinematicsMut;

pub mod command_loop;
pub mod handle;
pub mod spawn;

pub use command_loop::{handle_command, EditCommand, EditOutcome};
pub use handle::EditorHandle;
pub use spawn::spawn;

pub type KinematicsUpdate = Box<dyn FnOnce(KinematicsMut<'_>) + Send>;

/// Messages understood by the editor thread.
pub enum EditorRequest {
    Edit {
        ctx: EditContext,
        command: EditCommand,
        reply: Sender<Result<EditOutcome, EditError>>,
    },
    Undo {
        reply: Sender<Result<Option<&'static str>, EditError>>,
    },
    Redo {
        reply: Sender<Result<Option<&'static str>, EditError>>,
    },
    /// Integrator access to positions and velocities between edits
    Kinematics { apply: KinematicsUpdate },
    Shutdown,
}
