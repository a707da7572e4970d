// edit/mod.rs
// Re-exports for the structural edit engine

mod context;
mod editor;
mod events;
mod history;
mod insertion;

pub use context::EditContext;
pub use editor::{EditorSnapshot, StructureEditor};
pub use events::{EditEvent, EditEventKind, EditListener};
pub use history::{Edit, EditHistory, Placement, Replay, Structure};
pub use insertion::{sample_velocity, MoleculeTemplate, TemplateAtom, VelocityPolicy};

#[cfg(test)]
mod tests;
