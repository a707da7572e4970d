// edit/context.rs
// Per-call edit options, passed explicitly into every mutating editor call.

/// Whether a committed edit lands on the undo stack.
///
/// Edits applied with `record_undo == false` still mutate the structure, but
/// they invalidate any recorded history, which is discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditContext {
    pub record_undo: bool,
}

impl EditContext {
    /// User gestures: recorded and undoable.
    pub const INTERACTIVE: EditContext = EditContext { record_undo: true };
    /// Scene loading and scripted setup: applied without an undo entry.
    pub const SCRIPTED: EditContext = EditContext { record_undo: false };
}

impl Default for EditContext {
    fn default() -> Self {
        Self::INTERACTIVE
    }
}
