use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam::channel::{unbounded, Receiver};
use parking_lot::RwLock;

use super::command_loop;
use super::handle::EditorHandle;
use super::EditorRequest;
use crate::edit::{EditorSnapshot, StructureEditor};
use crate::profile_scope;

/// Move `editor` onto its own thread. The join handle gives the editor back
/// once a `Shutdown` arrives or every handle has been dropped.
pub fn spawn(editor: StructureEditor) -> std::io::Result<(EditorHandle, JoinHandle<StructureEditor>)> {
    let (tx, rx) = unbounded();
    let snapshot = Arc::new(RwLock::new(editor.snapshot()));
    let published = Arc::clone(&snapshot);
    let join = std::thread::Builder::new()
        .name("structure-editor".to_string())
        .spawn(move || run_editor_loop(rx, editor, published))?;
    Ok((EditorHandle::new(tx, snapshot), join))
}

pub fn run_editor_loop(
    rx: Receiver<EditorRequest>,
    mut editor: StructureEditor,
    snapshot: Arc<RwLock<EditorSnapshot>>,
) -> StructureEditor {
    log::debug!("editor thread started");
    for request in rx.iter() {
        let changed = match request {
            EditorRequest::Edit { ctx, command, reply } => {
                let result = command_loop::handle_command(command, ctx, &mut editor);
                if let Err(e) = &result {
                    log::debug!("edit rejected: {}", e);
                }
                let changed = result.is_ok();
                // requester may have given up waiting
                let _ = reply.send(result);
                changed
            }
            EditorRequest::Undo { reply } => {
                let result = editor.undo();
                let changed = matches!(result, Ok(Some(_)));
                let _ = reply.send(result);
                changed
            }
            EditorRequest::Redo { reply } => {
                let result = editor.redo();
                let changed = matches!(result, Ok(Some(_)));
                let _ = reply.send(result);
                changed
            }
            EditorRequest::Kinematics { apply } => {
                apply(editor.kinematics_mut());
                true
            }
            EditorRequest::Shutdown => break,
        };
        if changed {
            profile_scope!("publish_snapshot");
            *snapshot.write() = editor.snapshot();
        }
    }
    log::debug!("editor thread stopped with {} live particles", editor.store().len());
    editor
}
