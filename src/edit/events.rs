// edit/events.rs
// Notifications fired after every committed structural change

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditEventKind {
    Committed,
    Undone,
    Redone,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditEvent {
    pub kind: EditEventKind,
    /// Undo label of the edit, e.g. "Deletion"
    pub label: &'static str,
    pub live_count: usize,
    pub molecule_count: usize,
}

pub type EditListener = Box<dyn FnMut(&EditEvent) + Send>;

#[derive(Default)]
pub(crate) struct Listeners {
    listeners: Vec<EditListener>,
}

impl Listeners {
    pub fn push(&mut self, listener: EditListener) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn fire(&mut self, event: &EditEvent) {
        log::debug!("{:?} '{}' ({} live particles)", event.kind, event.label, event.live_count);
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}
