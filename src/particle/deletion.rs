// particle/deletion.rs
// Bulk deletion with a tail-filled scratch buffer, and its exact inverse.
//
// A deleted particle is moved into a buffer with the same capacity as the
// store, filled from the last slot toward the front. Every pre-deletion slot
// gets a `SlotFate` so bonds can be rewritten or captured afterwards.

use std::collections::BTreeSet;

use super::{Particle, ParticleStore};
use crate::profile_scope;

/// Where an endpoint lives after a deletion: in the compacted live range or in the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotRef {
    Live(usize),
    Buffered(usize),
}

impl SlotRef {
    /// Legacy single-integer encoding: buffer slots as-is, live slots shifted by `capacity`.
    pub fn encode(self, capacity: usize) -> usize {
        match self {
            SlotRef::Live(slot) => slot + capacity,
            SlotRef::Buffered(slot) => slot,
        }
    }

    pub fn decode(raw: usize, capacity: usize) -> Self {
        if raw >= capacity {
            SlotRef::Live(raw - capacity)
        } else {
            SlotRef::Buffered(raw)
        }
    }

    pub fn is_buffered(self) -> bool {
        matches!(self, SlotRef::Buffered(_))
    }

    /// Live slot this endpoint occupies once `record` has been restored.
    pub fn resolve(self, record: &DeletionRecord) -> usize {
        match self {
            SlotRef::Live(slot) => slot,
            SlotRef::Buffered(slot) => record.restored_slot(slot),
        }
    }
}

/// Outcome of one pre-deletion slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotFate {
    Kept(usize),
    Removed(usize),
}

/// Scratch buffer of exactly `capacity` slots, written from the tail.
#[derive(Clone, Debug)]
pub struct ParticleBuffer {
    slots: Vec<Option<Particle>>,
    head: usize,
}

impl ParticleBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            head: capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.head
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push_front(&mut self, particle: Particle) -> usize {
        assert!(self.head > 0, "scratch buffer overflow");
        self.head -= 1;
        self.slots[self.head] = Some(particle);
        self.head
    }

    pub fn get(&self, slot: usize) -> Option<&Particle> {
        self.slots.get(slot).and_then(|p| p.as_ref())
    }

    /// Occupied slots in the order they were written (tail first).
    pub fn write_order(&self) -> impl Iterator<Item = (usize, &Particle)> + '_ {
        (self.head..self.slots.len()).rev().filter_map(move |slot| {
            self.slots[slot].as_ref().map(|p| (slot, p))
        })
    }
}

/// Everything needed to undo a bulk deletion.
#[derive(Clone, Debug)]
pub struct DeletionRecord {
    fates: Vec<SlotFate>,
    old_live_count: usize,
    new_live_count: usize,
    buffer: ParticleBuffer,
}

impl DeletionRecord {
    pub fn fate(&self, old_slot: usize) -> SlotFate {
        self.fates[old_slot]
    }

    pub fn fates(&self) -> &[SlotFate] {
        &self.fates
    }

    pub fn locate(&self, old_slot: usize) -> SlotRef {
        match self.fates[old_slot] {
            SlotFate::Kept(slot) => SlotRef::Live(slot),
            SlotFate::Removed(slot) => SlotRef::Buffered(slot),
        }
    }

    pub fn old_live_count(&self) -> usize {
        self.old_live_count
    }

    pub fn new_live_count(&self) -> usize {
        self.new_live_count
    }

    pub fn removed_count(&self) -> usize {
        self.old_live_count - self.new_live_count
    }

    pub fn is_noop(&self) -> bool {
        self.removed_count() == 0
    }

    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    /// (old slot, new slot) for every survivor
    pub fn survivors(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.fates.iter().enumerate().filter_map(|(old, fate)| match fate {
            SlotFate::Kept(new) => Some((old, *new)),
            SlotFate::Removed(_) => None,
        })
    }

    /// (old slot, buffer slot) for every removed particle
    pub fn removed(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.fates.iter().enumerate().filter_map(|(old, fate)| match fate {
            SlotFate::Removed(buf) => Some((old, *buf)),
            SlotFate::Kept(_) => None,
        })
    }

    /// Live slot a buffered particle re-enters at on restore.
    pub fn restored_slot(&self, buffer_slot: usize) -> usize {
        let capacity = self.buffer.capacity();
        assert!(
            buffer_slot >= capacity - self.removed_count() && buffer_slot < capacity,
            "buffer slot {} was never written by this deletion",
            buffer_slot
        );
        self.new_live_count + (capacity - 1 - buffer_slot)
    }

    /// For each slot after `restore_particles`, the slot that particle held
    /// before the deletion.
    pub fn original_slots(&self) -> Vec<usize> {
        let mut original = vec![0; self.old_live_count];
        for (old, new) in self.survivors() {
            original[new] = old;
        }
        for (old, buffer_slot) in self.removed() {
            original[self.restored_slot(buffer_slot)] = old;
        }
        original
    }
}

impl ParticleStore {
    /// Remove the given live slots. Survivors are compacted in their original
    /// relative order; removed particles move into the returned record.
    ///
    /// Panics if any index is not a live slot.
    pub fn delete_particles<I>(&mut self, indices: I) -> DeletionRecord
    where
        I: IntoIterator<Item = usize>,
    {
        profile_scope!("delete_particles");
        let doomed: BTreeSet<usize> = indices.into_iter().collect();
        let old_live_count = self.len();
        if let Some(&last) = doomed.iter().next_back() {
            assert!(
                last < old_live_count,
                "cannot delete slot {}: only {} live particles",
                last,
                old_live_count
            );
        }

        let capacity = self.capacity();
        let mut buffer = ParticleBuffer::with_capacity(capacity);
        let mut fates = Vec::with_capacity(old_live_count);
        let mut survivors = Vec::with_capacity(capacity);
        for (old, particle) in self.particles_mut().drain(..).enumerate() {
            if doomed.contains(&old) {
                fates.push(SlotFate::Removed(buffer.push_front(particle)));
            } else {
                fates.push(SlotFate::Kept(survivors.len()));
                survivors.push(particle);
            }
        }
        let new_live_count = survivors.len();
        *self.particles_mut() = survivors;

        DeletionRecord {
            fates,
            old_live_count,
            new_live_count,
            buffer,
        }
    }

    /// Re-open live slots for every buffered particle, in write order.
    /// Returns the slots the particles now occupy.
    ///
    /// Panics if the store is not in the state the deletion left it in.
    pub fn restore_particles(&mut self, record: &DeletionRecord) -> Vec<usize> {
        profile_scope!("restore_particles");
        assert_eq!(
            self.len(),
            record.new_live_count,
            "store changed since the deletion being restored"
        );
        assert!(
            record.removed_count() <= self.free_slots(),
            "no room to restore {} particles",
            record.removed_count()
        );
        let mut slots = Vec::with_capacity(record.removed_count());
        for (buffer_slot, particle) in record.buffer.write_order() {
            let slot = self.len();
            debug_assert_eq!(slot, record.restored_slot(buffer_slot));
            self.particles_mut().push(particle.clone());
            slots.push(slot);
        }
        slots
    }
}
