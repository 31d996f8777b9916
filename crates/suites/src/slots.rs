//! Per-thread result slots.
//!
//! A pre-sized arena indexed by worker id. Each worker writes only its own
//! slot, and each slot accepts exactly one write, so recording needs no lock
//! and a second write is reported instead of silently overwriting.

use mtfs_core::{Errno, Error, Result, SlotError};
use std::sync::OnceLock;

/// Write-once slots, one per worker.
#[derive(Debug)]
pub struct ResultSlots<T> {
    slots: Box<[OnceLock<T>]>,
}

impl<T> ResultSlots<T> {
    /// `len` empty slots.
    ///
    /// # Errors
    ///
    /// `OutOfMemory` when `len` slots cannot be allocated.
    pub fn new(len: usize) -> Result<Self> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(len)
            .map_err(|_| Error::OutOfMemory {
                what: "result slots",
                count: len,
            })?;
        slots.extend((0..len).map(|_| OnceLock::new()));
        Ok(Self {
            slots: slots.into_boxed_slice(),
        })
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when sized for zero workers.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Record the outcome of worker `index`.
    pub fn record(&self, index: usize, value: T) -> std::result::Result<(), SlotError> {
        let slot = self.slots.get(index).ok_or(SlotError::OutOfRange {
            index,
            len: self.slots.len(),
        })?;
        slot.set(value)
            .map_err(|_| SlotError::AlreadyRecorded { index })
    }

    /// The outcome of worker `index`, if it recorded one.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(OnceLock::get)
    }

    /// Slots in id order; `None` for workers that never recorded.
    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> + '_ {
        self.slots.iter().map(OnceLock::get)
    }

    /// Number of slots written so far.
    pub fn recorded(&self) -> usize {
        self.slots.iter().filter(|s| s.get().is_some()).count()
    }
}

impl ResultSlots<Errno> {
    /// Codes in id order, `NOT_RUN` for empty slots.
    pub fn codes(&self) -> impl Iterator<Item = Errno> + '_ {
        self.iter().map(|slot| slot.copied().unwrap_or(Errno::NOT_RUN))
    }
}
