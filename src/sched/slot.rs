//! The logical slot table and the advertising-set pool.
//!
//! A [`Slot`] is one logical advertisement definition: its payload source, its immutable
//! advertising interval, and the hardware set currently carrying it (if any). The whole table is
//! one owned aggregate; nothing else in the crate holds slot state, and all mutation goes through
//! the scheduler.
//!
//! [`Slot`]: struct.Slot.html

use crate::payload::PayloadSource;
use crate::radio::AdvHandle;
use crate::time::AdvInterval;
use crate::Error;

/// Number of logical advertisement definitions in the rotation.
///
/// The controller's supported set count is clamped to this, so at most `SLOT_COUNT` sets are ever
/// in use.
pub const SLOT_COUNT: usize = 5;

/// One logical advertisement definition.
pub struct Slot<P: PayloadSource> {
    source: P,
    interval: AdvInterval,
    handle: Option<AdvHandle>,
}

impl<P: PayloadSource> Slot<P> {
    /// Creates an inactive slot broadcasting `source`'s payload at `interval`.
    pub fn new(source: P, interval: AdvInterval) -> Self {
        Slot {
            source,
            interval,
            handle: None,
        }
    }

    /// Returns the advertising interval of this definition.
    pub fn interval(&self) -> AdvInterval {
        self.interval
    }

    /// Returns the advertising set currently carrying this definition, if any.
    pub fn handle(&self) -> Option<AdvHandle> {
        self.handle
    }

    /// Returns whether this definition is currently broadcasting.
    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub(crate) fn source_mut(&mut self) -> &mut P {
        &mut self.source
    }

    pub(crate) fn assign(&mut self, handle: AdvHandle) {
        self.handle = Some(handle);
    }
}

/// Outcome of releasing a slot.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Released {
    /// The slot was broadcasting; its set was reclaimed and must be stopped before reuse.
    Reclaimed(AdvHandle),

    /// The slot was already idle; this is the first set no slot currently holds. It is not
    /// transmitting, so no stop is needed.
    Spare(AdvHandle),
}

impl Released {
    /// Returns the freed handle regardless of how it was obtained.
    pub fn handle(&self) -> AdvHandle {
        match *self {
            Released::Reclaimed(handle) | Released::Spare(handle) => handle,
        }
    }
}

/// The fixed table of logical definitions plus the pool bookkeeping.
pub struct SlotTable<P: PayloadSource> {
    slots: [Slot<P>; SLOT_COUNT],
    supported: u8,
}

impl<P: PayloadSource> SlotTable<P> {
    /// Creates a table from `SLOT_COUNT` inactive slots.
    ///
    /// The supported set count starts at 0 and is filled in by the scheduler once the controller
    /// has been queried.
    pub fn new(slots: [Slot<P>; SLOT_COUNT]) -> Self {
        SlotTable {
            slots,
            supported: 0,
        }
    }

    pub(crate) fn set_supported(&mut self, count: u8) {
        self.supported = count.min(SLOT_COUNT as u8);
    }

    /// Returns the number of advertising sets available to the rotation.
    pub fn supported(&self) -> u8 {
        self.supported
    }

    /// Returns the slot at `idx`.
    ///
    /// # Panics
    ///
    /// Panics when `idx >= SLOT_COUNT`.
    pub fn slot(&self, idx: usize) -> &Slot<P> {
        &self.slots[idx]
    }

    pub(crate) fn slot_mut(&mut self, idx: usize) -> &mut Slot<P> {
        &mut self.slots[idx]
    }

    /// Returns the number of definitions currently broadcasting.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    /// Returns the index of the slot holding `handle`, if any.
    pub fn holder_of(&self, handle: AdvHandle) -> Option<usize> {
        self.slots.iter().position(|s| s.handle() == Some(handle))
    }

    /// Frees an advertising set on behalf of the slot at `idx`.
    ///
    /// If the slot is broadcasting, its set is taken back and returned as
    /// [`Released::Reclaimed`]; the caller must stop that set before reusing it. If the slot is
    /// idle, the table is searched linearly for the first set held by no slot, returned as
    /// [`Released::Spare`] without mutating anything, so repeating the call yields the same
    /// result.
    ///
    /// Returns `Error::Exhausted` when every supported set is in use (and nothing is mutated).
    ///
    /// [`Released::Reclaimed`]: enum.Released.html#variant.Reclaimed
    /// [`Released::Spare`]: enum.Released.html#variant.Spare
    pub fn release(&mut self, idx: usize) -> Result<Released, Error> {
        if let Some(handle) = self.slots[idx].handle.take() {
            return Ok(Released::Reclaimed(handle));
        }

        // A set is free only if no slot at all holds it.
        for raw in 1..=self.supported {
            if let Some(handle) = AdvHandle::new(raw) {
                if self.holder_of(handle).is_none() {
                    return Ok(Released::Spare(handle));
                }
            }
        }

        Err(Error::Exhausted)
    }
}
