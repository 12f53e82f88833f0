//! The controller seam.
//!
//! The scheduler never talks to BLE hardware directly. The platform implements [`AdvRadio`] once
//! per vendor stack and forwards each method to the corresponding stack call. All methods are
//! fire-and-forget: they return as soon as the stack accepted the command, and completion (if any)
//! is reported later through the platform's event delivery, never awaited inline.
//!
//! [`AdvRadio`]: trait.AdvRadio.html

use crate::address::DeviceAddress;
use crate::params::{AdvParams, DurationBudget};
use crate::Error;
use core::fmt;
use core::num::NonZeroU8;

/// Handle of one hardware advertising set.
///
/// Handles are 1-based, `1..=supported`, so `Option<AdvHandle>` replaces the usual zero sentinel
/// at no size cost.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct AdvHandle(NonZeroU8);

impl AdvHandle {
    /// Creates a handle from its raw value. Returns `None` for the reserved value 0.
    pub fn new(raw: u8) -> Option<Self> {
        NonZeroU8::new(raw).map(AdvHandle)
    }

    /// Returns the handle used for slot `slot` in the identity-like initial assignment.
    pub fn for_slot(slot: u8) -> Self {
        match Self::new(slot + 1) {
            Some(handle) => handle,
            // `slot + 1` is never 0 for the slot counts this crate supports
            None => unreachable!(),
        }
    }

    /// Returns the raw handle value passed to the controller.
    pub fn raw(&self) -> u8 {
        self.0.get()
    }
}

impl fmt::Display for AdvHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Debug for AdvHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}

/// Duty mode of the generic discoverable advertisement.
///
/// This advertisement exists alongside the rotating sets and is what a peer connects to.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DiscoverableMode {
    /// Not discoverable.
    Off,
    /// High duty cycle, used right after boot and after a disconnect.
    High,
    /// Low duty cycle, entered when high-duty advertising timed out without a connection.
    Low,
}

/// Interface to the platform's BLE controller.
///
/// One method per capability the rotation needs. Implementations translate each call into the
/// vendor stack's command and map a rejected command to [`Error::Rejected`].
///
/// [`Error::Rejected`]: ../enum.Error.html
pub trait AdvRadio {
    /// Queries how many advertising sets the controller supports concurrently.
    fn num_adv_sets(&mut self) -> u8;

    /// Programs the parameters of the set identified by `handle`.
    fn set_adv_params(&mut self, handle: AdvHandle, params: &AdvParams) -> Result<(), Error>;

    /// Programs the random device address the set broadcasts with.
    fn set_random_address(&mut self, handle: AdvHandle, address: DeviceAddress)
        -> Result<(), Error>;

    /// Installs the raw payload bytes on the set.
    fn set_adv_data(&mut self, handle: AdvHandle, data: &[u8]) -> Result<(), Error>;

    /// Commands the set to begin transmitting within the given budget.
    fn start_adv(&mut self, handle: AdvHandle, budget: DurationBudget) -> Result<(), Error>;

    /// Commands the set to cease transmitting.
    fn stop_adv(&mut self, handle: AdvHandle) -> Result<(), Error>;

    /// Installs the payload of the generic discoverable advertisement.
    fn set_discoverable_data(&mut self, data: &[u8]) -> Result<(), Error>;

    /// Switches the generic discoverable advertisement to the given mode.
    fn set_discoverable(&mut self, mode: DiscoverableMode) -> Result<(), Error>;
}
