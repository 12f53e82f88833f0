//! Advertising set parameters.
//!
//! Every rotating definition is broadcast with the same fixed profile, only the interval differs:
//! connectable and scannable legacy events at maximum TX power on all three primary channels,
//! random own and peer address types, and scan-request notifications enabled.

use crate::address::AddressKind;
use crate::radio::AdvHandle;
use crate::time::AdvInterval;
use bitflags::bitflags;

bitflags! {
    /// Event properties of an extended advertising set.
    ///
    /// The bit layout matches the event properties field of the LE extended advertising parameter
    /// command.
    pub struct EventProperties: u16 {
        const CONNECTABLE = 0x0001;
        const SCANNABLE = 0x0002;
        const DIRECTED = 0x0004;
        const HIGH_DUTY_DIRECTED = 0x0008;
        const LEGACY = 0x0010;
        const ANONYMOUS = 0x0020;
        const INCLUDE_TX_POWER = 0x0040;
    }
}

bitflags! {
    /// A map marking primary advertising channels as used.
    pub struct AdvChannels: u8 {
        const CH37 = 0x01;
        const CH38 = 0x02;
        const CH39 = 0x04;
    }
}

impl Default for AdvChannels {
    fn default() -> Self {
        AdvChannels::all()
    }
}

/// Whether scan and connect requests from unknown devices are processed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FilterPolicy {
    /// Process scan and connect requests from any device.
    Any,
    /// Only process scan requests from devices on the filter list.
    FilterScan,
    /// Only process connect requests from devices on the filter list.
    FilterConnect,
    /// Only process scan and connect requests from devices on the filter list.
    FilterBoth,
}

/// The physical layer used for the primary advertisement.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Phy {
    OneM,
    TwoM,
    Coded,
}

/// Maximum transmit power selector.
///
/// The controller clamps this to whatever its radio can actually emit.
pub const TX_POWER_MAX: i8 = 0x7f;

/// Parameters programmed onto an advertising set before it is started.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AdvParams {
    pub properties: EventProperties,
    pub interval_min: AdvInterval,
    pub interval_max: AdvInterval,
    pub channels: AdvChannels,
    pub own_address: AddressKind,
    pub peer_address: AddressKind,
    pub filter: FilterPolicy,
    pub tx_power: i8,
    pub primary_phy: Phy,
    pub scan_request_notify: bool,
}

impl AdvParams {
    /// Builds the fixed rotation profile for a definition with the given interval.
    ///
    /// Minimum and maximum interval are both set to `interval`, pinning the advertising cadence
    /// exactly.
    pub fn for_interval(interval: AdvInterval) -> Self {
        AdvParams {
            properties: EventProperties::CONNECTABLE
                | EventProperties::SCANNABLE
                | EventProperties::LEGACY,
            interval_min: interval,
            interval_max: interval,
            channels: AdvChannels::all(),
            own_address: AddressKind::Random,
            peer_address: AddressKind::Random,
            filter: FilterPolicy::Any,
            tx_power: TX_POWER_MAX,
            primary_phy: Phy::OneM,
            scan_request_notify: true,
        }
    }
}

/// Transmit budget handed to the controller when a set is started.
///
/// `duration` is in units of 10 ms; `0` means "advertise until told to stop". `max_events` caps
/// the number of advertising events, `0` for no cap.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct DurationBudget {
    pub duration: u16,
    pub max_events: u8,
}

impl DurationBudget {
    /// Returns the per-set budget used by the rotation.
    ///
    /// Each set gets a duration equal to its handle value, staggering when the controller reports
    /// the sets as finished.
    pub fn for_handle(handle: AdvHandle) -> Self {
        DurationBudget {
            duration: u16::from(handle.raw()),
            max_events: 0,
        }
    }
}
