//! Device addresses for advertising sets.
//!
//! Every simultaneously active advertising set needs its own on-air address, or scanners would
//! see two unrelated payloads attributed to one device. Addresses are derived per logical slot,
//! not per hardware set, so a definition keeps its address no matter which set carries it.

use core::fmt;

/// Base of the per-slot random addresses; byte 1 carries the slot index.
const SLOT_ADDR_BASE: [u8; 6] = [0x40, 0x01, 0x02, 0x03, 0x04, 0x05];

/// Specifies whether a device address is randomly generated or a registered MAC address.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AddressKind {
    /// Publicly registered IEEE 802-2001 LAN MAC address.
    Public,
    /// Randomly generated address.
    Random,
}

/// A Bluetooth device address.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct DeviceAddress {
    bytes: [u8; 6],
    kind: AddressKind,
}

impl DeviceAddress {
    /// Create a new device address from 6 raw Bytes and an address kind specifier.
    ///
    /// The `bytes` array contains the address Bytes as they are sent over the air (LSB first).
    pub fn new(bytes: [u8; 6], kind: AddressKind) -> Self {
        DeviceAddress { bytes, kind }
    }

    /// Derives the random address broadcast for the logical slot at `slot`.
    ///
    /// Injecting the slot index into one byte of a fixed base keeps the addresses of all
    /// simultaneously active sets distinct.
    pub fn for_slot(slot: u8) -> Self {
        let mut bytes = SLOT_ADDR_BASE;
        bytes[1] = slot;
        DeviceAddress {
            bytes,
            kind: AddressKind::Random,
        }
    }

    /// Returns the address kind.
    pub fn kind(&self) -> AddressKind {
        self.kind
    }

    /// Returns whether this address is randomly generated.
    pub fn is_random(&self) -> bool {
        self.kind == AddressKind::Random
    }

    /// Returns the raw bytes making up this address.
    pub fn raw(&self) -> &[u8; 6] {
        &self.bytes
    }
}

impl fmt::Debug for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.bytes.iter().enumerate() {
            if i != 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02X}", b)?;
        }

        write!(f, " ({:?})", self.kind)?;

        Ok(())
    }
}
