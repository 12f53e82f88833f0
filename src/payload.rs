//! Advertising payload buffers and the payload-source capability.
//!
//! The rotation does not know or care what the broadcast bytes mean. Each logical definition
//! carries a [`PayloadSource`] that is asked to fill a [`PayloadBuf`] every time the definition is
//! activated, so sources with changing content (counters, sensor readings) are re-queried on every
//! activation. Applications typically implement the trait on an enum with one variant per
//! definition kind.
//!
//! [`PayloadSource`]: trait.PayloadSource.html
//! [`PayloadBuf`]: struct.PayloadBuf.html

use crate::Error;
use byteorder::{ByteOrder, LittleEndian};
use core::fmt;

/// Maximum number of payload octets in a legacy advertising PDU.
pub const MAX_ADV_DATA_LEN: usize = 31;

/// A fixed-capacity buffer holding one advertising payload.
pub struct PayloadBuf {
    buf: [u8; MAX_ADV_DATA_LEN],
    len: u8,
}

impl PayloadBuf {
    /// Creates an empty payload buffer.
    pub fn new() -> Self {
        PayloadBuf {
            buf: [0; MAX_ADV_DATA_LEN],
            len: 0,
        }
    }

    /// Appends a single Byte.
    pub fn push(&mut self, byte: u8) -> Result<(), Error> {
        if self.space_left() < 1 {
            return Err(Error::Eof);
        }
        self.buf[usize::from(self.len)] = byte;
        self.len += 1;
        Ok(())
    }

    /// Appends a Byte slice.
    pub fn push_slice(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if self.space_left() < bytes.len() {
            return Err(Error::Eof);
        }
        let start = usize::from(self.len);
        self.buf[start..start + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len() as u8;
        Ok(())
    }

    /// Appends a `u16` in little-endian Byte order.
    pub fn push_u16_le(&mut self, value: u16) -> Result<(), Error> {
        let mut bytes = [0; 2];
        LittleEndian::write_u16(&mut bytes, value);
        self.push_slice(&bytes)
    }

    /// Appends a `u32` in little-endian Byte order.
    pub fn push_u32_le(&mut self, value: u32) -> Result<(), Error> {
        let mut bytes = [0; 4];
        LittleEndian::write_u32(&mut bytes, value);
        self.push_slice(&bytes)
    }

    /// Appends a length-prefixed AD structure with type tag `ty`.
    ///
    /// The length Byte covers the type tag and `data`, matching the GAP advertising data format.
    pub fn push_ad(&mut self, ty: u8, data: &[u8]) -> Result<(), Error> {
        if self.space_left() < data.len() + 2 {
            return Err(Error::Eof);
        }
        self.push(data.len() as u8 + 1)?;
        self.push(ty)?;
        self.push_slice(data)
    }

    /// Returns the filled part of the buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..usize::from(self.len)]
    }

    /// Returns the number of Bytes written so far.
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// Returns whether nothing was written yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of Bytes still available.
    pub fn space_left(&self) -> usize {
        MAX_ADV_DATA_LEN - usize::from(self.len)
    }

    /// Resets the buffer to empty.
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl Default for PayloadBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PayloadBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, byte) in self.as_slice().iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        f.write_str("]")
    }
}

/// Capability of producing the broadcast bytes for one logical definition.
///
/// Implementations may be stateful; `fill` is invoked once per activation of the definition, so
/// content that changes over time (frame counters, uptime) is picked up when the rotation next
/// reaches the definition.
pub trait PayloadSource {
    /// Writes the current payload into `buf`.
    ///
    /// `buf` is empty when this is called. Returns `Error::Eof` if the payload does not fit.
    fn fill(&mut self, buf: &mut PayloadBuf) -> Result<(), Error>;
}
