//! Connection identifiers.
//!
//! Opaque byte strings of 0 to 20 bytes. Ids built from a `u64` are the
//! 8-byte big-endian encoding of that value.

use crate::config::MAX_CONNECTION_ID_LEN;
use crate::error::{ProtocolError, Result};
use std::fmt;

/// Inline connection id, `Copy` so headers stay plain values
///
/// Bytes past `len` are always zero, so the derived comparisons only see the id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId {
    bytes: [u8; MAX_CONNECTION_ID_LEN],
    len: u8,
}

impl ConnectionId {
    /// Zero-length id
    pub const EMPTY: Self = Self {
        bytes: [0; MAX_CONNECTION_ID_LEN],
        len: 0,
    };

    /// Copy an id out of `data`
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        if data.len() > MAX_CONNECTION_ID_LEN {
            return Err(ProtocolError::InvalidConnectionIdLength(data.len()));
        }
        let mut bytes = [0; MAX_CONNECTION_ID_LEN];
        bytes[..data.len()].copy_from_slice(data);
        Ok(Self {
            bytes,
            len: data.len() as u8,
        })
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Value of an id of at most 8 bytes, read big-endian
    pub fn to_u64(&self) -> Option<u64> {
        if self.len() > 8 {
            return None;
        }
        Some(
            self.as_bytes()
                .iter()
                .fold(0u64, |acc, b| (acc << 8) | u64::from(*b)),
        )
    }
}

impl Default for ConnectionId {
    /// The zero 64-bit id
    fn default() -> Self {
        Self::from(0u64)
    }
}

impl From<u64> for ConnectionId {
    fn from(value: u64) -> Self {
        let mut bytes = [0; MAX_CONNECTION_ID_LEN];
        bytes[..8].copy_from_slice(&value.to_be_bytes());
        Self { bytes, len: 8 }
    }
}

impl TryFrom<&[u8]> for ConnectionId {
    type Error = ProtocolError;

    fn try_from(data: &[u8]) -> Result<Self> {
        Self::from_slice(data)
    }
}

impl AsRef<[u8]> for ConnectionId {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.as_bytes() {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionId({self})")
    }
}
