//! Packet number width selection.
//!
//! Short headers encode the packet number in the fewest of 1, 2 or 4 bytes
//! that hold the value; the choice is carried in the low two bits of the
//! flags byte. Long headers always use 4 bytes.

use crate::error::{ProtocolError, Result};

/// Width of the long-form packet number field, in bytes
pub const LONG_PACKET_NUMBER_LEN: usize = 4;

/// Short-form packet number width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PacketNumberLength {
    #[default]
    One,
    Two,
    Four,
}

impl PacketNumberLength {
    /// Smallest width covering `value`
    pub fn for_value(value: u32) -> Self {
        if value < 1 << 8 {
            PacketNumberLength::One
        } else if value < 1 << 16 {
            PacketNumberLength::Two
        } else {
            PacketNumberLength::Four
        }
    }

    /// Two-bit code carried in the short flags byte
    pub fn code(self) -> u8 {
        match self {
            PacketNumberLength::One => 0b00,
            PacketNumberLength::Two => 0b01,
            PacketNumberLength::Four => 0b10,
        }
    }

    /// Width named by a two-bit code. `0b11` has no width in this layout.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0b00 => Ok(PacketNumberLength::One),
            0b01 => Ok(PacketNumberLength::Two),
            0b10 => Ok(PacketNumberLength::Four),
            other => Err(ProtocolError::InvalidPacketNumberLength(other)),
        }
    }

    #[inline]
    pub fn bytes(self) -> usize {
        match self {
            PacketNumberLength::One => 1,
            PacketNumberLength::Two => 2,
            PacketNumberLength::Four => 4,
        }
    }

    #[inline]
    pub fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }

    /// Diagnostic label
    pub fn label(self) -> &'static str {
        match self {
            PacketNumberLength::One => "1 Octet",
            PacketNumberLength::Two => "2 Octets",
            PacketNumberLength::Four => "4 Octets",
        }
    }
}
