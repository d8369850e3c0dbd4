//! Header form, long packet types, and the bit layout of the flags byte.

use crate::error::{ProtocolError, Result};

/// Header form bit (bit 7): 1 = long, 0 = short
pub const HEADER_FORM_BIT: u8 = 0x80;

/// Fixed bit (bit 6), always 1 on well-formed headers
pub const FIXED_BIT: u8 = 0x40;

/// Long packet type (bits 5-4)
pub const LONG_TYPE_MASK: u8 = 0x30;
pub const LONG_TYPE_SHIFT: u8 = 4;

/// Reserved low nibble of the long flags byte
pub const LONG_RESERVED_MASK: u8 = 0x0f;

/// Spin bit (short, bit 5)
pub const SPIN_BIT: u8 = 0x20;

/// Reserved bits (short, bits 4-3)
pub const SHORT_RESERVED_MASK: u8 = 0x18;

/// Key phase bit (short, bit 2)
pub const KEY_PHASE_BIT: u8 = 0x04;

/// Packet number length code (short, bits 1-0)
pub const PACKET_NUMBER_LENGTH_MASK: u8 = 0x03;

/// Header layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeaderForm {
    /// Compact 1-RTT layout
    #[default]
    Short,
    /// Connection-establishment layout with version and both connection ids
    Long,
}

impl HeaderForm {
    /// Value of the form bit for this layout
    pub fn bit(self) -> u8 {
        match self {
            HeaderForm::Short => 0,
            HeaderForm::Long => HEADER_FORM_BIT,
        }
    }

    /// Form selected by a flags byte
    pub fn from_flags(flags: u8) -> Self {
        if flags & HEADER_FORM_BIT != 0 {
            HeaderForm::Long
        } else {
            HeaderForm::Short
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HeaderForm::Short => "Short",
            HeaderForm::Long => "Long",
        }
    }
}

/// Long header packet type
///
/// `VersionNegotiation` is never carried by the type bits; it is signalled by
/// a zero version. `None` only exists while a header is being assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum LongType {
    Initial = 0,
    ZeroRtt = 1,
    Handshake = 2,
    Retry = 3,
    VersionNegotiation = 4,
    #[default]
    None = 5,
}

impl LongType {
    /// Model type code, as returned by `Header::type_byte`
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Two-bit code written into the flags byte
    pub fn wire_bits(self) -> Result<u8> {
        match self {
            LongType::Initial => Ok(0b00),
            LongType::ZeroRtt => Ok(0b01),
            LongType::Handshake => Ok(0b10),
            LongType::Retry => Ok(0b11),
            // unused by version negotiation, sent as zero
            LongType::VersionNegotiation => Ok(0b00),
            LongType::None => Err(ProtocolError::MissingLongType),
        }
    }

    /// Type named by the two type bits of a long flags byte
    pub fn from_wire_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => LongType::Initial,
            0b01 => LongType::ZeroRtt,
            0b10 => LongType::Handshake,
            _ => LongType::Retry,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            LongType::Initial => "Initial",
            LongType::ZeroRtt => "0-RTT Protected",
            LongType::Handshake => "Handshake",
            LongType::Retry => "Retry",
            LongType::VersionNegotiation => "Version Negotiation",
            LongType::None => "None",
        }
    }
}
