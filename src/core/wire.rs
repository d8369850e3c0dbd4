//! # Wire Format
//!
//! Bit-exact encoding of [`Header`] in network byte order.
//!
//! ## Long form
//! ```text
//! [1|F|TT|0000] [Version(4)] [DCID Len(1)] [DCID(n)] [SCID Len(1)] [SCID(m)] [PN(4)]
//! ```
//! The packet number is absent when the version is 0 (version negotiation).
//!
//! ## Short form
//! ```text
//! [0|F|S|00|K|PP] [DCID(n)] [PN(1|2|4)]
//! ```
//! `PP` selects a 1, 2 or 4 byte packet number. Short headers carry no DCID
//! length; the decoder takes it from [`CodecConfig::short_header_dcid_len`].
//!
//! `serialized_size()` is exactly what `serialize` writes and what
//! `deserialize` consumes for the same header.

use crate::config::{CodecConfig, MAX_CONNECTION_ID_LEN};
use crate::core::connection_id::ConnectionId;
use crate::core::header::Header;
use crate::core::packet_number::{PacketNumberLength, LONG_PACKET_NUMBER_LEN};
use crate::core::types::{
    HeaderForm, LongType, FIXED_BIT, KEY_PHASE_BIT, LONG_RESERVED_MASK, LONG_TYPE_MASK,
    LONG_TYPE_SHIFT, PACKET_NUMBER_LENGTH_MASK, SHORT_RESERVED_MASK, SPIN_BIT,
};
use crate::error::{ProtocolError, Result};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::IoSlice;
use tracing::{debug, trace};

/// Flags + version + DCID length + SCID length
const LONG_FIXED_LEN: usize = 1 + 4 + 1 + 1;

/// Largest header the decoder can accept
const MAX_HEADER_LEN: usize = LONG_FIXED_LEN + 2 * MAX_CONNECTION_ID_LEN + LONG_PACKET_NUMBER_LEN;

/// Chunks gathered from a segmented buffer before decoding
const MAX_GATHER_CHUNKS: usize = 16;

impl Header {
    /// Exact number of bytes this header occupies on the wire
    pub fn serialized_size(&self) -> usize {
        match self.form {
            HeaderForm::Long => {
                let pn = if self.is_version_negotiation() {
                    0
                } else {
                    LONG_PACKET_NUMBER_LEN
                };
                LONG_FIXED_LEN + self.dcid.len() + self.scid.len() + pn
            }
            HeaderForm::Short => {
                let dcid = if self.dcid_present { self.dcid.len() } else { 0 };
                1 + dcid + self.pn_len.bytes()
            }
        }
    }

    /// Flags byte as written on the wire
    pub fn flags_byte(&self) -> Result<u8> {
        let mut flags = self.form.bit();
        if self.fixed_bit {
            flags |= FIXED_BIT;
        }
        match self.form {
            HeaderForm::Long => flags |= self.long_type.wire_bits()? << LONG_TYPE_SHIFT,
            HeaderForm::Short => {
                if self.spin_bit {
                    flags |= SPIN_BIT;
                }
                if self.key_phase_bit {
                    flags |= KEY_PHASE_BIT;
                }
                flags |= self.pn_len.code();
            }
        }
        Ok(flags)
    }

    /// Write the header into `buf`, returning the number of bytes written.
    ///
    /// Nothing is written if the header is invalid or `buf` lacks room.
    pub fn serialize<B: BufMut>(&self, buf: &mut B) -> Result<usize> {
        self.validate()?;
        let size = self.serialized_size();
        if buf.remaining_mut() < size {
            return Err(ProtocolError::BufferTooShort {
                needed: size,
                available: buf.remaining_mut(),
            });
        }

        buf.put_u8(self.flags_byte()?);
        match self.form {
            HeaderForm::Long => {
                buf.put_u32(self.version);
                buf.put_u8(self.dcid.len() as u8);
                buf.put_slice(self.dcid.as_bytes());
                buf.put_u8(self.scid.len() as u8);
                buf.put_slice(self.scid.as_bytes());
                if !self.is_version_negotiation() {
                    buf.put_u32(self.packet_number);
                }
            }
            HeaderForm::Short => {
                if self.dcid_present {
                    buf.put_slice(self.dcid.as_bytes());
                }
                match self.pn_len {
                    PacketNumberLength::One => buf.put_u8(self.packet_number as u8),
                    PacketNumberLength::Two => buf.put_u16(self.packet_number as u16),
                    PacketNumberLength::Four => buf.put_u32(self.packet_number),
                }
            }
        }

        trace!(form = self.form.name(), size, "Serialized header");
        Ok(size)
    }

    /// Encode into a freshly allocated buffer
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.serialized_size());
        self.serialize(&mut buf)?;
        Ok(buf.freeze())
    }

    /// Decode a header from the front of `data`, returning it and the bytes consumed
    pub fn from_bytes(data: &[u8], config: &CodecConfig) -> Result<(Self, usize)> {
        match decode(data, config) {
            Ok(decoded) => Ok(decoded),
            Err(e) => {
                debug!(error = %e, available = data.len(), "Rejected header");
                Err(e)
            }
        }
    }

    /// Replace `self` with the header at the cursor of `buf` and advance past it.
    ///
    /// All or nothing: on error neither `self` nor `buf` change. A header
    /// split across the chunks of a segmented buffer (such as `Chain`) is
    /// gathered into scratch space before decoding.
    pub fn deserialize<B: Buf>(&mut self, buf: &mut B, config: &CodecConfig) -> Result<usize> {
        let chunk = buf.chunk();
        let (header, consumed) = if chunk.len() >= buf.remaining().min(MAX_HEADER_LEN) {
            Self::from_bytes(chunk, config)?
        } else {
            let mut scratch = [0u8; MAX_HEADER_LEN];
            let gathered = gather(buf, &mut scratch);
            Self::from_bytes(&scratch[..gathered], config)?
        };
        buf.advance(consumed);
        *self = header;

        trace!(form = self.form.name(), consumed, "Deserialized header");
        Ok(consumed)
    }
}

/// Copy the front of `buf` into `scratch` without advancing it
fn gather<B: Buf>(buf: &B, scratch: &mut [u8]) -> usize {
    let mut slices = [IoSlice::new(&[]); MAX_GATHER_CHUNKS];
    let count = buf.chunks_vectored(&mut slices);

    let mut filled = 0;
    for slice in &slices[..count] {
        let n = slice.len().min(scratch.len() - filled);
        scratch[filled..filled + n].copy_from_slice(&slice[..n]);
        filled += n;
        if filled == scratch.len() {
            break;
        }
    }
    trace!(filled, chunks = count, "Gathered segmented header bytes");
    filled
}

/// Bounds-checked cursor over the input
struct Reader<'a> {
    buf: &'a [u8],
    total: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            buf: data,
            total: data.len(),
        }
    }

    fn consumed(&self) -> usize {
        self.total - self.buf.len()
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if self.buf.remaining() < n {
            return Err(ProtocolError::BufferTooShort {
                needed: self.consumed() + n,
                available: self.total,
            });
        }
        Ok(())
    }

    fn u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    fn u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.buf.get_u16())
    }

    fn u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.buf.get_u32())
    }

    fn connection_id(&mut self, len: usize, max: usize) -> Result<ConnectionId> {
        if len > max {
            return Err(ProtocolError::InvalidConnectionIdLength(len));
        }
        self.ensure(len)?;
        let cid = ConnectionId::from_slice(&self.buf[..len])?;
        self.buf.advance(len);
        Ok(cid)
    }
}

pub(crate) fn decode(data: &[u8], config: &CodecConfig) -> Result<(Header, usize)> {
    let mut reader = Reader::new(data);
    let flags = reader.u8()?;

    let mut header = Header::default();
    header.fixed_bit = flags & FIXED_BIT != 0;
    if !header.fixed_bit && config.require_fixed_bit {
        return Err(ProtocolError::InvalidFixedBit);
    }

    match HeaderForm::from_flags(flags) {
        HeaderForm::Long => {
            if config.reject_reserved_bits && flags & LONG_RESERVED_MASK != 0 {
                return Err(ProtocolError::ReservedBitsSet(flags));
            }
            header.form = HeaderForm::Long;
            header.version = reader.u32()?;

            let dcid_len = reader.u8()? as usize;
            header.dcid = reader.connection_id(dcid_len, config.max_connection_id_len)?;
            header.dcid_present = true;
            let scid_len = reader.u8()? as usize;
            header.scid = reader.connection_id(scid_len, config.max_connection_id_len)?;

            if header.version == 0 {
                header.long_type = LongType::VersionNegotiation;
            } else {
                header.long_type =
                    LongType::from_wire_bits((flags & LONG_TYPE_MASK) >> LONG_TYPE_SHIFT);
                header.packet_number = reader.u32()?;
            }
        }
        HeaderForm::Short => {
            if config.reject_reserved_bits && flags & SHORT_RESERVED_MASK != 0 {
                return Err(ProtocolError::ReservedBitsSet(flags));
            }
            header.spin_bit = flags & SPIN_BIT != 0;
            header.key_phase_bit = flags & KEY_PHASE_BIT != 0;
            header.pn_len = PacketNumberLength::from_code(flags & PACKET_NUMBER_LENGTH_MASK)?;

            if config.short_header_dcid_len > 0 {
                header.dcid = reader
                    .connection_id(config.short_header_dcid_len, config.max_connection_id_len)?;
                header.dcid_present = true;
            }

            // width comes from the flags, not from the value
            header.packet_number = match header.pn_len {
                PacketNumberLength::One => u32::from(reader.u8()?),
                PacketNumberLength::Two => u32::from(reader.u16()?),
                PacketNumberLength::Four => reader.u32()?,
            };
        }
    }

    let consumed = reader.consumed();
    debug_assert_eq!(consumed, header.serialized_size());
    Ok((header, consumed))
}
