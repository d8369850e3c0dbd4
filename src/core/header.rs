//! # Header Model
//!
//! The in-memory QUIC packet header and the rules tying its fields together.
//!
//! A [`Header`] is either long form (connection establishment: version, both
//! connection ids, fixed 4-byte packet number) or short form (spin and key
//! phase bits, optional destination connection id, 1/2/4-byte packet number).
//! Fields that only exist for one form are reachable through accessors that
//! return [`ProtocolError::InvalidHeaderState`] on the other form.
//!
//! ## Derived fields
//! - The short-form packet number width follows the packet number: every
//!   `set_packet_number` picks the smallest of 1, 2 or 4 bytes.
//! - Connection id length fields follow the ids themselves.
//! - A long header is a version negotiation header iff its version is 0.
//!   `set_version(0)` switches the type to version negotiation, a non-zero
//!   version switches it away, and a version negotiation header has no
//!   packet number.
//!
//! ## Usage
//! ```rust
//! use quic_header::Header;
//!
//! let header = Header::initial(42u64, 1, 5)?;
//! assert!(header.is_initial());
//! assert_eq!(header.version()?, 1);
//!
//! let short = Header::short(7u64, 300, true, false, true);
//! assert_eq!(short.packet_number_bits(), 16);
//! # Ok::<(), quic_header::ProtocolError>(())
//! ```

use crate::core::connection_id::ConnectionId;
use crate::core::packet_number::PacketNumberLength;
use crate::core::types::{HeaderForm, LongType};
use crate::error::constants::{
    ERR_KEY_PHASE_ON_LONG, ERR_NEGOTIATION_VERSION, ERR_NO_CONNECTION_ID, ERR_SPIN_ON_LONG,
    ERR_VERSION_ON_SHORT, ERR_ZERO_VERSION,
};
use crate::error::{ProtocolError, Result};
use tracing::{debug, trace};

/// QUIC packet header
///
/// Equality follows the wire-visible fields of the header's form; see the
/// `PartialEq` impl.
#[derive(Debug, Clone, Copy)]
pub struct Header {
    pub(crate) form: HeaderForm,
    pub(crate) fixed_bit: bool,
    pub(crate) long_type: LongType,
    pub(crate) version: u32,
    pub(crate) dcid: ConnectionId,
    pub(crate) scid: ConnectionId,
    pub(crate) spin_bit: bool,
    pub(crate) key_phase_bit: bool,
    pub(crate) pn_len: PacketNumberLength,
    pub(crate) packet_number: u32,
    pub(crate) dcid_present: bool,
}

impl Default for Header {
    /// Short form, fixed bit set, everything else zeroed
    fn default() -> Self {
        Self {
            form: HeaderForm::Short,
            fixed_bit: true,
            long_type: LongType::None,
            version: 0,
            dcid: ConnectionId::default(),
            scid: ConnectionId::default(),
            spin_bit: false,
            key_phase_bit: false,
            pn_len: PacketNumberLength::One,
            packet_number: 0,
            dcid_present: false,
        }
    }
}

impl Header {
    /// Empty header of the given form
    pub fn new(form: HeaderForm) -> Self {
        let mut header = Self::default();
        header.set_form(form);
        header
    }

    fn new_long(
        long_type: LongType,
        connection_id: ConnectionId,
        version: u32,
        packet_number: u32,
    ) -> Result<Self> {
        if version == 0 {
            return Err(ProtocolError::InvalidHeaderState(ERR_ZERO_VERSION));
        }
        let mut header = Self::new(HeaderForm::Long);
        header.set_long_type(long_type);
        header.set_connection_id(connection_id);
        header.set_version(version)?;
        header.set_packet_number(packet_number);
        header.validate()?;

        debug!(
            kind = long_type.name(),
            dcid = %connection_id,
            version,
            packet_number,
            "Created long header"
        );
        Ok(header)
    }

    /// Initial packet header. `version` must be non-zero.
    pub fn initial(
        connection_id: impl Into<ConnectionId>,
        version: u32,
        packet_number: u32,
    ) -> Result<Self> {
        Self::new_long(
            LongType::Initial,
            connection_id.into(),
            version,
            packet_number,
        )
    }

    /// Handshake packet header. `version` must be non-zero.
    pub fn handshake(
        connection_id: impl Into<ConnectionId>,
        version: u32,
        packet_number: u32,
    ) -> Result<Self> {
        Self::new_long(
            LongType::Handshake,
            connection_id.into(),
            version,
            packet_number,
        )
    }

    /// 0-RTT packet header. `version` must be non-zero.
    pub fn zero_rtt(
        connection_id: impl Into<ConnectionId>,
        version: u32,
        packet_number: u32,
    ) -> Result<Self> {
        Self::new_long(
            LongType::ZeroRtt,
            connection_id.into(),
            version,
            packet_number,
        )
    }

    /// Retry packet header. `version` must be non-zero.
    pub fn retry(
        connection_id: impl Into<ConnectionId>,
        version: u32,
        packet_number: u32,
    ) -> Result<Self> {
        Self::new_long(
            LongType::Retry,
            connection_id.into(),
            version,
            packet_number,
        )
    }

    /// Version negotiation header.
    ///
    /// The wire version is always 0. `version` is the version the peer asked
    /// for; it and `supported_versions` belong to the packet payload, which
    /// this codec does not frame.
    pub fn version_negotiation(
        connection_id: impl Into<ConnectionId>,
        version: u32,
        supported_versions: &[u32],
    ) -> Self {
        let connection_id = connection_id.into();
        let mut header = Self::new(HeaderForm::Long);
        header.set_long_type(LongType::VersionNegotiation);
        header.set_connection_id(connection_id);

        debug!(
            dcid = %connection_id,
            requested_version = version,
            supported = supported_versions.len(),
            "Created version negotiation header"
        );
        header
    }

    /// Short (1-RTT) header. The connection id is only attached when
    /// `include_connection_id` is set.
    pub fn short(
        connection_id: impl Into<ConnectionId>,
        packet_number: u32,
        include_connection_id: bool,
        key_phase_bit: bool,
        spin_bit: bool,
    ) -> Self {
        let mut header = Self::new(HeaderForm::Short);
        header.spin_bit = spin_bit;
        header.key_phase_bit = key_phase_bit;
        header.set_packet_number(packet_number);
        if include_connection_id {
            header.set_connection_id(connection_id);
        }

        debug!(
            packet_number,
            pn_len = header.pn_len.bytes(),
            has_dcid = header.dcid_present,
            "Created short header"
        );
        header
    }

    /// Check the cross-field invariants a header must hold before it is encoded
    pub fn validate(&self) -> Result<()> {
        if self.is_short() {
            return Ok(());
        }
        match self.long_type {
            LongType::None => Err(ProtocolError::MissingLongType),
            LongType::VersionNegotiation if self.version != 0 => {
                Err(ProtocolError::InvalidHeaderState(ERR_NEGOTIATION_VERSION))
            }
            LongType::VersionNegotiation => Ok(()),
            _ if self.version == 0 => Err(ProtocolError::InvalidHeaderState(ERR_ZERO_VERSION)),
            _ => Ok(()),
        }
    }

    pub fn form(&self) -> HeaderForm {
        self.form
    }

    /// Switch layout. Switching to short re-derives the packet number width.
    pub fn set_form(&mut self, form: HeaderForm) {
        self.form = form;
        match form {
            HeaderForm::Short => {
                self.pn_len = PacketNumberLength::for_value(self.packet_number);
            }
            HeaderForm::Long => self.set_long_type(self.long_type),
        }
    }

    pub fn fixed_bit(&self) -> bool {
        self.fixed_bit
    }

    pub fn long_type(&self) -> LongType {
        self.long_type
    }

    /// Set the long packet type. Has no wire effect on short headers.
    ///
    /// Choosing [`LongType::VersionNegotiation`] on a long header also zeroes
    /// the version and the packet number.
    pub fn set_long_type(&mut self, long_type: LongType) {
        self.long_type = long_type;
        if self.is_version_negotiation() {
            self.version = 0;
            self.packet_number = 0;
        }
    }

    /// Raw model type code (see [`LongType::code`]).
    ///
    /// Headers that never had a long type assigned, including every short
    /// header built by [`Header::short`] or [`Header::default`], report
    /// `LongType::None` (5) rather than 0, which is the code of `Initial`.
    pub fn type_byte(&self) -> u8 {
        self.long_type.code()
    }

    /// Destination connection id length, in bytes
    pub fn dest_conn_id_len(&self) -> u8 {
        self.dcid.len() as u8
    }

    /// Source connection id length, in bytes
    pub fn src_conn_id_len(&self) -> u8 {
        self.scid.len() as u8
    }

    /// Destination connection id
    pub fn connection_id(&self) -> Result<ConnectionId> {
        if !self.has_connection_id() {
            return Err(ProtocolError::InvalidHeaderState(ERR_NO_CONNECTION_ID));
        }
        Ok(self.dcid)
    }

    /// Assign the destination connection id and mark it present
    pub fn set_connection_id(&mut self, connection_id: impl Into<ConnectionId>) {
        self.dcid = connection_id.into();
        self.dcid_present = true;
    }

    pub fn source_connection_id(&self) -> ConnectionId {
        self.scid
    }

    pub fn set_source_connection_id(&mut self, connection_id: impl Into<ConnectionId>) {
        self.scid = connection_id.into();
    }

    pub fn version(&self) -> Result<u32> {
        if !self.has_version() {
            return Err(ProtocolError::InvalidHeaderState(ERR_VERSION_ON_SHORT));
        }
        Ok(self.version)
    }

    /// Set the version of a long header.
    ///
    /// Version 0 turns the header into a version negotiation header. A
    /// non-zero version on a version negotiation header clears its type, which
    /// must then be set again before the header validates.
    pub fn set_version(&mut self, version: u32) -> Result<()> {
        if !self.has_version() {
            return Err(ProtocolError::InvalidHeaderState(ERR_VERSION_ON_SHORT));
        }
        if version == 0 {
            self.set_long_type(LongType::VersionNegotiation);
        } else if self.long_type == LongType::VersionNegotiation {
            self.long_type = LongType::None;
        }
        self.version = version;
        Ok(())
    }

    pub fn packet_number(&self) -> u32 {
        self.packet_number
    }

    /// Set the packet number; short headers also pick the smallest width holding it.
    ///
    /// Version negotiation headers carry no packet number and keep it at 0.
    pub fn set_packet_number(&mut self, packet_number: u32) {
        if self.is_version_negotiation() {
            trace!(packet_number, "Ignored packet number on version negotiation header");
            return;
        }
        self.packet_number = packet_number;
        if self.is_short() {
            self.pn_len = PacketNumberLength::for_value(packet_number);
        }
    }

    /// Short-form packet number width code. Not meaningful for long headers.
    pub fn packet_number_length(&self) -> PacketNumberLength {
        self.pn_len
    }

    /// Packet number field width in bits: 32 for long headers, 8/16/32 for short
    pub fn packet_number_bits(&self) -> u32 {
        if self.is_long() {
            PacketNumberLength::Four.bits()
        } else {
            self.pn_len.bits()
        }
    }

    pub fn spin_bit(&self) -> Result<bool> {
        if !self.is_short() {
            return Err(ProtocolError::InvalidHeaderState(ERR_SPIN_ON_LONG));
        }
        Ok(self.spin_bit)
    }

    pub fn set_spin_bit(&mut self, spin_bit: bool) -> Result<()> {
        if !self.is_short() {
            return Err(ProtocolError::InvalidHeaderState(ERR_SPIN_ON_LONG));
        }
        self.spin_bit = spin_bit;
        Ok(())
    }

    pub fn key_phase_bit(&self) -> Result<bool> {
        if !self.is_short() {
            return Err(ProtocolError::InvalidHeaderState(ERR_KEY_PHASE_ON_LONG));
        }
        Ok(self.key_phase_bit)
    }

    pub fn set_key_phase_bit(&mut self, key_phase_bit: bool) -> Result<()> {
        if !self.is_short() {
            return Err(ProtocolError::InvalidHeaderState(ERR_KEY_PHASE_ON_LONG));
        }
        self.key_phase_bit = key_phase_bit;
        Ok(())
    }

    #[inline]
    pub fn is_short(&self) -> bool {
        self.form == HeaderForm::Short
    }

    #[inline]
    pub fn is_long(&self) -> bool {
        !self.is_short()
    }

    /// Long header of type version negotiation, which the setters keep in step
    /// with a zero version
    pub fn is_version_negotiation(&self) -> bool {
        self.is_long() && self.long_type == LongType::VersionNegotiation
    }

    pub fn is_initial(&self) -> bool {
        self.is_long() && self.long_type == LongType::Initial
    }

    pub fn is_retry(&self) -> bool {
        self.is_long() && self.long_type == LongType::Retry
    }

    pub fn is_handshake(&self) -> bool {
        self.is_long() && self.long_type == LongType::Handshake
    }

    pub fn is_zero_rtt(&self) -> bool {
        self.is_long() && self.long_type == LongType::ZeroRtt
    }

    pub fn has_version(&self) -> bool {
        self.is_long()
    }

    /// Long headers always carry a destination connection id; short ones only once assigned
    pub fn has_connection_id(&self) -> bool {
        self.is_long() || self.dcid_present
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_short_without_connection_id() {
        let header = Header::default();
        assert!(header.is_short());
        assert!(header.fixed_bit());
        assert!(!header.has_connection_id());
        assert!(!header.is_version_negotiation());
        assert!(header.connection_id().is_err());
    }

    #[test]
    fn test_unassigned_type_byte() {
        assert_eq!(Header::default().type_byte(), LongType::None.code());
        assert_eq!(Header::short(1u64, 1, true, false, false).type_byte(), 5);
        assert_eq!(Header::initial(1u64, 1, 0).unwrap().type_byte(), 0);
    }

    #[test]
    fn test_factories_set_type() {
        assert!(Header::initial(1u64, 1, 0).unwrap().is_initial());
        assert!(Header::handshake(1u64, 1, 0).unwrap().is_handshake());
        assert!(Header::zero_rtt(1u64, 1, 0).unwrap().is_zero_rtt());
        assert!(Header::retry(1u64, 1, 0).unwrap().is_retry());
    }

    #[test]
    fn test_data_factory_rejects_zero_version() {
        assert!(matches!(
            Header::initial(1u64, 0, 0),
            Err(ProtocolError::InvalidHeaderState(_))
        ));
    }

    #[test]
    fn test_version_negotiation_zeroes_version() {
        let header = Header::version_negotiation(1u64, 9, &[]);
        assert!(header.is_long());
        assert!(header.is_version_negotiation());
        assert_eq!(header.version().unwrap(), 0);
        assert_eq!(header.long_type(), LongType::VersionNegotiation);
        assert!(header.validate().is_ok());
    }

    #[test]
    fn test_zero_version_switches_to_negotiation() {
        let mut header = Header::new(HeaderForm::Long);
        header.set_long_type(LongType::Initial);
        header.set_packet_number(7);
        header.set_version(0).unwrap();

        assert!(header.is_version_negotiation());
        assert_eq!(header.long_type(), LongType::VersionNegotiation);
        assert_eq!(header.packet_number(), 0);
        assert!(header.validate().is_ok());
        assert_eq!(header.serialized_size(), header.to_bytes().unwrap().len());
    }

    #[test]
    fn test_nonzero_version_leaves_negotiation() {
        let mut header = Header::version_negotiation(1u64, 9, &[]);
        header.set_version(1).unwrap();
        assert!(!header.is_version_negotiation());
        assert_eq!(header.long_type(), LongType::None);

        header.set_long_type(LongType::Handshake);
        header.set_packet_number(4);
        assert!(header.is_handshake());
        assert_eq!(header.packet_number(), 4);
        assert!(header.validate().is_ok());
    }

    #[test]
    fn test_negotiation_ignores_packet_number() {
        let mut header = Header::version_negotiation(1u64, 9, &[]);
        header.set_packet_number(5);
        assert_eq!(header.packet_number(), 0);
    }

    #[test]
    fn test_data_type_with_zero_version_is_invalid() {
        let mut header = Header::new(HeaderForm::Long);
        header.set_long_type(LongType::Retry);
        assert!(!header.is_version_negotiation());
        assert!(matches!(
            header.validate(),
            Err(ProtocolError::InvalidHeaderState(_))
        ));
    }

    #[test]
    fn test_short_connection_id_optional() {
        let without = Header::short(7u64, 1, false, false, false);
        assert!(!without.has_connection_id());

        let with = Header::short(7u64, 1, true, false, false);
        assert_eq!(with.connection_id().unwrap(), ConnectionId::from(7u64));
    }

    #[test]
    fn test_form_restricted_accessors() {
        let mut long = Header::initial(1u64, 1, 0).unwrap();
        assert!(long.spin_bit().is_err());
        assert!(long.set_key_phase_bit(true).is_err());

        let mut short = Header::default();
        assert!(short.version().is_err());
        assert!(short.set_version(1).is_err());
        assert!(short.set_spin_bit(true).is_ok());
        assert!(short.spin_bit().unwrap());
    }

    #[test]
    fn test_long_without_type_is_invalid() {
        let mut header = Header::new(HeaderForm::Long);
        header.set_version(1).unwrap();
        assert!(matches!(
            header.validate(),
            Err(ProtocolError::MissingLongType)
        ));
    }

    #[test]
    fn test_packet_number_width_tracks_value() {
        let mut header = Header::default();
        header.set_packet_number(70_000);
        assert_eq!(header.packet_number_length(), PacketNumberLength::Four);
        header.set_packet_number(3);
        assert_eq!(header.packet_number_bits(), 8);

        let long = Header::initial(1u64, 1, 3).unwrap();
        assert_eq!(long.packet_number_bits(), 32);
    }

    #[test]
    fn test_switch_to_short_rederives_width() {
        let mut header = Header::initial(1u64, 1, 300).unwrap();
        header.set_form(HeaderForm::Short);
        assert_eq!(header.packet_number_length(), PacketNumberLength::Two);
    }

    #[test]
    fn test_length_fields_follow_ids() {
        let mut header = Header::initial(1u64, 1, 0).unwrap();
        assert_eq!(header.dest_conn_id_len(), 8);
        header.set_source_connection_id(ConnectionId::from_slice(&[1, 2, 3]).unwrap());
        assert_eq!(header.src_conn_id_len(), 3);
    }
}
