//! Byte-level tests of the long and short header layouts

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bytes::BytesMut;
use quic_header::{CodecConfig, ConnectionId, Header, HeaderForm, LongType, ProtocolError};

fn decode(bytes: &[u8]) -> (Header, usize) {
    Header::from_bytes(bytes, &CodecConfig::default()).expect("decode")
}

// ============================================================================
// LONG FORM
// ============================================================================

#[test]
fn test_initial_scenario_bytes() {
    let header = Header::initial(42u64, 1, 5).expect("valid initial");
    let bytes = header.to_bytes().expect("encode");

    let mut expected = vec![0b1100_0000, 0x00, 0x00, 0x00, 0x01];
    expected.push(8);
    expected.extend_from_slice(&42u64.to_be_bytes());
    expected.push(8);
    expected.extend_from_slice(&0u64.to_be_bytes());
    expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x05]);

    assert_eq!(&bytes[..], &expected[..]);
    assert_eq!(header.serialized_size(), expected.len());
}

#[test]
fn test_long_type_bits() {
    let cases = [
        (Header::initial(1u64, 1, 0).unwrap(), 0xc0),
        (Header::zero_rtt(1u64, 1, 0).unwrap(), 0xd0),
        (Header::handshake(1u64, 1, 0).unwrap(), 0xe0),
        (Header::retry(1u64, 1, 0).unwrap(), 0xf0),
    ];
    for (header, flags) in cases {
        assert_eq!(header.flags_byte().unwrap(), flags, "{}", header.type_name());
        let bytes = header.to_bytes().unwrap();
        assert_eq!(bytes[0], flags);
        let (decoded, _) = decode(&bytes);
        assert_eq!(decoded.long_type(), header.long_type());
    }
}

#[test]
fn test_long_packet_number_always_four_bytes() {
    for pn in [0u32, 1, 255, 256, 65_536, u32::MAX] {
        let header = Header::handshake(9u64, 1, pn).unwrap();
        assert_eq!(header.packet_number_bits(), 32);
        let bytes = header.to_bytes().unwrap();
        assert_eq!(bytes.len(), 27);
        assert_eq!(&bytes[23..], &pn.to_be_bytes());
    }
}

#[test]
fn test_version_negotiation_scenario() {
    let header = Header::version_negotiation(1u64, 9, &[]);
    assert_eq!(header.version().unwrap(), 0);
    assert!(header.is_version_negotiation());

    let with_pn_field = Header::initial(1u64, 9, 0).unwrap();
    assert_eq!(header.serialized_size() + 4, with_pn_field.serialized_size());

    let bytes = header.to_bytes().unwrap();
    assert_eq!(bytes.len(), header.serialized_size());
    assert_eq!(&bytes[1..5], &[0, 0, 0, 0]);
    assert_eq!(&bytes[bytes.len() - 8..], &0u64.to_be_bytes());
}

#[test]
fn test_version_negotiation_decode_ignores_trailing_payload() {
    let header = Header::version_negotiation(5u64, 1, &[1, 2]);
    let mut wire = BytesMut::new();
    header.serialize(&mut wire).unwrap();
    // supported version list follows the header; it is payload
    wire.extend_from_slice(&1u32.to_be_bytes());

    let (decoded, consumed) = decode(&wire);
    assert_eq!(consumed, header.serialized_size());
    assert_eq!(decoded.long_type(), LongType::VersionNegotiation);
    assert_eq!(decoded, header);
}

#[test]
fn test_variable_length_connection_ids() {
    let mut header = Header::initial(ConnectionId::from_slice(&[0xab; 20]).unwrap(), 1, 77).unwrap();
    header.set_source_connection_id(ConnectionId::EMPTY);

    let bytes = header.to_bytes().unwrap();
    assert_eq!(bytes[5], 20);
    assert_eq!(bytes[26], 0);
    assert_eq!(bytes.len(), 1 + 4 + 1 + 20 + 1 + 0 + 4);

    let (decoded, consumed) = decode(&bytes);
    assert_eq!(consumed, bytes.len());
    assert_eq!(decoded.dest_conn_id_len(), 20);
    assert_eq!(decoded.src_conn_id_len(), 0);
    assert_eq!(decoded, header);
}

#[test]
fn test_oversized_connection_id_length_rejected() {
    let mut bytes = vec![0xc0, 0, 0, 0, 1, 21];
    bytes.extend_from_slice(&[0; 21]);
    bytes.push(0);
    bytes.extend_from_slice(&[0; 4]);

    let result = Header::from_bytes(&bytes, &CodecConfig::default());
    assert!(matches!(
        result,
        Err(ProtocolError::InvalidConnectionIdLength(21))
    ));
}

#[test]
fn test_long_reserved_bits() {
    let mut bytes = Header::initial(1u64, 1, 1).unwrap().to_bytes().unwrap().to_vec();
    bytes[0] |= 0x01;

    assert!(matches!(
        Header::from_bytes(&bytes, &CodecConfig::default()),
        Err(ProtocolError::ReservedBitsSet(0xc1))
    ));

    let lenient = CodecConfig::default_with_overrides(|c| c.reject_reserved_bits = false);
    let (decoded, _) = Header::from_bytes(&bytes, &lenient).unwrap();
    assert!(decoded.is_initial());
}

#[test]
fn test_missing_type_cannot_serialize() {
    let mut header = Header::new(HeaderForm::Long);
    header.set_version(1).unwrap();
    let mut buf = BytesMut::new();
    assert!(matches!(
        header.serialize(&mut buf),
        Err(ProtocolError::MissingLongType)
    ));
    assert!(buf.is_empty());
}

// ============================================================================
// SHORT FORM
// ============================================================================

#[test]
fn test_short_scenario_bytes() {
    let header = Header::short(7u64, 300, true, false, true);
    let bytes = header.to_bytes().unwrap();

    assert_eq!(bytes[0] & 0x80, 0, "form bit");
    assert_eq!(bytes[0] & 0x40, 0x40, "fixed bit");
    assert_eq!(bytes[0] & 0x20, 0x20, "spin bit");
    assert_eq!(bytes[0] & 0x04, 0, "key phase bit");
    assert_eq!(bytes[0] & 0x03, 0b01, "length code");
    assert_eq!(&bytes[1..9], &7u64.to_be_bytes());
    assert_eq!(&bytes[9..], &[0x01, 0x2c]);
}

#[test]
fn test_short_packet_number_widths() {
    let cases = [
        (0u32, vec![0x00]),
        (255, vec![0xff]),
        (256, vec![0x01, 0x00]),
        (65_535, vec![0xff, 0xff]),
        (65_536, vec![0x00, 0x01, 0x00, 0x00]),
        (u32::MAX, vec![0xff, 0xff, 0xff, 0xff]),
    ];
    for (pn, expected) in cases {
        let header = Header::short(1u64, pn, false, false, false);
        let bytes = header.to_bytes().unwrap();
        assert_eq!(&bytes[1..], &expected[..], "packet number {pn}");
        assert_eq!(bytes.len(), header.serialized_size());
    }
}

#[test]
fn test_short_without_connection_id() {
    let header = Header::short(7u64, 9, false, true, false);
    let bytes = header.to_bytes().unwrap();
    assert_eq!(&bytes[..], &[0b0100_0100, 0x09]);

    let no_dcid = CodecConfig::default_with_overrides(|c| c.short_header_dcid_len = 0);
    let (decoded, consumed) = Header::from_bytes(&bytes, &no_dcid).unwrap();
    assert_eq!(consumed, 2);
    assert!(!decoded.has_connection_id());
    assert!(decoded.key_phase_bit().unwrap());
    assert_eq!(decoded, header);
}

#[test]
fn test_short_custom_dcid_width() {
    let cid = ConnectionId::from_slice(&[1, 2, 3, 4]).unwrap();
    let header = Header::short(cid, 1_000, true, true, true);
    let bytes = header.to_bytes().unwrap();
    assert_eq!(bytes.len(), 1 + 4 + 2);

    let config = CodecConfig::default_with_overrides(|c| c.short_header_dcid_len = 4);
    let (decoded, _) = Header::from_bytes(&bytes, &config).unwrap();
    assert_eq!(decoded.connection_id().unwrap(), cid);
    assert_eq!(decoded, header);
}

#[test]
fn test_short_fixed_bit_cleared() {
    let bytes = [0x00u8, 0x01];
    let no_dcid = CodecConfig::default_with_overrides(|c| c.short_header_dcid_len = 0);
    assert!(matches!(
        Header::from_bytes(&bytes, &no_dcid),
        Err(ProtocolError::InvalidFixedBit)
    ));

    let lenient = CodecConfig::default_with_overrides(|c| {
        c.short_header_dcid_len = 0;
        c.require_fixed_bit = false;
    });
    let (decoded, _) = Header::from_bytes(&bytes, &lenient).unwrap();
    assert!(!decoded.fixed_bit());
    assert_eq!(decoded.to_bytes().unwrap().as_ref(), &bytes);
}

#[test]
fn test_short_reserved_bits() {
    let no_dcid = CodecConfig::default_with_overrides(|c| c.short_header_dcid_len = 0);
    assert!(matches!(
        Header::from_bytes(&[0x48, 0x01], &no_dcid),
        Err(ProtocolError::ReservedBitsSet(0x48))
    ));
}

#[test]
fn test_short_invalid_length_code() {
    assert!(matches!(
        Header::from_bytes(&[0x43, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0], &CodecConfig::default()),
        Err(ProtocolError::InvalidPacketNumberLength(3))
    ));
}

#[test]
fn test_empty_input() {
    assert!(matches!(
        Header::from_bytes(&[], &CodecConfig::default()),
        Err(ProtocolError::BufferTooShort {
            needed: 1,
            available: 0
        })
    ));
}
