#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use quic_header::{CodecConfig, Header};

fuzz_target!(|input: (u64, u32, u32, u8)| {
    let (cid, version, pn, selector) = input;
    let header = match selector % 6 {
        0 => Header::initial(cid, version, pn),
        1 => Header::handshake(cid, version, pn),
        2 => Header::zero_rtt(cid, version, pn),
        3 => Header::retry(cid, version, pn),
        4 => Ok(Header::version_negotiation(cid, version, &[])),
        _ => Ok(Header::short(cid, pn, true, selector & 0x40 != 0, selector & 0x80 != 0)),
    };
    let Ok(header) = header else {
        return;
    };

    let mut wire = BytesMut::new();
    let written = header.serialize(&mut wire).expect("valid header encodes");
    assert_eq!(written, header.serialized_size());

    let (decoded, consumed) = Header::from_bytes(&wire, &CodecConfig::default()).expect("decodes");
    assert_eq!(consumed, written);
    assert_eq!(decoded, header);
});
