#![no_main]

use libfuzzer_sys::fuzz_target;
use quic_header::{CodecConfig, Header};

fuzz_target!(|data: &[u8]| {
    // Decoding must never panic. Strictly decoded headers re-encode to their input,
    // except version negotiation, whose type bits are not carried.
    let lenient = CodecConfig::default_with_overrides(|c| {
        c.require_fixed_bit = false;
        c.reject_reserved_bits = false;
    });
    for config in [CodecConfig::default(), lenient] {
        if let Ok((header, consumed)) = Header::from_bytes(data, &config) {
            assert_eq!(consumed, header.serialized_size());
            if config.reject_reserved_bits && !header.is_version_negotiation() {
                if let Ok(bytes) = header.to_bytes() {
                    assert_eq!(&bytes[..], &data[..consumed]);
                }
            }
        }
    }
});
