//! # Header Codec
//!
//! Tokio codec framing consecutive headers on a byte stream.
//!
//! Decoding returns `Ok(None)` while the buffered bytes hold only part of a
//! header, and leaves them in place for the next read.

use crate::config::CodecConfig;
use crate::core::header::Header;
use crate::core::wire;
use crate::error::{ProtocolError, Result};
use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, trace};

/// Codec for [`Header`] values
#[derive(Debug, Clone, Default)]
pub struct HeaderCodec {
    config: CodecConfig,
}

impl HeaderCodec {
    /// Codec decoding with `config`
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

impl Decoder for HeaderCodec {
    type Item = Header;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Header>> {
        if src.is_empty() {
            return Ok(None);
        }
        match wire::decode(&src[..], &self.config) {
            Ok((header, consumed)) => {
                src.advance(consumed);
                Ok(Some(header))
            }
            Err(ProtocolError::BufferTooShort { needed, .. }) => {
                trace!(buffered = src.len(), needed, "Waiting for more header bytes");
                src.reserve(needed.saturating_sub(src.len()));
                Ok(None)
            }
            Err(e) => {
                debug!(error = %e, buffered = src.len(), "Rejected header on stream");
                Err(e)
            }
        }
    }
}

impl Encoder<Header> for HeaderCodec {
    type Error = ProtocolError;

    fn encode(&mut self, header: Header, dst: &mut BytesMut) -> Result<()> {
        dst.reserve(header.serialized_size());
        header.serialize(dst)?;
        Ok(())
    }
}
