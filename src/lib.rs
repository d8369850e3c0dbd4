//! # quic-header
//!
//! Bit-exact codec for QUIC packet headers.
//!
//! A [`Header`] is built through one of its named constructors (or field by
//! field), encoded with [`Header::serialize`], and rebuilt on the receiving
//! side with [`Header::deserialize`]. Encoding is lossless: decoding the bytes
//! of a valid header yields an equal header and consumes exactly
//! [`Header::serialized_size`] bytes.
//!
//! ## Modules
//! - [`core`](crate::core): header model, wire format, diagnostics, stream codec
//! - [`config`]: decoder settings, loadable from TOML
//! - [`error`]: [`ProtocolError`] and the crate [`Result`](error::Result) alias
//!
//! ## Example
//! ```rust
//! use quic_header::{CodecConfig, Header};
//!
//! let header = Header::short(7u64, 300, true, false, true);
//! let bytes = header.to_bytes()?;
//! assert_eq!(bytes.len(), header.serialized_size());
//!
//! let (decoded, consumed) = Header::from_bytes(&bytes, &CodecConfig::default())?;
//! assert_eq!(decoded, header);
//! assert_eq!(consumed, bytes.len());
//! # Ok::<(), quic_header::ProtocolError>(())
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod core;
pub mod error;

pub use crate::config::CodecConfig;
pub use crate::core::codec::HeaderCodec;
pub use crate::core::connection_id::ConnectionId;
pub use crate::core::header::Header;
pub use crate::core::packet_number::PacketNumberLength;
pub use crate::core::types::{HeaderForm, LongType};
pub use crate::error::{ProtocolError, Result};
