//! # Error Types
//!
//! Error handling for the header codec.
//!
//! Every misuse of the header model and every malformed input surfaces as a
//! [`ProtocolError`] instead of aborting the caller.
//!
//! ## Error Categories
//! - **Contract errors**: form-restricted accessors used on the wrong form,
//!   long headers without a concrete type
//! - **Wire errors**: truncated input, bad length codes, bad marker bits
//! - **Configuration errors**: TOML parse or validation failures
//! - **I/O errors**: surfaced through the stream codec
//!
//! ## Example Usage
//! ```rust
//! use quic_header::error::{ProtocolError, Result};
//! use quic_header::Header;
//!
//! fn version_of(header: &Header) -> Result<u32> {
//!     header.version()
//! }
//!
//! let short = Header::default();
//! assert!(matches!(version_of(&short), Err(ProtocolError::InvalidHeaderState(_))));
//! ```

use std::io;
use thiserror::Error;

/// Error message constants shared by the accessors and the wire code.
pub mod constants {
    /// Form-restricted accessors
    pub const ERR_VERSION_ON_SHORT: &str = "version is only defined for long headers";
    pub const ERR_SPIN_ON_LONG: &str = "spin bit is only defined for short headers";
    pub const ERR_KEY_PHASE_ON_LONG: &str = "key phase bit is only defined for short headers";
    pub const ERR_NO_CONNECTION_ID: &str = "header carries no connection id";

    /// Version / type coupling
    pub const ERR_ZERO_VERSION: &str = "version 0 is reserved for version negotiation";
    pub const ERR_NEGOTIATION_VERSION: &str = "version negotiation headers must carry version 0";
}

/// Primary error type for all codec operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid header state: {0}")]
    InvalidHeaderState(&'static str),

    #[error("Long header has no packet type")]
    MissingLongType,

    #[error("Invalid packet number length code: {0:#04b}")]
    InvalidPacketNumberLength(u8),

    #[error("Buffer too short: need {needed} bytes, have {available}")]
    BufferTooShort { needed: usize, available: usize },

    #[error("Invalid connection id length: {0} bytes")]
    InvalidConnectionIdLength(usize),

    #[error("Fixed bit is not set")]
    InvalidFixedBit,

    #[error("Reserved bits set in flags byte: {0:#010b}")]
    ReservedBitsSet(u8),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
