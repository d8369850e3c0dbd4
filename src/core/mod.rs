//! # Core Header Components
//!
//! The QUIC packet header model and its wire codec.
//!
//! ## Components
//! - **Header**: value type with form-aware accessors and named constructors
//! - **Wire**: bit-exact serializer / deserializer for long and short layouts
//! - **Display**: diagnostic dump and form-aware equality
//! - **Codec**: Tokio codec for framing headers over byte streams
//!
//! ## Wire Format
//! ```text
//! Long:  [1|F|TT|0000] [Version(4)] [DCIDLen(1)] [DCID] [SCIDLen(1)] [SCID] [PN(4)]?
//! Short: [0|F|S|00|K|PP] [DCID]? [PN(1|2|4)]
//! ```

pub mod codec;
pub mod connection_id;
pub mod display;
pub mod header;
pub mod packet_number;
pub mod types;
pub mod wire;
