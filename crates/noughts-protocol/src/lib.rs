//! Wire protocol for Noughts.
//!
//! This crate defines the message contract that clients and the server
//! share:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`Symbol`], [`Seat`],
//!   etc.): the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding, decoding and validation.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about connections or rooms. The Client
//! View depends on this crate alone, never on server internals.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientMessage) → Session → Room
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    BOARD_CELLS, Cell, ClientMessage, PlayerId, Recipient, RoomKey, Seat,
    ServerMessage, Symbol,
};
