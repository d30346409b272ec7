//! Client-side state for one Noughts room.
//!
//! [`ClientView`] mirrors what the server last said about the room and only
//! produces intents the server would accept. It does no I/O: feed it decoded
//! [`ServerMessage`](noughts_protocol::ServerMessage)s and send the
//! [`ClientMessage`](noughts_protocol::ClientMessage)s it returns.

mod view;

pub use view::{ClientView, Outcome};
