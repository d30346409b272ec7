//! Session gateway for Noughts.
//!
//! One [`SessionGateway`] exists per live connection. It turns inbound
//! intents into room operations and enforces the only authorization rule
//! the game has: a connection may act only on the room it joined, with the
//! symbol it was granted.
//!
//! # How it fits in the stack
//!
//! ```text
//! Connection handler (above)  ← decodes frames, owns the gateway
//!     ↕
//! Session Gateway (this crate) ← binding, authorization, dispatch
//!     ↕
//! Room Registry / Room actors (below)
//! ```

mod error;
mod gateway;

pub use error::SessionError;
pub use gateway::{Binding, SessionGateway};
