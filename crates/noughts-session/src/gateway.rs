//! The per-connection gateway: binding, authorization and dispatch.

use std::sync::Arc;

use noughts_protocol::{ClientMessage, PlayerId, RoomKey, ServerMessage, Symbol};
use noughts_room::{PlayerSender, RoomError, RoomHandle, RoomRegistry};

use crate::SessionError;

/// The room and symbol a session was granted by a successful join.
pub struct Binding {
    room: RoomKey,
    symbol: Symbol,
    handle: RoomHandle,
}

impl Binding {
    pub fn room(&self) -> &RoomKey {
        &self.room
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }
}

/// Binds one connection to at most one `(room, symbol)` pair.
///
/// Owned exclusively by its connection handler. Everything addressed to
/// this connection, whether a direct answer like `full` or a room
/// broadcast, goes through the same `outbound` sender, so messages reach
/// the client in the order they were produced.
///
/// Dropping a bound gateway without calling [`disconnect`](Self::disconnect)
/// still notifies the room.
pub struct SessionGateway {
    player_id: PlayerId,
    registry: Arc<RoomRegistry>,
    outbound: PlayerSender,
    binding: Option<Binding>,
}

impl SessionGateway {
    pub fn new(
        player_id: PlayerId,
        registry: Arc<RoomRegistry>,
        outbound: PlayerSender,
    ) -> Self {
        Self {
            player_id,
            registry,
            outbound,
            binding: None,
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    /// Routes one inbound intent by kind.
    ///
    /// An `Err` means the intent was dropped; the session and the room are
    /// exactly as they were before it arrived.
    pub async fn dispatch(&mut self, msg: ClientMessage) -> Result<(), SessionError> {
        match msg {
            ClientMessage::Join { room_id } => self.join(room_id).await,
            ClientMessage::Play {
                room_id,
                index,
                symbol,
            } => self.play(&room_id, index, symbol).await,
            ClientMessage::Reset { room_id } => self.reset(&room_id).await,
        }
    }

    async fn join(&mut self, room_id: RoomKey) -> Result<(), SessionError> {
        if let Some(binding) = &self.binding {
            return Err(SessionError::AlreadyBound(binding.room.clone()));
        }

        let handle = self.registry.get_or_create(&room_id).await;
        match handle.join(self.player_id, self.outbound.clone()).await {
            Ok(symbol) => {
                self.binding = Some(Binding {
                    room: room_id,
                    symbol,
                    handle,
                });
                Ok(())
            }
            Err(RoomError::RoomFull(key)) => {
                let _ = self.outbound.send(ServerMessage::Full);
                Err(RoomError::RoomFull(key).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn play(
        &self,
        room_id: &RoomKey,
        index: usize,
        claimed: Symbol,
    ) -> Result<(), SessionError> {
        let binding = self.bound_to(room_id)?;
        if claimed != binding.symbol {
            return Err(SessionError::UnauthorizedSymbol {
                claimed,
                granted: binding.symbol,
            });
        }
        binding.handle.play(self.player_id, index).await?;
        Ok(())
    }

    async fn reset(&self, room_id: &RoomKey) -> Result<(), SessionError> {
        let binding = self.bound_to(room_id)?;
        binding.handle.reset(self.player_id).await?;
        Ok(())
    }

    /// Releases the seat, if any. Safe to call more than once.
    pub async fn disconnect(&mut self) {
        if let Some(binding) = self.binding.take() {
            let player_id = self.player_id;
            if let Err(e) = binding.handle.disconnect(player_id).await {
                tracing::debug!(%player_id, error = %e, "room gone before disconnect");
            }
        }
    }

    fn bound_to(&self, room_id: &RoomKey) -> Result<&Binding, SessionError> {
        let binding = self.binding.as_ref().ok_or(SessionError::NotBound)?;
        if binding.room != *room_id {
            return Err(SessionError::NotInRoom(room_id.clone()));
        }
        Ok(binding)
    }
}

impl Drop for SessionGateway {
    fn drop(&mut self) {
        let Some(binding) = self.binding.take() else {
            return;
        };
        let player_id = self.player_id;
        if binding.handle.try_disconnect(player_id).is_ok() {
            return;
        }

        // The room's queue is full: wait for a slot on the runtime instead.
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let handle = binding.handle;
                runtime.spawn(async move {
                    if let Err(e) = handle.disconnect(player_id).await {
                        tracing::debug!(%player_id, error = %e, "room gone before disconnect");
                    }
                });
            }
            Err(_) => {
                tracing::warn!(%player_id, room = %binding.room, "could not release seat on drop");
            }
        }
    }
}
