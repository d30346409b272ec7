//! Per-connection handler: decode, validate, dispatch, deliver.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Assign a `PlayerId` from the connection id
//!   2. Spawn a writer draining the connection's outbound queue
//!   3. Loop: receive frame → decode `ClientMessage` → gateway dispatch
//!   4. On close, error or idle timeout: release the seat

use std::sync::Arc;

use noughts_protocol::{ClientMessage, Codec, PlayerId, ServerMessage};
use noughts_session::SessionGateway;
use noughts_transport::Connection;
use tokio::sync::mpsc;

use crate::server::ServerState;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<T: Connection, C: Codec>(
    conn: T,
    state: Arc<ServerState<C>>,
) {
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    let player_id = PlayerId(conn_id.into_inner());
    tracing::debug!(%conn_id, %player_id, "handling new connection");

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_outbound(
        Arc::clone(&conn),
        Arc::clone(&state),
        player_id,
        outbound_rx,
    ));
    let mut gateway =
        SessionGateway::new(player_id, Arc::clone(&state.registry), outbound_tx);

    loop {
        let received = match state.idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, conn.recv()).await {
                Ok(received) => received,
                Err(_) => {
                    tracing::info!(%player_id, "connection idle, closing");
                    break;
                }
            },
            None => conn.recv().await,
        };

        let data = match received {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        let msg: ClientMessage = match state.codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode intent");
                continue;
            }
        };
        if let Err(e) = msg.validate() {
            tracing::debug!(%player_id, error = %e, "intent failed validation");
            continue;
        }

        let intent = msg.kind();
        let room = msg.room_id().clone();
        if let Err(e) = gateway.dispatch(msg).await {
            tracing::debug!(%player_id, intent, %room, error = %e, "intent dropped");
        }
    }

    gateway.disconnect().await;
    drop(gateway);

    // The writer stops once the room has released its copy of the sender.
    if let Err(e) = writer.await {
        tracing::warn!(%player_id, error = %e, "writer task failed");
    }
    if let Err(e) = conn.close().await {
        tracing::debug!(%player_id, error = %e, "close after disconnect failed");
    }
}

/// Encodes and sends everything queued for one connection, in order.
async fn write_outbound<T: Connection, C: Codec>(
    conn: Arc<T>,
    state: Arc<ServerState<C>>,
    player_id: PlayerId,
    mut outbound: mpsc::UnboundedReceiver<ServerMessage>,
) {
    while let Some(msg) = outbound.recv().await {
        let bytes = match state.codec.encode(&msg) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%player_id, error = %e, "failed to encode outbound message");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(%player_id, error = %e, "send failed, stopping writer");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use noughts_protocol::{JsonCodec, Symbol};
    use noughts_room::RoomRegistry;
    use noughts_transport::{ConnectionId, TransportError};
    use tokio::sync::Mutex;

    use super::*;

    /// A connection backed by channels instead of a socket.
    struct MemoryConnection {
        id: ConnectionId,
        inbound: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
        outbound: mpsc::UnboundedSender<Vec<u8>>,
    }

    struct Peer {
        to_server: mpsc::UnboundedSender<Vec<u8>>,
        from_server: mpsc::UnboundedReceiver<Vec<u8>>,
    }

    fn memory_pair(id: u64) -> (MemoryConnection, Peer) {
        let (to_server, inbound) = mpsc::unbounded_channel();
        let (outbound, from_server) = mpsc::unbounded_channel();
        let conn = MemoryConnection {
            id: ConnectionId::new(id),
            inbound: Mutex::new(inbound),
            outbound,
        };
        (conn, Peer { to_server, from_server })
    }

    fn closed() -> TransportError {
        TransportError::SendFailed(std::io::ErrorKind::BrokenPipe.into())
    }

    impl Connection for MemoryConnection {
        type Error = TransportError;

        async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
            self.outbound.send(data.to_vec()).map_err(|_| closed())
        }

        async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
            Ok(self.inbound.lock().await.recv().await)
        }

        async fn close(&self) -> Result<(), TransportError> {
            Ok(())
        }

        fn id(&self) -> ConnectionId {
            self.id
        }
    }

    impl Peer {
        fn send(&self, json: &str) {
            self.to_server.send(json.as_bytes().to_vec()).unwrap();
        }

        async fn recv(&mut self) -> ServerMessage {
            let bytes = tokio::time::timeout(Duration::from_secs(2), self.from_server.recv())
                .await
                .expect("timed out")
                .expect("server side closed");
            JsonCodec.decode(&bytes).unwrap()
        }
    }

    fn state(idle_timeout: Option<Duration>) -> Arc<ServerState<JsonCodec>> {
        Arc::new(ServerState {
            registry: Arc::new(RoomRegistry::default()),
            codec: JsonCodec,
            idle_timeout,
            handshake_timeout: Duration::from_secs(1),
        })
    }

    #[tokio::test]
    async fn test_handler_joins_and_broadcasts() {
        let state = state(None);
        let (conn_a, mut a) = memory_pair(1);
        let (conn_b, mut b) = memory_pair(2);
        tokio::spawn(handle_connection(conn_a, Arc::clone(&state)));
        tokio::spawn(handle_connection(conn_b, Arc::clone(&state)));

        a.send(r#"{"type":"join","roomId":"r1"}"#);
        assert_eq!(a.recv().await, ServerMessage::Joined { symbol: Symbol::X });
        a.recv().await;

        b.send(r#"{"type":"join","roomId":"r1"}"#);
        assert_eq!(b.recv().await, ServerMessage::Joined { symbol: Symbol::O });
        assert!(matches!(b.recv().await, ServerMessage::State { .. }));
        assert!(matches!(a.recv().await, ServerMessage::State { .. }));
    }

    #[tokio::test]
    async fn test_peer_close_releases_seat() {
        let state = state(None);
        let (conn_a, mut a) = memory_pair(1);
        let (conn_b, mut b) = memory_pair(2);
        let handler_a = tokio::spawn(handle_connection(conn_a, Arc::clone(&state)));
        tokio::spawn(handle_connection(conn_b, Arc::clone(&state)));

        a.send(r#"{"type":"join","roomId":"r1"}"#);
        a.recv().await;
        a.recv().await;
        b.send(r#"{"type":"join","roomId":"r1"}"#);
        b.recv().await;
        b.recv().await;

        // Dropping the sender ends `recv` with `None`, like a clean close.
        drop(a.to_server);
        tokio::time::timeout(Duration::from_secs(2), handler_a)
            .await
            .expect("handler should finish")
            .unwrap();

        assert_eq!(
            b.recv().await,
            ServerMessage::GameOver { winner: None, disconnected: true }
        );
    }
}
