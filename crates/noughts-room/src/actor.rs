//! Room actor: an isolated Tokio task that owns one [`Room`].
//!
//! Every operation on a room travels through its command channel, so the
//! actor applies them one at a time, broadcasts included, before taking the
//! next. Rooms never share a lock with each other.

use std::collections::HashMap;

use noughts_protocol::{PlayerId, Recipient, RoomKey, Seat, ServerMessage, Symbol};
use tokio::sync::{mpsc, oneshot};

use crate::{Board, Departure, Evaluation, Room, RoomError, RoomStatus};

/// Channel sender for delivering outbound messages to one player's
/// connection. Unbounded: delivery never waits on a slow client.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

type Reply<T> = oneshot::Sender<Result<T, RoomError>>;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    Join {
        player_id: PlayerId,
        sender: PlayerSender,
        reply: Reply<Symbol>,
    },
    Play {
        player_id: PlayerId,
        index: usize,
        reply: Reply<Evaluation>,
    },
    Reset {
        player_id: PlayerId,
        reply: Reply<()>,
    },
    Disconnect {
        player_id: PlayerId,
    },
    Snapshot {
        reply: oneshot::Sender<RoomInfo>,
    },
}

/// A point-in-time copy of a room, for inspection outside the actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub key: RoomKey,
    pub status: RoomStatus,
    pub board: Board,
    pub players: Vec<Seat>,
    pub turn: Symbol,
    pub winner_line: Option<[usize; 3]>,
}

/// Handle to a running room actor.
///
/// Cheap to clone; the registry hands one to every session that joins.
#[derive(Clone)]
pub struct RoomHandle {
    key: RoomKey,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn key(&self) -> &RoomKey {
        &self.key
    }

    /// Seats `player_id`. On success the actor has already queued
    /// `joined` for the player and `state` for every member.
    pub async fn join(
        &self,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<Symbol, RoomError> {
        self.request(|reply| RoomCommand::Join {
            player_id,
            sender,
            reply,
        })
        .await
    }

    pub async fn play(
        &self,
        player_id: PlayerId,
        index: usize,
    ) -> Result<Evaluation, RoomError> {
        self.request(|reply| RoomCommand::Play {
            player_id,
            index,
            reply,
        })
        .await
    }

    pub async fn reset(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Reset { player_id, reply })
            .await
    }

    /// Tells the room the player's connection is gone (fire-and-forget).
    pub async fn disconnect(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Disconnect { player_id })
            .await
            .map_err(|_| RoomError::Unavailable(self.key.clone()))
    }

    /// Non-async [`disconnect`](Self::disconnect) for drop paths. Fails if
    /// the command channel is momentarily full.
    pub fn try_disconnect(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.sender
            .try_send(RoomCommand::Disconnect { player_id })
            .map_err(|_| RoomError::Unavailable(self.key.clone()))
    }

    pub async fn snapshot(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.key.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.key.clone()))
    }

    /// Sends a command carrying a reply channel and waits for the answer.
    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| RoomError::Unavailable(self.key.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.key.clone()))?
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct RoomActor {
    room: Room,
    /// Outbound channel per seated player.
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::debug!(room = %self.room.key(), "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    player_id,
                    sender,
                    reply,
                } => {
                    let _ = reply.send(self.handle_join(player_id, sender));
                }
                RoomCommand::Play {
                    player_id,
                    index,
                    reply,
                } => {
                    let _ = reply.send(self.handle_play(player_id, index));
                }
                RoomCommand::Reset { player_id, reply } => {
                    let _ = reply.send(self.handle_reset(player_id));
                }
                RoomCommand::Disconnect { player_id } => {
                    self.handle_disconnect(player_id);
                }
                RoomCommand::Snapshot { reply } => {
                    let _ = reply.send(self.info());
                }
            }
        }

        tracing::debug!(room = %self.room.key(), "room actor stopped");
    }

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<Symbol, RoomError> {
        let symbol = self.room.join(player_id)?;
        self.senders.insert(player_id, sender);
        tracing::info!(
            room = %self.room.key(),
            %player_id,
            %symbol,
            players = self.room.players().len(),
            "player joined"
        );

        self.dispatch(vec![
            (Recipient::Player(player_id), ServerMessage::Joined { symbol }),
            (Recipient::All, self.room.state_message()),
        ]);
        Ok(symbol)
    }

    fn handle_play(
        &mut self,
        player_id: PlayerId,
        index: usize,
    ) -> Result<Evaluation, RoomError> {
        let evaluation = self.room.play(player_id, index).inspect_err(|e| {
            tracing::debug!(
                room = %self.room.key(),
                %player_id,
                index,
                error = %e,
                "move rejected"
            );
        })?;

        let mut out = vec![(Recipient::All, self.room.state_message())];
        match evaluation {
            Evaluation::Win { symbol, .. } => {
                tracing::info!(room = %self.room.key(), winner = %symbol, "game won");
                out.push((
                    Recipient::All,
                    ServerMessage::GameOver {
                        winner: Some(symbol),
                        disconnected: false,
                    },
                ));
            }
            Evaluation::Draw => {
                tracing::info!(room = %self.room.key(), "game drawn");
                out.push((
                    Recipient::All,
                    ServerMessage::GameOver {
                        winner: None,
                        disconnected: false,
                    },
                ));
            }
            Evaluation::Ongoing => {}
        }
        self.dispatch(out);
        Ok(evaluation)
    }

    fn handle_reset(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        self.room.reset(player_id)?;
        tracing::info!(
            room = %self.room.key(),
            %player_id,
            status = %self.room.status(),
            "room reset"
        );
        self.dispatch(vec![(Recipient::All, self.room.state_message())]);
        Ok(())
    }

    fn handle_disconnect(&mut self, player_id: PlayerId) {
        self.senders.remove(&player_id);
        match self.room.disconnect(player_id) {
            Ok(Departure::Abandoned) => {
                tracing::info!(
                    room = %self.room.key(),
                    %player_id,
                    "player disconnected mid-game, game over"
                );
                self.dispatch(vec![(
                    Recipient::All,
                    ServerMessage::GameOver {
                        winner: None,
                        disconnected: true,
                    },
                )]);
            }
            Ok(Departure::Left) => {
                tracing::info!(room = %self.room.key(), %player_id, "player left");
            }
            Err(e) => {
                tracing::debug!(room = %self.room.key(), error = %e, "disconnect ignored");
            }
        }
    }

    /// Delivers outbound messages in order to their recipients.
    fn dispatch(&self, msgs: Vec<(Recipient, ServerMessage)>) {
        for (recipient, msg) in msgs {
            match recipient {
                Recipient::All => {
                    for seat in self.room.players() {
                        self.send_to(seat.id, msg.clone());
                    }
                }
                Recipient::Player(player_id) => self.send_to(player_id, msg),
            }
        }
    }

    /// Silently drops the message if the player's receiver is gone.
    fn send_to(&self, player_id: PlayerId, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&player_id) {
            let _ = sender.send(msg);
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            key: self.room.key().clone(),
            status: self.room.status(),
            board: *self.room.board(),
            players: self.room.players().to_vec(),
            turn: self.room.turn(),
            winner_line: self.room.winner_line(),
        }
    }
}

/// Spawns a new room actor task and returns a handle to it.
pub(crate) fn spawn_room(key: RoomKey, channel_size: usize) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size.max(1));

    let actor = RoomActor {
        room: Room::new(key.clone()),
        senders: HashMap::new(),
        receiver: rx,
    };
    tokio::spawn(actor.run());

    RoomHandle { key, sender: tx }
}
