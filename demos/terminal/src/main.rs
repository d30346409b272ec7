//! Terminal client: `terminal [ws://host:port] [room]`.
//!
//! Type a cell number to play, `r` to reset, `q` to quit.

use futures_util::{Sink, SinkExt, StreamExt};
use noughts_client::ClientView;
use noughts_protocol::{ClientMessage, Codec, JsonCodec, ServerMessage};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::tungstenite::Message;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "ws://127.0.0.1:8080";
const DEFAULT_ROOM: &str = "lobby";

enum Command {
    Play(usize),
    Reset,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "q" | "quit" => Some(Command::Quit),
        "r" | "reset" => Some(Command::Reset),
        other => other.parse().ok().map(Command::Play),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they don't interleave with the board.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let url = args.next().unwrap_or_else(|| DEFAULT_URL.to_string());
    let room = args.next().unwrap_or_else(|| DEFAULT_ROOM.to_string());

    let (ws, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
    let (mut sink, mut stream) = ws.split();
    let codec = JsonCodec;
    let mut view = ClientView::new();

    let join = view.join(room.as_str());
    send(&mut sink, &codec, &join).await?;
    println!("connected to {url}, joining {room}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            frame = stream.next() => {
                let Some(frame) = frame else { break };
                let data = match frame? {
                    Message::Text(text) => text.as_str().as_bytes().to_vec(),
                    Message::Binary(bytes) => bytes.to_vec(),
                    Message::Close(_) => break,
                    _ => continue,
                };
                match codec.decode::<ServerMessage>(&data) {
                    Ok(msg) => {
                        view.apply(msg);
                        println!("\n{}", view.render());
                    }
                    Err(e) => tracing::warn!(error = %e, "undecodable server message"),
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let intent = match parse_command(&line) {
                    Some(Command::Quit) => break,
                    Some(Command::Reset) => view.reset(),
                    Some(Command::Play(index)) => view.play(index),
                    None => {
                        println!("type 0-8, r or q");
                        continue;
                    }
                };
                match intent {
                    Some(intent) => send(&mut sink, &codec, &intent).await?,
                    None => println!("not now: {}", view.status()),
                }
            }
        }
    }

    sink.close().await?;
    Ok(())
}

async fn send<S>(
    sink: &mut S,
    codec: &JsonCodec,
    msg: &ClientMessage,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: Sink<Message> + Unpin,
    S::Error: std::error::Error + 'static,
{
    let bytes = codec.encode(msg)?;
    let text = String::from_utf8(bytes)?;
    sink.send(Message::Text(text.into())).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert!(matches!(parse_command(" 4 \n"), Some(Command::Play(4))));
        assert!(matches!(parse_command("r"), Some(Command::Reset)));
        assert!(matches!(parse_command("quit"), Some(Command::Quit)));
        assert!(parse_command("left").is_none());
    }
}
