use std::env;
use std::error::Error;

use futures::{SinkExt, StreamExt};
use relay_core::RoomId;
use relay_protocol::{parse_broadcast, room_path};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Where to connect: env override or default.
    let addr = env::var("RELAY_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
    let room = RoomId::new(env::args().nth(1).unwrap_or_else(|| "lobby".to_string()))?;

    let url = format!("ws://{}{}", addr, room_path(&room));
    println!("Connecting to {}...", url);
    let (ws, _) = connect_async(url.as_str()).await?;
    println!("Connected. Type a message and press enter; Ctrl-D to leave.\n");

    let (mut sink, mut stream) = ws.split();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = stdin.next_line() => {
                match line? {
                    Some(text) if text.trim().is_empty() => continue,
                    Some(text) => sink.send(Message::Text(text)).await?,
                    None => {
                        println!("\nEOF on stdin, exiting client.");
                        sink.send(Message::Close(None)).await?;
                        break;
                    }
                }
            }
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => match parse_broadcast(&text) {
                        Some(msg) => println!("<< [{}] {}", msg.room, msg.text),
                        None => println!("<< {}", text),
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        println!("Server closed the connection.");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        eprintln!("Read error: {:?}", e);
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
