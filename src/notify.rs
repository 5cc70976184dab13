use std::io;
use std::net::TcpStream;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

use crate::state::Delta;

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

const SOCKET_IO_PATH: &str = "/socket.io/?EIO=3&transport=websocket";
const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(25);

enum ListenEnd {
    Closed,
    ReceiverGone,
}

/// One Engine.IO text frame, reduced to what the listener acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Open { ping_interval: Option<Duration> },
    Ping,
    Pong,
    Connect,
    Disconnect,
    /// A socket.io message or event. Its content is never inspected.
    Message,
    Other,
}

#[derive(Debug, Deserialize)]
struct OpenPacket {
    #[serde(rename = "pingInterval", default)]
    ping_interval: Option<u64>,
}

pub fn parse_frame(text: &str) -> Frame {
    let mut chars = text.chars();
    match chars.next() {
        Some('0') => {
            let ping_interval = serde_json::from_str::<OpenPacket>(chars.as_str())
                .ok()
                .and_then(|open| open.ping_interval)
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis);
            Frame::Open { ping_interval }
        }
        Some('1') => Frame::Disconnect,
        Some('2') => Frame::Ping,
        Some('3') => Frame::Pong,
        Some('4') => match chars.next() {
            Some('0') => Frame::Connect,
            Some('1') => Frame::Disconnect,
            Some('2') | None => Frame::Message,
            Some(_) => Frame::Other,
        },
        _ => Frame::Other,
    }
}

/// Turns `FIGHTCARD_NOTIFY_ADDR` into a websocket URL. A bare `host:port` gets the
/// socket.io websocket path; `ws://` and `wss://` URLs are used as given.
pub fn socket_io_url(addr: &str) -> String {
    let addr = addr.trim();
    if addr.starts_with("ws://") || addr.starts_with("wss://") {
        return addr.to_string();
    }
    let (scheme, rest) = if let Some(rest) = addr.strip_prefix("https://") {
        ("wss", rest)
    } else {
        ("ws", addr.strip_prefix("http://").unwrap_or(addr))
    };
    let rest = rest.trim_end_matches('/');
    if rest.contains('/') {
        format!("{scheme}://{rest}")
    } else {
        format!("{scheme}://{rest}{SOCKET_IO_PATH}")
    }
}

/// Keeps a socket.io connection to the notification host open and turns every
/// message frame into `Delta::Notified`. Frame contents are discarded.
pub fn spawn_notifier(
    addr: String,
    reconnect: Duration,
    tx: Sender<Delta>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let url = socket_io_url(&addr);
        loop {
            match tungstenite::connect(url.as_str()) {
                Ok((socket, _)) => {
                    if tx
                        .send(Delta::Log(format!("[INFO] Notification channel connected ({url})")))
                        .is_err()
                    {
                        return;
                    }
                    match listen(socket, &url, &tx) {
                        Ok(ListenEnd::ReceiverGone) => return,
                        Ok(ListenEnd::Closed) => {
                            let _ = tx.send(Delta::Log(
                                "[WARN] Notification channel closed".to_string(),
                            ));
                        }
                        Err(err) => {
                            let _ = tx.send(Delta::Log(format!(
                                "[WARN] Notification channel error: {err:#}"
                            )));
                        }
                    }
                }
                Err(err) => {
                    if tx
                        .send(Delta::Log(format!(
                            "[WARN] Notification connect to {url} failed: {err}"
                        )))
                        .is_err()
                    {
                        return;
                    }
                }
            }
            thread::sleep(reconnect);
        }
    })
}

fn listen(mut socket: Socket, url: &str, tx: &Sender<Delta>) -> Result<ListenEnd> {
    // Engine.IO 4 servers wait for the client to join the default namespace.
    let join_namespace = url.contains("EIO=4");
    set_read_timeout(&mut socket, DEFAULT_PING_INTERVAL)?;
    loop {
        let msg = match socket.read() {
            Ok(msg) => msg,
            Err(tungstenite::Error::Io(err))
                if matches!(
                    err.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                ) =>
            {
                // Quiet for a full ping interval; Engine.IO 3 expects the client to ping.
                socket
                    .send(Message::Text("2".to_string()))
                    .context("failed sending ping")?;
                continue;
            }
            Err(tungstenite::Error::ConnectionClosed) => return Ok(ListenEnd::Closed),
            Err(err) => return Err(err).context("failed reading frame"),
        };

        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => return Ok(ListenEnd::Closed),
            _ => continue,
        };
        match parse_frame(&text) {
            Frame::Open { ping_interval } => {
                set_read_timeout(&mut socket, ping_interval.unwrap_or(DEFAULT_PING_INTERVAL))?;
                if join_namespace {
                    socket
                        .send(Message::Text("40".to_string()))
                        .context("failed joining namespace")?;
                }
            }
            Frame::Ping => socket
                .send(Message::Text("3".to_string()))
                .context("failed sending pong")?,
            Frame::Message => {
                if tx.send(Delta::Notified).is_err() {
                    return Ok(ListenEnd::ReceiverGone);
                }
            }
            Frame::Disconnect => return Ok(ListenEnd::Closed),
            Frame::Pong | Frame::Connect | Frame::Other => {}
        }
    }
}

fn set_read_timeout(socket: &mut Socket, timeout: Duration) -> Result<()> {
    match socket.get_mut() {
        MaybeTlsStream::Plain(stream) => stream
            .set_read_timeout(Some(timeout.max(Duration::from_secs(1))))
            .context("failed setting read timeout"),
        _ => Ok(()),
    }
}

/// Stand-in channel for demo mode: one trigger per `interval`.
pub fn spawn_timer_notifier(interval: Duration, tx: Sender<Delta>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        loop {
            thread::sleep(interval);
            if tx.send(Delta::Notified).is_err() {
                return;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_frame_carries_ping_interval() {
        let frame = parse_frame(r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":60000}"#);
        assert_eq!(
            frame,
            Frame::Open {
                ping_interval: Some(Duration::from_secs(25))
            }
        );
        assert_eq!(parse_frame("0"), Frame::Open { ping_interval: None });
    }

    #[test]
    fn message_frames_are_triggers() {
        assert_eq!(parse_frame(r#"42["message","betting open"]"#), Frame::Message);
        assert_eq!(parse_frame("4"), Frame::Message);
        assert_eq!(parse_frame("40"), Frame::Connect);
        assert_eq!(parse_frame("41"), Frame::Disconnect);
        assert_eq!(parse_frame("2"), Frame::Ping);
        assert_eq!(parse_frame("3probe"), Frame::Pong);
        assert_eq!(parse_frame(""), Frame::Other);
    }

    #[test]
    fn bare_address_gets_socket_io_path() {
        assert_eq!(
            socket_io_url("www-cdn-twitch.saltybet.com:8000"),
            "ws://www-cdn-twitch.saltybet.com:8000/socket.io/?EIO=3&transport=websocket"
        );
        assert_eq!(
            socket_io_url("http://localhost:8000/"),
            "ws://localhost:8000/socket.io/?EIO=3&transport=websocket"
        );
        assert_eq!(
            socket_io_url("https://example.test/socket.io/?EIO=4&transport=websocket"),
            "wss://example.test/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(socket_io_url("ws://127.0.0.1:9/x"), "ws://127.0.0.1:9/x");
    }
}
