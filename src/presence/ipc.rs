//! Discord local RPC client over Unix domain sockets
//!
//! Frames are `opcode: u32 LE`, `length: u32 LE`, then a JSON payload.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::io::{Read, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use super::PresenceClient;
use super::messages::{Activity, Handshake, Opcode, Reply, SetActivity, SetActivityArgs};
use crate::constants::presence::{
    IO_TIMEOUT_MS, MAX_FRAME_SIZE, RPC_VERSION, SOCKET_PREFIX, SOCKET_SLOTS,
};

/// Directories searched for the service socket, in order
pub fn default_socket_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for var in ["XDG_RUNTIME_DIR", "TMPDIR", "TMP", "TEMP"] {
        if let Ok(dir) = std::env::var(var)
            && !dir.is_empty()
        {
            dirs.push(PathBuf::from(dir));
        }
    }
    dirs.push(PathBuf::from("/tmp"));
    dirs.dedup();
    dirs
}

pub struct DiscordIpcClient {
    client_id: String,
    socket_dirs: Vec<PathBuf>,
    stream: Option<UnixStream>,
    next_nonce: u64,
}

impl DiscordIpcClient {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self::with_socket_dirs(client_id, default_socket_dirs())
    }

    pub fn with_socket_dirs(client_id: impl Into<String>, socket_dirs: Vec<PathBuf>) -> Self {
        Self {
            client_id: client_id.into(),
            socket_dirs,
            stream: None,
            next_nonce: 0,
        }
    }

    #[cfg(test)]
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn open_socket(&self) -> Result<(UnixStream, PathBuf)> {
        for dir in &self.socket_dirs {
            for slot in 0..SOCKET_SLOTS {
                let path = dir.join(format!("{SOCKET_PREFIX}{slot}"));
                match UnixStream::connect(&path) {
                    Ok(stream) => return Ok((stream, path)),
                    Err(err) => debug!(
                        path = %path.display(),
                        error = %err,
                        "Presence socket not available"
                    ),
                }
            }
        }
        Err(anyhow!(
            "No presence socket found in {} location(s)",
            self.socket_dirs.len()
        ))
    }

    fn nonce(&mut self) -> String {
        self.next_nonce += 1;
        format!("{}-{}", std::process::id(), self.next_nonce)
    }
}

impl PresenceClient for DiscordIpcClient {
    fn connect(&mut self) -> Result<()> {
        let (mut stream, path) = self.open_socket()?;
        let timeout = Some(Duration::from_millis(IO_TIMEOUT_MS));
        stream.set_read_timeout(timeout).context("Failed to set read timeout")?;
        stream.set_write_timeout(timeout).context("Failed to set write timeout")?;

        let handshake = Handshake {
            v: RPC_VERSION,
            client_id: &self.client_id,
        };
        write_frame(&mut stream, Opcode::Handshake, &handshake)?;

        let (opcode, reply) = read_frame(&mut stream)?;
        match opcode {
            Opcode::Frame if reply.is_ready() => {}
            Opcode::Close => {
                return Err(anyhow!(
                    "Presence service rejected handshake: {}",
                    reply.error_message()
                ));
            }
            other => {
                return Err(anyhow!(
                    "Unexpected handshake reply {other:?} (evt: {:?})",
                    reply.evt
                ));
            }
        }

        info!(path = %path.display(), "Connected to presence service");
        self.stream = Some(stream);
        Ok(())
    }

    fn set_activity(&mut self, activity: &Activity) -> Result<()> {
        let nonce = self.nonce();
        let stream = self.stream.as_mut().context("Presence client is not connected")?;

        let command = SetActivity {
            cmd: "SET_ACTIVITY",
            args: SetActivityArgs {
                pid: std::process::id(),
                activity,
            },
            nonce,
        };
        write_frame(stream, Opcode::Frame, &command)?;

        let (_, reply) = read_frame(stream)?;
        if reply.is_error() {
            return Err(anyhow!("Presence update rejected: {}", reply.error_message()));
        }
        debug!(details = ?activity.details, state = ?activity.state, "Presence activity set");
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = write_frame(&mut stream, Opcode::Close, &serde_json::json!({}));
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}

/// Write a single frame
fn write_frame<W: Write, T: Serialize>(writer: &mut W, opcode: Opcode, payload: &T) -> Result<()> {
    let json = serde_json::to_vec(payload).context("Failed to serialize presence payload")?;
    let len = u32::try_from(json.len()).context("Presence payload too large")?;

    let mut frame = Vec::with_capacity(8 + json.len());
    frame.extend_from_slice(&(opcode as u32).to_le_bytes());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&json);

    writer.write_all(&frame).context("Failed to write presence frame")?;
    writer.flush().context("Failed to flush presence socket")?;
    Ok(())
}

/// Read a single frame
fn read_frame<R: Read>(reader: &mut R) -> Result<(Opcode, Reply)> {
    let mut header = [0u8; 8];
    reader
        .read_exact(&mut header)
        .context("Failed to read presence frame header")?;

    let opcode =
        Opcode::try_from(u32::from_le_bytes([header[0], header[1], header[2], header[3]]))?;
    let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
    if len > MAX_FRAME_SIZE {
        return Err(anyhow!("Presence frame too large: {len} bytes (max: {MAX_FRAME_SIZE})"));
    }

    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .context("Failed to read presence frame payload")?;

    let reply = if payload.is_empty() {
        Reply::default()
    } else {
        serde_json::from_slice(&payload).context("Failed to parse presence frame")?
    };
    Ok((opcode, reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::os::unix::net::UnixListener;
    use std::path::Path;
    use std::thread;

    fn first_slot(dir: &Path) -> PathBuf {
        dir.join(format!("{SOCKET_PREFIX}0"))
    }

    /// Read one raw frame as JSON, for asserting on what the client sent
    fn read_raw(stream: &mut UnixStream) -> (u32, serde_json::Value) {
        let mut header = [0u8; 8];
        stream.read_exact(&mut header).unwrap();
        let opcode = u32::from_le_bytes(header[0..4].try_into().unwrap());
        let len = u32::from_le_bytes(header[4..8].try_into().unwrap()) as usize;
        let mut payload = vec![0u8; len];
        stream.read_exact(&mut payload).unwrap();
        (opcode, serde_json::from_slice(&payload).unwrap())
    }

    #[test]
    fn test_frame_layout() {
        let mut buf = Vec::new();
        write_frame(&mut buf, Opcode::Handshake, &serde_json::json!({"v": 1})).unwrap();

        assert_eq!(&buf[0..4], &0u32.to_le_bytes());
        assert_eq!(&buf[4..8], &7u32.to_le_bytes());
        assert_eq!(&buf[8..], br#"{"v":1}"#);
    }

    #[test]
    fn test_read_frame_rejects_oversized() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&(MAX_FRAME_SIZE as u32 + 1).to_le_bytes());

        let err = read_frame(&mut Cursor::new(bytes)).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_read_frame_rejects_unknown_opcode() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&9u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());

        assert!(read_frame(&mut Cursor::new(bytes)).is_err());
    }

    #[test]
    fn test_connect_fails_without_socket() {
        let tmp = tempfile::tempdir().unwrap();
        let mut client = DiscordIpcClient::with_socket_dirs("123", vec![tmp.path().to_path_buf()]);

        assert!(client.connect().is_err());
        assert!(!client.is_connected());
    }

    #[test]
    fn test_handshake_activity_and_close() {
        let tmp = tempfile::tempdir().unwrap();
        let listener = UnixListener::bind(first_slot(tmp.path())).unwrap();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();

            let (opcode, handshake) = read_raw(&mut stream);
            assert_eq!(opcode, 0);
            assert_eq!(handshake["v"], 1);
            assert_eq!(handshake["client_id"], "42");
            let ready = serde_json::json!({"cmd": "DISPATCH", "evt": "READY"});
            write_frame(&mut stream, Opcode::Frame, &ready).unwrap();

            let (opcode, command) = read_raw(&mut stream);
            assert_eq!(opcode, 1);
            assert_eq!(command["cmd"], "SET_ACTIVITY");
            assert_eq!(command["args"]["activity"]["state"], "Not playing");
            let ack = serde_json::json!({"cmd": "SET_ACTIVITY", "evt": null});
            write_frame(&mut stream, Opcode::Frame, &ack).unwrap();

            let (opcode, _) = read_raw(&mut stream);
            assert_eq!(opcode, 2);
        });

        let mut client = DiscordIpcClient::with_socket_dirs("42", vec![tmp.path().to_path_buf()]);
        client.connect().unwrap();
        assert!(client.is_connected());

        let activity = Activity {
            state: Some("Not playing".to_string()),
            ..Default::default()
        };
        client.set_activity(&activity).unwrap();
        client.disconnect();
        assert!(!client.is_connected());

        server.join().unwrap();
    }

    #[test]
    fn test_error_reply_surfaces_message() {
        let tmp = tempfile::tempdir().unwrap();
        let listener = UnixListener::bind(first_slot(tmp.path())).unwrap();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            read_raw(&mut stream);
            write_frame(&mut stream, Opcode::Frame, &serde_json::json!({"evt": "READY"})).unwrap();
            read_raw(&mut stream);
            write_frame(
                &mut stream,
                Opcode::Frame,
                &serde_json::json!({"evt": "ERROR", "data": {"message": "bad activity"}}),
            )
            .unwrap();
        });

        let mut client = DiscordIpcClient::with_socket_dirs("42", vec![tmp.path().to_path_buf()]);
        client.connect().unwrap();
        let err = client.set_activity(&Activity::default()).unwrap_err();
        assert!(err.to_string().contains("bad activity"));

        server.join().unwrap();
    }

    #[test]
    fn test_set_activity_requires_connection() {
        let mut client = DiscordIpcClient::with_socket_dirs("42", Vec::new());
        assert!(client.set_activity(&Activity::default()).is_err());
    }
}
