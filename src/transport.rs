//! The `i3-ipc` wire protocol over a Unix stream socket.
//!
//! Every message in either direction is one frame:
//!
//! ```text
//! "i3-ipc"  <payload length: u32 le>  <message type: u32 le>  <payload>
//! ```
//!
//! The peer is the locally running window manager, already up and trusted, so
//! the transport is deliberately plain: blocking I/O, no timeouts, no
//! retries. Anything short of a well-formed reply is fatal to the invocation;
//! re-running the tool is the retry mechanism.

use log::warn;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

/// The fixed magic literal opening every frame.
pub const MAGIC: &[u8; 6] = b"i3-ipc";

/// Frame header length: magic + payload length + message type.
pub const HEADER_LEN: usize = MAGIC.len() + 8;

/// Upper bound on a reply payload. A length field beyond this means the
/// stream is desynchronized, not that the manager has 64 MiB of workspaces.
const MAX_PAYLOAD: usize = 64 * 1024 * 1024;

/// Message types this client sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// Execute a command string; the reply is one result object per command.
    RunCommand,
    /// Query the workspace list; no payload.
    GetWorkspaces,
}

impl MessageType {
    /// The wire code for this message type.
    pub fn code(self) -> u32 {
        match self {
            MessageType::RunCommand => 0,
            MessageType::GetWorkspaces => 1,
        }
    }
}

/// Transport failures. All fatal.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// A connection to the manager's IPC socket.
///
/// Used strictly sequentially: write one request frame, read one reply frame.
/// This client never subscribes to events, so no event frame can interleave.
#[derive(Debug)]
pub struct Connection {
    stream: UnixStream,
}

impl Connection {
    /// Open the socket at `path`.
    pub fn connect(path: &Path) -> Result<Self, TransportError> {
        let stream = UnixStream::connect(path).map_err(|source| TransportError::Connect {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { stream })
    }

    /// Send one request frame and read the reply's payload.
    pub fn request(
        &mut self,
        message: MessageType,
        payload: &[u8],
    ) -> Result<Vec<u8>, TransportError> {
        write_frame(&mut self.stream, message.code(), payload)?;
        let (reply_type, reply) = read_frame(&mut self.stream)?;
        if reply_type != message.code() {
            // Never expected without a subscription; worth a trace if it does.
            warn!(
                "reply type {} does not match request type {}",
                reply_type,
                message.code()
            );
        }
        Ok(reply)
    }
}

/// Encode and write one frame.
pub fn write_frame(
    writer: &mut impl Write,
    message_type: u32,
    payload: &[u8],
) -> Result<(), TransportError> {
    let mut header = [0u8; HEADER_LEN];
    header[..MAGIC.len()].copy_from_slice(MAGIC);
    header[6..10].copy_from_slice(&(payload.len() as u32).to_le_bytes());
    header[10..14].copy_from_slice(&message_type.to_le_bytes());
    writer.write_all(&header)?;
    if !payload.is_empty() {
        writer.write_all(payload)?;
    }
    Ok(())
}

/// Read one frame, returning `(message_type, payload)`.
///
/// A short or mismatched header is a [`TransportError::Protocol`] — the
/// stream cannot be trusted past that point. A payload cut short mid-read is
/// plain [`TransportError::Io`].
pub fn read_frame(reader: &mut impl Read) -> Result<(u32, Vec<u8>), TransportError> {
    let mut header = [0u8; HEADER_LEN];
    reader
        .read_exact(&mut header)
        .map_err(|e| TransportError::Protocol(format!("short header: {e}")))?;

    if &header[..MAGIC.len()] != MAGIC {
        return Err(TransportError::Protocol("bad magic in reply header".into()));
    }
    let length = u32::from_le_bytes([header[6], header[7], header[8], header[9]]) as usize;
    let message_type = u32::from_le_bytes([header[10], header[11], header[12], header[13]]);
    if length > MAX_PAYLOAD {
        return Err(TransportError::Protocol(format!(
            "reply length {length} exceeds sanity bound"
        )));
    }

    let mut payload = vec![0u8; length];
    if length > 0 {
        reader.read_exact(&mut payload)?;
    }
    Ok((message_type, payload))
}

/// Resolve the manager's socket path from the environment.
///
/// i3 exports `$I3SOCK`; Sway speaks the same protocol and exports
/// `$SWAYSOCK`. Checked in that order.
pub fn socket_from_env() -> Option<PathBuf> {
    std::env::var_os("I3SOCK")
        .or_else(|| std::env::var_os("SWAYSOCK"))
        .map(PathBuf::from)
}

//  Tests
