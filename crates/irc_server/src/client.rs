//! Per-connection state: identity, registration flags, receive buffer, and
//! channel membership. Pure data — mutated only by the event loop and the
//! command dispatcher acting on the connection it belongs to.

use std::collections::HashSet;

use mio::net::TcpStream;

/// Stable key for a live connection. `mio::Token` wraps a `usize`; we key
/// every piece of per-client state (and channel membership) by it, the way
/// the reference keys everything by the raw file descriptor.
pub type ClientId = mio::Token;

pub struct Client {
    pub id: ClientId,
    pub stream: TcpStream,
    pub host: String,

    pub authenticated: bool,
    /// Sticky: once the welcome burst has been sent this never goes back
    /// to `false`, even if nick/user somehow become empty again.
    pub registered: bool,

    pub nick: String,
    pub user: String,
    pub realname: String,

    inbound: Vec<u8>,
    pub channels: HashSet<String>,
}

impl Client {
    pub fn new(id: ClientId, stream: TcpStream, host: String) -> Self {
        Client {
            id,
            stream,
            host,
            authenticated: false,
            registered: false,
            nick: String::new(),
            user: String::new(),
            realname: String::new(),
            inbound: Vec::new(),
            channels: HashSet::new(),
        }
    }

    pub fn fully_registered(&self) -> bool {
        self.authenticated && !self.nick.is_empty() && !self.user.is_empty()
    }

    /// `nick!user@host`, used as the prefix on every relayed line this
    /// client originates.
    pub fn source_prefix(&self) -> String {
        format!("{}!{}@{}", self.nick, self.user, self.host)
    }

    /// Appends freshly-read bytes to the inbound buffer and drains every
    /// complete line out of it (terminator `\n`, one trailing `\r`
    /// trimmed if present). A single call may return zero, one, or many
    /// lines; whatever doesn't end in `\n` yet stays buffered.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.inbound.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.inbound.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.inbound.drain(..=pos).collect();
            line.pop(); // drop the '\n'
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }
}
