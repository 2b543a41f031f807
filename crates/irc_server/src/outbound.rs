//! Writing to client sockets. Every line gets a trailing `\r\n`; writes are
//! best-effort — a write that fails or falls short is logged and otherwise
//! ignored here, since the event loop will observe the same broken
//! connection on the next readiness pass and disconnect it cleanly.

use std::io::Write;

use crate::client::ClientId;
use crate::replies::IrcReply;
use crate::state::Registry;

pub fn send_line(registry: &mut Registry, id: ClientId, line: &str) {
    let Some(client) = registry.clients.get_mut(&id) else {
        return;
    };
    let mut out = Vec::with_capacity(line.len() + 2);
    out.extend_from_slice(line.as_bytes());
    out.extend_from_slice(b"\r\n");
    if let Err(err) = client.stream.write_all(&out) {
        log::warn!("short or failed write to {:?}: {}", id, err);
    }
}

pub fn send_reply(registry: &mut Registry, id: ClientId, reply: IrcReply) {
    send_line(registry, id, &reply.format());
}

/// Sends a line (already including whatever prefix it needs) to every
/// member of `channel`, optionally skipping one client — used so a user's
/// own JOIN/PART/PRIVMSG echo can be suppressed when the caller has already
/// sent its own acknowledgement.
pub fn broadcast_to_channel(
    registry: &mut Registry,
    channel: &str,
    line: &str,
    exclude: Option<ClientId>,
) {
    let Some(ch) = registry.channels.get(channel) else {
        return;
    };
    let targets: Vec<ClientId> = ch
        .members
        .iter()
        .copied()
        .filter(|id| Some(*id) != exclude)
        .collect();
    for id in targets {
        send_line(registry, id, line);
    }
}
