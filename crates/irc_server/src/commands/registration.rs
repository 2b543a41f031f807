//! PASS, NICK, USER, PING, QUIT — the only commands usable before a
//! connection is fully registered.

use crate::client::ClientId;
use crate::outbound::{broadcast_to_channel, send_line, send_reply};
use crate::replies::IrcReply;
use crate::state::Registry;

fn send_welcome_burst(registry: &mut Registry, id: ClientId) {
    let nick = registry.clients[&id].nick.clone();
    send_reply(registry, id, IrcReply::Welcome { nick: &nick });
    send_reply(registry, id, IrcReply::YourHost { nick: &nick });
    send_reply(registry, id, IrcReply::Created { nick: &nick });
    send_reply(registry, id, IrcReply::MyInfo { nick: &nick });
    if let Some(client) = registry.clients.get_mut(&id) {
        client.registered = true;
    }
}

/// Sends the welcome burst the first time (and only the first time)
/// PASS+NICK+USER have all completed.
fn maybe_complete_registration(registry: &mut Registry, id: ClientId) {
    let Some(client) = registry.clients.get(&id) else {
        return;
    };
    if client.fully_registered() && !client.registered {
        send_welcome_burst(registry, id);
    }
}

pub fn handle_pass(registry: &mut Registry, id: ClientId, params: &[String]) {
    let nick = current_nick(registry, id);
    let Some(given) = params.first() else {
        send_reply(
            registry,
            id,
            IrcReply::NeedMoreParams {
                nick: &nick,
                command: "PASS",
            },
        );
        return;
    };
    let already_authenticated = registry.clients[&id].authenticated;
    if already_authenticated {
        send_reply(registry, id, IrcReply::AlreadyRegistered { nick: &nick });
        return;
    }
    if *given != registry.password {
        send_reply(registry, id, IrcReply::PasswdMismatch { nick: &nick });
        return;
    }
    registry.clients.get_mut(&id).unwrap().authenticated = true;
    maybe_complete_registration(registry, id);
}

pub fn handle_nick(registry: &mut Registry, id: ClientId, params: &[String]) {
    let nick = current_nick(registry, id);
    if !registry.clients[&id].authenticated {
        send_reply(registry, id, IrcReply::PasswdMismatch { nick: &nick });
        return;
    }
    let Some(wanted) = params.first() else {
        send_reply(registry, id, IrcReply::NoNicknameGiven { nick: &nick });
        return;
    };
    if registry.nick_in_use(wanted) {
        send_reply(
            registry,
            id,
            IrcReply::NicknameInUse {
                nick: &nick,
                wanted,
            },
        );
        return;
    }
    registry.clients.get_mut(&id).unwrap().nick = wanted.clone();
    maybe_complete_registration(registry, id);
}

pub fn handle_user(
    registry: &mut Registry,
    id: ClientId,
    params: &[String],
    trailing: Option<&str>,
) {
    let nick = current_nick(registry, id);
    if !registry.clients[&id].user.is_empty() {
        send_reply(registry, id, IrcReply::AlreadyRegistered { nick: &nick });
        return;
    }
    let realname = trailing.filter(|r| !r.is_empty());
    let (Some(username), Some(realname)) = (params.first(), realname) else {
        send_reply(
            registry,
            id,
            IrcReply::NeedMoreParams {
                nick: &nick,
                command: "USER",
            },
        );
        return;
    };
    if params.len() < 3 {
        send_reply(
            registry,
            id,
            IrcReply::NeedMoreParams {
                nick: &nick,
                command: "USER",
            },
        );
        return;
    }
    let client = registry.clients.get_mut(&id).unwrap();
    client.user = username.clone();
    client.realname = realname.to_string();
    maybe_complete_registration(registry, id);
}

pub fn handle_ping(registry: &mut Registry, id: ClientId, params: &[String], trailing: Option<&str>) {
    let token = params
        .first()
        .cloned()
        .or_else(|| trailing.map(str::to_string))
        .unwrap_or_default();
    send_line(registry, id, &format!("PONG :{token}"));
}

/// Broadcasts the quit message to every channel the client belongs to, then
/// tears down its state entirely. Returns true to tell the event loop to
/// close the socket.
pub fn handle_quit(registry: &mut Registry, id: ClientId, trailing: Option<&str>) -> bool {
    let reason = trailing.unwrap_or("Client Quit");
    if let Some(client) = registry.clients.get(&id) {
        let line = format!(":{} QUIT :{}", client.source_prefix(), reason);
        let channels = registry.channel_names(id);
        for name in channels {
            broadcast_to_channel(registry, &name, &line, Some(id));
        }
    }
    registry.disconnect(id);
    true
}

fn current_nick(registry: &Registry, id: ClientId) -> String {
    registry
        .clients
        .get(&id)
        .map(|c| if c.nick.is_empty() { "*".to_string() } else { c.nick.clone() })
        .unwrap_or_else(|| "*".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use crate::config::Config;
    use std::net::TcpListener;

    fn registry_with_client(password: &str) -> (Registry, ClientId) {
        let mut reg = Registry::new(password.to_string(), Config::default());
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let std_stream = std::net::TcpStream::connect(addr).unwrap();
        std_stream.set_nonblocking(true).unwrap();
        let stream = mio::net::TcpStream::from_std(std_stream);
        let client = Client::new(mio::Token(1), stream, "127.0.0.1".to_string());
        let id = client.id;
        reg.clients.insert(id, client);
        (reg, id)
    }

    #[test]
    fn pass_wrong_password_does_not_authenticate() {
        let (mut reg, id) = registry_with_client("hunter2");
        handle_pass(&mut reg, id, &["wrong".to_string()]);
        assert!(!reg.clients[&id].authenticated);
    }

    #[test]
    fn full_registration_sequence_sets_registered_once() {
        let (mut reg, id) = registry_with_client("hunter2");
        handle_pass(&mut reg, id, &["hunter2".to_string()]);
        assert!(reg.clients[&id].authenticated);
        handle_nick(&mut reg, id, &["alice".to_string()]);
        handle_user(
            &mut reg,
            id,
            &["alice".to_string(), "0".to_string(), "*".to_string()],
            Some("Alice A"),
        );
        assert!(reg.clients[&id].registered);
    }

    #[test]
    fn nick_requires_authentication_first() {
        let (mut reg, id) = registry_with_client("hunter2");
        handle_nick(&mut reg, id, &["alice".to_string()]);
        assert!(reg.clients[&id].nick.is_empty());
    }

    #[test]
    fn nick_in_use_is_rejected() {
        let (mut reg, id) = registry_with_client("hunter2");
        handle_pass(&mut reg, id, &["hunter2".to_string()]);
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let std_stream = std::net::TcpStream::connect(addr).unwrap();
        std_stream.set_nonblocking(true).unwrap();
        let stream = mio::net::TcpStream::from_std(std_stream);
        let mut other = Client::new(mio::Token(2), stream, "127.0.0.1".to_string());
        other.nick = "bob".to_string();
        reg.clients.insert(other.id, other);

        handle_nick(&mut reg, id, &["bob".to_string()]);
        assert!(reg.clients[&id].nick.is_empty());
    }

    #[test]
    fn second_pass_after_authentication_is_already_registered_not_mismatch() {
        let (mut reg, id) = registry_with_client("hunter2");
        handle_pass(&mut reg, id, &["hunter2".to_string()]);
        // A second PASS, even with the wrong password, must not be treated
        // as a fresh authentication attempt.
        handle_pass(&mut reg, id, &["totally-wrong".to_string()]);
        assert!(reg.clients[&id].authenticated);
    }

    #[test]
    fn user_requires_three_middle_params() {
        let (mut reg, id) = registry_with_client("hunter2");
        handle_pass(&mut reg, id, &["hunter2".to_string()]);
        handle_nick(&mut reg, id, &["alice".to_string()]);
        handle_user(&mut reg, id, &["alice".to_string()], Some("Alice A"));
        assert!(reg.clients[&id].user.is_empty());
    }

    #[test]
    fn user_rejects_empty_trailing() {
        let (mut reg, id) = registry_with_client("hunter2");
        handle_pass(&mut reg, id, &["hunter2".to_string()]);
        handle_nick(&mut reg, id, &["alice".to_string()]);
        handle_user(
            &mut reg,
            id,
            &["alice".to_string(), "0".to_string(), "*".to_string()],
            Some(""),
        );
        assert!(reg.clients[&id].user.is_empty());
    }

    #[test]
    fn second_user_before_nick_completes_does_not_overwrite() {
        let (mut reg, id) = registry_with_client("hunter2");
        handle_pass(&mut reg, id, &["hunter2".to_string()]);
        handle_user(
            &mut reg,
            id,
            &["alice".to_string(), "0".to_string(), "*".to_string()],
            Some("Alice A"),
        );
        handle_user(
            &mut reg,
            id,
            &["mallory".to_string(), "0".to_string(), "*".to_string()],
            Some("Mallory M"),
        );
        assert_eq!(reg.clients[&id].user, "alice");
    }

    #[test]
    fn ping_prefers_param_over_trailing() {
        use std::io::Read;

        let mut reg = Registry::new("hunter2".to_string(), Config::default());
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let std_stream = std::net::TcpStream::connect(addr).unwrap();
        std_stream.set_nonblocking(true).unwrap();
        let (mut peer, _) = listener.accept().unwrap();
        peer.set_nonblocking(true).unwrap();
        let stream = mio::net::TcpStream::from_std(std_stream);
        let client = Client::new(mio::Token(1), stream, "127.0.0.1".to_string());
        let id = client.id;
        reg.clients.insert(id, client);

        handle_ping(&mut reg, id, &["foo".to_string()], Some("bar"));

        let mut buf = [0u8; 32];
        let n = peer.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"PONG :foo\r\n");
    }
}
