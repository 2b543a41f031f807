//! Top-level command dispatch: routes a parsed [`Message`] to the handler
//! for its command, enforcing the registration gate every command except
//! PASS/NICK/USER/PING/QUIT sits behind.

mod channels;
mod messaging;
mod registration;

use crate::client::ClientId;
use crate::message::Message;
use crate::replies::IrcReply;
use crate::state::Registry;

/// Commands usable before a connection has completed PASS/NICK/USER.
fn needs_registration(command: &str) -> bool {
    !matches!(command, "PASS" | "NICK" | "USER" | "PING" | "QUIT")
}

const KNOWN_COMMANDS: &[&str] = &[
    "PASS", "NICK", "USER", "PING", "QUIT", "WHOIS", "PRIVMSG", "JOIN", "PART", "KICK", "INVITE",
    "TOPIC", "MODE",
];

/// Dispatches one message for `id`. Returns `true` if the connection should
/// be closed (QUIT was issued).
pub fn dispatch(registry: &mut Registry, id: ClientId, msg: Message) -> bool {
    if msg.command.is_empty() {
        return false;
    }
    let command = msg.command.to_ascii_uppercase();
    let fully_registered = registry.clients[&id].fully_registered();

    if !KNOWN_COMMANDS.contains(&command.as_str()) {
        // Unknown commands from a connection that hasn't finished
        // registering are dropped silently; only a registered client gets
        // 421 for a command it's never heard of.
        if fully_registered {
            let nick = registry.clients[&id].nick.clone();
            crate::outbound::send_reply(
                registry,
                id,
                IrcReply::UnknownCommand {
                    nick: &nick,
                    command: &command,
                },
            );
        }
        return false;
    }

    if needs_registration(&command) && !fully_registered {
        let nick = registry.clients[&id].nick.clone();
        let nick = if nick.is_empty() { "*".to_string() } else { nick };
        crate::outbound::send_reply(registry, id, IrcReply::NotRegistered { nick: &nick });
        return false;
    }

    match command.as_str() {
        "PASS" => registration::handle_pass(registry, id, &msg.params),
        "NICK" => registration::handle_nick(registry, id, &msg.params),
        "USER" => registration::handle_user(registry, id, &msg.params, msg.trailing.as_deref()),
        "PING" => registration::handle_ping(registry, id, &msg.params, msg.trailing.as_deref()),
        "QUIT" => return registration::handle_quit(registry, id, msg.trailing.as_deref()),
        "WHOIS" => messaging::handle_whois(registry, id, &msg.params),
        "PRIVMSG" => messaging::handle_privmsg(registry, id, &msg.params, msg.trailing.as_deref()),
        "JOIN" => channels::handle_join(registry, id, &msg.params),
        "PART" => channels::handle_part(registry, id, &msg.params, msg.trailing.as_deref()),
        "KICK" => channels::handle_kick(registry, id, &msg.params, msg.trailing.as_deref()),
        "INVITE" => channels::handle_invite(registry, id, &msg.params),
        "TOPIC" => channels::handle_topic(registry, id, &msg.params, msg.trailing.as_deref()),
        "MODE" => channels::handle_mode(registry, id, &msg.params),
        _ => unreachable!("checked against KNOWN_COMMANDS above"),
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use crate::config::Config;
    use std::net::TcpListener;

    fn registry_with_registered_client(nick: &str) -> (Registry, ClientId) {
        let mut reg = Registry::new("pw".to_string(), Config::default());
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let std_stream = std::net::TcpStream::connect(addr).unwrap();
        std_stream.set_nonblocking(true).unwrap();
        let stream = mio::net::TcpStream::from_std(std_stream);
        let mut client = Client::new(mio::Token(1), stream, "127.0.0.1".to_string());
        client.authenticated = true;
        client.nick = nick.to_string();
        client.user = nick.to_string();
        client.registered = true;
        let id = client.id;
        reg.clients.insert(id, client);
        (reg, id)
    }

    #[test]
    fn unregistered_client_gets_not_registered_for_join() {
        let mut reg = Registry::new("pw".to_string(), Config::default());
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let std_stream = std::net::TcpStream::connect(addr).unwrap();
        std_stream.set_nonblocking(true).unwrap();
        let stream = mio::net::TcpStream::from_std(std_stream);
        let client = Client::new(mio::Token(1), stream, "127.0.0.1".to_string());
        let id = client.id;
        reg.clients.insert(id, client);

        let disconnect = dispatch(&mut reg, id, Message::parse("JOIN #dev"));
        assert!(!disconnect);
        assert!(reg.channels.is_empty());
    }

    #[test]
    fn join_then_part_round_trips_membership() {
        let (mut reg, id) = registry_with_registered_client("alice");
        dispatch(&mut reg, id, Message::parse("JOIN #dev"));
        assert!(reg.channels.contains_key("#dev"));
        dispatch(&mut reg, id, Message::parse("PART #dev"));
        assert!(reg.channels.get("#dev").is_none());
    }

    #[test]
    fn quit_signals_disconnect() {
        let (mut reg, id) = registry_with_registered_client("alice");
        let disconnect = dispatch(&mut reg, id, Message::parse("QUIT :bye"));
        assert!(disconnect);
        assert!(reg.clients.get(&id).is_none());
    }

    #[test]
    fn unknown_command_does_not_disconnect() {
        let (mut reg, id) = registry_with_registered_client("alice");
        let disconnect = dispatch(&mut reg, id, Message::parse("BOGUS"));
        assert!(!disconnect);
    }

    #[test]
    fn unknown_command_from_unregistered_client_is_silently_ignored() {
        let mut reg = Registry::new("pw".to_string(), Config::default());
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let std_stream = std::net::TcpStream::connect(addr).unwrap();
        std_stream.set_nonblocking(true).unwrap();
        let stream = mio::net::TcpStream::from_std(std_stream);
        let client = Client::new(mio::Token(1), stream, "127.0.0.1".to_string());
        let id = client.id;
        reg.clients.insert(id, client);

        // Neither 421 nor 451 should come back for a command dispatch
        // doesn't recognize, since registration never completed.
        let disconnect = dispatch(&mut reg, id, Message::parse("BOGUS"));
        assert!(!disconnect);
    }
}
