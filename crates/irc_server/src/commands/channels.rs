//! JOIN, PART, KICK, INVITE, TOPIC, MODE.

use crate::channel::{Channel, JoinError};
use crate::client::ClientId;
use crate::outbound::{broadcast_to_channel, send_line, send_reply};
use crate::replies::IrcReply;
use crate::state::Registry;

fn nick_of(registry: &Registry, id: ClientId) -> String {
    registry.clients[&id].nick.clone()
}

pub fn handle_join(registry: &mut Registry, id: ClientId, params: &[String]) {
    let nick = nick_of(registry, id);
    let Some(channel_list) = params.first() else {
        send_reply(
            registry,
            id,
            IrcReply::NeedMoreParams {
                nick: &nick,
                command: "JOIN",
            },
        );
        return;
    };
    let keys: Vec<Option<&str>> = match params.get(1) {
        Some(k) => k.split(',').map(Some).collect(),
        None => Vec::new(),
    };

    for (i, name) in channel_list.split(',').enumerate() {
        let key = keys.get(i).copied().flatten();
        join_one(registry, id, &nick, name, key);
    }
}

fn join_one(registry: &mut Registry, id: ClientId, nick: &str, name: &str, key: Option<&str>) {
    if !Registry::is_valid_channel_name(name) {
        send_reply(
            registry,
            id,
            IrcReply::NoSuchChannel {
                nick,
                channel: name,
            },
        );
        return;
    }

    registry
        .channels
        .entry(name.to_string())
        .or_insert_with(|| Channel::new(name.to_string()));

    let check = registry.channels[name].can_join(id, key);
    if let Err(err) = check {
        let reply = match err {
            JoinError::ChannelIsFull => IrcReply::ChannelIsFull {
                nick,
                channel: name,
            },
            JoinError::InviteOnly => IrcReply::InviteOnlyChan {
                nick,
                channel: name,
            },
            JoinError::BadKey => IrcReply::BadChannelKey {
                nick,
                channel: name,
            },
        };
        send_reply(registry, id, reply);
        return;
    }

    registry.channels.get_mut(name).unwrap().add_member(id);
    registry
        .clients
        .get_mut(&id)
        .unwrap()
        .channels
        .insert(name.to_string());

    let prefix = registry.clients[&id].source_prefix();
    let join_line = format!(":{prefix} JOIN {name}");
    broadcast_to_channel(registry, name, &join_line, None);

    let ch = &registry.channels[name];
    match &ch.topic {
        Some(topic) => send_reply(
            registry,
            id,
            IrcReply::Topic {
                nick,
                channel: name,
                topic,
            },
        ),
        None => send_reply(
            registry,
            id,
            IrcReply::NoTopic {
                nick,
                channel: name,
            },
        ),
    }

    send_names(registry, id, nick, name);
}

fn send_names(registry: &mut Registry, id: ClientId, nick: &str, channel: &str) {
    let Some(ch) = registry.channels.get(channel) else {
        return;
    };
    let mut names: Vec<String> = ch
        .members
        .iter()
        .filter_map(|member| registry.clients.get(member))
        .map(|c| Channel::format_member(&c.nick, ch.operators.contains(&c.id)))
        .collect();
    names.sort();
    let names = names.join(" ");
    send_reply(
        registry,
        id,
        IrcReply::NamReply {
            nick,
            channel,
            names: &names,
        },
    );
    send_reply(registry, id, IrcReply::EndOfNames { nick, channel });
}

pub fn handle_part(registry: &mut Registry, id: ClientId, params: &[String], trailing: Option<&str>) {
    let nick = nick_of(registry, id);
    let Some(channel_list) = params.first() else {
        send_reply(
            registry,
            id,
            IrcReply::NeedMoreParams {
                nick: &nick,
                command: "PART",
            },
        );
        return;
    };
    for name in channel_list.split(',') {
        part_one(registry, id, &nick, name, trailing);
    }
}

fn part_one(registry: &mut Registry, id: ClientId, nick: &str, name: &str, reason: Option<&str>) {
    let Some(ch) = registry.channels.get(name) else {
        send_reply(
            registry,
            id,
            IrcReply::NoSuchChannel {
                nick,
                channel: name,
            },
        );
        return;
    };
    if !ch.members.contains(&id) {
        send_reply(
            registry,
            id,
            IrcReply::NotOnChannel {
                nick,
                channel: name,
            },
        );
        return;
    }
    let prefix = registry.clients[&id].source_prefix();
    let line = match reason {
        Some(r) => format!(":{prefix} PART {name} :{r}"),
        None => format!(":{prefix} PART {name}"),
    };
    broadcast_to_channel(registry, name, &line, None);
    registry.channels.get_mut(name).unwrap().remove_member(id);
    registry
        .clients
        .get_mut(&id)
        .unwrap()
        .channels
        .remove(name);
    registry.cleanup_empty_channels();
}

pub fn handle_invite(registry: &mut Registry, id: ClientId, params: &[String]) {
    let nick = nick_of(registry, id);
    let (Some(target_nick), Some(channel)) = (params.first(), params.get(1)) else {
        send_reply(
            registry,
            id,
            IrcReply::NeedMoreParams {
                nick: &nick,
                command: "INVITE",
            },
        );
        return;
    };
    let Some(target_id) = registry.find_client_by_nick(target_nick) else {
        send_reply(
            registry,
            id,
            IrcReply::NoSuchNick {
                nick: &nick,
                target: target_nick,
            },
        );
        return;
    };
    let Some(ch) = registry.channels.get(channel) else {
        send_reply(
            registry,
            id,
            IrcReply::NoSuchChannel {
                nick: &nick,
                channel,
            },
        );
        return;
    };
    if !ch.members.contains(&id) {
        send_reply(
            registry,
            id,
            IrcReply::NotOnChannel {
                nick: &nick,
                channel,
            },
        );
        return;
    }
    if ch.invite_only && !ch.is_operator(id) {
        send_reply(
            registry,
            id,
            IrcReply::ChanOPrivsNeeded {
                nick: &nick,
                channel,
            },
        );
        return;
    }
    if ch.members.contains(&target_id) {
        send_reply(
            registry,
            id,
            IrcReply::UserOnChannel {
                nick: &nick,
                target: target_nick,
                channel,
            },
        );
        return;
    }
    registry.channels.get_mut(channel).unwrap().invite(target_id);
    send_reply(
        registry,
        id,
        IrcReply::Inviting {
            nick: &nick,
            target: target_nick,
            channel,
        },
    );
    let prefix = registry.clients[&id].source_prefix();
    send_line(
        registry,
        target_id,
        &format!(":{prefix} INVITE {target_nick} :{channel}"),
    );
}

pub fn handle_topic(registry: &mut Registry, id: ClientId, params: &[String], trailing: Option<&str>) {
    let nick = nick_of(registry, id);
    let Some(channel) = params.first() else {
        send_reply(
            registry,
            id,
            IrcReply::NeedMoreParams {
                nick: &nick,
                command: "TOPIC",
            },
        );
        return;
    };
    let Some(ch) = registry.channels.get(channel) else {
        send_reply(
            registry,
            id,
            IrcReply::NoSuchChannel {
                nick: &nick,
                channel,
            },
        );
        return;
    };
    if !ch.members.contains(&id) {
        send_reply(
            registry,
            id,
            IrcReply::NotOnChannel {
                nick: &nick,
                channel,
            },
        );
        return;
    }

    let Some(new_topic) = trailing else {
        match &ch.topic {
            Some(topic) => send_reply(
                registry,
                id,
                IrcReply::Topic {
                    nick: &nick,
                    channel,
                    topic,
                },
            ),
            None => send_reply(
                registry,
                id,
                IrcReply::NoTopic {
                    nick: &nick,
                    channel,
                },
            ),
        }
        return;
    };

    if ch.topic_restricted && !ch.is_operator(id) {
        send_reply(
            registry,
            id,
            IrcReply::ChanOPrivsNeeded {
                nick: &nick,
                channel,
            },
        );
        return;
    }

    registry.channels.get_mut(channel).unwrap().topic = Some(new_topic.to_string());
    let prefix = registry.clients[&id].source_prefix();
    let line = format!(":{prefix} TOPIC {channel} :{new_topic}");
    broadcast_to_channel(registry, channel, &line, None);
}

pub fn handle_kick(registry: &mut Registry, id: ClientId, params: &[String], trailing: Option<&str>) {
    let nick = nick_of(registry, id);
    let (Some(channel), Some(target_nick)) = (params.first(), params.get(1)) else {
        send_reply(
            registry,
            id,
            IrcReply::NeedMoreParams {
                nick: &nick,
                command: "KICK",
            },
        );
        return;
    };
    let Some(ch) = registry.channels.get(channel) else {
        send_reply(
            registry,
            id,
            IrcReply::NoSuchChannel {
                nick: &nick,
                channel,
            },
        );
        return;
    };
    if !ch.members.contains(&id) {
        send_reply(
            registry,
            id,
            IrcReply::NotOnChannel {
                nick: &nick,
                channel,
            },
        );
        return;
    }
    if !ch.is_operator(id) {
        send_reply(
            registry,
            id,
            IrcReply::ChanOPrivsNeeded {
                nick: &nick,
                channel,
            },
        );
        return;
    }
    let Some(target_id) = registry.find_client_by_nick(target_nick) else {
        send_reply(
            registry,
            id,
            IrcReply::NoSuchNick {
                nick: &nick,
                target: target_nick,
            },
        );
        return;
    };
    if !ch.members.contains(&target_id) {
        send_reply(
            registry,
            id,
            IrcReply::UserNotInChannel {
                nick: &nick,
                target: target_nick,
                channel,
            },
        );
        return;
    }

    let prefix = registry.clients[&id].source_prefix();
    let reason = trailing.unwrap_or(target_nick);
    let line = format!(":{prefix} KICK {channel} {target_nick} :{reason}");
    broadcast_to_channel(registry, channel, &line, None);

    registry.channels.get_mut(channel).unwrap().remove_member(target_id);
    registry
        .clients
        .get_mut(&target_id)
        .unwrap()
        .channels
        .remove(channel);
    registry.cleanup_empty_channels();
}

pub fn handle_mode(registry: &mut Registry, id: ClientId, params: &[String]) {
    let nick = nick_of(registry, id);
    let Some(channel) = params.first() else {
        send_reply(
            registry,
            id,
            IrcReply::NeedMoreParams {
                nick: &nick,
                command: "MODE",
            },
        );
        return;
    };
    if !registry.channels.contains_key(channel) {
        send_reply(
            registry,
            id,
            IrcReply::NoSuchChannel {
                nick: &nick,
                channel,
            },
        );
        return;
    }

    let Some(modestring) = params.get(1) else {
        let (modes, mode_params) = registry.channels[channel].mode_string();
        let modes = if modes.is_empty() { "+".to_string() } else { modes };
        send_reply(
            registry,
            id,
            IrcReply::ChannelModeIs {
                nick: &nick,
                channel,
                modes: &modes,
                mode_params: &mode_params,
            },
        );
        return;
    };

    if !registry.channels[channel].is_operator(id) {
        send_reply(
            registry,
            id,
            IrcReply::ChanOPrivsNeeded {
                nick: &nick,
                channel,
            },
        );
        return;
    }

    let mut adding = true;
    let mut param_index = 2usize;
    for c in modestring.chars() {
        match c {
            '+' => adding = true,
            '-' => adding = false,
            'i' => {
                registry.channels.get_mut(channel).unwrap().invite_only = adding;
            }
            't' => {
                registry.channels.get_mut(channel).unwrap().topic_restricted = adding;
            }
            'k' => {
                if adding {
                    let Some(param) = params.get(param_index).filter(|p| !p.is_empty()) else {
                        send_reply(
                            registry,
                            id,
                            IrcReply::NeedMoreParams {
                                nick: &nick,
                                command: "MODE",
                            },
                        );
                        continue;
                    };
                    registry.channels.get_mut(channel).unwrap().key = Some(param.clone());
                    param_index += 1;
                } else {
                    registry.channels.get_mut(channel).unwrap().key = None;
                }
            }
            'l' => {
                if adding {
                    let parsed = params.get(param_index).and_then(|p| p.parse::<usize>().ok());
                    let Some(limit) = parsed else {
                        continue;
                    };
                    registry.channels.get_mut(channel).unwrap().limit = Some(limit);
                    param_index += 1;
                } else {
                    registry.channels.get_mut(channel).unwrap().limit = None;
                }
            }
            'o' => {
                let Some(target_nick) = params.get(param_index).filter(|p| !p.is_empty()) else {
                    continue;
                };
                match registry.find_client_by_nick(target_nick) {
                    Some(target_id) if registry.channels[channel].members.contains(&target_id) => {
                        registry
                            .channels
                            .get_mut(channel)
                            .unwrap()
                            .set_operator(target_id, adding);
                    }
                    Some(_) => {
                        send_reply(
                            registry,
                            id,
                            IrcReply::UserNotInChannel {
                                nick: &nick,
                                target: target_nick,
                                channel,
                            },
                        );
                    }
                    None => {
                        send_reply(
                            registry,
                            id,
                            IrcReply::NoSuchNick {
                                nick: &nick,
                                target: target_nick,
                            },
                        );
                    }
                }
                param_index += 1;
            }
            _ => {}
        }
    }

    let prefix = registry.clients[&id].source_prefix();
    let consumed = params[2..param_index.min(params.len())].join(" ");
    let line = if consumed.is_empty() {
        format!(":{prefix} MODE {channel} {modestring}")
    } else {
        format!(":{prefix} MODE {channel} {modestring} {consumed}")
    };
    broadcast_to_channel(registry, channel, &line, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use crate::config::Config;
    use std::io::Read;
    use std::net::TcpListener;

    fn connected_client(token: usize, nick: &str) -> (Client, std::net::TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let std_stream = std::net::TcpStream::connect(addr).unwrap();
        std_stream.set_nonblocking(true).unwrap();
        let (peer, _) = listener.accept().unwrap();
        peer.set_nonblocking(true).unwrap();
        let stream = mio::net::TcpStream::from_std(std_stream);
        let mut client = Client::new(mio::Token(token), stream, "127.0.0.1".to_string());
        client.authenticated = true;
        client.nick = nick.to_string();
        client.user = nick.to_string();
        client.registered = true;
        (client, peer)
    }

    fn operator_in_channel(channel: &str) -> (Registry, ClientId, std::net::TcpStream) {
        let mut reg = Registry::new("pw".to_string(), Config::default());
        let (client, peer) = connected_client(1, "alice");
        let id = client.id;
        reg.clients.insert(id, client);

        let mut ch = Channel::new(channel.to_string());
        ch.add_member(id);
        reg.channels.insert(channel.to_string(), ch);
        (reg, id, peer)
    }

    fn last_line(peer: &mut std::net::TcpStream) -> String {
        let mut buf = [0u8; 256];
        let n = peer.read(&mut buf).unwrap();
        String::from_utf8_lossy(&buf[..n])
            .trim_end_matches(['\r', '\n'])
            .to_string()
    }

    #[test]
    fn mode_plus_k_without_key_sends_need_more_params() {
        let (mut reg, id, mut peer) = operator_in_channel("#dev");
        handle_mode(&mut reg, id, &["#dev".to_string(), "+k".to_string()]);
        assert_eq!(last_line(&mut peer), "461 alice MODE :Not enough parameters");
        assert!(reg.channels["#dev"].key.is_none());
    }

    #[test]
    fn mode_plus_o_on_known_nick_not_in_channel_is_441() {
        let (mut reg, id, mut peer) = operator_in_channel("#dev");
        let (bob, _bob_peer) = connected_client(2, "bob");
        reg.clients.insert(bob.id, bob);

        handle_mode(
            &mut reg,
            id,
            &["#dev".to_string(), "+o".to_string(), "bob".to_string()],
        );
        assert_eq!(
            last_line(&mut peer),
            "441 alice bob #dev :They aren't on that channel"
        );
    }

    #[test]
    fn mode_plus_o_on_unknown_nick_is_401() {
        let (mut reg, id, mut peer) = operator_in_channel("#dev");
        handle_mode(
            &mut reg,
            id,
            &["#dev".to_string(), "+o".to_string(), "ghost".to_string()],
        );
        assert_eq!(last_line(&mut peer), "401 alice ghost :No such nick");
    }

    #[test]
    fn join_broadcast_has_no_colon_before_channel() {
        let mut reg = Registry::new("pw".to_string(), Config::default());
        let (alice, mut alice_peer) = connected_client(1, "alice");
        let alice_id = alice.id;
        reg.clients.insert(alice_id, alice);
        handle_join(&mut reg, alice_id, &["#dev".to_string()]);
        last_line(&mut alice_peer); // topic
        last_line(&mut alice_peer); // names
        last_line(&mut alice_peer); // end of names

        let (bob, mut bob_peer) = connected_client(2, "bob");
        let bob_id = bob.id;
        reg.clients.insert(bob_id, bob);
        handle_join(&mut reg, bob_id, &["#dev".to_string()]);
        let _ = bob_peer;

        assert_eq!(last_line(&mut alice_peer), ":bob!bob@127.0.0.1 JOIN #dev");
    }
}
