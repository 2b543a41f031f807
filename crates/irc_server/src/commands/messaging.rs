//! PRIVMSG and WHOIS.

use crate::client::ClientId;
use crate::outbound::{broadcast_to_channel, send_line, send_reply};
use crate::replies::IrcReply;
use crate::state::Registry;

fn nick_of(registry: &Registry, id: ClientId) -> String {
    registry.clients[&id].nick.clone()
}

pub fn handle_privmsg(
    registry: &mut Registry,
    id: ClientId,
    params: &[String],
    trailing: Option<&str>,
) {
    let nick = nick_of(registry, id);
    let (Some(target), Some(text)) = (params.first(), trailing) else {
        send_reply(
            registry,
            id,
            IrcReply::NeedMoreParams {
                nick: &nick,
                command: "PRIVMSG",
            },
        );
        return;
    };

    let prefix = registry.clients[&id].source_prefix();

    if Registry::is_valid_channel_name(target) {
        let Some(ch) = registry.channels.get(target) else {
            send_reply(
                registry,
                id,
                IrcReply::NoSuchChannel {
                    nick: &nick,
                    channel: target,
                },
            );
            return;
        };
        if !ch.members.contains(&id) {
            send_reply(
                registry,
                id,
                IrcReply::CannotSendToChan {
                    nick: &nick,
                    channel: target,
                },
            );
            return;
        }
        let line = format!(":{prefix} PRIVMSG {target} :{text}");
        broadcast_to_channel(registry, target, &line, Some(id));
        return;
    }

    let Some(target_id) = registry.find_client_by_nick(target) else {
        send_reply(
            registry,
            id,
            IrcReply::NoSuchNick {
                nick: &nick,
                target,
            },
        );
        return;
    };
    let line = format!(":{prefix} PRIVMSG {target} :{text}");
    send_line(registry, target_id, &line);
}

pub fn handle_whois(registry: &mut Registry, id: ClientId, params: &[String]) {
    let nick = nick_of(registry, id);
    let Some(target_nick) = params.first() else {
        send_reply(
            registry,
            id,
            IrcReply::NeedMoreParams {
                nick: &nick,
                command: "WHOIS",
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
        send_reply(
            registry,
            id,
            IrcReply::EndOfWhois {
                nick: &nick,
                target: target_nick,
            },
        );
        return;
    };
    let target = &registry.clients[&target_id];
    let (user, host, realname) = (
        target.user.clone(),
        target.host.clone(),
        target.realname.clone(),
    );
    send_reply(
        registry,
        id,
        IrcReply::WhoisUser {
            nick: &nick,
            target: target_nick,
            user: &user,
            host: &host,
            realname: &realname,
        },
    );
    send_reply(
        registry,
        id,
        IrcReply::EndOfWhois {
            nick: &nick,
            target: target_nick,
        },
    );
}
