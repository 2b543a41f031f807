//! Numeric replies the server sends back to a client.
//!
//! Every line rendered by [`IrcReply::format`] is `<code> <params...>`, with
//! no leading `:servername` token — the reference server writes raw,
//! unprefixed lines for anything it originates itself, reserving the
//! `:nick!user@host` prefix for messages relayed from one client to
//! another.

use crate::constants::*;

pub enum IrcReply<'a> {
    Welcome {
        nick: &'a str,
    },
    YourHost {
        nick: &'a str,
    },
    Created {
        nick: &'a str,
    },
    MyInfo {
        nick: &'a str,
    },
    WhoisUser {
        nick: &'a str,
        target: &'a str,
        user: &'a str,
        host: &'a str,
        realname: &'a str,
    },
    EndOfWhois {
        nick: &'a str,
        target: &'a str,
    },
    ChannelModeIs {
        nick: &'a str,
        channel: &'a str,
        modes: &'a str,
        mode_params: &'a str,
    },
    NoTopic {
        nick: &'a str,
        channel: &'a str,
    },
    Topic {
        nick: &'a str,
        channel: &'a str,
        topic: &'a str,
    },
    Inviting {
        nick: &'a str,
        target: &'a str,
        channel: &'a str,
    },
    NamReply {
        nick: &'a str,
        channel: &'a str,
        names: &'a str,
    },
    EndOfNames {
        nick: &'a str,
        channel: &'a str,
    },
    NoSuchNick {
        nick: &'a str,
        target: &'a str,
    },
    NoSuchChannel {
        nick: &'a str,
        channel: &'a str,
    },
    CannotSendToChan {
        nick: &'a str,
        channel: &'a str,
    },
    UnknownCommand {
        nick: &'a str,
        command: &'a str,
    },
    NoNicknameGiven {
        nick: &'a str,
    },
    NicknameInUse {
        nick: &'a str,
        wanted: &'a str,
    },
    UserNotInChannel {
        nick: &'a str,
        target: &'a str,
        channel: &'a str,
    },
    NotOnChannel {
        nick: &'a str,
        channel: &'a str,
    },
    UserOnChannel {
        nick: &'a str,
        target: &'a str,
        channel: &'a str,
    },
    NotRegistered {
        nick: &'a str,
    },
    NeedMoreParams {
        nick: &'a str,
        command: &'a str,
    },
    AlreadyRegistered {
        nick: &'a str,
    },
    PasswdMismatch {
        nick: &'a str,
    },
    ChannelIsFull {
        nick: &'a str,
        channel: &'a str,
    },
    InviteOnlyChan {
        nick: &'a str,
        channel: &'a str,
    },
    BadChannelKey {
        nick: &'a str,
        channel: &'a str,
    },
    ChanOPrivsNeeded {
        nick: &'a str,
        channel: &'a str,
    },
}

impl<'a> IrcReply<'a> {
    pub fn format(&self) -> String {
        match self {
            IrcReply::Welcome { nick } => format!(
                "{:03} {} :Welcome to the IRC Server, {}!",
                RPL_WELCOME_NB, nick, nick
            ),
            IrcReply::YourHost { nick } => format!(
                "{:03} {} :Your host is ircserv, running version 1.0",
                RPL_YOURHOST_NB, nick
            ),
            IrcReply::Created { nick } => format!(
                "{:03} {} :This server was created today",
                RPL_CREATED_NB, nick
            ),
            IrcReply::MyInfo { nick } => {
                format!("{:03} {} ircserv 1.0 o o", RPL_MYINFO_NB, nick)
            }
            IrcReply::WhoisUser {
                nick,
                target,
                user,
                host,
                realname,
            } => format!(
                "{:03} {} {} {} {} * :{}",
                RPL_WHOISUSER_NB, nick, target, user, host, realname
            ),
            IrcReply::EndOfWhois { nick, target } => format!(
                "{:03} {} {} :{}",
                RPL_ENDOFWHOIS_NB, nick, target, RPL_ENDOFWHOIS_STR
            ),
            IrcReply::ChannelModeIs {
                nick,
                channel,
                modes,
                mode_params,
            } => {
                if mode_params.is_empty() {
                    format!("{:03} {} {} {}", RPL_CHANNELMODEIS_NB, nick, channel, modes)
                } else {
                    format!(
                        "{:03} {} {} {} {}",
                        RPL_CHANNELMODEIS_NB, nick, channel, modes, mode_params
                    )
                }
            }
            IrcReply::NoTopic { nick, channel } => format!(
                "{:03} {} {} :{}",
                RPL_NOTOPIC_NB, nick, channel, RPL_NOTOPIC_STR
            ),
            IrcReply::Topic {
                nick,
                channel,
                topic,
            } => format!("{:03} {} {} :{}", RPL_TOPIC_NB, nick, channel, topic),
            IrcReply::Inviting {
                nick,
                target,
                channel,
            } => format!("{:03} {} {} {}", RPL_INVITING_NB, nick, target, channel),
            IrcReply::NamReply {
                nick,
                channel,
                names,
            } => format!(
                "{:03} {} = {} :{}",
                RPL_NAMREPLY_NB, nick, channel, names
            ),
            IrcReply::EndOfNames { nick, channel } => format!(
                "{:03} {} {} :{}",
                RPL_ENDOFNAMES_NB, nick, channel, RPL_ENDOFNAMES_STR
            ),
            IrcReply::NoSuchNick { nick, target } => format!(
                "{:03} {} {} :{}",
                ERR_NOSUCHNICK_NB, nick, target, ERR_NOSUCHNICK_STR
            ),
            IrcReply::NoSuchChannel { nick, channel } => format!(
                "{:03} {} {} :{}",
                ERR_NOSUCHCHANNEL_NB, nick, channel, ERR_NOSUCHCHANNEL_STR
            ),
            IrcReply::CannotSendToChan { nick, channel } => format!(
                "{:03} {} {} :{}",
                ERR_CANNOTSENDTOCHAN_NB, nick, channel, ERR_CANNOTSENDTOCHAN_STR
            ),
            IrcReply::UnknownCommand { nick, command } => format!(
                "{:03} {} {} :{}",
                ERR_UNKNOWNCOMMAND_NB, nick, command, ERR_UNKNOWNCOMMAND_STR
            ),
            IrcReply::NoNicknameGiven { nick } => format!(
                "{:03} {} :{}",
                ERR_NONICKNAMEGIVEN_NB, nick, ERR_NONICKNAMEGIVEN_STR
            ),
            IrcReply::NicknameInUse { nick, wanted } => format!(
                "{:03} {} {} :{}",
                ERR_NICKNAMEINUSE_NB, nick, wanted, ERR_NICKNAMEINUSE_STR
            ),
            IrcReply::UserNotInChannel {
                nick,
                target,
                channel,
            } => format!(
                "{:03} {} {} {} :{}",
                ERR_USERNOTINCHANNEL_NB, nick, target, channel, ERR_USERNOTINCHANNEL_STR
            ),
            IrcReply::NotOnChannel { nick, channel } => format!(
                "{:03} {} {} :{}",
                ERR_NOTONCHANNEL_NB, nick, channel, ERR_NOTONCHANNEL_STR
            ),
            IrcReply::UserOnChannel {
                nick,
                target,
                channel,
            } => format!(
                "{:03} {} {} {} :{}",
                ERR_USERONCHANNEL_NB, nick, target, channel, ERR_USERONCHANNEL_STR
            ),
            IrcReply::NotRegistered { nick } => format!(
                "{:03} {} :{}",
                ERR_NOTREGISTERED_NB, nick, ERR_NOTREGISTERED_STR
            ),
            IrcReply::NeedMoreParams { nick, command } => format!(
                "{:03} {} {} :{}",
                ERR_NEEDMOREPARAMS_NB, nick, command, ERR_NEEDMOREPARAMS_STR
            ),
            IrcReply::AlreadyRegistered { nick } => format!(
                "{:03} {} :{}",
                ERR_ALREADYREGISTERED_NB, nick, ERR_ALREADYREGISTERED_STR
            ),
            IrcReply::PasswdMismatch { nick } => format!(
                "{:03} {} :{}",
                ERR_PASSWDMISMATCH_NB, nick, ERR_PASSWDMISMATCH_STR
            ),
            IrcReply::ChannelIsFull { nick, channel } => format!(
                "{:03} {} {} :Cannot join channel (+l)",
                ERR_CHANNELISFULL_NB, nick, channel
            ),
            IrcReply::InviteOnlyChan { nick, channel } => format!(
                "{:03} {} {} :Cannot join channel (+i)",
                ERR_INVITEONLYCHAN_NB, nick, channel
            ),
            IrcReply::BadChannelKey { nick, channel } => format!(
                "{:03} {} {} :Cannot join channel (+k)",
                ERR_BADCHANNELKEY_NB, nick, channel
            ),
            IrcReply::ChanOPrivsNeeded { nick, channel } => format!(
                "{:03} {} {} :{}",
                ERR_CHANOPRIVSNEEDED_NB, nick, channel, ERR_CHANOPRIVSNEEDED_STR
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_has_no_server_prefix() {
        let line = IrcReply::Welcome { nick: "alice" }.format();
        assert!(!line.starts_with(':'));
        assert_eq!(line, "001 alice :Welcome to the IRC Server, alice!");
    }

    #[test]
    fn myinfo_has_no_trailing_colon() {
        let line = IrcReply::MyInfo { nick: "alice" }.format();
        assert_eq!(line, "004 alice ircserv 1.0 o o");
    }

    #[test]
    fn channel_mode_is_omits_params_when_empty() {
        let line = IrcReply::ChannelModeIs {
            nick: "alice",
            channel: "#dev",
            modes: "+it",
            mode_params: "",
        }
        .format();
        assert_eq!(line, "324 alice #dev +it");
    }

    #[test]
    fn channel_mode_is_includes_params_when_present() {
        let line = IrcReply::ChannelModeIs {
            nick: "alice",
            channel: "#dev",
            modes: "+kl",
            mode_params: "secret 10",
        }
        .format();
        assert_eq!(line, "324 alice #dev +kl secret 10");
    }

    #[test]
    fn nam_reply_marks_operators_with_at() {
        let line = IrcReply::NamReply {
            nick: "alice",
            channel: "#dev",
            names: "@alice bob",
        }
        .format();
        assert_eq!(line, "353 alice = #dev :@alice bob");
    }
}
