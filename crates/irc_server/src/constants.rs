//! Numeric reply codes and protocol-level constants.
//!
//! Codes and their `_STR` counterparts mirror RFC 2812's wording where the
//! spec calls for the RFC text verbatim; a few (001-004, the `(+l)`-style
//! channel errors) instead use the server's own wording, matching the
//! reference implementation this crate is built from.

/// Maximum number of live client connections, unless overridden by config.
pub const DEFAULT_MAX_CLIENTS: usize = 5;

/// Single `recv` never reads more than this many bytes at once.
pub const RECV_BUFFER_SIZE: usize = 1024;

pub const RPL_WELCOME_NB: u16 = 1;
pub const RPL_YOURHOST_NB: u16 = 2;
pub const RPL_CREATED_NB: u16 = 3;
pub const RPL_MYINFO_NB: u16 = 4;

pub const RPL_WHOISUSER_NB: u16 = 311;
pub const RPL_ENDOFWHOIS_NB: u16 = 318;
pub const RPL_ENDOFWHOIS_STR: &str = "End of WHOIS list";

pub const RPL_CHANNELMODEIS_NB: u16 = 324;

pub const RPL_NOTOPIC_NB: u16 = 331;
pub const RPL_NOTOPIC_STR: &str = "No topic is set";
pub const RPL_TOPIC_NB: u16 = 332;

pub const RPL_INVITING_NB: u16 = 341;

pub const RPL_NAMREPLY_NB: u16 = 353;
pub const RPL_ENDOFNAMES_NB: u16 = 366;
pub const RPL_ENDOFNAMES_STR: &str = "End of NAMES list";

pub const ERR_NOSUCHNICK_NB: u16 = 401;
pub const ERR_NOSUCHNICK_STR: &str = "No such nick";
pub const ERR_NOSUCHCHANNEL_NB: u16 = 403;
pub const ERR_NOSUCHCHANNEL_STR: &str = "No such channel";
pub const ERR_CANNOTSENDTOCHAN_NB: u16 = 404;
pub const ERR_CANNOTSENDTOCHAN_STR: &str = "Cannot send to channel";

pub const ERR_UNKNOWNCOMMAND_NB: u16 = 421;
pub const ERR_UNKNOWNCOMMAND_STR: &str = "Unknown command";

pub const ERR_NONICKNAMEGIVEN_NB: u16 = 431;
pub const ERR_NONICKNAMEGIVEN_STR: &str = "No nickname given";
pub const ERR_NICKNAMEINUSE_NB: u16 = 433;
pub const ERR_NICKNAMEINUSE_STR: &str = "Nickname is already in use";

pub const ERR_USERNOTINCHANNEL_NB: u16 = 441;
pub const ERR_USERNOTINCHANNEL_STR: &str = "They aren't on that channel";
pub const ERR_NOTONCHANNEL_NB: u16 = 442;
pub const ERR_NOTONCHANNEL_STR: &str = "You're not on that channel";
pub const ERR_USERONCHANNEL_NB: u16 = 443;
pub const ERR_USERONCHANNEL_STR: &str = "is already on channel";

pub const ERR_NOTREGISTERED_NB: u16 = 451;
pub const ERR_NOTREGISTERED_STR: &str = "You have not registered";

pub const ERR_NEEDMOREPARAMS_NB: u16 = 461;
pub const ERR_NEEDMOREPARAMS_STR: &str = "Not enough parameters";
pub const ERR_ALREADYREGISTERED_NB: u16 = 462;
pub const ERR_ALREADYREGISTERED_STR: &str = "You may not reregister";
pub const ERR_PASSWDMISMATCH_NB: u16 = 464;
pub const ERR_PASSWDMISMATCH_STR: &str = "Password incorrect";

pub const ERR_CHANNELISFULL_NB: u16 = 471;
pub const ERR_INVITEONLYCHAN_NB: u16 = 473;
pub const ERR_BADCHANNELKEY_NB: u16 = 475;

pub const ERR_CHANOPRIVSNEEDED_NB: u16 = 482;
pub const ERR_CHANOPRIVSNEEDED_STR: &str = "You're not channel operator";
