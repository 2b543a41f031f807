//! A single channel: membership, operator set, invite list, and the i/t/k/l
//! modes. Membership is keyed by [`ClientId`] rather than nickname so that a
//! nick change never requires rekeying a channel's member sets.

use std::collections::HashSet;

use crate::client::ClientId;

pub enum JoinError {
    ChannelIsFull,
    InviteOnly,
    BadKey,
}

pub struct Channel {
    pub name: String,
    pub topic: Option<String>,

    pub invite_only: bool,
    pub topic_restricted: bool,
    pub key: Option<String>,
    pub limit: Option<usize>,

    pub members: HashSet<ClientId>,
    pub operators: HashSet<ClientId>,
    pub invited: HashSet<ClientId>,
}

impl Channel {
    pub fn new(name: String) -> Self {
        Channel {
            name,
            topic: None,
            invite_only: false,
            topic_restricted: false,
            key: None,
            limit: None,
            members: HashSet::new(),
            operators: HashSet::new(),
            invited: HashSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_operator(&self, id: ClientId) -> bool {
        self.operators.contains(&id)
    }

    /// Checked in this exact order: user limit, then invite-only, then key —
    /// the first failing condition is the one reported.
    pub fn can_join(&self, id: ClientId, key: Option<&str>) -> Result<(), JoinError> {
        if let Some(limit) = self.limit {
            if self.members.len() >= limit {
                return Err(JoinError::ChannelIsFull);
            }
        }
        if self.invite_only && !self.invited.contains(&id) {
            return Err(JoinError::InviteOnly);
        }
        if let Some(expected) = &self.key {
            if key != Some(expected.as_str()) {
                return Err(JoinError::BadKey);
            }
        }
        Ok(())
    }

    /// Adds `id` as a member. The first member to ever join becomes an
    /// operator. A successful join clears any outstanding invite for `id`.
    /// No-op if `id` is already a member.
    pub fn add_member(&mut self, id: ClientId) {
        if !self.members.insert(id) {
            return;
        }
        if self.members.len() == 1 {
            self.operators.insert(id);
        }
        self.invited.remove(&id);
    }

    /// Removes `id` from members, operators, and the invite list. Idempotent.
    pub fn remove_member(&mut self, id: ClientId) {
        self.members.remove(&id);
        self.operators.remove(&id);
        self.invited.remove(&id);
    }

    pub fn invite(&mut self, id: ClientId) {
        self.invited.insert(id);
    }

    pub fn set_operator(&mut self, id: ClientId, on: bool) {
        if on {
            self.operators.insert(id);
        } else {
            self.operators.remove(&id);
        }
    }

    /// Mode letters in `itkl` order, with key/limit as space-separated
    /// trailing params — e.g. `("+kl", "secret 10")`. No flags set yields
    /// `("", "")`, not a bare `"+"`.
    pub fn mode_string(&self) -> (String, String) {
        let mut flags = String::new();
        let mut params = Vec::new();

        if self.invite_only {
            flags.push('i');
        }
        if self.topic_restricted {
            flags.push('t');
        }
        if let Some(key) = &self.key {
            flags.push('k');
            params.push(key.clone());
        }
        if let Some(limit) = self.limit {
            flags.push('l');
            params.push(limit.to_string());
        }

        if flags.is_empty() {
            (String::new(), String::new())
        } else {
            (format!("+{flags}"), params.join(" "))
        }
    }

    /// Member nicknames for NAMES/JOIN replies, operators prefixed with `@`,
    /// resolved and sorted by the caller — this just renders one entry.
    pub fn format_member(nick: &str, is_operator: bool) -> String {
        if is_operator {
            format!("@{nick}")
        } else {
            nick.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: usize) -> ClientId {
        mio::Token(n)
    }

    #[test]
    fn first_member_becomes_operator() {
        let mut ch = Channel::new("#dev".to_string());
        ch.add_member(id(1));
        assert!(ch.is_operator(id(1)));
        ch.add_member(id(2));
        assert!(!ch.is_operator(id(2)));
    }

    #[test]
    fn join_order_checks_limit_before_invite_before_key() {
        let mut ch = Channel::new("#dev".to_string());
        ch.limit = Some(0);
        ch.invite_only = true;
        ch.key = Some("secret".to_string());
        assert!(matches!(
            ch.can_join(id(1), None),
            Err(JoinError::ChannelIsFull)
        ));

        ch.limit = None;
        assert!(matches!(
            ch.can_join(id(1), None),
            Err(JoinError::InviteOnly)
        ));

        ch.invite_only = false;
        assert!(matches!(ch.can_join(id(1), None), Err(JoinError::BadKey)));

        assert!(ch.can_join(id(1), Some("secret")).is_ok());
    }

    #[test]
    fn successful_join_clears_invite() {
        let mut ch = Channel::new("#dev".to_string());
        ch.invite(id(1));
        ch.add_member(id(1));
        assert!(!ch.invited.contains(&id(1)));
    }

    #[test]
    fn mode_string_is_empty_with_no_flags() {
        let ch = Channel::new("#dev".to_string());
        assert_eq!(ch.mode_string(), (String::new(), String::new()));
    }

    #[test]
    fn mode_string_orders_itkl_with_params() {
        let mut ch = Channel::new("#dev".to_string());
        ch.topic_restricted = true;
        ch.invite_only = true;
        ch.key = Some("secret".to_string());
        ch.limit = Some(10);
        assert_eq!(
            ch.mode_string(),
            ("+itkl".to_string(), "secret 10".to_string())
        );
    }

    #[test]
    fn remove_member_is_idempotent() {
        let mut ch = Channel::new("#dev".to_string());
        ch.add_member(id(1));
        ch.remove_member(id(1));
        ch.remove_member(id(1));
        assert!(ch.is_empty());
    }
}
