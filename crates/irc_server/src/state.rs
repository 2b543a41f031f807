//! Shared server state: every live connection and every channel, plus the
//! handful of lookups the dispatcher needs (nick -> client, empty-channel
//! sweep). Single-threaded and single-owner — the event loop holds the only
//! `Registry` and passes `&mut` into the dispatcher, so there is nothing here
//! that needs a lock.

use std::collections::HashMap;

use crate::channel::Channel;
use crate::client::{Client, ClientId};
use crate::config::Config;

pub struct Registry {
    pub clients: HashMap<ClientId, Client>,
    pub channels: HashMap<String, Channel>,
    pub password: String,
    pub config: Config,
}

impl Registry {
    pub fn new(password: String, config: Config) -> Self {
        Registry {
            clients: HashMap::new(),
            channels: HashMap::new(),
            password,
            config,
        }
    }

    pub fn max_clients(&self) -> usize {
        self.config.limits.max_clients
    }

    /// Linear scan by nickname, case-sensitive — mirrors the reference
    /// server's `findClientByNickname`, which never builds a secondary
    /// index either.
    pub fn find_client_by_nick(&self, nick: &str) -> Option<ClientId> {
        self.clients
            .values()
            .find(|c| c.nick == nick)
            .map(|c| c.id)
    }

    pub fn nick_in_use(&self, nick: &str) -> bool {
        self.find_client_by_nick(nick).is_some()
    }

    pub fn channel_names(&self, id: ClientId) -> Vec<String> {
        self.clients
            .get(&id)
            .map(|c| c.channels.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Removes `id` from every channel it belongs to and drops any channel
    /// that becomes empty as a result. Called when a client disconnects or
    /// issues QUIT.
    pub fn remove_client_from_all_channels(&mut self, id: ClientId) {
        let names = self.channel_names(id);
        for name in names {
            if let Some(ch) = self.channels.get_mut(&name) {
                ch.remove_member(id);
            }
        }
        if let Some(client) = self.clients.get_mut(&id) {
            client.channels.clear();
        }
        self.cleanup_empty_channels();
    }

    pub fn cleanup_empty_channels(&mut self) {
        self.channels.retain(|_, ch| !ch.is_empty());
    }

    pub fn disconnect(&mut self, id: ClientId) -> Option<Client> {
        self.remove_client_from_all_channels(id);
        self.clients.remove(&id)
    }

    /// `#` or `&` prefix, length > 1.
    pub fn is_valid_channel_name(name: &str) -> bool {
        name.len() > 1 && (name.starts_with('#') || name.starts_with('&'))
    }
}
