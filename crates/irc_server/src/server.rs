//! The event loop: a single `mio::Poll` instance multiplexing the listening
//! socket and every accepted connection, all on one thread. No background
//! threads, no async runtime, no locks — every mutation of [`Registry`]
//! happens inline while handling one readiness event.

use std::io::{ErrorKind, Read};
use std::net::SocketAddr;

use mio::net::{TcpListener, TcpStream};
use mio::{Events, Interest, Poll, Token};

use crate::client::{Client, ClientId};
use crate::commands;
use crate::config::Config;
use crate::constants::RECV_BUFFER_SIZE;
use crate::errors::ServerError;
use crate::message::Message;
use crate::state::Registry;

const LISTENER_TOKEN: Token = Token(0);
const FIRST_CLIENT_TOKEN: usize = 1;

pub struct Server {
    poll: Poll,
    listener: TcpListener,
    registry: Registry,
    next_token: usize,
}

impl Server {
    pub fn bind(addr: SocketAddr, password: String, config: Config) -> Result<Self, ServerError> {
        let std_listener =
            std::net::TcpListener::bind(addr).map_err(|source| ServerError::Bind { addr, source })?;
        std_listener
            .set_nonblocking(true)
            .map_err(ServerError::SocketCreate)?;
        let mut listener = TcpListener::from_std(std_listener);

        let poll = Poll::new().map_err(ServerError::Poll)?;
        poll.registry()
            .register(&mut listener, LISTENER_TOKEN, Interest::READABLE)
            .map_err(ServerError::PollRegister)?;

        Ok(Server {
            poll,
            listener,
            registry: Registry::new(password, config),
            next_token: FIRST_CLIENT_TOKEN,
        })
    }

    pub fn run(&mut self) -> Result<(), ServerError> {
        let mut events = Events::with_capacity(128);
        loop {
            self.poll.poll(&mut events, None).map_err(ServerError::Poll)?;
            for event in events.iter() {
                if event.token() == LISTENER_TOKEN {
                    self.accept_new_clients();
                } else {
                    self.handle_client_event(event.token());
                }
            }
        }
    }

    fn accept_new_clients(&mut self) {
        loop {
            match self.listener.accept() {
                Ok((mut stream, addr)) => {
                    if self.registry.clients.len() >= self.registry.max_clients() {
                        log::info!("rejecting {addr}: server is full");
                        drop(stream);
                        continue;
                    }
                    let token = Token(self.next_token);
                    self.next_token += 1;
                    if let Err(err) =
                        self.poll
                            .registry()
                            .register(&mut stream, token, Interest::READABLE)
                    {
                        log::warn!("failed to register {addr}: {err}");
                        continue;
                    }
                    log::info!("accepted connection from {addr} as {token:?}");
                    let client = Client::new(token, stream, addr.ip().to_string());
                    self.registry.clients.insert(token, client);
                }
                Err(err) if err.kind() == ErrorKind::WouldBlock => break,
                Err(err) => {
                    log::warn!("accept failed: {err}");
                    break;
                }
            }
        }
    }

    fn handle_client_event(&mut self, token: ClientId) {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        let read_result = self
            .registry
            .clients
            .get_mut(&token)
            .map(|c| c.stream.read(&mut buf));

        let Some(result) = read_result else {
            return;
        };

        match result {
            Ok(0) => self.drop_client(token),
            Ok(n) => {
                let lines = self
                    .registry
                    .clients
                    .get_mut(&token)
                    .map(|c| c.feed(&buf[..n]))
                    .unwrap_or_default();
                for line in lines {
                    if !self.registry.clients.contains_key(&token) {
                        break;
                    }
                    let msg = Message::parse(&line);
                    // QUIT tears the client out of `registry` itself (so its
                    // channel memberships are gone before the quit message
                    // broadcasts); dropping its `TcpStream` here closes the
                    // fd, which the kernel removes from the poller on its own.
                    if commands::dispatch(&mut self.registry, token, msg) {
                        return;
                    }
                }
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => {}
            Err(_) => self.drop_client(token),
        }
    }

    fn drop_client(&mut self, token: ClientId) {
        self.deregister(token);
        self.registry.disconnect(token);
    }

    fn deregister(&mut self, token: ClientId) {
        if let Some(client) = self.registry.clients.get_mut(&token) {
            let _ = self.poll.registry().deregister(&mut client.stream);
        }
    }
}
