use thiserror::Error;

/// Startup-fatal errors. Anything here unwinds straight to the process
/// entry point and exits non-zero; nothing in the event loop itself can
/// produce one of these once `Server::bind` has returned.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to create listening socket: {0}")]
    SocketCreate(#[source] std::io::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to register listener with the poller: {0}")]
    PollRegister(#[source] std::io::Error),

    #[error("poll failed: {0}")]
    Poll(#[source] std::io::Error),

    #[error("failed to read config file {path:?}: {source}")]
    ConfigRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {source}")]
    ConfigParse {
        path: std::path::PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
