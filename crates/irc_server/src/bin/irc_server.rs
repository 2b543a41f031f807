use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::process::ExitCode;

use clap::Parser;
use flexi_logger::Logger;

use irc_server::config::Config;
use irc_server::errors::ServerError;
use irc_server::server::Server;

/// A single-process IRC relay: one listening port, one password, optional
/// ambient settings from a TOML file.
#[derive(Parser, Debug)]
#[command(name = "ircserv", version, about)]
struct Cli {
    /// TCP port to listen on, 1024-65535.
    #[arg(value_parser = parse_port)]
    port: u16,

    /// Password clients must supply via PASS before registering.
    password: String,

    /// Optional TOML file with ambient [server]/[limits] settings.
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

fn parse_port(raw: &str) -> Result<u16, String> {
    let port: u16 = raw.parse().map_err(|_| format!("invalid port {raw:?}"))?;
    if port < 1024 {
        return Err(format!("invalid port {raw:?}: must be >= 1024"));
    }
    Ok(port)
}

fn run() -> Result<(), ServerError> {
    let cli = Cli::parse();

    Logger::try_with_env_or_str("info")
        .expect("static log spec always parses")
        .start()
        .expect("only one logger is started per process");

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), cli.port);
    log::info!("starting {} on {addr}", config.server.name);
    let mut server = Server::bind(addr, cli.password, config)?;
    server.run()
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ircserv: {err}");
            ExitCode::FAILURE
        }
    }
}
