//! Send a command to the lircd daemon and print its reply.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use lirc_client::{ClientResult, CommandConnection};
use lirc_protocol::{Reply, Request};

#[derive(Debug, Parser)]
#[command(name = "irsend", about = "Send commands to the lircd daemon")]
struct Cli {
    /// Path to the lircd socket; discovered when omitted.
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Reply timeout in seconds.
    #[arg(long, default_value_t = 5.0)]
    timeout: f64,

    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// List remotes, or the keys of one remote.
    List {
        /// Remote to list keys for; lists remotes when omitted.
        remote: Option<String>,
    },

    /// Send one or more keys once.
    SendOnce {
        remote: String,
        /// Keys to send, at least one.
        keys: Vec<String>,
    },

    /// Start repeating a key.
    SendStart { remote: String, key: String },

    /// Stop repeating a key.
    SendStop { remote: String, key: String },

    /// Simulate a received keypress.
    Simulate {
        remote: String,
        key: String,
        /// Repeat count.
        #[arg(long, default_value_t = 1)]
        repeat: u32,
        /// Key code.
        #[arg(long, default_value_t = 0)]
        keycode: u64,
    },

    /// Select the transmitters to use.
    SetTransmitters {
        /// Raw bitmask; overrides the index list.
        #[arg(long)]
        mask: Option<u64>,
        /// 1-based transmitter indices.
        transmitters: Vec<u32>,
    },

    /// Print the daemon version.
    Version,

    /// Set a driver option.
    DrvOption { option: String, value: String },

    /// Start logging daemon input to a file, or stop when omitted.
    SetInputlog { logfile: Option<String> },
}

impl Action {
    fn into_request(self) -> Request {
        match self {
            Action::List { remote: None } => Request::ListRemotes,
            Action::List {
                remote: Some(remote),
            } => Request::ListKeys { remote },
            Action::SendOnce { remote, keys } => Request::SendOnce { remote, keys },
            Action::SendStart { remote, key } => Request::StartRepeat { remote, key },
            Action::SendStop { remote, key } => Request::StopRepeat { remote, key },
            Action::Simulate {
                remote,
                key,
                repeat,
                keycode,
            } => Request::Simulate {
                remote,
                key,
                repeat,
                keycode,
            },
            Action::SetTransmitters {
                mask: Some(mask), ..
            } => Request::SetTransmitters { mask },
            Action::SetTransmitters {
                mask: None,
                transmitters,
            } => Request::set_transmitters_from_indices(&transmitters),
            Action::Version => Request::Version,
            Action::DrvOption { option, value } => Request::DrvOption { option, value },
            Action::SetInputlog { logfile } => Request::SetInputLog { logfile },
        }
    }
}

fn run(cli: Cli) -> ClientResult<Reply> {
    let request = cli.action.into_request();
    debug!(request = %request.to_line(), "sending");
    let mut conn = CommandConnection::connect(cli.socket.as_deref())?;
    conn.run(&request, Some(Duration::from_secs_f64(cli.timeout)))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(reply) => {
            if reply.success == Some(false) {
                for line in &reply.data {
                    eprintln!("{line}");
                }
                eprintln!("irsend: daemon reported an error");
                return ExitCode::FAILURE;
            }
            for line in &reply.data {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("irsend: {err}");
            ExitCode::FAILURE
        }
    }
}
