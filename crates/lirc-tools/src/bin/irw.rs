//! Print keypresses broadcast by the lircd daemon, one line each.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use lirc_client::RawConnection;
use lirc_protocol::Keypress;

#[derive(Debug, Parser)]
#[command(name = "irw", about = "Stream keypresses from the lircd daemon")]
struct Cli {
    /// Path to the lircd socket; discovered when omitted.
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Print decoded fields (remote, key, repeat) instead of raw lines.
    #[arg(long)]
    parsed: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut conn = match RawConnection::connect(cli.socket.as_deref()) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("irw: {err}");
            return ExitCode::FAILURE;
        }
    };

    loop {
        match conn.read_line(None) {
            Ok(Some(line)) => {
                if cli.parsed {
                    match Keypress::parse(&line) {
                        Ok(event) => {
                            println!("{} {} {}", event.remote, event.key, event.repeat)
                        }
                        Err(err) => warn!(%err, "skipping unparsable broadcast"),
                    }
                } else {
                    println!("{line}");
                }
            }
            // Blocking reads only come back empty on timeout; with no
            // timeout set, keep waiting.
            Ok(None) => continue,
            Err(err) => {
                eprintln!("irw: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
}
