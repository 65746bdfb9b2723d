//! `responder` command-line entry point
//!
//! ```bash
//! # HTTP endpoint on the configured address
//! responder serve --port 8080
//!
//! # Interactive console session
//! responder -v chat
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use responder_core::{server, Config, Responder};

#[derive(Parser, Debug)]
#[command(
    name = "responder",
    about = "Rule-based chat responder: intents, dictionary, calculator and to-do list",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Configuration file (defaults to ./responder.toml when present)
    #[arg(short, long, env = "RESPONDER_CONFIG", global = true)]
    config: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the chat endpoint over HTTP
    Serve {
        #[arg(long)]
        host: Option<IpAddr>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Chat on the console until EOF or /quit
    Chat,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    // Built outside the async runtime: the dictionary client blocks
    let responder =
        Arc::new(Responder::from_config(&config).context("Failed to initialise responder")?);

    match cli.command {
        Commands::Serve { host, port } => {
            let addr = SocketAddr::new(
                host.unwrap_or(config.server.host),
                port.unwrap_or(config.server.port),
            );
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime
                .block_on(server::run_server(Arc::clone(&responder), addr))
                .context("Server error")?;
        }
        Commands::Chat => chat(&responder)?,
    }

    Ok(())
}

fn chat(responder: &Responder) -> anyhow::Result<()> {
    println!("Chat with Ava! Type /quit to leave.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        print!("You: ");
        stdout.flush().context("Failed to flush stdout")?;

        line.clear();
        if stdin.lock().read_line(&mut line).context("Failed to read input")? == 0 {
            println!();
            break;
        }

        let input = line.trim();
        if input.eq_ignore_ascii_case("/quit") {
            break;
        }

        match responder.get_response(input) {
            Ok(reply) => println!("Ava: {}", reply),
            Err(e) => {
                tracing::error!("Failed to generate reply: {:?}", e);
                eprintln!("Error: {}", e);
            }
        }
    }

    Ok(())
}
