//! EmberKV CLI Client
//!
//! Reads commands from stdin, one per line, and prints one response per
//! line. Works interactively or with piped input.

use std::io::{self, BufRead, Write};

use clap::Parser;
use emberkv::network::Client;
use emberkv::{App, Context, Engine};

/// EmberKV CLI
#[derive(Parser, Debug)]
#[command(name = "emberkv-cli")]
#[command(about = "CLI for the EmberKV key-value store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:3002")]
    server: String,

    /// Run commands against a throwaway in-process engine instead of a server
    #[arg(long)]
    memory: bool,
}

fn main() {
    let args = Args::parse();

    let result = if args.memory {
        run_memory()
    } else {
        run_remote(&args.server)
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run_remote(addr: &str) -> emberkv::Result<()> {
    let mut client = Client::connect(addr)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = client.send(&line)?;
        writeln!(out, "{}", response)?;
    }
    Ok(())
}

fn run_memory() -> emberkv::Result<()> {
    let app = App::new(Engine::new());
    let ctx = Context::background();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(out, "{}", app.handle(&ctx, &line))?;
    }
    Ok(())
}
