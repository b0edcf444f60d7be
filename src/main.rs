mod config;
mod shell;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "breadcrumb")]
#[command(about = "Drive a navigation breadcrumb from JSON-line commands")]
struct Args {
    #[arg(long, help = "Read commands from this file instead of stdin")]
    script: Option<PathBuf>,

    #[arg(long, help = "Print the final trail as JSON")]
    json: bool,

    #[arg(long, help = "Do not print the trail after each change")]
    quiet: bool,
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = config::Config::from_env();

    info!("Starting breadcrumb shell...");

    let mut session = shell::Session::new(config, !args.quiet);
    match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            session.run(BufReader::new(file))?;
        }
        None => session.run(io::stdin().lock())?,
    }

    info!("Session finished with {} crumb(s)", session.breadcrumb().len());

    if args.json {
        let report = serde_json::to_string_pretty(&session.report())
            .context("Failed to serialize trail")?;
        println!("{}", report);
    } else if args.quiet {
        println!("{}", session.renderer().last());
    }

    Ok(())
}
