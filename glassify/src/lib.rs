//! Glassify
//!
//! Command line front end for the background removal relay.
//!
//! - `glassify serve` runs the relay that holds the remove.bg API key.
//! - `glassify remove` sends a local image through a relay and writes the
//!   transparent result, optionally with a before/after comparison.

#[macro_use]
extern crate derivative;

pub mod cli;
pub mod config;

mod logic;

use anyhow::Result;
use cli::{Cli, Command};
use config::Config;

/// Sets up a logger printing timestamp, level, file name, line number and
/// message. Defaults to `info`, `RUST_LOG` overrides it.
pub fn init_logger() {
    use std::io::Write;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::init(cli.config)?;

    match cli.command {
        Command::Serve(args) => logic::serve::run(&config, args).await,
        Command::Remove(args) => logic::remove::run(&config, args).await,
    }
}
