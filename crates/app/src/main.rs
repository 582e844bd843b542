//! Storefront CLI

use std::process;

use clap::Parser;

mod cli;
mod config;
mod observability;
mod render;

fn main() {
    let _env = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    if let Err(error) = observability::init(&cli.logging) {
        eprintln!("{error}");
        process::exit(1);
    }

    if let Err(error) = cli.run() {
        eprintln!("{error}");
        process::exit(1);
    }
}
