//! # SP CLI
//!
//! Command-line tool for SAML SP authentication sources.

#![forbid(unsafe_code)]
#![deny(warnings)]

use clap::Parser;
use sp_cli::{
    cli::{Cli, Command},
    commands::{run_authn_request, run_metadata, run_sources, run_validate},
    config::CliConfig,
    output::error,
};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    if let Err(e) = sp_core::logging::init(level) {
        error(&format!("Failed to initialise logging: {e}"));
    }

    let config = match CliConfig::load(&cli.config, cli.output) {
        Ok(c) => c,
        Err(e) => {
            error(&format!("Failed to load configuration: {e}"));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Sources => run_sources(&config),
        Command::Validate => run_validate(&config),
        Command::Metadata(args) => run_metadata(&args, &config),
        Command::AuthnRequest(args) => run_authn_request(&args, &config),
    };

    if let Err(e) = result {
        error(&e.to_string());
        std::process::exit(1);
    }
}
