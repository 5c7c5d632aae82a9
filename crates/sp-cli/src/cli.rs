//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::OutputFormat;

/// SP CLI - inspect and exercise SAML SP authentication sources.
#[derive(Debug, Parser)]
#[command(name = "sp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Authentication sources file.
    #[arg(short, long, env = "SP_CONFIG", default_value = "authsources.toml")]
    pub config: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List configured sources.
    Sources,

    /// Create every source and synthesize its metadata.
    Validate,

    /// Print the hosted metadata of a source.
    Metadata(MetadataArgs),

    /// Build an authentication request.
    AuthnRequest(AuthnRequestArgs),
}

/// Metadata document format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MetadataFormat {
    /// `md:EntityDescriptor` XML.
    #[default]
    Xml,
    /// The synthesized document as JSON.
    Json,
}

/// Arguments of `metadata`.
#[derive(Debug, Args)]
pub struct MetadataArgs {
    /// Source ID.
    pub source: String,

    /// Document format.
    #[arg(long, value_enum, default_value = "xml")]
    pub format: MetadataFormat,
}

/// Arguments of `authn-request`.
#[derive(Debug, Args)]
pub struct AuthnRequestArgs {
    /// Source ID.
    pub source: String,

    /// TOML or JSON file with `idps` entries.
    #[arg(long)]
    pub idp_metadata: PathBuf,

    /// IdP to use for this attempt.
    #[arg(long)]
    pub idp: Option<String>,

    /// Acceptable IdPs, repeatable.
    #[arg(long = "idp-list")]
    pub idp_list: Vec<String>,

    /// Request a fresh authentication.
    #[arg(long)]
    pub force_authn: bool,

    /// Relay state to send along.
    #[arg(long)]
    pub relay_state: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_authn_request() {
        let cli = Cli::try_parse_from([
            "sp",
            "-c",
            "sources.toml",
            "authn-request",
            "default-sp",
            "--idp-metadata",
            "idps.toml",
            "--idp-list",
            "https://idp1.example.org",
            "--idp-list",
            "https://idp2.example.org",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("sources.toml"));
        let Command::AuthnRequest(args) = cli.command else {
            panic!("expected authn-request");
        };
        assert_eq!(args.source, "default-sp");
        assert_eq!(args.idp_list.len(), 2);
        assert!(!args.force_authn);
    }

    #[test]
    fn metadata_defaults_to_xml() {
        let cli = Cli::try_parse_from(["sp", "metadata", "default-sp"]).unwrap();
        let Command::Metadata(args) = cli.command else {
            panic!("expected metadata");
        };
        assert_eq!(args.format, MetadataFormat::Xml);
    }
}
