//! `metadata` command.

use crate::cli::{MetadataArgs, MetadataFormat};
use crate::CliConfig;

use super::no_idps;

/// Prints the hosted metadata of a source.
pub fn run_metadata(args: &MetadataArgs, config: &CliConfig) -> crate::CliResult<()> {
    let source = config.build_source(&args.source, no_idps())?;
    let document = source.hosted_metadata()?;

    match args.format {
        MetadataFormat::Xml => print!("{}", document.to_xml()),
        MetadataFormat::Json => println!("{}", serde_json::to_string_pretty(&document)?),
    }
    Ok(())
}
