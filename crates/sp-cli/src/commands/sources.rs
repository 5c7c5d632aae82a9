//! `sources` command.

use serde::Serialize;
use tabled::Tabled;

use crate::output::output;
use crate::CliConfig;

#[derive(Debug, Serialize, Tabled)]
struct SourceRow {
    #[tabled(rename = "Source")]
    id: String,
    #[tabled(rename = "Type")]
    source_type: String,
    #[tabled(rename = "Entity ID")]
    entity_id: String,
    #[tabled(rename = "IdP")]
    idp: String,
    #[tabled(rename = "Signed")]
    signed: bool,
}

/// Lists the configured sources.
pub fn run_sources(config: &CliConfig) -> crate::CliResult<()> {
    let rows: Vec<SourceRow> = config
        .sources
        .sources
        .iter()
        .map(|(id, source)| SourceRow {
            id: id.clone(),
            source_type: source.source_type.clone(),
            entity_id: source.sp.entity_id.clone(),
            idp: source.sp.idp.clone().unwrap_or_else(|| "-".to_string()),
            signed: source.sp.credentials.is_some(),
        })
        .collect();
    output(&rows, config.output_format)
}
