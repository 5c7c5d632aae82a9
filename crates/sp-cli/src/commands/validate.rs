//! `validate` command.

use crate::output::{error, success, warning};
use crate::{CliConfig, CliError};

use super::no_idps;

/// Creates every source and synthesizes its metadata, reporting each failure.
pub fn run_validate(config: &CliConfig) -> crate::CliResult<()> {
    let sources = config.build_sources(no_idps())?;

    let mut failures = 0usize;
    for (id, source) in &sources {
        match source.hosted_metadata() {
            Ok(_) => {
                success(&format!("{id}: {}", source.entity_id()));
                if source.config().credentials.is_none() {
                    warning(&format!("{id}: no key pair, requests will be unsigned"));
                }
            }
            Err(e) => {
                failures += 1;
                error(&format!("{id}: {e}"));
            }
        }
    }

    if failures == 0 {
        Ok(())
    } else {
        Err(CliError::Config(format!(
            "{failures} of {} sources in {} are invalid",
            sources.len(),
            config.path.display()
        )))
    }
}
