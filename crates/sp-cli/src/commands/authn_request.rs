//! `authn-request` command.

use std::sync::Arc;

use sp_protocol_saml::{AuthnOutcome, RuntimeState};

use crate::cli::AuthnRequestArgs;
use crate::config::{IdpMetadataFile, OutputFormat};
use crate::output::info;
use crate::CliConfig;

/// Runs the IdP decision for a source and prints where the browser would go.
pub fn run_authn_request(args: &AuthnRequestArgs, config: &CliConfig) -> crate::CliResult<()> {
    let store = IdpMetadataFile::load(&args.idp_metadata)?.into_store();
    let source = config.build_source(&args.source, Arc::new(store))?;

    let mut state = RuntimeState::new().with_idp_list(args.idp_list.iter().cloned());
    state.idp.clone_from(&args.idp);
    state.force_authn = args.force_authn;
    state.relay_state.clone_from(&args.relay_state);

    match source.authenticate(state)? {
        AuthnOutcome::Request(message) => match config.output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&message)?),
            OutputFormat::Table => {
                info(&format!("AuthnRequest {} to {}", message.id, message.destination));
                println!("{}", message.xml);
                println!();
                println!("{}", message.redirect_url);
            }
            OutputFormat::Quiet => println!("{}", message.redirect_url),
        },
        AuthnOutcome::Discovery(discovery) => {
            if matches!(config.output_format, OutputFormat::Table) {
                info(&format!(
                    "Discovery needed among {} candidates (state {})",
                    discovery.candidates.len(),
                    discovery.state_id
                ));
            }
            println!("{}", discovery.url);
        }
    }
    Ok(())
}
