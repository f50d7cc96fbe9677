use vitrine_core::sync::{Notice, ToggleOutcome};
use vitrine_core::PromotionId;

use crate::cli::ToggleState;
use crate::commands::common::build_synchronizer;
use crate::error::CliError;

pub async fn run_toggle(
    api_url: Option<&str>,
    tenant: Option<&str>,
    id: &str,
    state: ToggleState,
) -> Result<(), CliError> {
    let id: PromotionId = id
        .parse()
        .map_err(|_| CliError::InvalidPromotionId(id.to_string()))?;

    let (sync, notices) = build_synchronizer(api_url, tenant)?;

    // Populate the cache so the synchronizer can find the record.
    sync.ensure_current().await?;

    match sync.toggle_active(id, state.as_bool()).await? {
        ToggleOutcome::Committed(_) => {
            for notice in notices.take() {
                if let Notice::Success(message) = notice {
                    println!("{message}: {id}");
                }
            }
            Ok(())
        }
        ToggleOutcome::RolledBack(_) => {
            let message = notices
                .take()
                .into_iter()
                .find_map(|notice| match notice {
                    Notice::Failure(message) => Some(message),
                    Notice::Success(_) => None,
                })
                .unwrap_or_else(|| "promotion update rejected".to_string());
            Err(CliError::ToggleRejected(message))
        }
        ToggleOutcome::NotCached => {
            println!("Promotion {id} is not in the current page; nothing to do");
            Ok(())
        }
    }
}
