use std::collections::BTreeMap;

use tracing::{error, info};

use crate::errors::AppError;
use crate::keys::store::CredentialStore;
use crate::models::platform::{Platform, Purpose};

/// Request body for a bulk key update: platform code → purpose code → raw key strings.
/// Ordered maps keep the processing order deterministic.
pub type BulkKeyUpdate = BTreeMap<String, BTreeMap<String, Vec<String>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkUpdateOutcome {
    pub inserted: usize,
}

/// Replaces the active key pool of every (platform, purpose) pair in `update`.
///
/// Per pair: deactivate all existing keys, then insert each non-blank trimmed value as
/// active. Pairs are not applied atomically; the first failure aborts the remaining
/// pairs and leaves the ones already written in place.
pub async fn apply_bulk_update(
    store: &dyn CredentialStore,
    update: &BulkKeyUpdate,
) -> Result<BulkUpdateOutcome, AppError> {
    let result = apply_pairs(store, update).await;
    if let Err(e) = &result {
        error!("Error updating keys: {e}");
    }
    result
}

async fn apply_pairs(
    store: &dyn CredentialStore,
    update: &BulkKeyUpdate,
) -> Result<BulkUpdateOutcome, AppError> {
    let mut outcome = BulkUpdateOutcome::default();

    for (platform_code, purposes) in update {
        let platform: Platform = platform_code
            .parse()
            .map_err(|e| AppError::Validation(format!("{e}")))?;

        for (purpose_code, keys) in purposes {
            let purpose: Purpose = purpose_code
                .parse()
                .map_err(|e| AppError::Validation(format!("{e}")))?;

            info!("Updating keys for platform: {platform}, purpose: {purpose}");

            let deactivated = store
                .deactivate_all(platform, purpose)
                .await
                .map_err(into_storage)?;

            let mut inserted = 0;
            for key in keys.iter().map(|k| k.trim()).filter(|k| !k.is_empty()) {
                store
                    .insert(platform, purpose, key)
                    .await
                    .map_err(into_storage)?;
                inserted += 1;
            }

            info!("{platform}/{purpose}: deactivated {deactivated}, inserted {inserted}");
            outcome.inserted += inserted;
        }
    }

    Ok(outcome)
}

/// Store failures during a bulk update are reported to the caller as a 400 with the
/// underlying message rather than the generic database error response.
fn into_storage(err: AppError) -> AppError {
    match err {
        AppError::Database(e) => AppError::Storage(e.to_string()),
        other => other,
    }
}
