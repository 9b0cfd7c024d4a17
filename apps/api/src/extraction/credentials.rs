use serde::Serialize;

use crate::errors::AppError;
use crate::keys::store::CredentialStore;
use crate::models::platform::{Platform, Purpose};

/// Shape of the credentials a platform's scrape routine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialRequirement {
    /// Every active key of the platform, whatever its purpose.
    SinglePool,
    /// Separate active `search` and `posts` pools, both non-empty.
    SearchAndPosts,
}

impl CredentialRequirement {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Ig => CredentialRequirement::SinglePool,
            Platform::Tk | Platform::X => CredentialRequirement::SearchAndPosts,
        }
    }
}

/// Key pools resolved for one dispatch. Owned, so a running job never sees later
/// changes to the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResolvedCredentials {
    Single {
        keys: Vec<String>,
    },
    Split {
        search_keys: Vec<String>,
        posts_keys: Vec<String>,
    },
}

/// Reads the active pools `platform` requires from the store.
pub async fn resolve_credentials(
    store: &dyn CredentialStore,
    platform: Platform,
) -> Result<ResolvedCredentials, AppError> {
    match CredentialRequirement::for_platform(platform) {
        CredentialRequirement::SinglePool => {
            let keys = store.list_active(platform, None).await?;
            if keys.is_empty() {
                return Err(shortfall(platform, Vec::new()));
            }
            Ok(ResolvedCredentials::Single { keys })
        }
        CredentialRequirement::SearchAndPosts => {
            let search_keys = store.list_active(platform, Some(Purpose::Search)).await?;
            let posts_keys = store.list_active(platform, Some(Purpose::Posts)).await?;

            let missing: Vec<Purpose> = [
                (Purpose::Search, search_keys.is_empty()),
                (Purpose::Posts, posts_keys.is_empty()),
            ]
            .into_iter()
            .filter_map(|(purpose, empty)| empty.then_some(purpose))
            .collect();

            if !missing.is_empty() {
                return Err(shortfall(platform, missing));
            }
            Ok(ResolvedCredentials::Split {
                search_keys,
                posts_keys,
            })
        }
    }
}

/// Error reported when a required pool is empty. x names the empty pools,
/// tk only reports that nothing could be started.
fn shortfall(platform: Platform, missing: Vec<Purpose>) -> AppError {
    match platform {
        Platform::Ig => AppError::NoCredentials(platform),
        Platform::X => AppError::MissingKeys {
            platform,
            pools: missing,
        },
        Platform::Tk => AppError::DispatchFailed(format!(
            "tk needs active search and posts keys ({} empty)",
            missing
                .iter()
                .map(Purpose::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}
