//! Release Resolver: decides whether a release for this run already exists.

use tracing::{error, info};

use crate::config::LookupStrategy;
use crate::contract::{Release, ReleaseApi};
use crate::error::PublishError;

/// Outcome of a lookup. Remote failures are reported through `Err`, never as `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(Release),
    NotFound,
}

pub async fn resolve_release<A>(
    api: &A,
    tag: &str,
    strategy: LookupStrategy,
) -> Result<Lookup, PublishError>
where
    A: ReleaseApi + ?Sized,
{
    info!(tag, ?strategy, "[RESOLVE] Looking up existing release");

    let found = match strategy {
        LookupStrategy::ByTag => api.find_release_by_tag(tag).await.map_err(|e| {
            error!(error = ?e, tag, "[RESOLVE][ERROR] Lookup by tag failed");
            PublishError::Lookup(e)
        })?,
        LookupStrategy::ByDraft => {
            let releases = api.list_releases().await.map_err(|e| {
                error!(error = ?e, "[RESOLVE][ERROR] Listing releases failed");
                PublishError::Lookup(e)
            })?;
            info!(count = releases.len(), "[RESOLVE] Listed releases");
            releases.into_iter().find(|r| r.draft)
        }
    };

    Ok(match found {
        Some(release) => {
            info!(
                release_id = release.id,
                release_tag = %release.tag_name,
                "[RESOLVE] Found existing release"
            );
            Lookup::Found(release)
        }
        None => {
            info!(tag, "[RESOLVE] No existing release");
            Lookup::NotFound
        }
    })
}
