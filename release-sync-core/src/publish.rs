//! High-level pipeline: resolve → write → upload for one release.
//!
//! This module provides the top-level orchestration for publishing a release:
//!   - Resolves whether a release already exists (see [`crate::resolve`])
//!   - Creates it, or overwrites the existing one, with the requested metadata (see [`crate::write`])
//!   - Uploads every file in the asset directory to the release (see [`crate::assets`])
//!   - Returns a report of what was written and uploaded.
//!
//! # Responsibilities
//! - Fail-fast orchestration: a lookup or write failure stops the run before any upload
//! - Exactly one mutating release call per run
//! - Structured tracing for each stage
//!
//! # Callable From
//! - The CLI crate and the integration tests, with any [`ReleaseApi`] implementation.
//!
//! # Error Handling
//! Every stage returns a [`PublishError`]; callers log and surface it as a single failure.

use tracing::{debug, error, info};

use crate::assets::upload_assets;
use crate::config::{LookupStrategy, ReleaseRequest};
use crate::contract::{ReleaseApi, UploadedAsset};
use crate::error::PublishError;
use crate::resolve::resolve_release;
use crate::write::write_release;

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub release_id: u64,
    pub is_new: bool,
    pub upload_url: String,
    pub html_url: Option<String>,
    pub assets: Vec<UploadedAsset>,
}

pub async fn publish<A>(
    api: &A,
    request: &ReleaseRequest,
    strategy: LookupStrategy,
) -> Result<PublishReport, PublishError>
where
    A: ReleaseApi + ?Sized,
{
    info!(tag = %request.tag, ?strategy, "[PUBLISH] Starting release publish pipeline");

    let lookup = resolve_release(api, &request.tag, strategy).await?;
    let handle = write_release(api, request, &lookup).await?;
    info!(
        release_id = handle.id,
        is_new = handle.is_new,
        "[PUBLISH] Release written"
    );

    let assets = match &request.asset_dir {
        Some(dir) => upload_assets(api, &handle.upload_url, dir).await.map_err(|e| {
            error!(error = %e, release_id = handle.id, "[PUBLISH][ERROR] Asset upload stage failed");
            e
        })?,
        None => {
            info!("[PUBLISH] No asset directory configured, skipping uploads");
            Vec::new()
        }
    };

    match serde_json::to_string_pretty(&assets) {
        Ok(json) => debug!(json = %json, "[PUBLISH][DEBUG] Uploaded assets as JSON"),
        Err(e) => error!(error = ?e, "[PUBLISH][DEBUG] Failed to serialize uploaded assets as JSON"),
    }

    Ok(PublishReport {
        release_id: handle.id,
        is_new: handle.is_new,
        upload_url: handle.upload_url,
        html_url: handle.html_url,
        assets,
    })
}
