//! Asset Uploader: attaches every regular file of a directory to a release.
//!
//! Only the immediate children of the directory are considered; subdirectories are skipped.
//! Uploads run concurrently and each one runs to completion, so a failure never cancels
//! its siblings. Assets that uploaded before a failure stay attached to the release.

use futures::future::join_all;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::contract::{AssetUpload, ReleaseApi, UploadedAsset};
use crate::error::{AssetFailure, PublishError};

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type for a file name, keyed on its extension exactly as written.
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    match extension {
        "zip" => "application/zip",
        "json" => "application/json",
        "yml" | "yaml" => "application/x-yaml",
        "txt" => "text/plain",
        // Executables and OS packages are uploaded as opaque binaries.
        "exe" | "deb" | "rpm" | "snap" | "dmg" | "pkg" | "AppImage" => DEFAULT_CONTENT_TYPE,
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Replaces the first space in `name` with a hyphen. Later spaces are kept.
pub fn sanitize_asset_name(name: &str) -> String {
    name.replacen(' ', "-", 1)
}

/// Regular files directly under `dir`, sorted by path.
///
/// A missing path or a path that is not a directory yields an empty list.
pub fn collect_assets(dir: &Path) -> Result<Vec<PathBuf>, PublishError> {
    if !dir.is_dir() {
        info!(path = %dir.display(), "[ASSETS] Asset directory absent or not a directory, skipping uploads");
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|e| {
        error!(error = ?e, path = %dir.display(), "[ASSETS][ERROR] Failed to read asset directory");
        PublishError::AssetDirectory {
            path: dir.display().to_string(),
            source: e,
        }
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PublishError::AssetDirectory {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        } else {
            debug!(path = %path.display(), "[ASSETS] Skipping non-file entry");
        }
    }
    files.sort();
    Ok(files)
}

/// Uploads every file under `dir` to `upload_url`, concurrently.
///
/// Succeeds only if every upload succeeds; otherwise all failures are reported together.
pub async fn upload_assets<A>(
    api: &A,
    upload_url: &str,
    dir: &Path,
) -> Result<Vec<UploadedAsset>, PublishError>
where
    A: ReleaseApi + ?Sized,
{
    let files = collect_assets(dir)?;
    info!(count = files.len(), path = %dir.display(), "[ASSETS] Dispatching asset uploads");
    upload_files(api, upload_url, &files).await
}

/// Uploads already-collected files to `upload_url`, concurrently.
///
/// A file that cannot be read counts as a failed upload; the others still go out.
pub async fn upload_files<A>(
    api: &A,
    upload_url: &str,
    files: &[PathBuf],
) -> Result<Vec<UploadedAsset>, PublishError>
where
    A: ReleaseApi + ?Sized,
{
    let total = files.len();
    let uploads = files.iter().map(|path| upload_one(api, upload_url, path));
    let results = join_all(uploads).await;

    let mut uploaded = Vec::with_capacity(total);
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(asset) => uploaded.push(asset),
            Err(failure) => failures.push(failure),
        }
    }

    if !failures.is_empty() {
        error!(
            failed = failures.len(),
            total, "[ASSETS][ERROR] Asset uploads failed"
        );
        return Err(PublishError::AssetUploads { failures, total });
    }

    info!(count = uploaded.len(), "[ASSETS] All assets uploaded");
    Ok(uploaded)
}

async fn upload_one<A>(api: &A, upload_url: &str, path: &Path) -> Result<UploadedAsset, AssetFailure>
where
    A: ReleaseApi + ?Sized,
{
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = sanitize_asset_name(&file_name);

    let content = tokio::fs::read(path).await.map_err(|e| {
        error!(error = ?e, path = %path.display(), "[ASSETS][ERROR] Failed to read asset file");
        AssetFailure {
            asset: name.clone(),
            reason: format!("read failed: {e}"),
        }
    })?;

    let asset = AssetUpload {
        name: name.clone(),
        content_type: content_type_for(&file_name).to_string(),
        content,
    };
    debug!(
        asset = %asset.name,
        content_type = %asset.content_type,
        content_length = asset.content_length(),
        "[ASSETS] Uploading asset"
    );

    match api.upload_asset(upload_url, asset).await {
        Ok(uploaded) => {
            info!(asset = %uploaded.name, asset_id = uploaded.id, "[ASSETS] Uploaded asset");
            Ok(uploaded)
        }
        Err(e) => {
            error!(error = ?e, asset = %name, "[ASSETS][ERROR] upload_asset failed");
            Err(AssetFailure {
                asset: name,
                reason: e.to_string(),
            })
        }
    }
}
