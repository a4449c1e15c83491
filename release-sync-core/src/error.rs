//! Error taxonomy for one publish run.
//!
//! A missing release is not represented here: lookups return [`crate::resolve::Lookup::NotFound`].
//! Every variant below is fatal for the run.

use std::fmt;

use crate::contract::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// A required input is missing or malformed. Raised before any remote call.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("release lookup failed: {0}")]
    Lookup(#[source] ApiError),

    #[error("failed to {operation} release: {source}")]
    Write {
        operation: WriteOperation,
        #[source]
        source: ApiError,
    },

    #[error("release {release_id} has no asset upload endpoint")]
    MissingUploadEndpoint { release_id: u64 },

    #[error("failed to read asset directory {path}: {source}")]
    AssetDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{} of {total} assets failed to upload: {}", .failures.len(), summarize(.failures))]
    AssetUploads {
        failures: Vec<AssetFailure>,
        total: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Create,
    Update,
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOperation::Create => f.write_str("create"),
            WriteOperation::Update => f.write_str("update"),
        }
    }
}

/// One asset that could not be read or uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFailure {
    pub asset: String,
    pub reason: String,
}

fn summarize(failures: &[AssetFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.asset, f.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_upload_error_lists_every_failure() {
        let err = PublishError::AssetUploads {
            failures: vec![
                AssetFailure {
                    asset: "a.zip".into(),
                    reason: "timeout".into(),
                },
                AssetFailure {
                    asset: "b.txt".into(),
                    reason: "status 500".into(),
                },
            ],
            total: 5,
        };
        assert_eq!(
            err.to_string(),
            "2 of 5 assets failed to upload: a.zip (timeout), b.txt (status 500)"
        );
    }
}
