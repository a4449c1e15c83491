#![allow(unused)]

//! # contract: the remote release API as seen by the pipeline
//!
//! This module defines a single trait ([`ReleaseApi`]) and the plain data types
//! exchanged with the hosted platform that owns releases and their assets.
//!
//! ## Interface & Extensibility
//! - Implement [`ReleaseApi`] to talk to a concrete platform (the CLI crate ships a GitHub client).
//! - All methods are async and return [`ApiError`] on any non-success outcome.
//! - A missing release on by-tag lookup is not an error: implementors return `Ok(None)`.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so tests can drive the whole pipeline
//!   with `MockReleaseApi` and assert exact call counts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mockall::{automock, predicate::*};

/// A release record as returned by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    /// Asset upload endpoint (a URL template on GitHub). Update responses may omit it.
    #[serde(default)]
    pub upload_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// The full field set sent on both create and update. Update overwrites, it never merges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseFields {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
    pub target_commitish: String,
}

/// One file ready to be attached to a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUpload {
    /// Display name, already sanitized.
    pub name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl AssetUpload {
    pub fn content_length(&self) -> usize {
        self.content.len()
    }
}

/// An asset as acknowledged by the platform after upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedAsset {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub browser_download_url: Option<String>,
}

/// Failure talking to the remote API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The platform answered with a non-success status.
    #[error("remote API returned status {status}: {message}")]
    Status { status: u16, message: String },
    /// The request never produced a response (DNS, TLS, connection reset, ...).
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Trait for looking up, writing and attaching assets to releases of one repository.
///
/// The implementor owns the repository coordinates and credentials; the pipeline
/// only ever deals in release identities and upload endpoints.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ReleaseApi: Send + Sync {
    /// Find the release whose tag equals `tag` exactly. `Ok(None)` means "not found".
    async fn find_release_by_tag(&self, tag: &str) -> Result<Option<Release>, ApiError>;

    /// List releases of the repository (first page only).
    async fn list_releases(&self) -> Result<Vec<Release>, ApiError>;

    /// Create a new release.
    async fn create_release(&self, fields: &ReleaseFields) -> Result<Release, ApiError>;

    /// Overwrite every field of an existing release.
    async fn update_release(&self, id: u64, fields: &ReleaseFields) -> Result<Release, ApiError>;

    /// Upload one asset to the given upload endpoint.
    async fn upload_asset(
        &self,
        upload_url: &str,
        asset: AssetUpload,
    ) -> Result<UploadedAsset, ApiError>;
}
