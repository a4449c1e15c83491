#![doc = "GitHub REST client implementing the core `ReleaseApi` contract."]
//
//! # GitHub Releases Client
//!
//! This module wires the [`ReleaseApi`] trait from `release-sync-core` to the GitHub REST API.
//! The CLI constructs a [`GitHubClient`] from the environment and hands it to the publish pipeline.
//!
//! - Construct [`GitHubClient`] with [`GitHubClient::new_from_env`] (`GITHUB_TOKEN`,
//!   `GITHUB_REPOSITORY`, optional `GITHUB_API_URL`).
//! - A 404 on by-tag lookup is reported as `Ok(None)`; every other non-success status is an error.
//! - Asset uploads go to the release's `upload_url`, a URL template such as
//!   `https://uploads.github.com/repos/o/r/releases/1/assets{?name,label}`.

use async_trait::async_trait;
use release_sync_core::contract::{
    ApiError, AssetUpload, Release, ReleaseApi, ReleaseFields, UploadedAsset,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::env;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("release-sync/", env!("CARGO_PKG_VERSION"));

/// Coordinates and credentials for one repository.
#[derive(Clone)]
pub struct GitHubSettings {
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    pub token: String,
}

impl std::fmt::Debug for GitHubSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSettings")
            .field("api_url", &self.api_url)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Splits `owner/repo`.
pub fn parse_repository(value: &str) -> Result<(String, String), Box<dyn std::error::Error + Send + Sync>> {
    match value.trim().split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(format!("GITHUB_REPOSITORY must look like owner/repo, got {value:?}").into()),
    }
}

/// Turns an upload URL template into a concrete URL carrying `name` as a query parameter.
pub fn expand_upload_url(template: &str, name: &str) -> Result<Url, ApiError> {
    let base = match template.find('{') {
        Some(idx) => &template[..idx],
        None => template,
    };
    let mut url = Url::parse(base)
        .map_err(|e| ApiError::Decode(format!("invalid upload url {template:?}: {e}")))?;
    url.query_pairs_mut().append_pair("name", name);
    // Form encoding writes spaces as '+'; the upload endpoint expects %20.
    let query = url.query().map(|q| q.replace('+', "%20"));
    url.set_query(query.as_deref());
    Ok(url)
}

pub struct GitHubClient {
    http: reqwest::Client,
    settings: GitHubSettings,
}

impl GitHubClient {
    pub fn new(settings: GitHubSettings) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", settings.token))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;
        Ok(GitHubClient { http, settings })
    }

    pub fn new_from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok(); // loads environment variables from .env if present
        match (env::var("GITHUB_TOKEN"), env::var("GITHUB_REPOSITORY")) {
            (Ok(token), Ok(repository)) if !token.is_empty() => {
                let (owner, repo) = parse_repository(&repository).map_err(|e| {
                    tracing::error!(error = %e, raw = %repository, "Failed to parse GITHUB_REPOSITORY from env");
                    e
                })?;
                let api_url = env::var("GITHUB_API_URL")
                    .ok()
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string());
                tracing::info!(%owner, %repo, %api_url, "Initialized GitHubClient from environment");
                GitHubClient::new(GitHubSettings {
                    api_url,
                    owner,
                    repo,
                    token,
                })
            }
            (Ok(_), Ok(_)) => {
                tracing::error!("GITHUB_TOKEN is empty");
                Err("GITHUB_TOKEN environment variable is empty".into())
            }
            (Err(e), _) => {
                tracing::error!(error = ?e, "GITHUB_TOKEN missing in environment");
                Err(format!("GITHUB_TOKEN environment variable not set: {e}").into())
            }
            (_, Err(e)) => {
                tracing::error!(error = ?e, "GITHUB_REPOSITORY missing in environment");
                Err(format!("GITHUB_REPOSITORY environment variable not set: {e}").into())
            }
        }
    }

    pub fn settings(&self) -> &GitHubSettings {
        &self.settings
    }

    /// `{api}/repos/{owner}/{repo}/releases` followed by `segments`.
    pub fn releases_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.settings.api_url)
            .map_err(|e| ApiError::Decode(format!("invalid API url: {e}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::Decode("API url cannot be a base".into()))?;
            path.pop_if_empty()
                .extend([
                    "repos",
                    self.settings.owner.as_str(),
                    self.settings.repo.as_str(),
                    "releases",
                ])
                .extend(segments);
        }
        Ok(url)
    }
}

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

/// Body of an error response, or a note on why it could not be read.
fn error_message<E: std::fmt::Display>(status: StatusCode, body: Result<String, E>) -> String {
    match body {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, status = %status, "Failed to read GitHub error body");
            format!("<failed to read response body: {e}>")
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let message = error_message(status, response.text().await);
        tracing::error!(status = %status, body = %message, "GitHub API returned error");
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl ReleaseApi for GitHubClient {
    async fn find_release_by_tag(&self, tag: &str) -> Result<Option<Release>, ApiError> {
        let url = self.releases_url(&["tags", tag])?;
        tracing::info!(%url, "Fetching release by tag");
        let response = self.http.get(url).send().await.map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::info!(tag, "No release for tag");
            return Ok(None);
        }
        decode(response).await.map(Some)
    }

    async fn list_releases(&self) -> Result<Vec<Release>, ApiError> {
        let url = self.releases_url(&[])?;
        tracing::info!(%url, "Listing releases");
        let response = self.http.get(url).send().await.map_err(transport)?;
        let releases: Vec<Release> = decode(response).await?;
        tracing::info!(count = releases.len(), "Fetched releases");
        Ok(releases)
    }

    async fn create_release(&self, fields: &ReleaseFields) -> Result<Release, ApiError> {
        let url = self.releases_url(&[])?;
        tracing::info!(tag = %fields.tag_name, "Creating release");
        let response = self
            .http
            .post(url)
            .json(fields)
            .send()
            .await
            .map_err(transport)?;
        let release: Release = decode(response).await?;
        tracing::info!(release_id = release.id, "Successfully created release");
        Ok(release)
    }

    async fn update_release(&self, id: u64, fields: &ReleaseFields) -> Result<Release, ApiError> {
        let id_segment = id.to_string();
        let url = self.releases_url(&[id_segment.as_str()])?;
        tracing::info!(release_id = id, tag = %fields.tag_name, "Updating release");
        let response = self
            .http
            .patch(url)
            .json(fields)
            .send()
            .await
            .map_err(transport)?;
        let release: Release = decode(response).await?;
        tracing::info!(release_id = release.id, "Successfully updated release");
        Ok(release)
    }

    async fn upload_asset(
        &self,
        upload_url: &str,
        asset: AssetUpload,
    ) -> Result<UploadedAsset, ApiError> {
        let url = expand_upload_url(upload_url, &asset.name)?;
        tracing::info!(
            asset = %asset.name,
            content_type = %asset.content_type,
            content_length = asset.content_length(),
            "Uploading release asset"
        );
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, asset.content_type.as_str())
            .header(CONTENT_LENGTH, asset.content_length())
            .body(asset.content)
            .send()
            .await
            .map_err(transport)?;
        let uploaded: UploadedAsset = decode(response).await?;
        tracing::info!(asset_id = uploaded.id, asset = %uploaded.name, "Successfully uploaded asset");
        Ok(uploaded)
    }
}
