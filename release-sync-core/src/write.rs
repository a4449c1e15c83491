//! Release Writer: the single mutating call against the release record.

use tracing::{error, info};

use crate::config::ReleaseRequest;
use crate::contract::ReleaseApi;
use crate::error::{PublishError, WriteOperation};
use crate::resolve::Lookup;

/// Identity of the release this run publishes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseHandle {
    pub id: u64,
    pub upload_url: String,
    pub html_url: Option<String>,
    /// Whether this run created the release.
    pub is_new: bool,
}

/// Creates the release when `lookup` is `NotFound`, otherwise overwrites the found one.
pub async fn write_release<A>(
    api: &A,
    request: &ReleaseRequest,
    lookup: &Lookup,
) -> Result<ReleaseHandle, PublishError>
where
    A: ReleaseApi + ?Sized,
{
    let fields = request.fields();

    match lookup {
        Lookup::NotFound => {
            info!(tag = %fields.tag_name, "[WRITE] Creating release");
            let created = api.create_release(&fields).await.map_err(|e| {
                error!(error = ?e, tag = %fields.tag_name, "[WRITE][ERROR] create_release failed");
                PublishError::Write {
                    operation: WriteOperation::Create,
                    source: e,
                }
            })?;
            let upload_url = created
                .upload_url
                .ok_or(PublishError::MissingUploadEndpoint {
                    release_id: created.id,
                })?;
            info!(release_id = created.id, "[WRITE] create_release succeeded");
            Ok(ReleaseHandle {
                id: created.id,
                upload_url,
                html_url: created.html_url,
                is_new: true,
            })
        }
        Lookup::Found(existing) => {
            info!(release_id = existing.id, tag = %fields.tag_name, "[WRITE] Updating release");
            let updated = api
                .update_release(existing.id, &fields)
                .await
                .map_err(|e| {
                    error!(error = ?e, release_id = existing.id, "[WRITE][ERROR] update_release failed");
                    PublishError::Write {
                        operation: WriteOperation::Update,
                        source: e,
                    }
                })?;
            let upload_url = updated
                .upload_url
                .or_else(|| existing.upload_url.clone())
                .ok_or(PublishError::MissingUploadEndpoint {
                    release_id: existing.id,
                })?;
            info!(release_id = existing.id, "[WRITE] update_release succeeded");
            Ok(ReleaseHandle {
                id: existing.id,
                upload_url,
                html_url: updated.html_url.or_else(|| existing.html_url.clone()),
                is_new: false,
            })
        }
    }
}
