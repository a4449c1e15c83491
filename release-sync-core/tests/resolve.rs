use release_sync_core::config::LookupStrategy;
use release_sync_core::contract::{ApiError, MockReleaseApi, Release};
use release_sync_core::error::PublishError;
use release_sync_core::resolve::{resolve_release, Lookup};

fn draft(id: u64, draft: bool) -> Release {
    Release {
        id,
        tag_name: format!("v0.{id}.0"),
        name: None,
        draft,
        prerelease: false,
        upload_url: None,
        html_url: None,
    }
}

#[tokio::test]
async fn by_tag_not_found_is_not_an_error() {
    let mut api = MockReleaseApi::new();
    api.expect_find_release_by_tag().times(1).returning(|_| Ok(None));

    let lookup = resolve_release(&api, "v1.0.0", LookupStrategy::ByTag)
        .await
        .expect("not found is a normal outcome");
    assert_eq!(lookup, Lookup::NotFound);
}

#[tokio::test]
async fn by_draft_returns_first_draft() {
    let mut api = MockReleaseApi::new();
    api.expect_list_releases()
        .times(1)
        .returning(|| Ok(vec![draft(1, false), draft(2, true), draft(3, true)]));

    let lookup = resolve_release(&api, "ignored", LookupStrategy::ByDraft)
        .await
        .unwrap();
    assert_eq!(lookup, Lookup::Found(draft(2, true)));
}

#[tokio::test]
async fn by_draft_with_empty_listing_is_not_found() {
    let mut api = MockReleaseApi::new();
    api.expect_list_releases().times(1).returning(|| Ok(vec![]));

    let lookup = resolve_release(&api, "v1", LookupStrategy::ByDraft)
        .await
        .unwrap();
    assert_eq!(lookup, Lookup::NotFound);
}

#[tokio::test]
async fn listing_failure_is_fatal() {
    let mut api = MockReleaseApi::new();
    api.expect_list_releases()
        .times(1)
        .returning(|| Err(ApiError::Transport("dns error".into())));

    let err = resolve_release(&api, "v1", LookupStrategy::ByDraft)
        .await
        .expect_err("listing failure must not read as absent");
    assert!(matches!(err, PublishError::Lookup(ApiError::Transport(_))));
}
