//! End-to-end digest pipeline: request host → site → published records →
//! normalized summaries → page digest.

use std::path::Path;

use futures::future::try_join_all;
use tracing::{debug, info, instrument};

use notipress_notion::NotionClient;
use notipress_shared::config::{SiteConfig, SiteRegistry};
use notipress_shared::{NotipressError, PageDigest, Result};

use crate::normalizer::normalize;

/// Build the page digest for one inbound request.
///
/// 1. Resolve the request host to a site configuration.
/// 2. Load the site's custom stylesheet, if one is configured.
/// 3. Query the site's database for published records.
/// 4. Normalize every record concurrently, preserving store order.
/// 5. Assemble the digest from site metadata and the summaries.
///
/// Fails atomically: a fetch error or any single record failing
/// normalization aborts the whole build. No partial digest is ever
/// returned.
#[instrument(skip_all, fields(host = %host))]
pub async fn build_digest(
    host: &str,
    registry: &SiteRegistry,
    client: &NotionClient,
    assets_dir: &Path,
) -> Result<PageDigest> {
    let site = registry.resolve(host);
    info!(site = %site.host, database_id = %site.database_id, "resolved site");

    let custom_css = load_custom_css(assets_dir, site).await?;

    let records = client.query_published(&site.database_id).await?;
    debug!(records = records.len(), "normalizing records");

    // One normalization task per record; try_join_all keeps the output in
    // input order and returns the first error, dropping the rest.
    let posts = try_join_all(records.iter().map(|r| normalize(client, r))).await?;

    info!(posts = posts.len(), "digest assembled");

    Ok(PageDigest {
        host: site.host.clone(),
        title: site.title.clone(),
        sub_title: site.sub_title.clone(),
        copyright: site.copyright.clone(),
        custom_css,
        posts,
    })
}

/// Read the site's custom stylesheet from the assets directory.
///
/// No configured path means no custom stylesheet. A configured path that
/// cannot be read is an error: the site explicitly asked for it.
async fn load_custom_css(assets_dir: &Path, site: &SiteConfig) -> Result<Option<String>> {
    let Some(rel_path) = &site.custom_css else {
        return Ok(None);
    };

    let path = assets_dir.join(rel_path);
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| NotipressError::io(&path, e))?;

    debug!(path = %path.display(), bytes = content.len(), "loaded custom stylesheet");
    Ok(Some(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use notipress_shared::config::NotionConfig;

    fn site(host: &str, default: bool, database_id: &str) -> SiteConfig {
        SiteConfig {
            host: host.into(),
            default,
            custom_css: None,
            title: format!("{host} blog"),
            sub_title: Some("a test tenant".into()),
            copyright: Some("© example".into()),
            database_id: database_id.into(),
        }
    }

    fn two_site_registry() -> SiteRegistry {
        SiteRegistry::new(vec![site("a.example", true, "C1"), site("b.example", false, "C2")])
            .expect("registry")
    }

    fn test_client(server: &MockServer) -> NotionClient {
        NotionClient::new(&NotionConfig {
            token: "secret-token".into(),
            base_url: server.uri(),
            timeout_secs: 5,
        })
        .expect("build client")
    }

    async fn mount_query(server: &MockServer, database_id: &str, results: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(format!("/v1/databases/{database_id}/query")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "object": "list", "results": results })),
            )
            .mount(server)
            .await;
    }

    fn record_json(record_id: &str) -> serde_json::Value {
        json!({
            "id": record_id,
            "properties": {
                "ID": { "id": "p-id" },
                "Title": { "id": "p-title" },
                "Category": { "id": "p-category" },
                "PublishedAt": { "id": "p-created" },
                "UpdatedAt": { "id": "p-updated" },
                "HeaderImage": { "id": "p-photo" },
            }
        })
    }

    async fn mount_property(
        server: &MockServer,
        record_id: &str,
        property_id: &str,
        body: serde_json::Value,
    ) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/pages/{record_id}/properties/{property_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    /// Mounts a valid property set for `record_id`, with per-property
    /// overrides applied first (wiremock keeps the first matching mock).
    async fn mount_record(
        server: &MockServer,
        record_id: &str,
        post_id: &str,
        overrides: &[(&str, serde_json::Value)],
    ) {
        let mut properties = vec![
            ("p-id", json!({ "type": "title", "title": { "plain_text": post_id } })),
            ("p-title", json!({ "type": "rich_text", "rich_text": { "plain_text": "A post" } })),
            ("p-category", json!({ "type": "select", "select": null })),
            ("p-created", json!({ "type": "date", "date": { "start": "2024-05-01" } })),
            ("p-updated", json!({ "type": "last_edited_time", "last_edited_time": "2024-05-02T10:00:00.000Z" })),
            ("p-photo", json!({ "type": "files", "files": [] })),
        ];
        for (id, body) in overrides {
            if let Some(slot) = properties.iter_mut().find(|(pid, _)| pid == id) {
                slot.1 = body.clone();
            }
        }
        for (property_id, body) in properties {
            mount_property(server, record_id, property_id, body).await;
        }
    }

    #[tokio::test]
    async fn known_host_uses_its_own_database() {
        let server = MockServer::start().await;
        mount_query(&server, "C2", json!([])).await;

        let client = test_client(&server);
        let digest = build_digest("b.example", &two_site_registry(), &client, Path::new("."))
            .await
            .expect("digest");

        assert_eq!(digest.host, "b.example");
        assert_eq!(digest.title, "b.example blog");
        assert!(digest.posts.is_empty());
        assert_eq!(digest.custom_css, None);
    }

    #[tokio::test]
    async fn unknown_host_falls_back_to_default_site() {
        let server = MockServer::start().await;
        mount_query(&server, "C1", json!([])).await;

        let client = test_client(&server);
        let digest = build_digest("unknown.example", &two_site_registry(), &client, Path::new("."))
            .await
            .expect("digest");

        // The default site's database, not the requested host's.
        assert_eq!(digest.host, "a.example");
    }

    #[tokio::test]
    async fn digest_preserves_store_record_order() {
        let server = MockServer::start().await;
        mount_query(&server, "C1", json!([record_json("rec-z"), record_json("rec-a")])).await;
        mount_record(&server, "rec-z", "post-z", &[]).await;
        mount_record(&server, "rec-a", "post-a", &[]).await;

        let client = test_client(&server);
        let digest = build_digest("a.example", &two_site_registry(), &client, Path::new("."))
            .await
            .expect("digest");

        let ids: Vec<&str> = digest.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["post-z", "post-a"]);
    }

    #[tokio::test]
    async fn one_malformed_record_fails_the_whole_digest() {
        let server = MockServer::start().await;
        mount_query(&server, "C1", json!([record_json("rec-ok"), record_json("rec-bad")])).await;
        mount_record(&server, "rec-ok", "post-ok", &[]).await;
        // The bad record's date property comes back as a select shape.
        mount_record(&server, "rec-bad", "post-bad", &[
            ("p-created", json!({ "type": "select", "select": { "name": "oops" } })),
        ])
        .await;

        let client = test_client(&server);
        let err = build_digest("a.example", &two_site_registry(), &client, Path::new("."))
            .await
            .unwrap_err();

        match err {
            NotipressError::UnexpectedShape { field, found } => {
                assert_eq!(field, "PublishedAt");
                assert_eq!(found, "select");
            }
            other => panic!("expected UnexpectedShape, got {other}"),
        }
    }

    #[tokio::test]
    async fn fetch_failure_aborts_the_build() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/databases/C1/query"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = build_digest("a.example", &two_site_registry(), &client, Path::new("."))
            .await
            .unwrap_err();

        assert!(matches!(err, NotipressError::Store(_)));
    }

    #[tokio::test]
    async fn configured_stylesheet_is_inlined() {
        let server = MockServer::start().await;
        mount_query(&server, "C1", json!([])).await;

        let mut styled = site("a.example", true, "C1");
        styled.custom_css = Some("custom.css".into());
        let registry = SiteRegistry::new(vec![styled]).expect("registry");

        let client = test_client(&server);
        let digest = build_digest(
            "a.example",
            &registry,
            &client,
            Path::new("../../../fixtures/css"),
        )
        .await
        .expect("digest");

        let css = digest.custom_css.expect("stylesheet content");
        assert!(css.contains("--tone-1"));
    }

    #[tokio::test]
    async fn missing_configured_stylesheet_is_an_error() {
        let server = MockServer::start().await;
        mount_query(&server, "C1", json!([])).await;

        let mut styled = site("a.example", true, "C1");
        styled.custom_css = Some("does-not-exist.css".into());
        let registry = SiteRegistry::new(vec![styled]).expect("registry");

        let client = test_client(&server);
        let err = build_digest(
            "a.example",
            &registry,
            &client,
            Path::new("../../../fixtures/css"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, NotipressError::Io { .. }));
    }
}
