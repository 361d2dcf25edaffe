//! HTTP API acceptance tests.
//!
//! Runs the real router on an ephemeral port with a stub crew, and drives it
//! with reqwest.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sitecrew_agents::{Content, SiteBrief, SiteGenerator};
use sitecrew_server::config::ServerConfig;
use sitecrew_server::server::Server;
use sitecrew_server::store::{JsonFileStore, MemoryStore, MetadataStore};

/// Answers like the real designer: chatter around a fenced page.
struct StubCrew;

#[async_trait]
impl SiteGenerator for StubCrew {
    async fn generate_content(&self, brief: &SiteBrief) -> anyhow::Result<Content> {
        Ok(Content::parse(&format!(
            "HERO_TITLE: Welcome to our {}",
            brief.business_type
        )))
    }

    async fn generate_design(&self, brief: &SiteBrief, content: &Content) -> anyhow::Result<String> {
        Ok(format!(
            "Here is the complete website:\n\n```html\n<!DOCTYPE html>\n<html><body>\
             <h1>{}</h1><p>{}</p><footer>{}</footer></body></html>\n```\n\nEnjoy!",
            content.get("HERO_TITLE").unwrap_or_default(),
            brief.key_features,
            brief.style_preference,
        ))
    }
}

struct DownCrew;

#[async_trait]
impl SiteGenerator for DownCrew {
    async fn generate_content(&self, _brief: &SiteBrief) -> anyhow::Result<Content> {
        anyhow::bail!("Failed to call Claude API")
    }

    async fn generate_design(&self, _: &SiteBrief, _: &Content) -> anyhow::Result<String> {
        unreachable!()
    }
}

fn test_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        listen_addr: "127.0.0.1:0".to_string(),
        metadata_path: dir.join("data").join("sites.json"),
        preview_dir: dir.join("previews"),
        api_key: "unused".to_string(),
        ..Default::default()
    }
}

async fn start_with(
    dir: &Path,
    store: Arc<dyn MetadataStore>,
    generator: Arc<dyn SiteGenerator>,
) -> (String, tokio::task::JoinHandle<anyhow::Result<()>>) {
    let server = Server::with_components(test_config(dir), store, generator);
    let (addr, handle) = server.start().await.unwrap();
    (format!("http://{addr}"), handle)
}

async fn start_server(dir: &Path) -> String {
    start_with(dir, Arc::new(MemoryStore::new()), Arc::new(StubCrew))
        .await
        .0
}

fn bakery_form() -> [(&'static str, &'static str); 3] {
    [
        ("business_type", "bakery"),
        ("key_features", "online ordering, pickup"),
        ("style_preference", "warm and rustic"),
    ]
}

async fn post_form(url: &str, form: &[(&str, &str)]) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(url)
        .form(form)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

async fn get_json(url: &str) -> (u16, Value) {
    let resp = reqwest::get(url).await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

// ── Creation ───────────────────────────────────────────────────────────

#[tokio::test]
async fn generate_bakery_site() {
    let tmp = tempfile::tempdir().unwrap();
    let base = start_server(tmp.path()).await;

    let (status, body) = post_form(&format!("{base}/generate"), &bakery_form()).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["site_id"], 1);
    assert_eq!(body["version"], 1);
    assert_eq!(body["preview_url"], "/previews/site_1.html");

    // Artifact on disk holds only the extracted page.
    let html = std::fs::read_to_string(tmp.path().join("previews").join("site_1.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"), "{html}");
    assert!(html.ends_with("</html>"), "{html}");
    assert!(html.contains("Welcome to our bakery"));

    // Served both through the static mount and the preview route.
    let served = reqwest::get(format!("{base}/previews/site_1.html"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(served, html);
    let resp = reqwest::get(format!("{base}/preview/1")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(
        resp.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    assert_eq!(resp.text().await.unwrap(), html);

    let (status, site) = get_json(&format!("{base}/sites/1")).await;
    assert_eq!(status, 200);
    assert_eq!(site["id"], 1);
    assert_eq!(site["business_type"], "bakery");
    assert_eq!(site["key_features"], "online ordering, pickup");
    assert_eq!(site["versions"].as_array().unwrap().len(), 1);
    assert_eq!(site["versions"][0]["version"], 1);
    assert_eq!(site["versions"][0]["file_path"], "site_1.html");
    assert_eq!(site["versions"][0]["parameters"]["business_type"], "bakery");
}

#[tokio::test]
async fn list_sites_returns_document() {
    let tmp = tempfile::tempdir().unwrap();
    let base = start_server(tmp.path()).await;

    let (_, empty) = get_json(&format!("{base}/sites")).await;
    assert_eq!(empty, serde_json::json!({"sites": []}));

    for _ in 0..3 {
        post_form(&format!("{base}/generate"), &bakery_form()).await;
    }
    let (status, doc) = get_json(&format!("{base}/sites")).await;
    assert_eq!(status, 200);
    let ids: Vec<u64> = doc["sites"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let (_, health) = get_json(&format!("{base}/health")).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["sites"], 3);
}

#[tokio::test]
async fn missing_field_is_bad_request() {
    let tmp = tempfile::tempdir().unwrap();
    let base = start_server(tmp.path()).await;

    let (status, body) = post_form(
        &format!("{base}/generate"),
        &[("business_type", "bakery"), ("key_features", "pickup")],
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert!(
        body["error"].as_str().unwrap().contains("style_preference"),
        "{body}"
    );
}

#[tokio::test]
async fn generator_failure_is_reported_in_band() {
    let tmp = tempfile::tempdir().unwrap();
    let (base, _h) = start_with(tmp.path(), Arc::new(MemoryStore::new()), Arc::new(DownCrew)).await;

    let (status, body) = post_form(&format!("{base}/generate"), &bakery_form()).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert!(
        body["error"].as_str().unwrap().contains("Failed to call Claude API"),
        "{body}"
    );
    assert!(body.get("site_id").is_none());

    let (_, doc) = get_json(&format!("{base}/sites")).await;
    assert_eq!(doc["sites"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn concurrent_generates_get_distinct_ids() {
    let tmp = tempfile::tempdir().unwrap();
    let base = start_server(tmp.path()).await;

    let url = format!("{base}/generate");
    let bakery = bakery_form();
    let gym = [
        ("business_type", "gym"),
        ("key_features", "classes"),
        ("style_preference", "bold"),
    ];
    let (a, b) = tokio::join!(post_form(&url, &bakery), post_form(&url, &gym));
    let mut ids = vec![
        a.1["site_id"].as_u64().unwrap(),
        b.1["site_id"].as_u64().unwrap(),
    ];
    ids.sort();
    assert_eq!(ids, vec![1, 2]);

    let (_, doc) = get_json(&format!("{base}/sites")).await;
    assert_eq!(doc["sites"].as_array().unwrap().len(), 2);
    assert!(tmp.path().join("previews").join("site_1.html").exists());
    assert!(tmp.path().join("previews").join("site_2.html").exists());
}

// ── Lookup ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_site_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let base = start_server(tmp.path()).await;
    post_form(&format!("{base}/generate"), &bakery_form()).await;

    let (status, body) = get_json(&format!("{base}/sites/999")).await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Site 999 not found");

    let (status, body) = get_json(&format!("{base}/sites/abc")).await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);

    let resp = reqwest::get(format!("{base}/preview/42")).await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn malformed_preview_name_is_bad_request() {
    let tmp = tempfile::tempdir().unwrap();
    let base = start_server(tmp.path()).await;
    post_form(&format!("{base}/generate"), &bakery_form()).await;

    for name in ["1.html", "site_1.html"] {
        let (status, body) = get_json(&format!("{base}/preview/{name}")).await;
        assert_eq!(status, 400, "{name}");
        assert_eq!(body["success"], false);
        assert!(
            body["error"].as_str().unwrap().contains("invalid preview name"),
            "{body}"
        );
    }
}

// ── Versions ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_versions() {
    let tmp = tempfile::tempdir().unwrap();
    let base = start_server(tmp.path()).await;
    post_form(&format!("{base}/generate"), &bakery_form()).await;

    let (status, body) = post_form(
        &format!("{base}/sites/1/versions"),
        &[
            ("business_type", "bakery"),
            ("key_features", "catering, wedding cakes"),
            ("style_preference", "elegant"),
        ],
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["site_id"], 1);
    assert_eq!(body["version"], 2);
    assert_eq!(body["preview_url"], "/previews/site_1_v2.html");

    let v2 = reqwest::get(format!("{base}/preview/1_v2"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(v2.contains("catering, wedding cakes"));
    assert!(v2.contains("elegant"));

    let (_, site) = get_json(&format!("{base}/sites/1")).await;
    let versions = site["versions"].as_array().unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["file_path"], "site_1.html");
    assert_eq!(versions[0]["parameters"]["style_preference"], "warm and rustic");
    assert_eq!(versions[1]["parameters"]["style_preference"], "elegant");
    // Site fields keep the first brief.
    assert_eq!(site["style_preference"], "warm and rustic");
}

#[tokio::test]
async fn version_of_unknown_site_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let base = start_server(tmp.path()).await;

    let (status, body) = post_form(&format!("{base}/sites/999/versions"), &bakery_form()).await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Site 999 not found");
}

// ── Persistence ────────────────────────────────────────────────────────

#[tokio::test]
async fn file_store_survives_restart() {
    let tmp = tempfile::tempdir().unwrap();
    let metadata = tmp.path().join("data").join("sites.json");

    let (base, handle) = start_with(
        tmp.path(),
        Arc::new(JsonFileStore::new(&metadata)),
        Arc::new(StubCrew),
    )
    .await;
    post_form(&format!("{base}/generate"), &bakery_form()).await;
    handle.abort();

    let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&metadata).unwrap()).unwrap();
    assert_eq!(on_disk["sites"][0]["id"], 1);

    let (base, _h) = start_with(
        tmp.path(),
        Arc::new(JsonFileStore::new(&metadata)),
        Arc::new(StubCrew),
    )
    .await;
    let (_, doc) = get_json(&format!("{base}/sites")).await;
    assert_eq!(doc["sites"].as_array().unwrap().len(), 1);

    let (_, body) = post_form(&format!("{base}/generate"), &bakery_form()).await;
    assert_eq!(body["site_id"], 2);
}

#[tokio::test]
async fn corrupt_metadata_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    let metadata = tmp.path().join("data").join("sites.json");
    let (base, _h) = start_with(
        tmp.path(),
        Arc::new(JsonFileStore::new(&metadata)),
        Arc::new(StubCrew),
    )
    .await;
    std::fs::write(&metadata, r#"{"sites": ["#).unwrap();

    // Liveness fails with an error status.
    let (status, body) = get_json(&format!("{base}/health")).await;
    assert_eq!(status, 503);
    assert_eq!(body["success"], false);
    assert!(
        body["error"].as_str().unwrap().starts_with("Storage unavailable"),
        "{body}"
    );

    // JSON routes report it in-band.
    let (status, body) = get_json(&format!("{base}/sites")).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert!(
        body["error"].as_str().unwrap().contains("Corrupt metadata"),
        "{body}"
    );
    assert!(body.get("sites").is_none());

    let (status, body) = post_form(&format!("{base}/generate"), &bakery_form()).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert!(
        body["error"].as_str().unwrap().starts_with("Storage unavailable"),
        "{body}"
    );
    assert!(body.get("site_id").is_none());
    assert!(!tmp.path().join("previews").join("site_1.html").exists());

    // The corrupt document is left for an operator to inspect.
    assert_eq!(std::fs::read_to_string(&metadata).unwrap(), r#"{"sites": ["#);
}

#[tokio::test]
async fn index_page_has_form() {
    let tmp = tempfile::tempdir().unwrap();
    let base = start_server(tmp.path()).await;
    let page = reqwest::get(format!("{base}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    for field in ["business_type", "key_features", "style_preference"] {
        assert!(page.contains(&format!("name=\"{field}\"")), "missing {field}");
    }
}
