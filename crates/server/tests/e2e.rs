use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use configs::AppConfig;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::Value;
use service::storage::{DocumentStore, MemoryDocumentStore, UnavailableDocumentStore};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::{routes, startup};

struct TestApp {
    base_url: String,
    // keeps the content directory alive for the test
    upload_dir: tempfile::TempDir,
}

fn cors() -> CorsLayer { CorsLayer::very_permissive() }

async fn start_server_with(store: Arc<dyn DocumentStore>) -> anyhow::Result<TestApp> {
    start_server_configured(store, |_| {}).await
}

async fn start_server_configured(
    store: Arc<dyn DocumentStore>,
    tweak: impl FnOnce(&mut AppConfig),
) -> anyhow::Result<TestApp> {
    let upload_dir = tempfile::tempdir()?;
    let mut cfg = AppConfig::default();
    cfg.uploads.dir = upload_dir.path().to_string_lossy().into_owned();
    tweak(&mut cfg);

    let state = startup::build_state(&cfg, store);
    let app = routes::build_router(state, cors(), &cfg.uploads);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, upload_dir })
}

async fn start_server() -> anyhow::Result<TestApp> {
    start_server_with(Arc::new(MemoryDocumentStore::new())).await
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

fn corolla_form() -> Form {
    Form::new()
        .text("make", "Toyota")
        .text("model", "Corolla")
        .text("year", "2020")
        .text("price", "15000")
        .text("description", "clean title")
}

fn image_part(name: &str, bytes: &[u8]) -> Part {
    Part::bytes(bytes.to_vec()).file_name(name.to_string())
}

async fn list(app: &TestApp) -> anyhow::Result<Vec<Value>> {
    let res = client().get(format!("{}/vehicles", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(res.json::<Vec<Value>>().await?)
}

fn token_of(path: &str, ext: &str) -> String {
    let name = path.strip_prefix("/uploads/").expect("uploads prefix");
    let token = name.strip_suffix(ext).expect("extension");
    assert_eq!(token.len(), 32, "token {token}");
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    token.to_string()
}

#[tokio::test]
async fn e2e_public_routes() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["status"], "ok");

    let res = c.get(format!("{}/", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?["message"], "Car Marketplace API");

    let res = c.get(format!("{}/api-docs/openapi.json", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn e2e_empty_catalog() -> anyhow::Result<()> {
    let app = start_server().await?;
    assert!(list(&app).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_create_then_list_round_trip() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(format!("{}/vehicles", app.base_url))
        .multipart(corolla_form())
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let created = res.json::<Value>().await?;
    let id = created["id"].as_str().expect("id string").to_string();
    assert!(!id.is_empty());
    assert_eq!(created["make"], "Toyota");
    assert_eq!(created["image_urls"], serde_json::json!([]));

    let listed = list(&app).await?;
    assert_eq!(listed.len(), 1);
    let entry = &listed[0];
    assert_eq!(entry["id"], id.as_str());
    assert_eq!(entry["make"], "Toyota");
    assert_eq!(entry["model"], "Corolla");
    assert_eq!(entry["year"], 2020);
    assert_eq!(entry["price"].as_f64(), Some(15000.0));
    assert_eq!(entry["description"], "clean title");
    assert_eq!(entry["image_urls"], serde_json::json!([]));
    assert!(entry.get("created_at").is_some());
    Ok(())
}

#[tokio::test]
async fn e2e_image_paths_are_generated_and_served() -> anyhow::Result<()> {
    let app = start_server().await?;
    let form = corolla_form().part("images", image_part("photo.png", b"\x89PNG fake"));
    let created = client()
        .post(format!("{}/vehicles", app.base_url))
        .multipart(form)
        .send()
        .await?
        .json::<Value>()
        .await?;

    let path = created["image_urls"][0].as_str().expect("image path").to_string();
    let token = token_of(&path, ".png");
    assert!(app.upload_dir.path().join(format!("{token}.png")).is_file());

    let res = client().get(format!("{}{}", app.base_url, path)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.bytes().await?;
    assert_eq!(&body[..], &b"\x89PNG fake"[..]);

    let res = client().get(format!("{}/uploads/nope.png", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_multiple_images_preserve_order() -> anyhow::Result<()> {
    let app = start_server().await?;
    let form = corolla_form()
        .part("images", image_part("A.jpg", b"A"))
        .part("images", image_part("B.jpg", b"B"))
        .part("images", image_part("C.jpg", b"C"));
    let created = client()
        .post(format!("{}/vehicles", app.base_url))
        .multipart(form)
        .send()
        .await?
        .json::<Value>()
        .await?;

    let urls: Vec<String> = created["image_urls"]
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(urls.len(), 3);
    for (url, expected) in urls.iter().zip(["A", "B", "C"]) {
        let body = client().get(format!("{}{}", app.base_url, url)).send().await?.bytes().await?;
        assert_eq!(&body[..], expected.as_bytes());
    }
    Ok(())
}

#[tokio::test]
async fn e2e_file_without_extension_defaults_to_jpg() -> anyhow::Result<()> {
    let app = start_server().await?;
    let form = corolla_form().part("images", image_part("camera-upload", b"x"));
    let created = client()
        .post(format!("{}/vehicles", app.base_url))
        .multipart(form)
        .send()
        .await?
        .json::<Value>()
        .await?;
    token_of(created["image_urls"][0].as_str().unwrap_or_default(), ".jpg");
    Ok(())
}

#[tokio::test]
async fn e2e_validation_boundaries() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let cases = [
        ("1899", "100", HttpStatusCode::BAD_REQUEST),
        ("1900", "100", HttpStatusCode::OK),
        ("2100", "100", HttpStatusCode::OK),
        ("2101", "100", HttpStatusCode::BAD_REQUEST),
        ("2020", "-0.01", HttpStatusCode::BAD_REQUEST),
        ("2020", "0", HttpStatusCode::OK),
        ("twenty", "0", HttpStatusCode::BAD_REQUEST),
    ];
    for (year, price, expected) in cases {
        let form = Form::new()
            .text("make", "Ford")
            .text("model", "Model T")
            .text("year", year)
            .text("price", price);
        let res = c.post(format!("{}/vehicles", app.base_url)).multipart(form).send().await?;
        assert_eq!(res.status(), expected, "year={year} price={price}");
        if expected == HttpStatusCode::BAD_REQUEST {
            let body = res.json::<Value>().await?;
            assert_eq!(body["error"], "Validation Error");
            assert!(body["message"].as_str().unwrap_or_default().contains(": "));
        }
    }
    // only the three valid submissions were stored
    assert_eq!(list(&app).await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn e2e_missing_fields_are_reported() -> anyhow::Result<()> {
    let app = start_server().await?;
    let form = Form::new().text("make", "Ford");
    let res = client().post(format!("{}/vehicles", app.base_url)).multipart(form).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .expect("fields")
        .iter()
        .filter_map(|f| f["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["model", "year", "price"]);
    Ok(())
}

#[tokio::test]
async fn e2e_listing_is_idempotent() -> anyhow::Result<()> {
    let app = start_server().await?;
    for _ in 0..3 {
        client().post(format!("{}/vehicles", app.base_url)).multipart(corolla_form()).send().await?;
    }
    let first = list(&app).await?;
    let second = list(&app).await?;
    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn e2e_concurrent_creates_never_collide() -> anyhow::Result<()> {
    let app = start_server().await?;
    let url = format!("{}/vehicles", app.base_url);
    let c = client();

    let requests = (0..100).map(|i| {
        let c = c.clone();
        let url = url.clone();
        async move {
            let form = corolla_form().part("images", image_part(&format!("photo{i}.png"), b"img"));
            let created = c.post(url).multipart(form).send().await?.json::<Value>().await?;
            Ok::<_, anyhow::Error>(created["image_urls"][0].as_str().unwrap_or_default().to_string())
        }
    });
    let paths = futures::future::try_join_all(requests).await?;

    let tokens: HashSet<String> = paths.iter().map(|p| token_of(p, ".png")).collect();
    assert_eq!(tokens.len(), 100);
    assert_eq!(list(&app).await?.len(), 100);
    Ok(())
}

#[tokio::test]
async fn e2e_without_database_degrades() -> anyhow::Result<()> {
    let app = start_server_with(Arc::new(UnavailableDocumentStore::new("database not configured"))).await?;
    let c = client();

    let res = c.get(format!("{}/", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.get(format!("{}/test", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let report = res.json::<Value>().await?;
    assert_eq!(report["connection_status"], "not connected");
    assert_eq!(report["collections"], serde_json::json!([]));

    let res = c.get(format!("{}/vehicles", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert!(body["message"].as_str().unwrap_or_default().contains("database not configured"));

    let res = c.post(format!("{}/vehicles", app.base_url)).multipart(corolla_form()).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}

#[tokio::test]
async fn e2e_diagnostics_lists_collections() -> anyhow::Result<()> {
    let app = start_server().await?;
    client().post(format!("{}/vehicles", app.base_url)).multipart(corolla_form()).send().await?;
    let report = client().get(format!("{}/test", app.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(report["connection_status"], "connected");
    assert_eq!(report["collections"], serde_json::json!(["vehicle"]));
    assert_eq!(report["store_backend"], "memory");
    Ok(())
}

#[tokio::test]
async fn e2e_blank_description_is_null() -> anyhow::Result<()> {
    let app = start_server().await?;
    let form = Form::new()
        .text("make", "Toyota")
        .text("model", "Corolla")
        .text("year", "2020")
        .text("price", "15000")
        .text("description", "");
    let res = client().post(format!("{}/vehicles", app.base_url)).multipart(form).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.json::<Value>().await?["description"].is_null());

    let listed = list(&app).await?;
    assert!(listed[0]["description"].is_null());
    Ok(())
}

#[tokio::test]
async fn e2e_oversized_image_is_payload_too_large() -> anyhow::Result<()> {
    let app = start_server_configured(Arc::new(MemoryDocumentStore::new()), |cfg| {
        cfg.uploads.max_body_bytes = 4 * 1024;
    })
    .await?;
    let form = corolla_form().part("images", image_part("big.jpg", &vec![7u8; 16 * 1024]));
    let res = client().post(format!("{}/vehicles", app.base_url)).multipart(form).send().await?;
    assert_eq!(res.status(), HttpStatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(res.json::<Value>().await?["error"], "Payload Too Large");

    // the half-written image is gone and nothing was stored
    assert_eq!(std::fs::read_dir(app.upload_dir.path())?.count(), 0);
    assert!(list(&app).await?.is_empty());
    Ok(())
}
