//! HTTP-level tests for the browser front end.
//!
//! Each test binds the router on an ephemeral port with an in-memory
//! provider and talks to it with a real HTTP client.
//!
//! Run with:
//!   cargo test --test web

use async_trait::async_trait;
use figma2html_web::{
    router, AccessToken, AppState, Artifact, ConversionConfig, ConversionProvider, ConvertError,
    Converter, OutputFile, ProviderOutput,
};
use reqwest::StatusCode;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

const URL: &str = "https://www.figma.com/design/ABC123/Landing-Page";
const MARKUP: &str = "<html><head><title>t</title></head><body><div class=\"hero\">Hi ✓</div><div></div></body></html>";
const STYLESHEET: &str = ".hero { color: #333; }\n";

/// Returns canned artifacts, or a canned failure.
struct StubProvider {
    markup: &'static str,
    stylesheet: &'static str,
    failure: Option<&'static str>,
    tokens_seen: Mutex<Vec<String>>,
}

impl StubProvider {
    fn new(markup: &'static str, stylesheet: &'static str) -> Self {
        Self {
            markup,
            stylesheet,
            failure: None,
            tokens_seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ConversionProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn convert(
        &self,
        run_id: &str,
        token: &AccessToken,
        _file_key: &str,
    ) -> Result<ProviderOutput, ConvertError> {
        self.tokens_seen
            .lock()
            .unwrap()
            .push(token.expose().to_string());
        if let Some(detail) = self.failure {
            return Err(ConvertError::ProviderFailed {
                exit_code: Some(1),
                detail: detail.to_string(),
            });
        }
        let mut files = Vec::new();
        for (name, content) in [("index.html", self.markup), ("styles.css", self.stylesheet)] {
            if !content.is_empty() {
                files.push(OutputFile {
                    name: name.to_string(),
                    size: content.len() as u64,
                });
            }
        }
        Ok(ProviderOutput {
            markup: Artifact::new("index.html", self.markup),
            stylesheet: Artifact::new("styles.css", self.stylesheet),
            files,
            log: "Conversion completed successfully\n".into(),
            exit_code: Some(0),
            output_dir: format!("output/{run_id}"),
        })
    }
}

struct TestServer {
    addr: SocketAddr,
    client: reqwest::Client,
}

impl TestServer {
    async fn start(provider: Arc<StubProvider>) -> Self {
        let converter = Converter::with_provider(provider, ConversionConfig::default());
        let state = Arc::new(AppState::new(converter, 4));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        Self {
            addr,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn submit(&self, token: &str, figma_url: &str) -> reqwest::Response {
        self.client
            .post(self.url("/convert"))
            .form(&[("access_token", token), ("figma_url", figma_url)])
            .send()
            .await
            .unwrap()
    }

    /// Submit a valid form and return the run id shown on the result page.
    async fn convert_ok(&self) -> String {
        let resp = self.submit("figd_secret_token", URL).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.text().await.unwrap();
        run_id_from(&body)
    }
}

fn run_id_from(body: &str) -> String {
    let start = body.find("(run <code>").expect("run id on page") + "(run <code>".len();
    let end = start + body[start..].find("</code>").unwrap();
    body[start..end].to_string()
}

// ── Page ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn index_serves_the_form() {
    let server = TestServer::start(Arc::new(StubProvider::new(MARKUP, STYLESHEET))).await;
    let resp = server.client.get(server.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Figma to HTML Converter"));
    assert!(body.contains("name=\"access_token\""));
    assert!(body.contains("name=\"figma_url\""));
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let server = TestServer::start(Arc::new(StubProvider::new(MARKUP, STYLESHEET))).await;
    let resp = server.client.get(server.url("/nope")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── Convert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn successful_submission_renders_results() {
    let provider = Arc::new(StubProvider::new(MARKUP, STYLESHEET));
    let server = TestServer::start(provider.clone()).await;

    let resp = server.submit("figd_secret_token", URL).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();

    assert!(body.contains("Conversion Successful"));
    assert!(body.contains("<strong>2</strong> elements converted"));
    for id in ["preview", "html", "css", "files", "download"] {
        assert!(body.contains(&format!("id=\"panel-{id}\"")), "missing panel {id}");
    }
    assert!(body.contains("📄 index.html"));
    // URL is kept in the form, the token is not.
    assert!(body.contains(&format!("value=\"{URL}\"")));
    assert!(!body.contains("figd_secret_token"));
    assert_eq!(*provider.tokens_seen.lock().unwrap(), vec!["figd_secret_token"]);
}

#[tokio::test]
async fn invalid_url_is_rejected_without_running() {
    let provider = Arc::new(StubProvider::new(MARKUP, STYLESHEET));
    let server = TestServer::start(provider.clone()).await;

    let resp = server.submit("figd_x", "https://example.com/foo").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Invalid Figma URL"));
    assert!(body.contains("role=\"alert\""));
    assert!(provider.tokens_seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let server = TestServer::start(Arc::new(StubProvider::new(MARKUP, STYLESHEET))).await;

    let resp = server.submit("", URL).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.unwrap().contains("Please provide a Figma access token"));

    let resp = server.submit("figd_x", "").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.unwrap().contains("Please provide a Figma file URL"));
}

#[tokio::test]
async fn converter_failure_shows_its_detail() {
    let mut stub = StubProvider::new("", "");
    stub.failure = Some("Invalid token: 403 Forbidden");
    let server = TestServer::start(Arc::new(stub)).await;

    let resp = server.submit("figd_x", URL).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Invalid token: 403 Forbidden"));
    assert!(!body.contains("Conversion Successful"));
}

#[tokio::test]
async fn empty_result_is_no_files_generated() {
    let server = TestServer::start(Arc::new(StubProvider::new("", ""))).await;
    let resp = server.submit("figd_x", URL).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert!(resp.text().await.unwrap().contains("No files were generated"));
}

// ── Download ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn downloads_are_byte_identical_attachments() {
    let server = TestServer::start(Arc::new(StubProvider::new(MARKUP, STYLESHEET))).await;
    let run_id = server.convert_ok().await;

    for (kind, file, content_type, content) in [
        ("markup", "index.html", "text/html; charset=utf-8", MARKUP),
        ("stylesheet", "styles.css", "text/css; charset=utf-8", STYLESHEET),
    ] {
        let resp = server
            .client
            .get(server.url(&format!("/runs/{run_id}/download/{kind}")))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers["content-type"], content_type);
        assert_eq!(
            headers["content-disposition"],
            format!("attachment; filename=\"{file}\"").as_str()
        );
        assert_eq!(resp.bytes().await.unwrap().as_ref(), content.as_bytes());
    }
}

#[tokio::test]
async fn download_of_missing_things_is_not_found() {
    let server = TestServer::start(Arc::new(StubProvider::new(MARKUP, ""))).await;
    let run_id = server.convert_ok().await;

    for path in [
        format!("/runs/{run_id}/download/stylesheet"),
        format!("/runs/{run_id}/download/script"),
        "/runs/run-unknown/download/markup".to_string(),
    ] {
        let resp = server.client.get(server.url(&path)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
    }
}

// ── Preview ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn preview_inlines_stylesheet_in_a_sandbox() {
    let server = TestServer::start(Arc::new(StubProvider::new(MARKUP, STYLESHEET))).await;
    let run_id = server.convert_ok().await;

    let resp = server
        .client
        .get(server.url(&format!("/runs/{run_id}/preview")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-security-policy"], "sandbox");
    let body = resp.text().await.unwrap();
    assert!(body.contains(&format!("<style>{STYLESHEET}</style></head>")));
    assert!(body.contains("<div class=\"hero\">Hi ✓</div>"));
}

#[tokio::test]
async fn preview_without_stylesheet_is_the_markup() {
    let server = TestServer::start(Arc::new(StubProvider::new(MARKUP, ""))).await;
    let run_id = server.convert_ok().await;

    let body = server
        .client
        .get(server.url(&format!("/runs/{run_id}/preview")))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, MARKUP);
}

#[tokio::test]
async fn preview_of_stylesheet_only_run_is_not_found() {
    let server = TestServer::start(Arc::new(StubProvider::new("", STYLESHEET))).await;
    let run_id = server.convert_ok().await;

    let resp = server
        .client
        .get(server.url(&format!("/runs/{run_id}/preview")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
