#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use cms_api::{AppConfig, AppState};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "s3cret";
pub const SESSION: &str = "admin_session=true";

/// Config whose store is a closed local port: every connect fails fast.
pub fn offline_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.host = "127.0.0.1".to_string();
    config.database.port = 1;
    config.database.encrypt = false;
    config.database.connect_timeout_secs = 5;
    config.security.admin_username = ADMIN_USERNAME.to_string();
    config.security.admin_password = ADMIN_PASSWORD.to_string();
    config
}

/// Config for a real database, taken from CMS_TEST_DATABASE_URL. `None` skips the test.
pub fn database_config() -> Option<AppConfig> {
    let url = std::env::var("CMS_TEST_DATABASE_URL").ok()?;
    let mut config = offline_config();
    config.database.port = 5432;
    config
        .database
        .apply_url(&url)
        .expect("CMS_TEST_DATABASE_URL must be a postgres:// URL");
    if let Ok(schema) = std::env::var("CMS_TEST_DATABASE_SCHEMA") {
        config.database.schema = Some(schema);
    }
    Some(config)
}

pub fn router(config: AppConfig) -> Router {
    cms_api::app(AppState::new(config))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(router: &Router, request: Request<Body>) -> Result<TestResponse> {
    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).context("response body is not JSON")?
    };
    Ok(TestResponse { status, headers, body })
}

pub fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri).header("cookie", SESSION);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn anonymous(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let mut req = request(method, uri, body);
    req.headers_mut().remove("cookie");
    req
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Serve the app in-process on a free port.
    pub async fn spawn(config: AppConfig) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let app = router(config);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        let server = Self {
            addr,
            base_url: format!("http://{}", addr),
            client,
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = self.client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK
                    || resp.status() == reqwest::StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
