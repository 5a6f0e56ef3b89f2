//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port with a configuration
//! whose model endpoint points at an `httpmock::MockServer`, so every
//! extraction request can be observed and answered by the test.

// Not every test binary uses every helper.
#![allow(unused)]

use anyhow::Result;
use httpmock::{prelude::*, Mock};
use pdfjson_server::{
    config::{self, AppConfig},
    router,
    state::{build_app_state, AppState},
};
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde_json::json;
use std::{fs::File, io::Write, net::SocketAddr};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

/// The path the mock chat-completions endpoint is served on.
pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn() -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start_async().await;

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
max_upload_mb: 5
provider:
  provider: "local"
  api_url: "{}"
  model_name: "mock-chat-model"
"#,
            mock_server.url(CHAT_COMPLETIONS_PATH)
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config: AppConfig = config::get_config(config_path.to_str())?;
        let app_state = build_app_state(config)?;
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state: app_state_for_harness,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Answers chat completions whose body contains `marker` with `content`.
    pub async fn mock_completion(&self, marker: &str, content: &str) -> Mock<'_> {
        self.mock_server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(CHAT_COMPLETIONS_PATH)
                    .body_contains(marker);
                then.status(200).json_body(json!({
                    "choices": [{ "message": { "role": "assistant", "content": content } }]
                }));
            })
            .await
    }

    /// Posts the given `(file name, bytes)` pairs as a multipart upload.
    pub async fn upload(&self, path: &str, files: Vec<(&str, Vec<u8>)>) -> Result<reqwest::Response> {
        let mut form = Form::new();
        for (file_name, data) in files {
            let part = Part::bytes(data)
                .file_name(file_name.to_string())
                .mime_str("application/pdf")?;
            form = form.part("files", part);
        }
        Ok(self
            .client
            .post(format!("{}{}", self.address, path))
            .multipart(form)
            .send()
            .await?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
