//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates a temporary data directory, default
//! config, and full [`AppContext`]. The [`TestHarness::with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;

use menagerie::config::{Config, StorageConfig};
use menagerie::records::RecordService;
use menagerie::server::{create_router, AppContext};
use reqwest::multipart::{Form, Part};
use tempfile::TempDir;

/// Test harness wrapping a fully-constructed [`AppContext`] backed by a
/// temporary data directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub dir: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration in a fresh directory.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness whose storage lives in a fresh directory.
    ///
    /// `config.storage.data_dir` is replaced by the temporary directory.
    pub fn with_config(mut config: Config) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        config.storage.data_dir = dir.path().to_path_buf();
        let records = RecordService::open(&config.storage).expect("failed to open storage");
        let ctx = AppContext::new(config, records);
        Self { ctx, dir }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let addr = harness.serve().await;
        (harness, addr)
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let addr = harness.serve().await;
        (harness, addr)
    }

    /// Serve this harness's context on a random port.
    pub async fn serve(&self) -> SocketAddr {
        serve_context(self.ctx.clone()).await
    }

    /// Open a second context on the same data directory, as a restarted
    /// process would.
    pub fn restart(&self) -> AppContext {
        let storage = self.storage();
        let records = RecordService::open(&storage).expect("failed to reopen storage");
        AppContext::new((*self.ctx.config).clone(), records)
    }

    pub fn storage(&self) -> StorageConfig {
        self.ctx.config.storage.clone()
    }

    /// Number of files in the upload directory.
    pub fn upload_count(&self) -> usize {
        std::fs::read_dir(self.storage().upload_path())
            .expect("upload dir missing")
            .count()
    }
}

/// Serve a context on a random port.
pub async fn serve_context(ctx: AppContext) -> SocketAddr {
    let app = create_router(ctx, None);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind random port");
    let addr = listener.local_addr().expect("failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    addr
}

/// The six text fields of the sample record.
pub const ARIA: [(&str, &str); 6] = [
    ("name", "Aria"),
    ("kind", "Elf"),
    ("category", "Mage"),
    ("strengths", "Fire"),
    ("weaknesses", "Cold"),
    ("notes", "—"),
];

/// A fake PNG of `len` bytes.
pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.resize(len.max(data.len()), 0xAB);
    data
}

/// Multipart form with the given text fields and no file.
pub fn text_form(fields: &[(&str, &str)]) -> Form {
    fields.iter().fold(Form::new(), |form, (name, value)| {
        form.text(name.to_string(), value.to_string())
    })
}

/// Multipart form with the given text fields and an image part.
pub fn upload_form(fields: &[(&str, &str)], file_name: &str, data: Vec<u8>) -> Form {
    let part = Part::bytes(data)
        .file_name(file_name.to_string())
        .mime_str("image/png")
        .expect("valid mime");
    text_form(fields).part("image", part)
}

/// Upload the sample record and return the JSON response.
pub async fn create_aria(addr: SocketAddr) -> serde_json::Value {
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/upload"))
        .multipart(upload_form(&ARIA, "aria.png", png_bytes(2048)))
        .send()
        .await
        .expect("upload failed");
    assert_eq!(resp.status(), 200);
    resp.json().await.expect("invalid json")
}
