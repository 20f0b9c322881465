//! Test helpers: build an app over a throwaway static root.
//!
//! Run from workspace root: `cargo test -p pixform-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use pixform_api::setup::build_app;
use pixform_core::ServiceConfig;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const INDEX_MARKER: &str = "<div id=\"root\"></div>";
pub const STATIC_ASSET_BODY: &str = "console.log(\"pixform\");";

/// Test application: server plus the directories it serves from.
pub struct TestApp {
    pub server: TestServer,
    pub static_root: PathBuf,
    pub upload_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Names currently in the upload directory, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        list_dir(&self.upload_dir)
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup test app, letting the caller adjust the config first.
pub async fn setup_test_app_with(configure: impl FnOnce(&mut ServiceConfig)) -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let static_root = temp_dir.path().join("build");
    let upload_dir = static_root.join("static").join("uploads");

    std::fs::create_dir_all(&static_root).unwrap();
    std::fs::write(
        static_root.join("index.html"),
        format!("<!doctype html><html><body>{}</body></html>", INDEX_MARKER),
    )
    .unwrap();

    std::fs::create_dir_all(static_root.join("static").join("js")).unwrap();
    std::fs::write(
        static_root.join("static").join("js").join("main.js"),
        STATIC_ASSET_BODY,
    )
    .unwrap();

    let mut config = ServiceConfig::new(&static_root, &upload_dir);
    configure(&mut config);

    let (_state, router) = build_app(config).await.unwrap();
    let server = TestServer::new(router).unwrap();

    TestApp {
        server,
        static_root,
        upload_dir,
        _temp_dir: temp_dir,
    }
}

fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}
