//! End-to-end tests for the artifactor binary

use assert_cmd::Command;
use mockito::{Matcher, Server, ServerGuard};
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

fn artifactor() -> Command {
    let mut cmd = Command::cargo_bin("artifactor").unwrap();
    cmd.env_clear().env("ARTIFACTOR_LOG", "info");
    cmd
}

fn write_config(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("config.yaml");
    fs::write(&path, contents).unwrap();
    path
}

fn site_zip() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("public/index.html", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"<h1>release</h1>").unwrap();
    writer.finish().unwrap().into_inner()
}

fn mock_github(server: &mut ServerGuard, assets: serde_json::Value) -> Vec<mockito::Mock> {
    let json_mock = |server: &mut ServerGuard, path: &str, body: serde_json::Value| {
        server
            .mock("GET", path)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create()
    };
    vec![
        json_mock(server, "/orgs/acme", json!({"login": "acme"})),
        json_mock(server, "/repos/acme/app", json!({"name": "app"})),
        json_mock(
            server,
            "/repos/acme/app/releases",
            json!([{"tag_name": "v1.0.0", "published_at": "2024-01-01T00:00:00Z", "assets": assets}]),
        ),
    ]
}

#[test]
fn test_help() {
    artifactor()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_missing_config_fails() {
    let temp = TempDir::new().unwrap();
    artifactor()
        .arg("--config")
        .arg(temp.path().join("absent.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to load deploy config"));
}

#[test]
fn test_invalid_yaml_fails() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "providers: [not, a, map");
    artifactor()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_unconfigured_provider_fails() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "providers: {}\n");
    artifactor()
        .env("ARTIFACTOR_CONFIG", &config)
        .env("PROVIDER", "gitlab.example.com")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn test_deploys_github_release() {
    let mut server = Server::new();
    let _mocks = mock_github(
        &mut server,
        json!([{"id": 7, "name": "site.zip", "content_type": "application/zip"}]),
    );
    let _download = server
        .mock("GET", "/repos/acme/app/releases/assets/7")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(site_zip())
        .create();

    let temp = TempDir::new().unwrap();
    let volume = temp.path().join("volume");
    let config = write_config(
        temp.path(),
        &format!(
            "providers:\n  github:\n    url: {}\n    api-type: github\n    secret-token: ghp_test\n",
            server.url()
        ),
    );

    artifactor()
        .arg("--config")
        .arg(&config)
        .env("PROVIDER", "github")
        .env("GROUP", "acme")
        .env("PROJECT", "app")
        .env("SOURCE_PATH", "public")
        .env("VOLUME", &volume)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));

    assert_eq!(
        fs::read_to_string(volume.join("index.html")).unwrap(),
        "<h1>release</h1>"
    );
}

#[test]
fn test_nothing_to_deploy_succeeds() {
    let mut server = Server::new();
    let _mocks = mock_github(
        &mut server,
        json!([{"id": 8, "name": "notes.txt", "content_type": "text/plain"}]),
    );

    let temp = TempDir::new().unwrap();
    let volume = temp.path().join("volume");
    let config = write_config(
        temp.path(),
        &format!(
            "providers:\n  github:\n    url: {}\n    api-type: github\n",
            server.url()
        ),
    );

    artifactor()
        .arg("--config")
        .arg(&config)
        .env("PROVIDER", "github")
        .env("GROUP", "acme")
        .env("PROJECT", "app")
        .env("VOLUME", &volume)
        .assert()
        .success()
        .stdout(predicate::str::contains("not found assets"));

    assert!(!volume.exists());
}
