use std::io::Write;
use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tempfile::{NamedTempFile, TempDir};
use tokio::time::{sleep, timeout};

/// Find an available port
fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Write one small partition per ECO family.
fn write_data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let partitions = [
        ("A", r#"{"fen-a": {"eco": "A10", "name": "English Opening", "moves": "1. c4"}}"#),
        (
            "B",
            r#"{
                "fen-b1": {
                    "eco": "B20",
                    "name": "Sicilian Defense",
                    "moves": "1. e4 c5",
                    "isEcoRoot": true,
                    "analysis_json": {"style_tags": ["aggressive"], "description": "Sharp play."},
                    "popularity": {"games_analyzed": 1000, "white_wins": 400, "draws": 300, "black_wins": 300}
                },
                "fen-b2": {
                    "eco": "B70",
                    "name": "Sicilian Defense Dragon",
                    "moves": "1. e4 c5 2. Nf3 d6",
                    "analysis_json": {"style_tags": ["attacking"]},
                    "popularity": {"games_analyzed": 500, "white_wins": 200, "draws": 100, "black_wins": 200}
                }
            }"#,
        ),
        ("C", r#"{"fen-c": {"eco": "C60", "name": "Ruy Lopez", "moves": "1. e4 e5 2. Nf3 Nc6 3. Bb5"}}"#),
        ("D", r#"{"fen-d": {"eco": "D30", "name": "Queen's Gambit Declined", "moves": "1. d4 d5 2. c4 e6"}}"#),
        ("E", r#"{}"#),
    ];
    for (family, body) in partitions {
        std::fs::write(dir.path().join(format!("eco{}.json", family)), body).unwrap();
    }
    dir
}

/// Create a minimal valid config
fn minimal_config(port: u16, data_dir: &Path) -> String {
    format!(
        r#"
[server]
host = "127.0.0.1"
port = {}

[data]
dir = '{}'
"#,
        port,
        data_dir.display()
    )
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// Spawn the server and return a handle
async fn spawn_server(config_path: &Path) -> tokio::process::Child {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_explorer"))
        .env("EXPLORER_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server")
}

/// Wait for server to be ready
async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/api/v1/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

/// Run the binary to completion with `config_path`.
async fn run_to_exit(config_path: &Path) -> std::process::Output {
    timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_explorer"))
            .env("EXPLORER_CONFIG", config_path)
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command")
}

#[tokio::test]
async fn test_health_endpoint() {
    let port = get_available_port();
    let data_dir = write_data_dir();
    let config = write_config(&minimal_config(port, data_dir.path()));

    let mut server = spawn_server(config.path()).await;
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let client = Client::new();
    let response = client
        .get(format!("http://127.0.0.1:{}/api/v1/health", port))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["openings"], 5);

    // Cleanup
    server.kill().await.ok();
}

#[tokio::test]
async fn test_search_and_popular_over_loaded_files() {
    let port = get_available_port();
    let data_dir = write_data_dir();
    let config = write_config(&minimal_config(port, data_dir.path()));

    let mut server = spawn_server(config.path()).await;
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let client = Client::new();
    let search: serde_json::Value = client
        .get(format!(
            "http://127.0.0.1:{}/api/v1/search?q=attacking%20sicilian",
            port
        ))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(search["results"][0]["fen"], "fen-b2");
    assert_eq!(search["results"][1]["fen"], "fen-b1");

    let popular: serde_json::Value = client
        .get(format!("http://127.0.0.1:{}/api/v1/popular-by-eco?limit=1", port))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(popular["B"][0]["fen"], "fen-b1");
    assert_eq!(popular["B"][0]["gamesAnalyzed"], 1000);
    assert_eq!(popular["metadata"]["totalReturned"], 1);

    // Cleanup
    server.kill().await.ok();
}

#[tokio::test]
async fn test_missing_config_file_exits_with_error() {
    let result = run_to_exit(Path::new("/nonexistent/config.toml")).await;
    assert!(!result.status.success());
}

#[tokio::test]
async fn test_missing_data_section_exits_with_error() {
    let config = write_config(
        r#"
[server]
port = 8080
"#,
    );
    let result = run_to_exit(config.path()).await;
    assert!(!result.status.success());
}

#[tokio::test]
async fn test_missing_partition_exits_with_error() {
    let data_dir = write_data_dir();
    std::fs::remove_file(data_dir.path().join("ecoC.json")).unwrap();
    let config = write_config(&minimal_config(get_available_port(), data_dir.path()));

    let result = run_to_exit(config.path()).await;
    assert!(!result.status.success());
}

#[tokio::test]
async fn test_corrupt_partition_exits_with_error() {
    let data_dir = write_data_dir();
    std::fs::write(data_dir.path().join("ecoD.json"), "{ not json").unwrap();
    let config = write_config(&minimal_config(get_available_port(), data_dir.path()));

    let result = run_to_exit(config.path()).await;
    assert!(!result.status.success());
}

#[tokio::test]
async fn test_invalid_config_exits_with_error() {
    let data_dir = write_data_dir();
    let config = write_config(&format!(
        "{}\n[search]\nthreshold = 1.5\n",
        minimal_config(get_available_port(), data_dir.path())
    ));

    let result = run_to_exit(config.path()).await;
    assert!(!result.status.success());
}
