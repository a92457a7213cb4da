use std::fs;
use std::path::Path;
use tempfile::TempDir;

use reqwest_middleware::ClientWithMiddleware;
use zonepull::progress::{ProgressBarOpts, ProgressDisplay, StyleOptions};
use zonepull::{create_http_client, AccessToken, HttpClientConfig};

use super::czds_server::TEST_TOKEN;

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates zone file content of the given size.
///
/// The byte pattern has a period of 251, so misordered or shifted chunks
/// never reproduce the original.
pub fn zone_body(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}

/// Reads a file fully, panicking with the path on failure
pub fn read_file(path: &Path) -> Vec<u8> {
    fs::read(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}

/// Creates an API-profile client without retries, so failure tests see
/// exactly one request
pub fn api_client() -> ClientWithMiddleware {
    create_http_client(HttpClientConfig {
        retries: 0,
        ..Default::default()
    })
    .expect("Failed to create api client")
}

/// Creates a transfer-profile client carrying the fixture bearer token
pub fn transfer_client() -> ClientWithMiddleware {
    let headers = AccessToken::new(TEST_TOKEN)
        .bearer_headers()
        .expect("Failed to build bearer headers");
    create_http_client(HttpClientConfig::transfer(headers)).expect("Failed to create client")
}

/// Creates style options with every bar hidden
pub fn hidden_style() -> StyleOptions {
    StyleOptions::new(ProgressBarOpts::hidden(), ProgressBarOpts::hidden())
}

/// Creates a hidden progress display sized for `jobs` transfers
pub fn hidden_progress(jobs: usize) -> ProgressDisplay {
    ProgressDisplay::new(hidden_style(), jobs, false)
}
