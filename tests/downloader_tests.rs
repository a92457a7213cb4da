//! Tests for the chunked downloader against a local fixture server.
//!
//! This file covers the full transfer path: size probing, parallel range
//! fetching, in-order reassembly, failure propagation, and cancellation.

mod common;

use common::czds_server::{CzdsServer, ZoneFixture};
use common::helpers::*;

use reqwest::Url;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use zonepull::downloader::DownloaderBuilder;
use zonepull::Error;

#[tokio::test]
async fn downloads_and_reassembles_out_of_order_ranges() {
    let body = zone_body(300);
    let server = CzdsServer::start(vec![ZoneFixture::new("com", body.clone()).staggered()]);
    let client = transfer_client();
    let downloader = DownloaderBuilder::new().chunk_count(3).build();
    let url = Url::parse(&server.zone_url("com")).unwrap();

    let assembled = downloader
        .download(&client, &url, &hidden_progress(1), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(assembled.len(), 300);
    let bytes = assembled.into_bytes();
    assert_eq!(&bytes[..], &body[..]);
    assert_eq!(server.range_hits(), 3);
}

#[tokio::test]
async fn empty_zone_means_no_range_requests() {
    let server = CzdsServer::start(vec![ZoneFixture::new("empty", Vec::new())]);
    let client = transfer_client();
    let downloader = DownloaderBuilder::new().chunk_count(4).build();
    let url = Url::parse(&server.zone_url("empty")).unwrap();

    let assembled = downloader
        .download(&client, &url, &hidden_progress(1), &CancellationToken::new())
        .await
        .unwrap();

    assert!(assembled.is_empty());
    assert_eq!(server.range_hits(), 0);
}

#[tokio::test]
async fn missing_content_length_is_size_unavailable() {
    let server = CzdsServer::start(vec![
        ZoneFixture::new("com", zone_body(64)).without_content_length()
    ]);
    let client = transfer_client();
    let downloader = DownloaderBuilder::new().build();
    let url = Url::parse(&server.zone_url("com")).unwrap();

    let err = downloader
        .download(&client, &url, &hidden_progress(1), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::SizeUnavailable { .. }));
    assert_eq!(server.range_hits(), 0);
}

#[tokio::test]
async fn failed_range_fails_the_whole_transfer() {
    let server = CzdsServer::start(vec![ZoneFixture::new("com", zone_body(300)).failing_ranges()]);
    let client = transfer_client();
    let downloader = DownloaderBuilder::new().chunk_count(3).build();
    let url = Url::parse(&server.zone_url("com")).unwrap();

    let err = downloader
        .download(&client, &url, &hidden_progress(1), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::FetchFailure { .. }));
    // The transfer client never retries, so each range is hit at most once.
    assert!(server.range_hits() <= 3);
}

#[tokio::test]
async fn short_range_body_fails_the_transfer() {
    let server = CzdsServer::start(vec![ZoneFixture::new("com", zone_body(120)).truncated_ranges()]);
    let client = transfer_client();
    let downloader = DownloaderBuilder::new().chunk_count(2).build();
    let url = Url::parse(&server.zone_url("com")).unwrap();

    let err = downloader
        .download(&client, &url, &hidden_progress(1), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        Error::FetchFailure { reason, .. } => assert!(reason.contains("expected")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn cancellation_interrupts_inflight_ranges() {
    let server = CzdsServer::start(vec![ZoneFixture::new("com", zone_body(300)).stalled()]);
    let client = transfer_client();
    let downloader = DownloaderBuilder::new().chunk_count(3).build();
    let url = Url::parse(&server.zone_url("com")).unwrap();

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let err = downloader
        .download(&client, &url, &hidden_progress(1), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert!(
        started.elapsed() < Duration::from_secs(3),
        "cancel took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn pre_cancelled_token_short_circuits() {
    let server = CzdsServer::start(vec![ZoneFixture::new("com", zone_body(300))]);
    let client = transfer_client();
    let downloader = DownloaderBuilder::new().build();
    let url = Url::parse(&server.zone_url("com")).unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = downloader
        .download(&client, &url, &hidden_progress(1), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert_eq!(server.range_hits(), 0);
}

#[tokio::test]
async fn range_probe_mode_reads_the_content_range_total() {
    let body = zone_body(100);
    let server = CzdsServer::start(vec![ZoneFixture::new("com", body.clone())]);
    let client = transfer_client();
    let downloader = DownloaderBuilder::new()
        .chunk_count(2)
        .use_range_for_content_length(true)
        .build();
    let url = Url::parse(&server.zone_url("com")).unwrap();

    let assembled = downloader
        .download(&client, &url, &hidden_progress(1), &CancellationToken::new())
        .await
        .unwrap();

    let bytes = assembled.into_bytes();
    assert_eq!(&bytes[..], &body[..]);
    // One probe plus two planned ranges.
    assert_eq!(server.range_hits(), 3);
}

#[test]
fn builder_defaults() {
    let downloader = DownloaderBuilder::new().build();
    assert_eq!(downloader.chunk_count(), 5);
    assert!(!downloader.use_range_for_content_length());
}

#[test]
fn builder_sets_options() {
    let downloader = DownloaderBuilder::new()
        .chunk_count(8)
        .use_range_for_content_length(true)
        .build();
    assert_eq!(downloader.chunk_count(), 8);
    assert!(downloader.use_range_for_content_length());
}
