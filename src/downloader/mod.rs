//! Downloader module containing the chunked transfer engine, builder pattern, and configuration.
//!
//! This module provides the main [`Downloader`] struct and its associated builder
//! for configuring and executing chunked transfers of single resources.
//!
//! # Overview
//!
//! The downloader module is organized into four components:
//!
//! - `downloader` - Core Downloader struct with probe, fan-out, and reassembly logic
//! - `builder` - DownloaderBuilder for flexible configuration using the builder pattern
//! - `config` - Configuration structure and defaults
//! - `assembled` - The in-memory result of a completed transfer

pub mod assembled;
pub mod builder;
pub mod config;
pub mod downloader;

pub use assembled::AssembledZone;
pub use builder::DownloaderBuilder;
pub use config::DownloaderConfig;
pub use downloader::Downloader;
