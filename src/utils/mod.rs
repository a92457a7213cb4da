//! Shared utility functions.
//!
//! This module contains utility functions used across multiple modules in
//! the zonepull crate, currently the content length extraction helpers the
//! metadata probe relies on.
//!
//! # Examples
//!
//! ## Parsing Content-Range Headers
//!
//! ```rust
//! use zonepull::utils::parse_content_range_total;
//!
//! // Extract the total size from a Content-Range header.
//! let header_value = "bytes 0-1023/2048";
//! if let Some(total_size) = parse_content_range_total(header_value) {
//!     println!("Total file size: {} bytes", total_size);
//! }
//! ```

pub mod content_length;

// Re-export commonly used utilities
pub use content_length::{get_content_length, get_content_range_total, parse_content_range_total};
