//! Progress module containing progress bar functionality.
//!
//! This module provides progress bar styling, display management,
//! and progress reporting functionality for transfer operations. It handles
//! both per-zone byte progress and overall pool progress coordination.
//!
//! # Overview
//!
//! The progress module is organized into two main components:
//!
//! - `style` - Progress bar styling options and templates
//! - `display` - Progress bar display management and coordination
//!
//! # Examples
//!
//! ## Custom Progress Bar Styling
//!
//! ```rust
//! use zonepull::progress::{StyleOptions, ProgressBarOpts};
//!
//! // Create custom style options
//! let style_options = StyleOptions::new(
//!     ProgressBarOpts::new(
//!         Some("[{bar:40.cyan/blue}] {pos}/{len} {msg}".to_string()),
//!         Some("█▉▊▋▌▍▎▏  ".to_string()),
//!         true,
//!         false
//!     ),
//!     ProgressBarOpts::with_pip_style(),
//! );
//! ```
//!
//! ## Hidden Progress Bars
//!
//! ```rust
//! use zonepull::progress::{StyleOptions, ProgressBarOpts};
//!
//! // Create style options with hidden progress bars
//! let hidden_style = StyleOptions::new(
//!     ProgressBarOpts::hidden(),
//!     ProgressBarOpts::hidden(),
//! );
//! ```

pub(crate) mod display;
pub(crate) mod style;

pub use display::ProgressDisplay;
pub use style::{ProgressBarOpts, StyleOptions};
