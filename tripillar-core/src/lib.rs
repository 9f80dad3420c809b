//! Tripillar Core: the pure synthesis engine.
//!
//! This crate contains the pure part of the synthesis engine:
//! - Domain types (bodies, signs, subject chart, timeline points, windows)
//! - Oracle traits for positions, period timelines, strengths and bindu tables
//! - House-relative classification and the three per-signal scorers
//! - The compositor (weighted sum plus alignment boost)
//! - Peak and caution window extraction
//! - Summary statistics and result fingerprinting
//!
//! Nothing here performs I/O or keeps state between calls.

pub mod domain;
pub mod oracle;
pub mod result;
pub mod scoring;
pub mod summary;
pub mod windows;

pub use result::{ResultHash, SynthesisResult};
pub use summary::{summarize, BestPoint, Summary};
pub use windows::{extract_caution_windows, extract_peak_windows};
