//! # Sijill Support
//!
//! Shared utilities for the Sijill registry crates.
//!
//! This crate provides:
//! - Text rendering for diagnostics (resolution chains, name suggestions)
//! - Tracing subscriber setup for applications

pub mod logging;
pub mod rendering;
