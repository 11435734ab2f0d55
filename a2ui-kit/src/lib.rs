//! # Description
//!
//! A2UI Kit is a Rust crate for hosting agent-generated user interfaces
//! described with the A2UI protocol, independent of any UI toolkit.
//!
//! # Features
//!
//! - Lenient ingestion of agent output: bad messages and entries are skipped, not fatal.
//! - Repair of truncated or commented JSON before decoding.
//! - Per-surface component registry and data model with path bindings.
//! - Data-driven templates for lists and columns.
//! - Form inputs whose edits are written back to the data model.
//! - Failure containment at every component boundary, with a per-pass render budget.
//! - Pluggable render primitives, with a bundled outline host.

pub mod a2ui;
