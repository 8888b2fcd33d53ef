//! # radx-core
//!
//! Core types and the vocabulary registry for radx-reporter.
//!
//! This crate provides the foundational types shared across all radx crates:
//! - Vocabulary terms and classifiers (with label policy and matching mode)
//! - Classified records and aggregation entries produced for report sinks
//! - The immutable [`TermRegistry`](registry::TermRegistry), including the
//!   built-in RADx Data Hub vocabularies
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod registry;
pub mod search_url;
