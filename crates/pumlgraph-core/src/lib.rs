//! Core types for pumlgraph deployment diagrams.
//!
//! This crate holds the normalized object/link graph produced by the
//! `pumlgraph-parser` front end and consumed by renderers and serializers.

pub mod semantic;
