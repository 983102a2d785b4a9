//! Serializers for compiled graphs.

pub mod json;
