//! # edi-schema
//!
//! Segment definitions and the explicit tag registry.
//!
//! A [`SegmentDefinition`] describes the positional shape of one segment and
//! builds the matching [`edi_ir::Node`] template. Definitions can be written in
//! code, loaded from YAML/JSON with [`SchemaLoader`], and registered by tag in a
//! [`SegmentRegistry`]. Registration is always an explicit call; nothing is
//! collected implicitly when a type is declared.

pub mod loader;
pub mod model;
pub mod registry;
pub mod service;

pub use loader::SchemaLoader;
pub use model::{ElementDefinition, Schema, SegmentDefinition};
pub use registry::{SegmentConstructor, SegmentRegistry};
pub use service::{register_service_segments, service_segments};

use thiserror::Error;

/// Errors that can occur when working with segment definitions
#[derive(Error, Debug)]
pub enum Error {
    #[error("No segment registered for tag: {0}")]
    UnknownTag(String),

    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
