//! # edi-adapter-edifact
//!
//! Boundary between tokenized EDIFACT segments and typed element trees.
//!
//! This crate provides the raw [`Segment`] shape a tokenizer produces, typed
//! views over the four envelope segments (UNB/UNZ, UNH/UNT) with their
//! validation rules, and the [`bridge`] that moves data between a raw segment
//! and a schema-shaped [`edi_ir::Node`].

pub mod bridge;
pub mod envelopes;
pub mod segment;

pub use bridge::{SchemaBridge, from_raw, to_raw};
pub use envelopes::{
    Envelope, EnvelopeSegment, MessageTypeIdentifier, UnbSegment, UnhSegment, UntSegment,
    UnzSegment, validate_interchange, validate_message,
};
pub use segment::{Element, Segment};

use thiserror::Error;

/// Errors that can occur when bridging or validating EDIFACT segments
#[derive(Error, Debug)]
pub enum Error {
    #[error("Tag mismatch for {location}: expected {expected}, got {found}")]
    TagMismatch {
        location: String,
        expected: String,
        found: String,
    },

    #[error("Timestamp of file-creation malformed: '{timestamp}'")]
    MalformedTimestamp { timestamp: String },

    #[error("Missing elements in {tag}: expected at least {expected}, got {found}")]
    MissingElements {
        tag: String,
        expected: usize,
        found: usize,
    },

    #[error("Missing element {position}:{component} in {tag}")]
    MissingElement {
        tag: String,
        position: usize,
        component: usize,
    },

    #[error("Envelope error: {0}")]
    Envelope(String),

    #[error("Element {position} of {tag} is nested deeper than a composite")]
    UnsupportedNesting { tag: String, position: usize },

    #[error("Invalid date/time '{value}': {source}")]
    InvalidDateTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error(transparent)]
    Ir(#[from] edi_ir::Error),

    #[error(transparent)]
    Schema(#[from] edi_schema::Error),
}

impl Error {
    /// True for envelope syntax errors (timestamp and element presence checks)
    #[must_use]
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedTimestamp { .. }
                | Error::MissingElements { .. }
                | Error::MissingElement { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
