/// Error taxonomy for configuration, decoding, derivation and transport
use std::net::SocketAddr;

use thiserror::Error;

use crate::models::Category;

/// Malformed or unrecognized configuration. Fatal to a rebuild; the
/// previously active mapping set stays in place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("unknown sensor category in key '{key}'")]
    UnknownCategory { key: String },

    #[error("unknown channel id in key '{key}'")]
    UnknownChannel { key: String },

    #[error("channel configured twice by key '{key}'")]
    DuplicateChannel { key: String },

    #[error("field index for '{key}' must be a non-negative integer, got '{value}'")]
    InvalidFieldIndex { key: String, value: String },

    #[error("unsupported unit system '{0}' (expected metric, us or uk)")]
    InvalidUnits(String),

    #[error("invalid UDPPort '{0}'")]
    InvalidPort(String),

    #[error("invalid IPAddress '{0}'")]
    InvalidAddress(String),

    #[error("invalid Elevation '{0}'")]
    InvalidElevation(String),
}

/// Failure handing the resolved schema to the hub. Recoverable: ingestion
/// keeps running with the new mappings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaPublicationError {
    #[error("schema generation failed: {0}")]
    Generation(String),

    #[error("schema install failed: {0}")]
    Install(String),
}

/// Per-record and per-channel decoding failures. None of these stop the
/// receive loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("record is not valid text: {0}")]
    Malformed(#[from] std::str::Utf8Error),

    #[error("{category}-{channel}: field index {index} out of range for record of {len} fields")]
    FieldIndexOutOfRange {
        category: Category,
        channel: String,
        index: usize,
        len: usize,
    },

    #[error("{category}-{channel}: field {index} value '{value}' is not numeric")]
    InvalidFieldValue {
        category: Category,
        channel: String,
        index: usize,
        value: String,
    },
}

/// A derived value could not be computed from its inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DerivedValueDomainError {
    #[error("dewpoint is undefined for humidity {0}")]
    NonPositiveHumidity(f64),

    #[error("{channel} needs {input}, which is not mapped or not present in this record")]
    MissingInput {
        channel: &'static str,
        input: &'static str,
    },

    #[error("sea level reduction is undefined for station pressure {0}")]
    NonPositivePressure(f64),
}

/// Network transport failures. Fatal at startup.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to bind UDP socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to join multicast group {group}: {source}")]
    JoinMulticast {
        group: std::net::Ipv4Addr,
        #[source]
        source: std::io::Error,
    },
}
