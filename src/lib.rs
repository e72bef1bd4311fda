//! Bridge between a WeatherDisplay UDP broadcast and a home automation hub.
//!
//! Raw positional records are mapped to named channels through a runtime
//! configuration, converted to the chosen unit system, enriched with derived
//! quantities and reported to a [`hub::Hub`].

pub mod config;
pub mod engine;
pub mod error;
pub mod hub;
pub mod ingest;
pub mod mapping;
pub mod models;
pub mod sensors;
pub mod units;
pub mod utils;

pub use engine::{DispatchSummary, Engine};
pub use error::{
    ConfigurationError, DerivedValueDomainError, RecordError, SchemaPublicationError,
    TransportError,
};
pub use models::{Category, CategoryMap, ChannelSpec, MappingSet, RawConfig, RawRecord, UnitSystem};
