//! Network ingestion: receive loop, decimation and record decoding.

pub mod decoder;
pub mod receiver;

pub use decoder::decode_record;
pub use receiver::{Decimator, Ingestor, Lifecycle, Receiver, ReceiverStats, DEFAULT_DECIMATION};
