//! Boundary to the home automation hub that consumes published channels.
//!
//! The engine never talks to the hub's transport directly; it only needs a
//! place to report values, hand over a schema and retire channel groups.

pub mod log_hub;
#[cfg(test)]
pub mod recording;

pub use log_hub::LogHub;

use crate::error::SchemaPublicationError;
use crate::models::{Category, Schema};

/// External collaborator receiving everything the engine publishes.
///
/// Implementations are called while the engine holds its state lock and must
/// not call back into the engine.
pub trait Hub: Send + Sync {
    /// Report the converted value of one channel.
    fn report_channel_value(&self, category: Category, channel_id: &str, value: f64);

    /// Generate the hub's channel descriptors from the resolved schema.
    fn publish_schema(&self, schema: &Schema) -> Result<(), SchemaPublicationError>;

    /// Push the generated descriptors to the hub.
    fn install_schema(&self) -> Result<(), SchemaPublicationError>;

    /// Tear down a category whose channel list became empty.
    fn retire_category(&self, category: Category);

    /// Show a notice to the user.
    fn notify_user(&self, message: &str);
}
