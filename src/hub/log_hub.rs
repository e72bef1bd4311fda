/// Hub implementation that writes everything to the log
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info, warn};

use super::Hub;
use crate::error::SchemaPublicationError;
use crate::models::{Category, Schema};

/// Used by the standalone binary, where no hub is attached.
#[derive(Debug, Default)]
pub struct LogHub {
    reports: AtomicU64,
}

impl LogHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of channel values reported so far.
    pub fn reports(&self) -> u64 {
        self.reports.load(Ordering::Relaxed)
    }
}

impl Hub for LogHub {
    fn report_channel_value(&self, category: Category, channel_id: &str, value: f64) {
        let n = self.reports.fetch_add(1, Ordering::Relaxed) + 1;
        if n == 1 {
            info!("First value reported: {}-{} = {}", category, channel_id, value);
        } else {
            debug!("{}-{} = {}", category, channel_id, value);
        }
    }

    fn publish_schema(&self, schema: &Schema) -> Result<(), SchemaPublicationError> {
        if schema.categories.is_empty() {
            return Err(SchemaPublicationError::Generation(
                "no categories to describe".to_string(),
            ));
        }
        for category in &schema.categories {
            let channels = category
                .channels
                .iter()
                .map(|c| format!("{}({})", c.channel_id, c.unit_code))
                .collect::<Vec<_>>()
                .join(", ");
            info!("Schema {}: {}", category.name, channels);
        }
        Ok(())
    }

    fn install_schema(&self) -> Result<(), SchemaPublicationError> {
        debug!("Schema install requested");
        Ok(())
    }

    fn retire_category(&self, category: Category) {
        info!("Retiring channel group {}", category);
    }

    fn notify_user(&self, message: &str) {
        warn!("Notice: {}", message);
    }
}
