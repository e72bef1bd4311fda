//! Test double that records every hub call.

use std::sync::Mutex;

use super::Hub;
use crate::error::SchemaPublicationError;
use crate::models::{Category, Schema};

#[derive(Debug, Default)]
pub struct RecordingHub {
    pub reports: Mutex<Vec<(Category, String, f64)>>,
    pub schemas: Mutex<Vec<Schema>>,
    pub installs: Mutex<usize>,
    pub retired: Mutex<Vec<Category>>,
    pub notices: Mutex<Vec<String>>,
    pub fail_schema: bool,
}

impl RecordingHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_schema() -> Self {
        Self {
            fail_schema: true,
            ..Self::default()
        }
    }

    pub fn reports(&self) -> Vec<(Category, String, f64)> {
        self.reports.lock().unwrap().clone()
    }

    pub fn retired(&self) -> Vec<Category> {
        self.retired.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    pub fn value_of(&self, category: Category, channel_id: &str) -> Option<f64> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(c, id, _)| *c == category && id == channel_id)
            .map(|(_, _, v)| *v)
    }
}

impl Hub for RecordingHub {
    fn report_channel_value(&self, category: Category, channel_id: &str, value: f64) {
        self.reports
            .lock()
            .unwrap()
            .push((category, channel_id.to_string(), value));
    }

    fn publish_schema(&self, schema: &Schema) -> Result<(), SchemaPublicationError> {
        self.schemas.lock().unwrap().push(schema.clone());
        if self.fail_schema {
            return Err(SchemaPublicationError::Generation("profile write failed".to_string()));
        }
        Ok(())
    }

    fn install_schema(&self) -> Result<(), SchemaPublicationError> {
        *self.installs.lock().unwrap() += 1;
        Ok(())
    }

    fn retire_category(&self, category: Category) {
        self.retired.lock().unwrap().push(category);
    }

    fn notify_user(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }
}
