//! Shared ingestion state and the two paths that touch it.
//!
//! The configuration path rebuilds the mapping set and swaps it in; the
//! ingestion path dispatches decoded records through whichever set is active.
//! Both go through one mutex guarding the mappings and the channel models, so
//! a record is always dispatched against a single, complete mapping set.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error, info, warn};

use crate::error::{ConfigurationError, RecordError};
use crate::hub::Hub;
use crate::mapping::{build_mappings, StationSettings};
use crate::models::{Category, ChannelSpec, MappingSet, RawConfig, RawRecord};
use crate::sensors::{Observation, SensorModels};

/// Outcome of dispatching one record.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub published: usize,
    pub skipped: usize,
}

struct EngineState {
    mappings: MappingSet,
    settings: Option<StationSettings>,
    models: SensorModels,
    /// Channels already warned about since the last rebuild
    skip_warned: HashSet<(Category, String)>,
}

pub struct Engine {
    hub: Arc<dyn Hub>,
    state: Mutex<EngineState>,
}

impl Engine {
    /// Create an engine with no channels mapped.
    pub fn new(hub: Arc<dyn Hub>) -> Self {
        Self {
            hub,
            state: Mutex::new(EngineState {
                mappings: MappingSet::empty(Default::default()),
                settings: None,
                models: SensorModels::default(),
                skip_warned: HashSet::new(),
            }),
        }
    }

    /// Replace the models, e.g. to drive rain periods from a fixed clock.
    pub fn with_models(hub: Arc<dyn Hub>, models: SensorModels) -> Self {
        let engine = Self::new(hub);
        engine.lock().models = models;
        engine
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rebuild the mapping set from a raw configuration and make it active
    ///
    /// On error nothing changes and the previous mappings keep serving
    /// records. On success the new set replaces the old one in a single swap,
    /// categories left without channels are retired, and the schema is handed
    /// to the hub. A schema failure is logged and does not undo the swap.
    ///
    /// # Arguments
    /// * `raw` - Complete flat configuration, not a delta
    ///
    /// # Returns
    /// The station settings now in effect
    pub fn apply_config(&self, raw: &RawConfig) -> Result<StationSettings, ConfigurationError> {
        let settings = StationSettings::from_raw(raw).inspect_err(|e| {
            error!("Configuration rejected, keeping previous mappings: {}", e);
        })?;
        let mappings = build_mappings(raw, settings.units).inspect_err(|e| {
            error!("Configuration rejected, keeping previous mappings: {}", e);
        })?;
        let schema = mappings.schema();

        let (previous, retired) = {
            let mut state = self.lock();
            let first_load = state.settings.is_none();
            let retired: Vec<Category> = mappings
                .empty_categories()
                .into_iter()
                .filter(|c| {
                    first_load || state.mappings.get(*c).is_some_and(|m| !m.is_empty())
                })
                .collect();

            state.models.pressure.set_elevation(settings.elevation);
            state.mappings = mappings;
            state.skip_warned.clear();
            let previous = state.settings.replace(settings);
            (previous, retired)
        };

        info!(
            "Configuration applied: units {}, elevation {} m, {} categories retired",
            settings.units,
            settings.elevation,
            retired.len()
        );

        for category in retired {
            self.hub.retire_category(category);
        }

        if let Some(previous) = previous {
            if previous.transport != settings.transport {
                self.hub.notify_user(&format!(
                    "Listening address changed to {}; restart the bridge for it to take effect",
                    settings.transport.socket_addr()
                ));
            }
        }

        if let Err(e) = self
            .hub
            .publish_schema(&schema)
            .and_then(|_| self.hub.install_schema())
        {
            warn!("Schema publication failed, ingestion continues with new mappings: {}", e);
        }

        Ok(settings)
    }

    /// Publish every mapped channel of one record
    ///
    /// Channels whose field is missing or not numeric are logged and skipped;
    /// the rest of the record is still published. Within a category, channels
    /// are published in mapping order.
    pub fn dispatch(&self, record: &RawRecord) -> DispatchSummary {
        let mut guard = self.lock();
        let state = &mut *guard;
        let obs = observation(&state.mappings, record);
        let mut summary = DispatchSummary::default();

        for map in state.mappings.categories.iter().filter(|m| !m.is_empty()) {
            let model = state.models.model_mut(map.category);
            for spec in &map.channels {
                match read_channel(map.category, spec, record) {
                    Ok(raw) => {
                        model.publish(
                            self.hub.as_ref(),
                            &spec.channel_id,
                            raw,
                            &obs,
                            map.unit_system,
                        );
                        summary.published += 1;
                    }
                    Err(e) => {
                        // Warn once per channel until the mapping is rebuilt
                        if state.skip_warned.insert((map.category, spec.channel_id.clone())) {
                            warn!("Skipping channel: {}", e);
                        } else {
                            debug!("Skipping channel: {}", e);
                        }
                        summary.skipped += 1;
                    }
                }
            }
        }

        summary
    }

    /// Snapshot of the active mapping set.
    pub fn mappings(&self) -> MappingSet {
        self.lock().mappings.clone()
    }

    /// Settings from the last successful configuration, if any.
    pub fn settings(&self) -> Option<StationSettings> {
        self.lock().settings
    }
}

/// Read and parse the field a channel is mapped to.
fn read_channel(category: Category, spec: &ChannelSpec, record: &RawRecord) -> Result<f64, RecordError> {
    let field = record
        .get(spec.source_field_index)
        .ok_or_else(|| RecordError::FieldIndexOutOfRange {
            category,
            channel: spec.channel_id.clone(),
            index: spec.source_field_index,
            len: record.len(),
        })?;

    spec.kind
        .parse(field)
        .ok_or_else(|| RecordError::InvalidFieldValue {
            category,
            channel: spec.channel_id.clone(),
            index: spec.source_field_index,
            value: field.to_string(),
        })
}

/// Collect the secondary inputs derived channels need from this record.
fn observation(mappings: &MappingSet, record: &RawRecord) -> Observation {
    let lookup = |category, channel_id| {
        mappings
            .channel(category, channel_id)
            .and_then(|spec| read_channel(category, spec, record).ok())
    };

    Observation {
        humidity: lookup(Category::Humidity, "main"),
        wind_speed_kph: lookup(Category::Wind, "windspeed"),
    }
}
