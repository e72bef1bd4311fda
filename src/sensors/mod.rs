//! Per-category channel models.
//!
//! Each model turns a raw wire value into the value reported to the hub:
//! derived quantities first, then unit conversion for the configured unit
//! system, then rounding to the category's precision. Models own whatever
//! cross-record state their category needs (the pressure trend window and
//! the rain accumulation counters).

pub mod humidity;
pub mod light;
pub mod lightning;
pub mod precipitation;
pub mod pressure;
pub mod temperature;
pub mod wind;

pub use humidity::HumidityModel;
pub use light::LightModel;
pub use lightning::LightningModel;
pub use precipitation::{AccumulationCounters, Period, PrecipitationModel};
pub use pressure::{PressureModel, TrendWindow};
pub use temperature::TemperatureModel;
pub use wind::WindModel;

use crate::hub::Hub;
use crate::models::{Category, UnitSystem};

/// Secondary inputs taken from the same record, in native units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Observation {
    /// Relative humidity in percent.
    pub humidity: Option<f64>,
    /// Wind speed in km/h.
    pub wind_speed_kph: Option<f64>,
}

/// Conversion and derived-value logic for one sensor category.
pub trait ChannelModel: Send {
    fn category(&self) -> Category;

    /// Derive, convert and round a raw value for `channel_id`.
    fn convert(&mut self, channel_id: &str, raw: f64, obs: &Observation, units: UnitSystem)
        -> f64;

    /// Convert a raw value and report it to the hub. Returns the reported value.
    fn publish(
        &mut self,
        hub: &dyn Hub,
        channel_id: &str,
        raw: f64,
        obs: &Observation,
        units: UnitSystem,
    ) -> f64 {
        let value = self.convert(channel_id, raw, obs, units);
        hub.report_channel_value(self.category(), channel_id, value);
        value
    }
}

/// One model per category, owned by the engine for the life of the process.
pub struct SensorModels {
    pub temperature: TemperatureModel,
    pub humidity: HumidityModel,
    pub pressure: PressureModel,
    pub wind: WindModel,
    pub precipitation: PrecipitationModel,
    pub light: LightModel,
    pub lightning: LightningModel,
}

impl SensorModels {
    pub fn new(elevation: f64) -> Self {
        Self {
            temperature: TemperatureModel,
            humidity: HumidityModel,
            pressure: PressureModel::new(elevation),
            wind: WindModel,
            precipitation: PrecipitationModel::default(),
            light: LightModel,
            lightning: LightningModel,
        }
    }

    pub fn model_mut(&mut self, category: Category) -> &mut dyn ChannelModel {
        match category {
            Category::Temperature => &mut self.temperature,
            Category::Humidity => &mut self.humidity,
            Category::Pressure => &mut self.pressure,
            Category::Wind => &mut self.wind,
            Category::Precipitation => &mut self.precipitation,
            Category::Light => &mut self.light,
            Category::Lightning => &mut self.lightning,
        }
    }
}

impl Default for SensorModels {
    fn default() -> Self {
        Self::new(0.0)
    }
}
