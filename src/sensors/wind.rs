/// Wind speeds and bearings
use super::{ChannelModel, Observation};
use crate::mapping::channels::is_speed_channel;
use crate::models::{Category, UnitSystem};
use crate::units::kph_to_mph;
use crate::utils::round_to;

const SPEED_PRECISION: u32 = 2;

#[derive(Debug, Default, Clone, Copy)]
pub struct WindModel;

impl ChannelModel for WindModel {
    fn category(&self) -> Category {
        Category::Wind
    }

    fn convert(&mut self, channel_id: &str, raw: f64, _obs: &Observation, units: UnitSystem) -> f64 {
        // Bearings are published in degrees whatever the unit system
        if !is_speed_channel(channel_id) {
            return raw;
        }
        let value = match units {
            UnitSystem::Metric => raw,
            UnitSystem::Us | UnitSystem::Uk => kph_to_mph(raw),
        };
        round_to(value, SPEED_PRECISION)
    }
}
