/// Lightning strike count and distance to the last strike
use super::{ChannelModel, Observation};
use crate::models::{Category, UnitSystem};
use crate::units::km_to_miles;
use crate::utils::round_to;

const PRECISION: u32 = 1;

#[derive(Debug, Default, Clone, Copy)]
pub struct LightningModel;

impl ChannelModel for LightningModel {
    fn category(&self) -> Category {
        Category::Lightning
    }

    fn convert(&mut self, channel_id: &str, raw: f64, _obs: &Observation, units: UnitSystem) -> f64 {
        if channel_id != "distance" {
            return raw;
        }
        let value = match units {
            UnitSystem::Metric => raw,
            UnitSystem::Us | UnitSystem::Uk => km_to_miles(raw),
        };
        round_to(value, PRECISION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_converted_outside_metric() {
        let mut model = LightningModel;
        let obs = Observation::default();
        assert_eq!(model.convert("distance", 16.09344, &obs, UnitSystem::Metric), 16.1);
        assert_eq!(model.convert("distance", 16.09344, &obs, UnitSystem::Uk), 10.0);
        assert_eq!(model.convert("distance", 16.09344, &obs, UnitSystem::Us), 10.0);
    }

    #[test]
    fn test_strikes_untouched() {
        let mut model = LightningModel;
        assert_eq!(
            model.convert("strikes", 12.0, &Observation::default(), UnitSystem::Us),
            12.0
        );
    }
}
