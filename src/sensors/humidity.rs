/// Relative humidity, published as-is in every unit system
use super::{ChannelModel, Observation};
use crate::models::{Category, UnitSystem};
use crate::utils::round_to;

const PRECISION: u32 = 1;

#[derive(Debug, Default, Clone, Copy)]
pub struct HumidityModel;

impl ChannelModel for HumidityModel {
    fn category(&self) -> Category {
        Category::Humidity
    }

    fn convert(&mut self, _channel_id: &str, raw: f64, _obs: &Observation, _units: UnitSystem) -> f64 {
        round_to(raw, PRECISION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_conversion_in_any_system() {
        let mut model = HumidityModel;
        for units in [UnitSystem::Metric, UnitSystem::Us, UnitSystem::Uk] {
            assert_eq!(model.convert("main", 57.0, &Observation::default(), units), 57.0);
        }
    }
}
