/// UV index, solar radiation and illuminance
use super::{ChannelModel, Observation};
use crate::models::{Category, UnitSystem};
use crate::utils::round_to;

const PRECISION: u32 = 1;

#[derive(Debug, Default, Clone, Copy)]
pub struct LightModel;

impl ChannelModel for LightModel {
    fn category(&self) -> Category {
        Category::Light
    }

    fn convert(&mut self, _channel_id: &str, raw: f64, _obs: &Observation, _units: UnitSystem) -> f64 {
        round_to(raw, PRECISION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_without_conversion() {
        let mut model = LightModel;
        let obs = Observation::default();
        assert_eq!(model.convert("uv", 3.46, &obs, UnitSystem::Us), 3.5);
        assert_eq!(model.convert("radiation", 812.0, &obs, UnitSystem::Uk), 812.0);
    }
}
