/// Barometric pressure, sea level reduction and short-term trend
use std::collections::VecDeque;

use log::warn;

use super::{ChannelModel, Observation};
use crate::error::DerivedValueDomainError;
use crate::models::{Category, UnitSystem};
use crate::units::mb_to_inhg;
use crate::utils::round_to;

const PRECISION: u32 = 3;

// Standard atmosphere
const LAPSE_RATE: f64 = 0.0065; // K/m
const GRAVITY: f64 = 9.80665; // m/s²
const GAS_CONSTANT: f64 = 287.05; // J/(kg·K)
const SEA_LEVEL_MB: f64 = 1013.25;
const REFERENCE_TEMP_K: f64 = 288.15;

/// Number of past readings kept for trend classification.
pub const TREND_WINDOW_LEN: usize = 180;

/// Change (in millibar) that must be exceeded before a trend is reported.
pub const TREND_THRESHOLD_MB: f64 = 1.0;

/// Reduce station pressure (mb) to sea level for an elevation in metres
pub fn sea_level_pressure(station: f64, elevation: f64) -> Result<f64, DerivedValueDomainError> {
    if station <= 0.0 || !station.is_finite() {
        return Err(DerivedValueDomainError::NonPositivePressure(station));
    }
    let c = GAS_CONSTANT * LAPSE_RATE / GRAVITY;
    let factor = (1.0 + (SEA_LEVEL_MB / station).powf(c) * (LAPSE_RATE * elevation / REFERENCE_TEMP_K))
        .powf(1.0 / c);
    Ok(round_to(station * factor, 3))
}

/// Bounded history of pressure readings, newest first.
#[derive(Debug, Clone, Default)]
pub struct TrendWindow {
    samples: VecDeque<f64>,
}

impl TrendWindow {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(TREND_WINDOW_LEN),
        }
    }

    /// Classify `current` against the oldest retained reading and record it
    ///
    /// # Returns
    /// 1 when rising, -1 when falling, 0 when steady or no history exists
    pub fn update(&mut self, current: f64) -> i8 {
        let trend = match self.samples.back() {
            Some(past) if past - current > TREND_THRESHOLD_MB => -1,
            Some(past) if past - current < -TREND_THRESHOLD_MB => 1,
            _ => 0,
        };

        if self.samples.len() == TREND_WINDOW_LEN {
            self.samples.pop_back();
        }
        self.samples.push_front(current);
        trend
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct PressureModel {
    elevation: f64,
    trend: TrendWindow,
}

impl PressureModel {
    pub fn new(elevation: f64) -> Self {
        Self {
            elevation,
            trend: TrendWindow::new(),
        }
    }

    pub fn set_elevation(&mut self, elevation: f64) {
        self.elevation = elevation;
    }

    pub fn trend_window(&self) -> &TrendWindow {
        &self.trend
    }
}

impl ChannelModel for PressureModel {
    fn category(&self) -> Category {
        Category::Pressure
    }

    fn convert(&mut self, channel_id: &str, raw: f64, _obs: &Observation, units: UnitSystem) -> f64 {
        let millibar = match channel_id {
            // Dimensionless, never converted
            "trend" => return f64::from(self.trend.update(raw)),
            "sealevel" => sea_level_pressure(raw, self.elevation).unwrap_or_else(|e| {
                warn!("pressure-sealevel: {}; publishing station pressure", e);
                raw
            }),
            _ => raw,
        };

        let value = match units {
            UnitSystem::Us => mb_to_inhg(millibar),
            UnitSystem::Metric | UnitSystem::Uk => millibar,
        };
        round_to(value, PRECISION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_rises_over_full_window() {
        let mut window = TrendWindow::new();
        let mut last = 0;
        for i in 0..181 {
            last = window.update(1000.0 + i as f64);
            assert!(window.len() <= TREND_WINDOW_LEN);
        }
        assert_eq!(last, 1);
        assert_eq!(window.len(), TREND_WINDOW_LEN);
    }

    #[test]
    fn test_trend_compares_against_oldest_sample() {
        let mut window = TrendWindow::new();
        assert_eq!(window.update(1010.0), 0);
        assert_eq!(window.update(1010.6), 0);
        // 1.2 above the oldest sample, though only 0.6 above the newest
        assert_eq!(window.update(1011.2), 1);
        assert_eq!(window.update(1008.5), -1);
        assert_eq!(window.update(1010.5), 0);
    }

    #[test]
    fn test_trend_window_is_bounded() {
        let mut window = TrendWindow::new();
        for _ in 0..500 {
            window.update(1013.0);
        }
        assert_eq!(window.len(), TREND_WINDOW_LEN);
    }

    #[test]
    fn test_sea_level_pressure() {
        assert_eq!(sea_level_pressure(1000.0, 0.0), Ok(1000.0));
        let reduced = sea_level_pressure(1000.0, 100.0).unwrap();
        assert!(reduced > 1011.0 && reduced < 1013.0, "got {}", reduced);
        assert!(sea_level_pressure(0.0, 100.0).is_err());
    }

    #[test]
    fn test_convert_units() {
        let mut model = PressureModel::new(0.0);
        let obs = Observation::default();
        assert_eq!(model.convert("station", 1013.25, &obs, UnitSystem::Us), 29.921);
        assert_eq!(model.convert("station", 1013.25, &obs, UnitSystem::Uk), 1013.25);
        assert_eq!(model.convert("sealevel", 1013.25, &obs, UnitSystem::Metric), 1013.25);
    }

    #[test]
    fn test_trend_channel_feeds_window() {
        let mut model = PressureModel::new(0.0);
        let obs = Observation::default();
        assert_eq!(model.convert("trend", 1000.0, &obs, UnitSystem::Us), 0.0);
        assert_eq!(model.convert("trend", 1002.0, &obs, UnitSystem::Us), 1.0);
        assert_eq!(model.trend_window().len(), 2);
    }
}
