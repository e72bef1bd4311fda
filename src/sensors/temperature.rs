/// Temperature channels and the comfort indices derived from them
use log::warn;

use super::{ChannelModel, Observation};
use crate::error::DerivedValueDomainError;
use crate::models::{Category, UnitSystem};
use crate::units::{celsius_to_fahrenheit, fahrenheit_to_celsius, kph_to_ms};
use crate::utils::round_to;

const PRECISION: u32 = 1;

/// Dewpoint from temperature (°C) and relative humidity (%)
///
/// Magnus formula approximation. Undefined for humidity ≤ 0.
pub fn dewpoint(t: f64, h: f64) -> Result<f64, DerivedValueDomainError> {
    if h <= 0.0 || !h.is_finite() {
        return Err(DerivedValueDomainError::NonPositiveHumidity(h));
    }
    let b = (17.625 * t) / (243.04 + t);
    let c = (h / 100.0).ln();
    let dewpt = (243.04 * (c + b)) / (17.625 - c - b);
    Ok(round_to(dewpt, 1))
}

/// Apparent ("feels like") temperature from °C, wind speed in m/s and
/// relative humidity in %.
pub fn apparent_temp(t: f64, ws: f64, h: f64) -> f64 {
    let wv = h / 100.0 * 6.105 * (17.27 * t / (237.7 + t)).exp();
    let at = t + (0.33 * wv) - (0.70 * ws) - 4.0;
    round_to(at, 1)
}

/// NWS wind chill from °C and wind speed in m/s
///
/// Returns `t` unchanged outside the formula's validity range
/// (above 50 °F or below 5 mph).
pub fn windchill(t: f64, ws: f64) -> f64 {
    let tf = celsius_to_fahrenheit(t);
    let mph = ws / 0.44704;

    if tf > 50.0 || mph < 5.0 {
        return t;
    }

    let v = mph.powf(0.16);
    let wc = 35.74 + (0.6215 * tf) - (35.75 * v) + (0.4275 * tf * v);
    round_to(fahrenheit_to_celsius(wc), 1)
}

/// Rothfusz heat index from °C and relative humidity in %
///
/// Returns `t` unchanged below 80 °F or 40 % humidity.
pub fn heatindex(t: f64, h: f64) -> f64 {
    let tf = celsius_to_fahrenheit(t);
    if tf < 80.0 || h < 40.0 {
        return t;
    }

    let c1 = -42.379;
    let c2 = 2.04901523;
    let c3 = 10.1433127;
    let c4 = -0.22475541;
    let c5 = -6.83783e-3;
    let c6 = -5.481717e-2;
    let c7 = 1.22874e-3;
    let c8 = 8.5282e-4;
    let c9 = -1.99e-6;

    let hi = c1
        + (c2 * tf)
        + (c3 * h)
        + (c4 * tf * h)
        + (c5 * tf * tf)
        + (c6 * h * h)
        + (c7 * tf * tf * h)
        + (c8 * tf * h * h)
        + (c9 * tf * tf * h * h);

    round_to(fahrenheit_to_celsius(hi), 1)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TemperatureModel;

impl TemperatureModel {
    fn derive(&self, channel_id: &str, t: f64, obs: &Observation) -> Result<f64, DerivedValueDomainError> {
        let humidity = |channel| {
            obs.humidity.ok_or(DerivedValueDomainError::MissingInput {
                channel,
                input: "humidity-main",
            })
        };
        let wind_ms = |channel| {
            obs.wind_speed_kph
                .map(kph_to_ms)
                .ok_or(DerivedValueDomainError::MissingInput {
                    channel,
                    input: "wind-windspeed",
                })
        };

        match channel_id {
            "apparent" => Ok(apparent_temp(t, wind_ms("apparent")?, humidity("apparent")?)),
            "dewpoint" => dewpoint(t, humidity("dewpoint")?),
            "heatindex" => Ok(heatindex(t, humidity("heatindex")?)),
            "windchill" => Ok(windchill(t, wind_ms("windchill")?)),
            _ => Ok(t),
        }
    }
}

impl ChannelModel for TemperatureModel {
    fn category(&self) -> Category {
        Category::Temperature
    }

    fn convert(&mut self, channel_id: &str, raw: f64, obs: &Observation, units: UnitSystem) -> f64 {
        let celsius = self.derive(channel_id, raw, obs).unwrap_or_else(|e| {
            warn!("temperature-{}: {}; publishing input temperature", channel_id, e);
            raw
        });

        let value = match units {
            UnitSystem::Us => celsius_to_fahrenheit(celsius),
            UnitSystem::Metric | UnitSystem::Uk => celsius,
        };
        round_to(value, PRECISION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(humidity: Option<f64>, wind_speed_kph: Option<f64>) -> Observation {
        Observation {
            humidity,
            wind_speed_kph,
        }
    }

    #[test]
    fn test_dewpoint() {
        assert_eq!(dewpoint(20.0, 50.0), Ok(9.3));
        assert_eq!(dewpoint(20.0, 100.0), Ok(20.0));
        assert_eq!(
            dewpoint(20.0, 0.0),
            Err(DerivedValueDomainError::NonPositiveHumidity(0.0))
        );
    }

    #[test]
    fn test_apparent_temp() {
        assert_eq!(apparent_temp(25.0, 0.0, 50.0), 26.2);
        assert!(apparent_temp(25.0, 10.0, 50.0) < 26.2);
    }

    #[test]
    fn test_windchill() {
        let wc = windchill(-10.0, 20.0 / 3.6);
        assert!((wc - (-17.8)).abs() <= 0.2, "windchill was {}", wc);
        // Too warm
        assert_eq!(windchill(20.0, 10.0), 20.0);
        // Too calm
        assert_eq!(windchill(-10.0, 1.0), -10.0);
    }

    #[test]
    fn test_heatindex() {
        assert_eq!(heatindex(26.0, 30.0), 26.0);
        assert_eq!(heatindex(35.0, 30.0), 35.0);
        assert!(heatindex(35.0, 70.0) >= 35.0);
    }

    #[test]
    fn test_convert_us_and_uk() {
        let mut model = TemperatureModel;
        assert_eq!(model.convert("main", 20.0, &obs(None, None), UnitSystem::Us), 68.0);
        assert_eq!(model.convert("main", 20.04, &obs(None, None), UnitSystem::Uk), 20.0);
        assert_eq!(model.convert("main", -3.0, &obs(None, None), UnitSystem::Metric), -3.0);
    }

    #[test]
    fn test_derived_channels_use_record_inputs() {
        let mut model = TemperatureModel;
        let o = obs(Some(50.0), Some(0.0));
        assert_eq!(model.convert("dewpoint", 20.0, &o, UnitSystem::Metric), 9.3);
        assert_eq!(model.convert("apparent", 25.0, &o, UnitSystem::Metric), 26.2);
        assert_eq!(model.convert("windchill", 20.0, &o, UnitSystem::Metric), 20.0);
    }

    #[test]
    fn test_missing_or_invalid_inputs_fall_back_to_temperature() {
        let mut model = TemperatureModel;
        assert_eq!(
            model.convert("dewpoint", 18.5, &obs(None, None), UnitSystem::Metric),
            18.5
        );
        assert_eq!(
            model.convert("dewpoint", 18.5, &obs(Some(0.0), None), UnitSystem::Metric),
            18.5
        );
        assert_eq!(
            model.convert("apparent", 18.5, &obs(Some(40.0), None), UnitSystem::Metric),
            18.5
        );
    }
}
