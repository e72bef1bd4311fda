//! Unit table and the conversion factors applied before publishing.

const MB_TO_INHG: f64 = 0.02952998751;
const KM_PER_MILE: f64 = 1.609344;
const MM_TO_INCHES: f64 = 0.03937;

/// Semantic unit attached to a channel. Maps to the hub's numeric unit code
/// only at the report boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitClass {
    TempC,
    TempF,
    Humidity,
    Millibar,
    InHg,
    Trend,
    Kph,
    Mph,
    Degree,
    MmPerHour,
    InPerHour,
    Mm,
    Inches,
    Uv,
    Lux,
    Radiation,
    Strikes,
    Km,
    Mile,
}

impl UnitClass {
    /// External unit code declared to the schema generator.
    pub fn code(self) -> u16 {
        match self {
            UnitClass::TempC => 4,
            UnitClass::TempF => 17,
            UnitClass::Humidity => 51,
            UnitClass::Millibar => 117,
            UnitClass::InHg => 23,
            UnitClass::Trend => 25,
            UnitClass::Kph => 32,
            UnitClass::Mph => 48,
            UnitClass::Degree => 14,
            UnitClass::MmPerHour => 46,
            UnitClass::InPerHour => 24,
            UnitClass::Mm => 82,
            UnitClass::Inches => 105,
            UnitClass::Uv => 71,
            UnitClass::Lux => 36,
            UnitClass::Radiation => 74,
            UnitClass::Strikes => 56,
            UnitClass::Km => 83,
            UnitClass::Mile => 116,
        }
    }
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 1.8 + 32.0
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) / 1.8
}

pub fn mb_to_inhg(mb: f64) -> f64 {
    mb * MB_TO_INHG
}

pub fn inhg_to_mb(inhg: f64) -> f64 {
    inhg / MB_TO_INHG
}

pub fn kph_to_mph(kph: f64) -> f64 {
    kph / KM_PER_MILE
}

pub fn mph_to_kph(mph: f64) -> f64 {
    mph * KM_PER_MILE
}

pub fn kph_to_ms(kph: f64) -> f64 {
    kph / 3.6
}

pub fn km_to_miles(km: f64) -> f64 {
    km / KM_PER_MILE
}

pub fn miles_to_km(miles: f64) -> f64 {
    miles * KM_PER_MILE
}

pub fn mm_to_inches(mm: f64) -> f64 {
    mm * MM_TO_INCHES
}

pub fn inches_to_mm(inches: f64) -> f64 {
    inches / MM_TO_INCHES
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::round_to;

    #[test]
    fn test_unit_codes() {
        assert_eq!(UnitClass::TempC.code(), 4);
        assert_eq!(UnitClass::TempF.code(), 17);
        assert_eq!(UnitClass::Millibar.code(), 117);
        assert_eq!(UnitClass::InHg.code(), 23);
        assert_eq!(UnitClass::Mph.code(), 48);
        assert_eq!(UnitClass::Inches.code(), 105);
        assert_eq!(UnitClass::Mile.code(), 116);
    }

    #[test]
    fn test_temperature_round_trip() {
        for c in [-40.0, -12.3, 0.0, 20.0, 37.5] {
            let back = round_to(fahrenheit_to_celsius(celsius_to_fahrenheit(c)), 1);
            assert!((back - c).abs() < 0.01, "{} -> {}", c, back);
        }
        assert_eq!(round_to(celsius_to_fahrenheit(20.0), 1), 68.0);
    }

    #[test]
    fn test_pressure_round_trip() {
        for mb in [950.0, 1013.25, 1040.125] {
            let back = inhg_to_mb(mb_to_inhg(mb));
            assert!((back - mb).abs() < 0.001, "{} -> {}", mb, back);
        }
    }

    #[test]
    fn test_speed_distance_and_rain_round_trip() {
        for v in [0.0, 3.7, 25.0, 112.4] {
            assert!((mph_to_kph(kph_to_mph(v)) - v).abs() < 0.01);
            assert!((miles_to_km(km_to_miles(v)) - v).abs() < 0.01);
            assert!((inches_to_mm(mm_to_inches(v)) - v).abs() < 0.01);
        }
    }

    #[test]
    fn test_kph_to_ms() {
        assert!((kph_to_ms(36.0) - 10.0).abs() < 1e-9);
    }
}
