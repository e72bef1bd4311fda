/// Permitted channel ids per category and the unit each one is published in
use crate::models::{Category, UnitSystem, ValueKind};
use crate::units::UnitClass;

/// A channel id a category accepts in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelDef {
    pub id: &'static str,
    pub kind: ValueKind,
}

const fn float(id: &'static str) -> ChannelDef {
    ChannelDef {
        id,
        kind: ValueKind::Float,
    }
}

const fn integer(id: &'static str) -> ChannelDef {
    ChannelDef {
        id,
        kind: ValueKind::Integer,
    }
}

const TEMPERATURE: &[ChannelDef] = &[
    float("main"),
    float("apparent"),
    float("dewpoint"),
    float("heatindex"),
    float("windchill"),
];

const HUMIDITY: &[ChannelDef] = &[integer("main")];

const PRESSURE: &[ChannelDef] = &[float("station"), float("sealevel"), float("trend")];

const WIND: &[ChannelDef] = &[
    float("windspeed"),
    integer("winddir"),
    float("gustspeed"),
    integer("gustdir"),
    float("lullspeed"),
];

const PRECIPITATION: &[ChannelDef] = &[
    float("rate"),
    float("hourly"),
    float("daily"),
    float("weekly"),
    float("monthly"),
    float("yearly"),
];

const LIGHT: &[ChannelDef] = &[float("uv"), float("radiation"), float("lux")];

const LIGHTNING: &[ChannelDef] = &[integer("strikes"), float("distance")];

/// Fixed dictionary of channel ids for a category, in publication order.
pub fn dictionary(category: Category) -> &'static [ChannelDef] {
    match category {
        Category::Temperature => TEMPERATURE,
        Category::Humidity => HUMIDITY,
        Category::Pressure => PRESSURE,
        Category::Wind => WIND,
        Category::Precipitation => PRECIPITATION,
        Category::Light => LIGHT,
        Category::Lightning => LIGHTNING,
    }
}

/// Position of a channel id within its category dictionary.
pub fn lookup(category: Category, channel_id: &str) -> Option<(usize, ChannelDef)> {
    dictionary(category)
        .iter()
        .enumerate()
        .find(|(_, def)| def.id == channel_id)
        .map(|(pos, def)| (pos, *def))
}

/// Wind channels carrying a speed, as opposed to a bearing.
pub fn is_speed_channel(channel_id: &str) -> bool {
    channel_id.contains("speed")
}

/// Unit a channel is published in. Pure function of its inputs.
pub fn unit_class(category: Category, channel_id: &str, units: UnitSystem) -> UnitClass {
    match category {
        Category::Temperature => match units {
            UnitSystem::Us => UnitClass::TempF,
            UnitSystem::Metric | UnitSystem::Uk => UnitClass::TempC,
        },
        Category::Humidity => UnitClass::Humidity,
        Category::Pressure => match (channel_id, units) {
            ("trend", _) => UnitClass::Trend,
            (_, UnitSystem::Us) => UnitClass::InHg,
            (_, _) => UnitClass::Millibar,
        },
        Category::Wind if is_speed_channel(channel_id) => match units {
            UnitSystem::Metric => UnitClass::Kph,
            UnitSystem::Us | UnitSystem::Uk => UnitClass::Mph,
        },
        Category::Wind => UnitClass::Degree,
        Category::Precipitation => match (channel_id == "rate", units) {
            (true, UnitSystem::Us) => UnitClass::InPerHour,
            (true, _) => UnitClass::MmPerHour,
            (false, UnitSystem::Us) => UnitClass::Inches,
            (false, _) => UnitClass::Mm,
        },
        Category::Light => match channel_id {
            "uv" => UnitClass::Uv,
            "radiation" => UnitClass::Radiation,
            _ => UnitClass::Lux,
        },
        Category::Lightning => match (channel_id, units) {
            ("strikes", _) => UnitClass::Strikes,
            (_, UnitSystem::Metric) => UnitClass::Km,
            (_, _) => UnitClass::Mile,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressure_units() {
        assert_eq!(
            unit_class(Category::Pressure, "trend", UnitSystem::Us),
            UnitClass::Trend
        );
        assert_eq!(
            unit_class(Category::Pressure, "trend", UnitSystem::Metric),
            UnitClass::Trend
        );
        assert_eq!(
            unit_class(Category::Pressure, "sealevel", UnitSystem::Us),
            UnitClass::InHg
        );
        assert_eq!(
            unit_class(Category::Pressure, "station", UnitSystem::Uk),
            UnitClass::Millibar
        );
    }

    #[test]
    fn test_wind_units() {
        assert_eq!(
            unit_class(Category::Wind, "windspeed", UnitSystem::Metric),
            UnitClass::Kph
        );
        assert_eq!(
            unit_class(Category::Wind, "gustspeed", UnitSystem::Uk),
            UnitClass::Mph
        );
        assert_eq!(
            unit_class(Category::Wind, "winddir", UnitSystem::Us),
            UnitClass::Degree
        );
    }

    #[test]
    fn test_precipitation_units() {
        assert_eq!(
            unit_class(Category::Precipitation, "rate", UnitSystem::Us),
            UnitClass::InPerHour
        );
        assert_eq!(
            unit_class(Category::Precipitation, "daily", UnitSystem::Us),
            UnitClass::Inches
        );
        assert_eq!(
            unit_class(Category::Precipitation, "rate", UnitSystem::Uk),
            UnitClass::MmPerHour
        );
        assert_eq!(
            unit_class(Category::Precipitation, "yearly", UnitSystem::Metric),
            UnitClass::Mm
        );
    }

    #[test]
    fn test_lightning_and_light_units() {
        assert_eq!(
            unit_class(Category::Lightning, "distance", UnitSystem::Uk),
            UnitClass::Mile
        );
        assert_eq!(
            unit_class(Category::Lightning, "strikes", UnitSystem::Us),
            UnitClass::Strikes
        );
        assert_eq!(
            unit_class(Category::Light, "radiation", UnitSystem::Us),
            UnitClass::Radiation
        );
    }

    #[test]
    fn test_dictionary_lookup() {
        assert_eq!(lookup(Category::Precipitation, "weekly").map(|(p, _)| p), Some(3));
        assert_eq!(
            lookup(Category::Humidity, "main").map(|(_, d)| d.kind),
            Some(ValueKind::Integer)
        );
        assert!(lookup(Category::Precipitation, "fortnightly").is_none());
    }
}
