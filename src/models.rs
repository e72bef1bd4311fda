use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::error::ConfigurationError;
use crate::units::UnitClass;

/// Flat key/value configuration as handed over by the hub.
pub type RawConfig = HashMap<String, String>;

/// Logical sensor group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Temperature,
    Humidity,
    Pressure,
    Wind,
    Precipitation,
    Light,
    Lightning,
}

impl Category {
    /// All categories in publication order.
    pub const ALL: [Category; 7] = [
        Category::Temperature,
        Category::Humidity,
        Category::Pressure,
        Category::Wind,
        Category::Precipitation,
        Category::Light,
        Category::Lightning,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Temperature => "temperature",
            Category::Humidity => "humidity",
            Category::Pressure => "pressure",
            Category::Wind => "wind",
            Category::Precipitation => "precipitation",
            Category::Light => "light",
            Category::Lightning => "lightning",
        }
    }

    /// Resolve a configuration key prefix. `rain` is accepted for
    /// precipitation since older configurations use it.
    pub fn from_prefix(prefix: &str) -> Option<Category> {
        match prefix {
            "temperature" => Some(Category::Temperature),
            "humidity" => Some(Category::Humidity),
            "pressure" => Some(Category::Pressure),
            "wind" => Some(Category::Wind),
            "precipitation" | "rain" => Some(Category::Precipitation),
            "light" => Some(Category::Light),
            "lightning" => Some(Category::Lightning),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// User-selected unit convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSystem {
    #[default]
    Metric,
    Us,
    Uk,
}

impl FromStr for UnitSystem {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "us" => Ok(UnitSystem::Us),
            "uk" => Ok(UnitSystem::Uk),
            _ => Err(ConfigurationError::InvalidUnits(s.to_string())),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Us => "us",
            UnitSystem::Uk => "uk",
        })
    }
}

/// Numeric type a channel's wire field is parsed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Float,
}

impl ValueKind {
    /// Parse a raw field. Integer channels accept a decimal representation
    /// and truncate it, since the upstream software is not consistent.
    pub fn parse(self, raw: &str) -> Option<f64> {
        match self {
            ValueKind::Float => raw.parse::<f64>().ok().filter(|v| v.is_finite()),
            ValueKind::Integer => raw.parse::<i64>().map(|v| v as f64).ok().or_else(|| {
                let value = raw.parse::<f64>().ok().filter(|v| v.is_finite())?;
                debug!("Truncating decimal field '{}' for an integer channel", raw);
                Some(value.trunc())
            }),
        }
    }
}

/// One mapped channel: where its value lives in the record and which unit
/// it is published in.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSpec {
    pub channel_id: String,
    pub source_field_index: usize,
    pub unit_class: UnitClass,
    pub kind: ValueKind,
}

/// Ordered channel list for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMap {
    pub category: Category,
    pub channels: Vec<ChannelSpec>,
    pub unit_system: UnitSystem,
}

impl CategoryMap {
    pub fn new(category: Category, unit_system: UnitSystem) -> Self {
        Self {
            category,
            channels: Vec::new(),
            unit_system,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel(&self, channel_id: &str) -> Option<&ChannelSpec> {
        self.channels.iter().find(|c| c.channel_id == channel_id)
    }
}

/// The complete set of category maps produced by one configuration load.
/// Always holds one map per category, in `Category::ALL` order.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingSet {
    pub unit_system: UnitSystem,
    pub categories: Vec<CategoryMap>,
}

impl MappingSet {
    pub fn empty(unit_system: UnitSystem) -> Self {
        Self {
            unit_system,
            categories: Category::ALL
                .iter()
                .map(|c| CategoryMap::new(*c, unit_system))
                .collect(),
        }
    }

    pub fn get(&self, category: Category) -> Option<&CategoryMap> {
        self.categories.iter().find(|m| m.category == category)
    }

    pub fn channel(&self, category: Category, channel_id: &str) -> Option<&ChannelSpec> {
        self.get(category).and_then(|m| m.channel(channel_id))
    }

    pub fn channel_count(&self) -> usize {
        self.categories.iter().map(|m| m.channels.len()).sum()
    }

    /// Categories that carry no channels.
    pub fn empty_categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|m| m.is_empty())
            .map(|m| m.category)
            .collect()
    }

    /// Category name → ordered (channel id, unit code) lists for the schema
    /// generator. Empty categories are left out.
    pub fn schema(&self) -> Schema {
        Schema {
            categories: self
                .categories
                .iter()
                .filter(|m| !m.is_empty())
                .map(|m| SchemaCategory {
                    name: m.category.name().to_string(),
                    channels: m
                        .channels
                        .iter()
                        .map(|c| SchemaChannel {
                            channel_id: c.channel_id.clone(),
                            unit_code: c.unit_class.code(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaChannel {
    pub channel_id: String,
    pub unit_code: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCategory {
    pub name: String,
    pub channels: Vec<SchemaChannel>,
}

/// Data structure handed to the external schema generator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    pub categories: Vec<SchemaCategory>,
}

/// One decoded datagram: whitespace separated fields in wire order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    pub fields: Vec<String>,
}

impl RawRecord {
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
