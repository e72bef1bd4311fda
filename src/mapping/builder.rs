/// Builds the per-category channel maps from raw configuration
use log::{debug, info};

use super::channels::{self, ChannelDef};
use crate::error::ConfigurationError;
use crate::models::{Category, ChannelSpec, MappingSet, RawConfig, UnitSystem};

/// Build the full mapping set for a raw configuration
///
/// Keys of the form `<category>-<channelId>` map a channel to a record field
/// index. Keys without a `-` are unrelated settings and are skipped. Within a
/// category, channels are ordered by the category dictionary so the result
/// does not depend on key iteration order.
///
/// # Arguments
/// * `raw` - Flat key/value configuration
/// * `units` - Unit system every category is published in
///
/// # Returns
/// The complete mapping set, or the first configuration error found
pub fn build_mappings(
    raw: &RawConfig,
    units: UnitSystem,
) -> Result<MappingSet, ConfigurationError> {
    let mut set = MappingSet::empty(units);
    let mut resolved: Vec<(Category, usize, ChannelDef, usize)> = Vec::new();

    // Sorted keys keep error reporting deterministic
    let mut keys: Vec<&String> = raw.keys().collect();
    keys.sort();

    for key in keys {
        let Some((prefix, channel_id)) = key.split_once('-') else {
            debug!("Skipping non-mapping key {}", key);
            continue;
        };

        let category = Category::from_prefix(prefix)
            .ok_or_else(|| ConfigurationError::UnknownCategory { key: key.clone() })?;

        let (position, def) = channels::lookup(category, channel_id)
            .ok_or_else(|| ConfigurationError::UnknownChannel { key: key.clone() })?;

        let value = &raw[key];
        let index = value
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigurationError::InvalidFieldIndex {
                key: key.clone(),
                value: value.clone(),
            })?;

        // `rain-x` and `precipitation-x` name the same channel
        if resolved
            .iter()
            .any(|(c, pos, _, _)| *c == category && *pos == position)
        {
            return Err(ConfigurationError::DuplicateChannel { key: key.clone() });
        }

        resolved.push((category, position, def, index));
    }

    resolved.sort_by_key(|(category, position, _, _)| (*category, *position));

    for (category, _, def, index) in resolved {
        let unit_class = channels::unit_class(category, def.id, units);
        if let Some(map) = set.categories.iter_mut().find(|m| m.category == category) {
            map.channels.push(ChannelSpec {
                channel_id: def.id.to_string(),
                source_field_index: index,
                unit_class,
                kind: def.kind,
            });
        }
    }

    info!(
        "Built channel mapping: {} channels, units {}",
        set.channel_count(),
        units
    );
    Ok(set)
}
