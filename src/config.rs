use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::ingest::DEFAULT_DECIMATION;
use crate::models::RawConfig;

/// Field layout of a stock WeatherDisplay broadcast, used when no channel
/// mappings are configured.
pub const DEFAULT_FIELD_MAP: &[(&str, &str)] = &[
    ("temperature-main", "4"),
    ("temperature-heatindex", "45"),
    ("temperature-windchill", "44"),
    ("humidity-main", "5"),
    ("pressure-sealevel", "6"),
    ("pressure-trend", "50"),
    ("wind-windspeed", "2"),
    ("wind-winddir", "3"),
    ("rain-rate", "10"),
    ("rain-weekly", "7"),
    ("rain-monthly", "8"),
    ("rain-yearly", "9"),
    ("light-uv", "34"),
];

/// Process configuration for the standalone bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Raw key/value parameters handed to the engine.
    pub params: RawConfig,
    /// File the parameters were read from, re-read on reload.
    pub params_file: Option<PathBuf>,
    /// Process every Nth received record.
    pub decimation: u32,
}

impl BridgeConfig {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        let params_file = env::var("WD_PARAMS_FILE").ok().map(PathBuf::from);

        let decimation = match env::var("WD_DECIMATION") {
            Ok(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("WD_DECIMATION must be a positive integer, got '{}'", value))?,
            Err(_) => DEFAULT_DECIMATION,
        };

        let params = load_params(params_file.as_deref(), env::var("WD_PARAMS").ok().as_deref())?;

        Ok(BridgeConfig {
            params,
            params_file,
            decimation,
        })
    }

    /// Read the parameter sources again, e.g. after the file was edited.
    pub fn reload_params(&self) -> Result<RawConfig, Box<dyn std::error::Error>> {
        load_params(
            self.params_file.as_deref(),
            env::var("WD_PARAMS").ok().as_deref(),
        )
    }
}

/// Parse `key=value` pairs separated by commas, e.g. `Units=us,temperature-main=4`
pub fn parse_param_list(list: &str) -> RawConfig {
    let mut params = RawConfig::new();
    for pair in list.split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        if let Some((key, value)) = pair.split_once('=') {
            let key = key.trim();
            let value = value.trim();
            if !key.is_empty() {
                params.insert(key.to_string(), value.to_string());
            }
        } else {
            debug!("Ignoring malformed parameter '{}'", pair);
        }
    }
    params
}

/// Parse a parameter file: one `key=value` per line, `#` starts a comment
pub fn parse_param_file(contents: &str) -> RawConfig {
    let mut params = RawConfig::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().trim_matches('"');
            params.insert(key.trim().to_string(), value.to_string());
        } else {
            debug!("Ignoring malformed line '{}'", line);
        }
    }
    params
}

/// Merge the parameter file and the inline list; inline entries win.
/// Without any `<category>-<channel>` entry the stock field map is used.
fn load_params(
    file: Option<&Path>,
    inline: Option<&str>,
) -> Result<RawConfig, Box<dyn std::error::Error>> {
    let mut params = RawConfig::new();

    if let Some(path) = file {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        params.extend(parse_param_file(&contents));
        info!("Loaded parameters from {}", path.display());
    }

    if let Some(list) = inline {
        params.extend(parse_param_list(list));
    }

    let mut mappings = params.keys().filter(|k| k.contains('-')).count();
    if mappings == 0 {
        info!("No channel mappings configured, using the default WeatherDisplay field map");
        for (key, value) in DEFAULT_FIELD_MAP {
            params.insert(key.to_string(), value.to_string());
        }
        mappings = DEFAULT_FIELD_MAP.len();
    }

    info!("Total parameters loaded: {} ({} channel mappings)", params.len(), mappings);
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::build_mappings;
    use crate::models::{Category, UnitSystem};
    use std::io::Write;

    #[test]
    fn test_parse_param_list() {
        let params = parse_param_list(" Units=us, temperature-main=4,,bogus , humidity-main = 5 ");
        assert_eq!(params.len(), 3);
        assert_eq!(params["Units"], "us");
        assert_eq!(params["temperature-main"], "4");
        assert_eq!(params["humidity-main"], "5");
    }

    #[test]
    fn test_parse_param_file() {
        let params = parse_param_file(
            "# WeatherDisplay field map\nUDPPort=1333\n\nIPAddress=\"231.31.31.31\"\nrain-rate = 10\n",
        );
        assert_eq!(params.len(), 3);
        assert_eq!(params["IPAddress"], "231.31.31.31");
        assert_eq!(params["rain-rate"], "10");
    }

    #[test]
    fn test_load_params_inline_overrides_file() {
        let path = env::temp_dir().join(format!("wd-params-{}.conf", std::process::id()));
        {
            let mut file = fs::File::create(&path).unwrap();
            writeln!(file, "Units=metric\ntemperature-main=4").unwrap();
        }

        let params = load_params(Some(&path), Some("Units=uk")).unwrap();
        assert_eq!(params["Units"], "uk");
        assert_eq!(params["temperature-main"], "4");
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_empty_params_use_default_field_map() {
        for inline in [None, Some(""), Some("Units=us")] {
            let params = load_params(None, inline).unwrap();
            assert_eq!(params["temperature-main"], "4");
            assert_eq!(params["pressure-trend"], "50");
            assert_eq!(params["rain-yearly"], "9");
            assert_eq!(params.keys().filter(|k| k.contains('-')).count(), DEFAULT_FIELD_MAP.len());
        }
        assert_eq!(load_params(None, Some("Units=us")).unwrap()["Units"], "us");
    }

    #[test]
    fn test_configured_mappings_replace_defaults() {
        let params = load_params(None, Some("humidity-main=5")).unwrap();
        assert_eq!(params.len(), 1);
        assert!(!params.contains_key("temperature-main"));
    }

    #[test]
    fn test_default_field_map_builds() {
        let params = load_params(None, None).unwrap();
        let mappings = build_mappings(&params, UnitSystem::Metric).unwrap();
        assert_eq!(mappings.channel_count(), DEFAULT_FIELD_MAP.len());
        let yearly = mappings.channel(Category::Precipitation, "yearly").unwrap();
        assert_eq!(yearly.source_field_index, 9);
    }
}
