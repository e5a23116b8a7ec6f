use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use crate::range::{DEFAULT_DAYS_BEFORE, DefaultStart};
use crate::types::AggregateMode;

const DAYS_BEFORE_TODAY: &str = "days-before-today";
const EARLIEST_DATA_POINT: &str = "earliest-data-point";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub range: RangeConfig,
    pub totals: TotalsConfig,
    pub formatting: FormattingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RangeConfig {
    /// `days-before-today` or `earliest-data-point`
    pub default_start: String,
    pub days_before: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TotalsConfig {
    pub categories: Vec<String>,
    pub mode: AggregateMode,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FormattingConfig {
    pub number_comma: bool,
    pub number_human: bool,
    pub locale: String,
    pub decimal_places: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            range: RangeConfig {
                default_start: DAYS_BEFORE_TODAY.to_string(),
                days_before: DEFAULT_DAYS_BEFORE,
            },
            totals: TotalsConfig {
                categories: vec![
                    "views".to_string(),
                    "comments".to_string(),
                    "votes".to_string(),
                ],
                mode: AggregateMode::Sum,
            },
            formatting: FormattingConfig {
                number_comma: false,
                number_human: false,
                locale: "en".to_string(),
                decimal_places: 2,
            },
        }
    }
}

thread_local! {
    static TEST_CONFIG_PATH: RefCell<Option<PathBuf>> = const { RefCell::new(None) };
}

#[cfg(test)]
pub fn set_test_config_path(path: PathBuf) {
    TEST_CONFIG_PATH.with(|p| *p.borrow_mut() = Some(path));
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(test)]
        {
            if let Some(path) = TEST_CONFIG_PATH.with(|p| p.borrow().clone()) {
                return Ok(path);
            }
        }

        Ok(dirs::home_dir()
            .context("Could not find home directory")?
            .join(".engagement.toml"))
    }

    pub fn load() -> Result<Option<Config>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(Some(config))
    }

    pub fn save(&self, silent: bool) -> Result<()> {
        let config_path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, content).context("Failed to write config file")?;

        if !silent {
            println!("Configuration saved to: {}", config_path.display());
        }

        Ok(())
    }

    /// Start-boundary policy used when no start date is given.
    pub fn default_start(&self) -> Result<DefaultStart> {
        parse_default_start(&self.range.default_start, self.range.days_before)
    }
}

fn parse_default_start(policy: &str, days_before: u32) -> Result<DefaultStart> {
    match policy {
        DAYS_BEFORE_TODAY => Ok(DefaultStart::DaysBeforeToday(days_before)),
        EARLIEST_DATA_POINT => Ok(DefaultStart::EarliestDataPoint),
        other => anyhow::bail!(
            "Unknown default-start policy: {other}. Use '{DAYS_BEFORE_TODAY}' or '{EARLIEST_DATA_POINT}'"
        ),
    }
}

fn parse_mode(value: &str) -> Result<AggregateMode> {
    match value {
        "sum" => Ok(AggregateMode::Sum),
        "count" => Ok(AggregateMode::Count),
        other => anyhow::bail!("Unknown aggregate mode: {other}. Use 'sum' or 'count'"),
    }
}

// CLI helper functions
pub fn create_default_config(overwrite: bool) -> Result<()> {
    let config = Config::default();
    if !std::fs::exists(Config::config_path()?)? || overwrite {
        config.save(true)?;

        println!("Created default configuration file.");
        println!("Edit it directly or use:");
        println!("   engagement config set default-start earliest-data-point");
        println!("   {}", Config::config_path()?.display());
    } else {
        println!("Configuration already exists.  Pass `--overwrite` to overwrite.");
    }

    Ok(())
}

pub fn show_config() -> Result<()> {
    match Config::load()? {
        Some(config) => {
            println!("Current configuration:");
            println!("   Default Start: {}", config.range.default_start);
            println!("   Days Before: {}", config.range.days_before);
            println!("   Categories: {}", config.totals.categories.join(", "));
            println!(
                "   Mode: {}",
                match config.totals.mode {
                    AggregateMode::Sum => "sum",
                    AggregateMode::Count => "count",
                }
            );
            println!("   Number Comma: {}", config.formatting.number_comma);
            println!("   Number Human: {}", config.formatting.number_human);
            println!("   Locale: {}", config.formatting.locale);
            println!("   Decimal Places: {}", config.formatting.decimal_places);
        }
        None => {
            println!("No configuration file found.");
            println!("   Run 'engagement config init' to create one.");
        }
    }
    Ok(())
}

pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?.unwrap_or_default();

    match key {
        "default-start" => {
            parse_default_start(value, config.range.days_before)?;
            config.range.default_start = value.to_string();
        }
        "days-before" => {
            config.range.days_before = value.parse::<u32>().context("Invalid number value")?;
        }
        "categories" => {
            config.totals.categories = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        "mode" => {
            config.totals.mode = parse_mode(value)?;
        }
        "number-comma" => {
            let enabled = value
                .parse::<bool>()
                .context("Invalid boolean value. Use 'true' or 'false'")?;
            config.formatting.number_comma = enabled;
        }
        "number-human" => {
            let enabled = value
                .parse::<bool>()
                .context("Invalid boolean value. Use 'true' or 'false'")?;
            config.formatting.number_human = enabled;
        }
        "locale" => {
            config.formatting.locale = value.to_string();
        }
        "decimal-places" => {
            let places = value.parse::<usize>().context("Invalid number value")?;
            config.formatting.decimal_places = places;
        }
        _ => anyhow::bail!("Unknown config key: {}", key),
    }

    config.save(false)?;
    Ok(())
}
