pub mod toml_config;

use crate::adapters::policy::EnvPolicyReader;
use crate::config::toml_config::PolicyFile;
use crate::core::reporter::OutputFormat;
use crate::core::resolver::DEFAULT_GEOCODER_URL;
use crate::domain::model::Coordinate;
use crate::domain::ports::PolicyReader;
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "geofix"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Check location prerequisites, wait for a location fix and reverse-geocode it")
)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, default_value = "5", help = "Seconds to wait for a location fix"))]
    pub timeout_secs: u64,

    #[cfg_attr(feature = "cli", arg(long, env = "GEOFIX_GEOCODER_URL", default_value = DEFAULT_GEOCODER_URL))]
    pub geocoder_url: String,

    #[cfg_attr(feature = "cli", arg(long, help = "TOML file with [policy] values; environment variables are used otherwise"))]
    pub policy_file: Option<String>,

    #[cfg_attr(
        feature = "cli",
        arg(long, value_parser = parse_position, allow_hyphen_values = true, help = "Use a fixed position (lat,lon) instead of the platform provider")
    )]
    pub position: Option<Coordinate>,

    #[cfg_attr(feature = "cli", arg(long, value_enum, default_value_t = OutputFormat::Text))]
    pub format: OutputFormat,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            policy_file: None,
            position: None,
            format: OutputFormat::Text,
            verbose: false,
        }
    }
}

impl CliConfig {
    pub fn fix_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The policy file when one is given, the environment otherwise.
    pub fn policy_reader(&self) -> Result<Box<dyn PolicyReader>> {
        match &self.policy_file {
            Some(path) => {
                tracing::debug!("Loading policy file: {}", path);
                Ok(Box::new(PolicyFile::from_file(path)?.into_reader()?))
            }
            None => Ok(Box::new(EnvPolicyReader::new())),
        }
    }
}

pub fn parse_position(raw: &str) -> std::result::Result<Coordinate, String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected 'lat,lon', got '{}'", raw))?;
    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude '{}': {}", lat.trim(), e))?;
    let longitude: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude '{}': {}", lon.trim(), e))?;
    Ok(Coordinate::new(latitude, longitude))
}

impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_range("timeout_secs", self.timeout_secs, 1, 300)?;
        validate_url("geocoder_url", &self.geocoder_url)?;
        if let Some(path) = &self.policy_file {
            validate_path("policy_file", path)?;
        }
        if let Some(position) = &self.position {
            validate_coordinate("position", position)?;
        }
        Ok(())
    }
}
