use crate::adapters::policy::StaticPolicyReader;
use crate::domain::ports::{PolicyKey, PolicyValue};
use crate::utils::error::{GeoError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Policy values loaded from a TOML file:
///
/// ```toml
/// [policy]
/// disable_location = 0
/// location_consent = "Allow"
/// system_radio_state = "${RADIO_STATE}"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyFile {
    #[serde(default)]
    pub policy: PolicySection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicySection {
    pub disable_location: Option<toml::Value>,
    pub location_consent: Option<toml::Value>,
    pub system_radio_state: Option<toml::Value>,
}

impl PolicyFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GeoError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GeoError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GeoError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn into_reader(self) -> Result<StaticPolicyReader> {
        let mut reader = StaticPolicyReader::new();
        let entries = [
            (PolicyKey::DisableLocation, self.policy.disable_location),
            (PolicyKey::LocationConsent, self.policy.location_consent),
            (PolicyKey::SystemRadioState, self.policy.system_radio_state),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                reader.insert(key, to_policy_value(key, value)?);
            }
        }
        Ok(reader)
    }
}

fn to_policy_value(key: PolicyKey, value: toml::Value) -> Result<PolicyValue> {
    match value {
        toml::Value::Integer(n) => Ok(PolicyValue::Int(n)),
        toml::Value::Boolean(b) => Ok(PolicyValue::Int(i64::from(b))),
        toml::Value::String(s) => Ok(PolicyValue::parse(&s)),
        other => Err(GeoError::InvalidConfigValueError {
            field: key.key_name().to_string(),
            value: other.to_string(),
            reason: "expected an integer, boolean or string".to_string(),
        }),
    }
}
