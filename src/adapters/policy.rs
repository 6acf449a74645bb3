use crate::domain::ports::{PolicyKey, PolicyReader, PolicyValue};
use crate::utils::error::Result;
use std::collections::HashMap;
use std::env;

/// Reads policy from `GEOFIX_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvPolicyReader;

impl EnvPolicyReader {
    pub fn new() -> Self {
        Self
    }
}

impl PolicyReader for EnvPolicyReader {
    fn read(&self, key: PolicyKey) -> Result<Option<PolicyValue>> {
        match env::var(key.env_var()) {
            Ok(raw) if !raw.trim().is_empty() => Ok(Some(PolicyValue::parse(&raw))),
            Ok(_) | Err(env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(crate::utils::error::GeoError::ConfigError {
                message: format!("{}: {}", key.env_var(), e),
            }),
        }
    }
}

/// In-memory policy store; the TOML policy file loads into one of these.
#[derive(Debug, Clone, Default)]
pub struct StaticPolicyReader {
    values: HashMap<PolicyKey, PolicyValue>,
}

impl StaticPolicyReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: PolicyKey, value: PolicyValue) -> Self {
        self.values.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: PolicyKey, value: PolicyValue) {
        self.values.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PolicyReader for StaticPolicyReader {
    fn read(&self, key: PolicyKey) -> Result<Option<PolicyValue>> {
        Ok(self.values.get(&key).cloned())
    }
}
