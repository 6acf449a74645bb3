use crate::domain::model::{Coordinate, FixStatus, Permission, Position};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Policy values the prerequisite checker consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKey {
    DisableLocation,
    LocationConsent,
    SystemRadioState,
}

impl PolicyKey {
    pub const ALL: [PolicyKey; 3] = [
        PolicyKey::DisableLocation,
        PolicyKey::LocationConsent,
        PolicyKey::SystemRadioState,
    ];

    pub fn key_name(self) -> &'static str {
        match self {
            PolicyKey::DisableLocation => "disable_location",
            PolicyKey::LocationConsent => "location_consent",
            PolicyKey::SystemRadioState => "system_radio_state",
        }
    }

    pub fn env_var(self) -> &'static str {
        match self {
            PolicyKey::DisableLocation => "GEOFIX_DISABLE_LOCATION",
            PolicyKey::LocationConsent => "GEOFIX_LOCATION_CONSENT",
            PolicyKey::SystemRadioState => "GEOFIX_SYSTEM_RADIO_STATE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyValue {
    Int(i64),
    Text(String),
}

impl PolicyValue {
    /// Integers parse as `Int`, everything else stays text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => PolicyValue::Int(n),
            Err(_) => PolicyValue::Text(trimmed.to_string()),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            PolicyValue::Int(n) => *n != 0,
            PolicyValue::Text(s) => matches!(
                s.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            ),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            PolicyValue::Int(n) => n.to_string(),
            PolicyValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for PolicyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyValue::Int(n) => write!(f, "{}", n),
            PolicyValue::Text(s) => f.write_str(s),
        }
    }
}

/// Key-value policy store. `Ok(None)` means no policy is set.
pub trait PolicyReader: Send + Sync {
    fn read(&self, key: PolicyKey) -> Result<Option<PolicyValue>>;
}

impl<R: PolicyReader + ?Sized> PolicyReader for Box<R> {
    fn read(&self, key: PolicyKey) -> Result<Option<PolicyValue>> {
        (**self).read(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperStatus {
    Up,
    Down,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkAdapter {
    pub name: String,
    pub description: String,
    pub status: OperStatus,
}

#[async_trait]
pub trait NetworkProbe: Send + Sync {
    /// Answer from the platform wireless tool. `None` when it could not tell.
    async fn wireless_radio(&self) -> Option<bool>;

    async fn adapters(&self) -> Vec<NetworkAdapter>;
}

#[async_trait]
impl<N: NetworkProbe + ?Sized> NetworkProbe for Box<N> {
    async fn wireless_radio(&self) -> Option<bool> {
        (**self).wireless_radio().await
    }

    async fn adapters(&self) -> Vec<NetworkAdapter> {
        (**self).adapters().await
    }
}

/// A polled location source. `start` may prompt the user or power up hardware.
#[async_trait]
pub trait LocationProvider: Send {
    async fn start(&mut self) -> Result<()>;

    async fn stop(&mut self);

    async fn status(&mut self) -> FixStatus;

    async fn permission(&mut self) -> Permission;

    async fn position(&mut self) -> Position;
}

#[async_trait]
impl<P: LocationProvider + ?Sized> LocationProvider for Box<P> {
    async fn start(&mut self) -> Result<()> {
        (**self).start().await
    }

    async fn stop(&mut self) {
        (**self).stop().await
    }

    async fn status(&mut self) -> FixStatus {
        (**self).status().await
    }

    async fn permission(&mut self) -> Permission {
        (**self).permission().await
    }

    async fn position(&mut self) -> Position {
        (**self).position().await
    }
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, coordinate: Coordinate) -> Result<String>;
}
