use chrono::{DateTime, Local, Timelike};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

pub const MAPS_LINK_BASE: &str = "https://www.google.com/maps?q=";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Advisory flags gathered before attempting a fix. Only `location_enabled == false`
/// stops the run; the others are reported as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrerequisiteReport {
    pub location_enabled: bool,
    pub app_access_enabled: bool,
    pub wifi_enabled: bool,
    pub airplane_mode_on: bool,
}

impl PrerequisiteReport {
    /// Without Wi-Fi, or with radios off, providers fall back to IP geolocation.
    pub fn degraded_triangulation(&self) -> bool {
        !self.wifi_enabled || self.airplane_mode_on
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixStatus {
    Ready,
    Denied,
    Disabled,
    NotInitialized,
    NoData,
    Unknown,
    /// Never reported by a provider; produced when the poll deadline passes.
    TimedOut,
}

impl fmt::Display for FixStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FixStatus::Ready => "Ready",
            FixStatus::Denied => "Denied",
            FixStatus::Disabled => "Disabled",
            FixStatus::NotInitialized => "NotInitialized",
            FixStatus::NoData => "NoData",
            FixStatus::Unknown => "Unknown",
            FixStatus::TimedOut => "TimedOut",
        };
        f.write_str(name)
    }
}

/// Access authorization, independent of operational status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    Allowed,
    Denied,
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn maps_link(&self) -> String {
        format!("{}{},{}", MAPS_LINK_BASE, self.latitude, self.longitude)
    }
}

/// A provider reading. `Unknown` is a legitimate answer, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    Known(Coordinate),
    Unknown,
}

/// The single structured output of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeoRecord {
    #[serde(serialize_with = "serialize_timestamp")]
    timestamp: DateTime<Local>,
    latitude: f64,
    longitude: f64,
    google_maps_link: String,
    resolved_address: String,
}

impl GeoRecord {
    pub fn new(timestamp: DateTime<Local>, coordinate: Coordinate, resolved_address: String) -> Self {
        let timestamp = timestamp.with_nanosecond(0).unwrap_or(timestamp);
        Self {
            timestamp,
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            google_maps_link: coordinate.maps_link(),
            resolved_address,
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn google_maps_link(&self) -> &str {
        &self.google_maps_link
    }

    pub fn resolved_address(&self) -> &str {
        &self.resolved_address
    }
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Local>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&ts.format(TIMESTAMP_FORMAT))
}

impl fmt::Display for GeoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timestamp       : {}", self.timestamp.format(TIMESTAMP_FORMAT))?;
        writeln!(f, "Latitude        : {}", self.latitude)?;
        writeln!(f, "Longitude       : {}", self.longitude)?;
        writeln!(f, "GoogleMapsLink  : {}", self.google_maps_link)?;
        write!(f, "ResolvedAddress : {}", self.resolved_address)
    }
}
