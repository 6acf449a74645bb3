#![allow(dead_code)]

use async_trait::async_trait;
use geofix::adapters::StaticPolicyReader;
use geofix::core::{Coordinate, FixStatus, Permission, Position};
use geofix::domain::ports::{
    LocationProvider, NetworkAdapter, NetworkProbe, OperStatus, PolicyKey, PolicyValue,
    ReverseGeocoder,
};
use geofix::{GeoError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

pub fn seattle() -> Coordinate {
    Coordinate::new(47.6062, -122.3321)
}

pub fn permissive_policy() -> StaticPolicyReader {
    StaticPolicyReader::new()
        .with(PolicyKey::DisableLocation, PolicyValue::Int(0))
        .with(PolicyKey::LocationConsent, PolicyValue::Text("Allow".to_string()))
        .with(PolicyKey::SystemRadioState, PolicyValue::Int(0))
}

pub struct FakeNetwork {
    pub radio: Option<bool>,
    pub adapters: Vec<NetworkAdapter>,
}

impl FakeNetwork {
    pub fn wifi_up() -> Self {
        Self {
            radio: None,
            adapters: vec![NetworkAdapter {
                name: "Wi-Fi".to_string(),
                description: "Intel(R) Wi-Fi 6 AX201 160MHz".to_string(),
                status: OperStatus::Up,
            }],
        }
    }

    pub fn offline() -> Self {
        Self {
            radio: Some(false),
            adapters: vec![],
        }
    }
}

#[async_trait]
impl NetworkProbe for FakeNetwork {
    async fn wireless_radio(&self) -> Option<bool> {
        self.radio
    }

    async fn adapters(&self) -> Vec<NetworkAdapter> {
        self.adapters.clone()
    }
}

/// Counters shared with the test after the engine takes ownership.
#[derive(Debug, Default)]
pub struct ProviderCalls {
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub position_reads: AtomicUsize,
}

impl ProviderCalls {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn position_reads(&self) -> usize {
        self.position_reads.load(Ordering::SeqCst)
    }
}

/// Status and permission follow a timeline measured from `start`.
pub struct ScriptedProvider {
    status_timeline: Vec<(Duration, FixStatus)>,
    denied_at: Option<Duration>,
    position: Position,
    started_at: Option<Instant>,
    calls: Arc<ProviderCalls>,
}

impl ScriptedProvider {
    pub fn new(status_timeline: Vec<(Duration, FixStatus)>, position: Position) -> Self {
        Self {
            status_timeline,
            denied_at: None,
            position,
            started_at: None,
            calls: Arc::new(ProviderCalls::default()),
        }
    }

    pub fn ready_at(at: Duration, coordinate: Coordinate) -> Self {
        Self::new(
            vec![
                (Duration::ZERO, FixStatus::NotInitialized),
                (at, FixStatus::Ready),
            ],
            Position::Known(coordinate),
        )
    }

    pub fn stuck_in(status: FixStatus) -> Self {
        Self::new(vec![(Duration::ZERO, status)], Position::Unknown)
    }

    pub fn denied_at(mut self, at: Duration) -> Self {
        self.denied_at = Some(at);
        self
    }

    pub fn calls(&self) -> Arc<ProviderCalls> {
        Arc::clone(&self.calls)
    }

    fn elapsed(&self) -> Duration {
        self.started_at.map(|t| t.elapsed()).unwrap_or_default()
    }
}

#[async_trait]
impl LocationProvider for ScriptedProvider {
    async fn start(&mut self) -> Result<()> {
        self.calls.starts.fetch_add(1, Ordering::SeqCst);
        self.started_at = Some(Instant::now());
        Ok(())
    }

    async fn stop(&mut self) {
        self.calls.stops.fetch_add(1, Ordering::SeqCst);
    }

    async fn status(&mut self) -> FixStatus {
        let elapsed = self.elapsed();
        self.status_timeline
            .iter()
            .rev()
            .find(|(at, _)| elapsed >= *at)
            .map(|(_, status)| *status)
            .unwrap_or(FixStatus::NotInitialized)
    }

    async fn permission(&mut self) -> Permission {
        match self.denied_at {
            Some(at) if self.elapsed() >= at => Permission::Denied,
            _ => Permission::Allowed,
        }
    }

    async fn position(&mut self) -> Position {
        self.calls.position_reads.fetch_add(1, Ordering::SeqCst);
        self.position
    }
}

/// In-process geocoder that records every lookup.
#[derive(Clone, Default)]
pub struct FakeGeocoder {
    answer: Option<String>,
    lookups: Arc<Mutex<Vec<Coordinate>>>,
}

impl FakeGeocoder {
    pub fn answering(address: &str) -> Self {
        Self {
            answer: Some(address.to_string()),
            lookups: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn lookups(&self) -> Vec<Coordinate> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReverseGeocoder for FakeGeocoder {
    async fn reverse(&self, coordinate: Coordinate) -> Result<String> {
        self.lookups.lock().unwrap().push(coordinate);
        self.answer
            .clone()
            .ok_or_else(|| GeoError::geocode("service unavailable"))
    }
}
