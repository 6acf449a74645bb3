//! Location provider backends.

#[cfg(all(target_os = "linux", feature = "geoclue"))]
mod geoclue;

#[cfg(all(target_os = "linux", feature = "geoclue"))]
pub use geoclue::GeoClueProvider;

use crate::domain::model::{Coordinate, FixStatus, Permission, Position};
use crate::domain::ports::LocationProvider;
use crate::utils::error::{GeoError, Result};
use async_trait::async_trait;

/// Reports a fixed coordinate as soon as it is started.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    coordinate: Coordinate,
    running: bool,
}

impl StaticProvider {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            running: false,
        }
    }
}

#[async_trait]
impl LocationProvider for StaticProvider {
    async fn start(&mut self) -> Result<()> {
        self.running = true;
        Ok(())
    }

    async fn stop(&mut self) {
        self.running = false;
    }

    async fn status(&mut self) -> FixStatus {
        if self.running {
            FixStatus::Ready
        } else {
            FixStatus::NotInitialized
        }
    }

    async fn permission(&mut self) -> Permission {
        Permission::Allowed
    }

    async fn position(&mut self) -> Position {
        if self.running {
            Position::Known(self.coordinate)
        } else {
            Position::Unknown
        }
    }
}

/// Stands in when no backend exists; fails on `start` so the prerequisite
/// checks still run first.
#[derive(Debug, Clone)]
pub struct UnavailableProvider {
    reason: String,
}

impl UnavailableProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl LocationProvider for UnavailableProvider {
    async fn start(&mut self) -> Result<()> {
        Err(GeoError::provider_unavailable(self.reason.clone()))
    }

    async fn stop(&mut self) {}

    async fn status(&mut self) -> FixStatus {
        FixStatus::NotInitialized
    }

    async fn permission(&mut self) -> Permission {
        Permission::Unspecified
    }

    async fn position(&mut self) -> Position {
        Position::Unknown
    }
}

/// The provider for the current platform. A fixed position always wins.
pub fn platform_provider(fixed: Option<Coordinate>) -> Box<dyn LocationProvider> {
    if let Some(coordinate) = fixed {
        tracing::info!("Using fixed position {}, {}", coordinate.latitude, coordinate.longitude);
        return Box::new(StaticProvider::new(coordinate));
    }

    #[cfg(all(target_os = "linux", feature = "geoclue"))]
    {
        Box::new(GeoClueProvider::new())
    }

    #[cfg(not(all(target_os = "linux", feature = "geoclue")))]
    {
        Box::new(UnavailableProvider::new(
            "no location backend is available on this platform",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_static_provider_lifecycle() {
        let coordinate = Coordinate::new(35.6762, 139.6503);
        let mut provider = StaticProvider::new(coordinate);

        assert_eq!(provider.status().await, FixStatus::NotInitialized);
        assert_ok!(provider.start().await);
        assert_eq!(provider.status().await, FixStatus::Ready);
        assert_eq!(provider.permission().await, Permission::Allowed);
        assert_eq!(provider.position().await, Position::Known(coordinate));
        provider.stop().await;
        assert_eq!(provider.position().await, Position::Unknown);
    }

    #[tokio::test]
    async fn test_fixed_position_selects_static_provider() {
        let mut provider = platform_provider(Some(Coordinate::new(1.0, 2.0)));
        provider.start().await.unwrap();
        assert_eq!(provider.status().await, FixStatus::Ready);
        provider.stop().await;
    }

    #[tokio::test]
    async fn test_unavailable_provider_fails_on_start() {
        let mut provider = UnavailableProvider::new("no backend");
        let err = assert_err!(provider.start().await);
        assert!(matches!(err, GeoError::ProviderUnavailable { ref message } if message == "no backend"));
        assert_eq!(provider.position().await, Position::Unknown);
    }
}
