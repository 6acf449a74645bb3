//! Location fix acquisition.
//!
//! The provider is started once, polled on a fixed cadence until it reports
//! `Ready`, its permission turns `Denied`, or the deadline passes, and is
//! stopped exactly once on every exit path.

use crate::domain::model::{Coordinate, FixStatus, Permission, Position};
use crate::domain::ports::LocationProvider;
use crate::utils::error::{GeoError, Result};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);
pub const DEFAULT_FIX_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a run ended without coordinates. Neither case is fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum FixFailure {
    TimedOut { status: FixStatus, message: String },
    PositionUnknown,
}

impl FixFailure {
    pub fn message(&self) -> &str {
        match self {
            FixFailure::TimedOut { message, .. } => message,
            FixFailure::PositionUnknown => "Location provider reported an unknown position",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FixOutcome {
    Fixed(Coordinate),
    Failed(FixFailure),
}

/// Explanations for the status a provider was stuck in when the deadline passed.
#[derive(Debug, Clone)]
pub struct StatusMessages {
    messages: HashMap<FixStatus, String>,
}

impl StatusMessages {
    pub fn empty() -> Self {
        Self {
            messages: HashMap::new(),
        }
    }

    pub fn with(mut self, status: FixStatus, message: impl Into<String>) -> Self {
        self.messages.insert(status, message.into());
        self
    }

    pub fn lookup(&self, status: FixStatus) -> Option<&str> {
        self.messages.get(&status).map(String::as_str)
    }

    pub fn timeout_message(&self, status: FixStatus) -> String {
        match self.lookup(status) {
            Some(message) => message.to_string(),
            None => format!("Timed out waiting for a location fix, status: {}", status),
        }
    }
}

impl Default for StatusMessages {
    fn default() -> Self {
        Self::empty()
            .with(
                FixStatus::Disabled,
                "Location provider is disabled. Turn on location services in the system settings.",
            )
            .with(
                FixStatus::NotInitialized,
                "Location provider has not finished initializing. Try again in a few seconds.",
            )
            .with(
                FixStatus::NoData,
                "Location provider has no data. No Wi-Fi or GPS source could produce a position.",
            )
            .with(
                FixStatus::Unknown,
                "Location provider status is unknown.",
            )
            .with(
                FixStatus::Denied,
                "Location provider refused access to position data.",
            )
    }
}

pub struct FixAcquirer {
    poll_interval: Duration,
    timeout: Duration,
    messages: StatusMessages,
}

impl FixAcquirer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout,
            messages: StatusMessages::default(),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_messages(mut self, messages: StatusMessages) -> Self {
        self.messages = messages;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Permission denial is the only error; timeouts and unknown positions
    /// come back as `FixOutcome::Failed`.
    pub async fn acquire<P: LocationProvider + ?Sized>(&self, provider: &mut P) -> Result<FixOutcome> {
        let started = Instant::now();
        tracing::info!("Starting location provider");

        let outcome = match provider.start().await {
            Ok(()) => self.poll(provider, started).await,
            Err(e) => Err(e),
        };
        provider.stop().await;
        tracing::debug!("Location provider stopped");

        match &outcome {
            Ok(FixOutcome::Fixed(c)) => {
                tracing::info!("Location fix acquired: {}, {}", c.latitude, c.longitude)
            }
            Ok(FixOutcome::Failed(failure)) => tracing::warn!("{}", failure.message()),
            Err(e) => tracing::error!("{}", e),
        }
        outcome
    }

    async fn poll<P: LocationProvider + ?Sized>(&self, provider: &mut P, started: Instant) -> Result<FixOutcome> {
        let deadline = started + self.timeout;
        let mut last_status = FixStatus::NotInitialized;

        loop {
            if provider.permission().await == Permission::Denied {
                return Err(GeoError::PermissionDenied);
            }

            let status = provider.status().await;
            if status == FixStatus::Ready {
                return Ok(Self::read_position(provider).await);
            }
            if status != last_status {
                tracing::debug!("Location provider status: {}", status);
            }
            last_status = status;

            let now = Instant::now();
            if now >= deadline {
                return Ok(FixOutcome::Failed(FixFailure::TimedOut {
                    status: last_status,
                    message: self.messages.timeout_message(last_status),
                }));
            }
            tokio::time::sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    async fn read_position<P: LocationProvider + ?Sized>(provider: &mut P) -> FixOutcome {
        match provider.position().await {
            Position::Known(coordinate) => FixOutcome::Fixed(coordinate),
            Position::Unknown => FixOutcome::Failed(FixFailure::PositionUnknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Provider whose status and permission change at fixed offsets from `start`.
    struct ScriptedProvider {
        status_script: Vec<(Duration, FixStatus)>,
        denied_at: Option<Duration>,
        position: Position,
        started_at: Option<Instant>,
        start_calls: usize,
        stop_calls: usize,
        status_polls: usize,
        position_reads: usize,
    }

    impl ScriptedProvider {
        fn new(status_script: Vec<(Duration, FixStatus)>) -> Self {
            Self {
                status_script,
                denied_at: None,
                position: Position::Known(Coordinate::new(47.6062, -122.3321)),
                started_at: None,
                start_calls: 0,
                stop_calls: 0,
                status_polls: 0,
                position_reads: 0,
            }
        }

        fn elapsed(&self) -> Duration {
            self.started_at.map(|t| t.elapsed()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl LocationProvider for ScriptedProvider {
        async fn start(&mut self) -> Result<()> {
            self.start_calls += 1;
            self.started_at = Some(Instant::now());
            Ok(())
        }

        async fn stop(&mut self) {
            self.stop_calls += 1;
        }

        async fn status(&mut self) -> FixStatus {
            self.status_polls += 1;
            let elapsed = self.elapsed();
            self.status_script
                .iter()
                .rev()
                .find(|(at, _)| elapsed >= *at)
                .map(|(_, s)| *s)
                .unwrap_or(FixStatus::NotInitialized)
        }

        async fn permission(&mut self) -> Permission {
            match self.denied_at {
                Some(at) if self.elapsed() >= at => Permission::Denied,
                _ => Permission::Allowed,
            }
        }

        async fn position(&mut self) -> Position {
            self.position_reads += 1;
            self.position
        }
    }

    struct UnavailableProvider {
        stop_calls: usize,
    }

    #[async_trait]
    impl LocationProvider for UnavailableProvider {
        async fn start(&mut self) -> Result<()> {
            Err(GeoError::provider_unavailable("no location service"))
        }

        async fn stop(&mut self) {
            self.stop_calls += 1;
        }

        async fn status(&mut self) -> FixStatus {
            FixStatus::Unknown
        }

        async fn permission(&mut self) -> Permission {
            Permission::Unspecified
        }

        async fn position(&mut self) -> Position {
            Position::Unknown
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_stops_polling_immediately() {
        let mut provider = ScriptedProvider::new(vec![
            (Duration::ZERO, FixStatus::NotInitialized),
            (Duration::from_secs(1), FixStatus::Ready),
        ]);
        let acquirer = FixAcquirer::new(DEFAULT_FIX_TIMEOUT);

        let begin = Instant::now();
        let outcome = acquirer.acquire(&mut provider).await.unwrap();

        assert_eq!(outcome, FixOutcome::Fixed(Coordinate::new(47.6062, -122.3321)));
        assert_eq!(begin.elapsed(), Duration::from_secs(1));
        // polls at 0, 250, 500, 750, 1000 ms
        assert_eq!(provider.status_polls, 5);
        assert_eq!(provider.position_reads, 1);
        assert_eq!(provider.start_calls, 1);
        assert_eq!(provider.stop_calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_on_first_poll_does_not_sleep() {
        let mut provider = ScriptedProvider::new(vec![(Duration::ZERO, FixStatus::Ready)]);
        let acquirer = FixAcquirer::new(DEFAULT_FIX_TIMEOUT);

        let begin = Instant::now();
        let outcome = acquirer.acquire(&mut provider).await.unwrap();

        assert!(matches!(outcome, FixOutcome::Fixed(_)));
        assert_eq!(begin.elapsed(), Duration::ZERO);
        assert_eq!(provider.status_polls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_uses_status_table() {
        let table = StatusMessages::default();
        for status in [
            FixStatus::Disabled,
            FixStatus::NotInitialized,
            FixStatus::NoData,
            FixStatus::Unknown,
        ] {
            let expected = table.lookup(status);
            assert!(expected.is_some());
            let mut provider = ScriptedProvider::new(vec![(Duration::ZERO, status)]);
            let acquirer = FixAcquirer::new(DEFAULT_FIX_TIMEOUT);

            let outcome = acquirer.acquire(&mut provider).await.unwrap();

            match outcome {
                FixOutcome::Failed(FixFailure::TimedOut { status: s, message }) => {
                    assert_eq!(s, status);
                    assert_eq!(Some(message.as_str()), expected);
                }
                other => panic!("expected timeout, got {:?}", other),
            }
            assert_eq!(provider.stop_calls, 1);
            assert_eq!(provider.position_reads, 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_measured_from_start() {
        let mut provider = ScriptedProvider::new(vec![(Duration::ZERO, FixStatus::NoData)]);
        let acquirer = FixAcquirer::new(DEFAULT_FIX_TIMEOUT);

        let begin = Instant::now();
        acquirer.acquire(&mut provider).await.unwrap();

        assert_eq!(begin.elapsed(), DEFAULT_FIX_TIMEOUT);
        // 0 ms through 5000 ms inclusive
        assert_eq!(provider.status_polls, 21);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unlisted_status_gets_generic_message() {
        let mut provider = ScriptedProvider::new(vec![(Duration::ZERO, FixStatus::NoData)]);
        let acquirer = FixAcquirer::new(Duration::from_secs(1)).with_messages(StatusMessages::empty());

        let outcome = acquirer.acquire(&mut provider).await.unwrap();

        assert_eq!(
            outcome,
            FixOutcome::Failed(FixFailure::TimedOut {
                status: FixStatus::NoData,
                message: "Timed out waiting for a location fix, status: NoData".to_string(),
            })
        );
    }

    #[test]
    fn test_generic_message_for_statuses_outside_table() {
        let messages = StatusMessages::default();
        assert_eq!(
            messages.timeout_message(FixStatus::TimedOut),
            "Timed out waiting for a location fix, status: TimedOut"
        );
        assert!(messages.lookup(FixStatus::Ready).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_denied_permission_is_fatal_and_stops_once() {
        let mut provider = ScriptedProvider::new(vec![
            (Duration::ZERO, FixStatus::NoData),
            (Duration::from_secs(3), FixStatus::Ready),
        ]);
        provider.denied_at = Some(Duration::from_secs(2));
        let acquirer = FixAcquirer::new(DEFAULT_FIX_TIMEOUT);

        let begin = Instant::now();
        let err = acquirer.acquire(&mut provider).await.unwrap_err();

        assert!(matches!(err, GeoError::PermissionDenied));
        assert_eq!(begin.elapsed(), Duration::from_secs(2));
        assert_eq!(provider.stop_calls, 1);
        assert_eq!(provider.position_reads, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_denied_checked_before_ready() {
        let mut provider = ScriptedProvider::new(vec![(Duration::ZERO, FixStatus::Ready)]);
        provider.denied_at = Some(Duration::ZERO);
        let acquirer = FixAcquirer::new(DEFAULT_FIX_TIMEOUT);

        let err = acquirer.acquire(&mut provider).await.unwrap_err();

        assert!(matches!(err, GeoError::PermissionDenied));
        assert_eq!(provider.status_polls, 0);
        assert_eq!(provider.stop_calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_position_after_ready() {
        let mut provider = ScriptedProvider::new(vec![(Duration::ZERO, FixStatus::Ready)]);
        provider.position = Position::Unknown;
        let acquirer = FixAcquirer::new(DEFAULT_FIX_TIMEOUT);

        let outcome = acquirer.acquire(&mut provider).await.unwrap();

        assert_eq!(outcome, FixOutcome::Failed(FixFailure::PositionUnknown));
        assert_eq!(provider.stop_calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_failure_still_stops_provider() {
        let mut provider = UnavailableProvider { stop_calls: 0 };
        let acquirer = FixAcquirer::new(DEFAULT_FIX_TIMEOUT);

        let err = acquirer.acquire(&mut provider).await.unwrap_err();

        assert!(matches!(err, GeoError::ProviderUnavailable { .. }));
        assert_eq!(provider.stop_calls, 1);
    }
}
