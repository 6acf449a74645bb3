use crate::domain::model::PrerequisiteReport;
use crate::domain::ports::{NetworkAdapter, NetworkProbe, OperStatus, PolicyKey, PolicyReader, PolicyValue};
use crate::utils::error::{GeoError, Result};
use regex::Regex;

pub const CONSENT_ALLOWED: &str = "Allow";
pub const WIRELESS_ADAPTER_PATTERN: &str = r"(?i)wi-?fi|wireless|wlan|802\.11";

pub struct PrerequisiteChecker<R: PolicyReader, N: NetworkProbe> {
    policy: R,
    network: N,
    wireless_pattern: Regex,
}

impl<R: PolicyReader, N: NetworkProbe> PrerequisiteChecker<R, N> {
    pub fn new(policy: R, network: N) -> Self {
        Self {
            policy,
            network,
            wireless_pattern: Regex::new(WIRELESS_ADAPTER_PATTERN)
                .expect("wireless adapter pattern is a valid regex"),
        }
    }

    /// Runs every check. Fails only when location is disabled by policy, and
    /// that check runs before anything else.
    pub async fn check(&self) -> Result<PrerequisiteReport> {
        let location_enabled = self.location_enabled();
        if !location_enabled {
            tracing::error!("Location services are disabled by policy");
            return Err(GeoError::LocationDisabled);
        }
        tracing::info!("Location services are enabled");

        let app_access_enabled = self.app_access_enabled();
        let wifi_enabled = self.wifi_enabled().await;
        let airplane_mode_on = self.airplane_mode_on();

        let report = PrerequisiteReport {
            location_enabled,
            app_access_enabled,
            wifi_enabled,
            airplane_mode_on,
        };

        if report.degraded_triangulation() {
            tracing::warn!(
                "Wi-Fi is unavailable or airplane mode is on; the location provider will likely fall back to IP-based geolocation with reduced accuracy"
            );
        }

        Ok(report)
    }

    fn read_policy(&self, key: PolicyKey) -> Option<PolicyValue> {
        match self.policy.read(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("Policy read for {} failed, treating as unset: {}", key.key_name(), e);
                None
            }
        }
    }

    fn location_enabled(&self) -> bool {
        match self.read_policy(PolicyKey::DisableLocation) {
            Some(value) => !value.is_truthy(),
            None => true,
        }
    }

    fn app_access_enabled(&self) -> bool {
        match self.read_policy(PolicyKey::LocationConsent) {
            Some(value) if !value.as_text().eq_ignore_ascii_case(CONSENT_ALLOWED) => {
                tracing::warn!(
                    "App location access is restricted (consent value: {}); some applications may not receive a location",
                    value
                );
                false
            }
            _ => true,
        }
    }

    fn airplane_mode_on(&self) -> bool {
        // Radio state readings vary between platform versions; best-effort only.
        let on = self
            .read_policy(PolicyKey::SystemRadioState)
            .map(|v| v.is_truthy())
            .unwrap_or(false);
        if on {
            tracing::warn!("Airplane mode appears to be on");
        } else {
            tracing::info!("Airplane mode is off");
        }
        on
    }

    async fn wifi_enabled(&self) -> bool {
        let enabled = match self.network.wireless_radio().await {
            Some(enabled) => enabled,
            None => {
                tracing::debug!("Wireless tool was inconclusive, checking network adapters");
                let adapters = self.network.adapters().await;
                self.any_wireless_adapter_up(&adapters)
            }
        };

        if enabled {
            tracing::info!("Wi-Fi is enabled");
        } else {
            tracing::warn!("Wi-Fi is disabled or unavailable");
        }
        enabled
    }

    fn any_wireless_adapter_up(&self, adapters: &[NetworkAdapter]) -> bool {
        adapters.iter().any(|adapter| {
            adapter.status == OperStatus::Up
                && (self.wireless_pattern.is_match(&adapter.name)
                    || self.wireless_pattern.is_match(&adapter.description))
        })
    }
}
