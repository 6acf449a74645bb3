use crate::domain::ports::{NetworkAdapter, NetworkProbe, OperStatus};
use async_trait::async_trait;
use sysinfo::Networks;
use tokio::process::Command;

/// Wi-Fi state from the platform's wireless tool, with adapter enumeration
/// through `sysinfo` as the fallback.
#[derive(Debug, Clone, Default)]
pub struct SystemNetworkProbe;

impl SystemNetworkProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NetworkProbe for SystemNetworkProbe {
    async fn wireless_radio(&self) -> Option<bool> {
        let (program, args) = WIRELESS_TOOL;
        match Command::new(program).args(args).output().await {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let answer = parse_wireless_tool_output(&stdout);
                tracing::debug!("{} reported wireless state {:?}", program, answer);
                answer
            }
            Err(e) => {
                tracing::debug!("Could not run {}: {}", program, e);
                None
            }
        }
    }

    async fn adapters(&self) -> Vec<NetworkAdapter> {
        let networks = Networks::new_with_refreshed_list();
        let mut adapters: Vec<NetworkAdapter> = networks
            .iter()
            .filter(|(name, _)| !is_loopback(name))
            .map(|(name, data)| {
                let status = match sys_operstate(name) {
                    Some(status) => status,
                    None if !data.ip_networks().is_empty() => OperStatus::Up,
                    None => OperStatus::Unknown,
                };
                NetworkAdapter {
                    name: name.clone(),
                    description: sys_description(name),
                    status,
                }
            })
            .collect();
        adapters.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::debug!("Found {} network adapters", adapters.len());
        adapters
    }
}

#[cfg(windows)]
const WIRELESS_TOOL: (&str, &[&str]) = ("netsh", &["wlan", "show", "interfaces"]);

#[cfg(not(windows))]
const WIRELESS_TOOL: (&str, &[&str]) = ("nmcli", &["radio", "wifi"]);

#[cfg(windows)]
fn parse_wireless_tool_output(output: &str) -> Option<bool> {
    parse_netsh_interfaces(output)
}

#[cfg(not(windows))]
fn parse_wireless_tool_output(output: &str) -> Option<bool> {
    parse_nmcli_radio(output)
}

fn is_loopback(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower == "lo" || lower.contains("loopback")
}

#[cfg(target_os = "linux")]
fn sys_operstate(name: &str) -> Option<OperStatus> {
    let raw = std::fs::read_to_string(format!("/sys/class/net/{}/operstate", name)).ok()?;
    Some(parse_operstate(&raw))
}

#[cfg(not(target_os = "linux"))]
fn sys_operstate(_name: &str) -> Option<OperStatus> {
    None
}

#[cfg(target_os = "linux")]
fn sys_description(name: &str) -> String {
    if std::path::Path::new(&format!("/sys/class/net/{}/wireless", name)).exists() {
        "Wireless".to_string()
    } else {
        String::new()
    }
}

#[cfg(not(target_os = "linux"))]
fn sys_description(_name: &str) -> String {
    String::new()
}

pub fn parse_operstate(raw: &str) -> OperStatus {
    match raw.trim() {
        "up" => OperStatus::Up,
        "down" | "dormant" | "lowerlayerdown" | "notpresent" => OperStatus::Down,
        _ => OperStatus::Unknown,
    }
}

/// `nmcli radio wifi` prints a single `enabled` or `disabled`.
pub fn parse_nmcli_radio(output: &str) -> Option<bool> {
    match output.trim().to_lowercase().as_str() {
        "enabled" => Some(true),
        "disabled" => Some(false),
        _ => None,
    }
}

/// Interprets `netsh wlan show interfaces`.
pub fn parse_netsh_interfaces(output: &str) -> Option<bool> {
    let lower = output.to_lowercase();
    if lower.contains("there is no wireless interface") {
        return Some(false);
    }

    let mut radio_off = false;
    let mut in_radio_status = false;
    for line in lower.lines() {
        match line.split_once(':') {
            Some((key, value)) => {
                let (key, value) = (key.trim(), value.trim());
                if key == "state" && value == "connected" {
                    return Some(true);
                }
                in_radio_status = key.starts_with("radio status");
                if in_radio_status && value.ends_with("off") {
                    radio_off = true;
                }
            }
            // "Radio status" spans several lines, one per radio switch.
            None if in_radio_status && line.trim().ends_with("off") => radio_off = true,
            None => {}
        }
    }

    if radio_off {
        Some(false)
    } else {
        None
    }
}
