//! Environment snapshots feeding channel selection.

use serde::{Deserialize, Serialize};

use crate::target::TargetProfile;

/// Environment half of a selection snapshot, as read from the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostFacts {
    /// The URL or launch flags force a plain browser download.
    pub force_download: bool,
    /// A native host bridge (webview message handler) is present.
    pub native_host_bridge: bool,
    /// Running inside the WinRT app shell.
    pub winrt: bool,
    /// Running inside an Electron shell.
    pub electron: bool,
    /// The WebUSB API is present and permitted.
    pub web_usb_available: bool,
    /// A generic HID bridge daemon is reachable.
    pub hid_bridge_usable: bool,
    /// The local development server answered on its well-known port.
    pub local_server_reachable: bool,
    /// Auth token for the local development server, if one was issued.
    pub local_auth_token: Option<String>,
}

/// Immutable input of one channel-selection pass.
///
/// Combines [`HostFacts`], the deploy-relevant [`TargetProfile`] flags, and
/// the engine's explicit paired-once state. Valid for a single pass; the
/// engine gathers a fresh snapshot on every re-selection trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentFacts {
    pub force_download: bool,
    pub no_device_deploy: bool,
    pub native_host_bridge: bool,
    pub winrt: bool,
    pub use_hf2: bool,
    pub raw_hid: bool,
    pub electron: bool,
    pub web_usb_available: bool,
    /// WebUSB is switched on: the API is available and the target wants it.
    pub web_usb_enabled: bool,
    pub auto_web_usb_download: bool,
    /// The user has paired a device over WebUSB at least once.
    pub paired_once: bool,
    pub hid_bridge_usable: bool,
    pub local_server_reachable: bool,
    pub local_auth_token: Option<String>,
}

impl EnvironmentFacts {
    /// Builds the selection input from its three sources.
    pub fn gather(host: &HostFacts, target: &TargetProfile, paired_once: bool) -> Self {
        Self {
            force_download: host.force_download,
            no_device_deploy: target.no_device_deploy,
            native_host_bridge: host.native_host_bridge,
            winrt: host.winrt,
            use_hf2: target.use_hf2,
            raw_hid: target.raw_hid,
            electron: host.electron,
            web_usb_available: host.web_usb_available,
            web_usb_enabled: host.web_usb_available && target.web_usb,
            auto_web_usb_download: target.auto_web_usb_download,
            paired_once,
            hid_bridge_usable: host.hid_bridge_usable,
            local_server_reachable: host.local_server_reachable,
            local_auth_token: host.local_auth_token.clone(),
        }
    }

    /// WebUSB can actually be used for a deploy.
    pub fn web_usb_usable(&self) -> bool {
        self.web_usb_available && self.web_usb_enabled
    }

    /// The local development server is reachable with a valid token.
    pub fn local_server_usable(&self) -> bool {
        self.local_server_reachable
            && self
                .local_auth_token
                .as_deref()
                .is_some_and(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_usb_enabled_requires_host_and_target() {
        let host = HostFacts {
            web_usb_available: true,
            ..HostFacts::default()
        };
        let mut target = TargetProfile::default();

        let facts = EnvironmentFacts::gather(&host, &target, false);
        assert!(!facts.web_usb_enabled);
        assert!(!facts.web_usb_usable());

        target.web_usb = true;
        let facts = EnvironmentFacts::gather(&host, &target, false);
        assert!(facts.web_usb_enabled);
        assert!(facts.web_usb_usable());
    }

    #[test]
    fn local_server_needs_nonempty_token() {
        let mut facts = EnvironmentFacts {
            local_server_reachable: true,
            local_auth_token: None,
            ..EnvironmentFacts::default()
        };
        assert!(!facts.local_server_usable());

        facts.local_auth_token = Some(String::new());
        assert!(!facts.local_server_usable());

        facts.local_auth_token = Some("tok-1".into());
        assert!(facts.local_server_usable());

        facts.local_server_reachable = false;
        assert!(!facts.local_server_usable());
    }

    #[test]
    fn paired_once_is_explicit_input() {
        let host = HostFacts::default();
        let target = TargetProfile::default();
        assert!(!EnvironmentFacts::gather(&host, &target, false).paired_once);
        assert!(EnvironmentFacts::gather(&host, &target, true).paired_once);
    }

    #[test]
    fn facts_serde_roundtrip() {
        let facts = EnvironmentFacts {
            winrt: true,
            use_hf2: true,
            local_auth_token: Some("tok".into()),
            ..EnvironmentFacts::default()
        };
        let json = serde_json::to_string(&facts).unwrap();
        let parsed: EnvironmentFacts = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, facts);
    }
}
