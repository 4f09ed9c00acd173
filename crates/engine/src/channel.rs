//! The active deployment channel.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One concrete way of delivering an artifact to its destination.
///
/// Exactly one channel is active at a time; selection replaces it
/// atomically together with the command table bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeploymentChannel {
    /// Native webview host bridge (mobile app shells).
    NativeHost,
    /// WinRT shell flashing over HF2 packet I/O.
    WinRtHf2,
    /// WinRT shell with target-owned deploy logic.
    WinRtCustom,
    /// Electron shell copying onto the board drive.
    Electron,
    /// WebUSB with automatic download on deploy.
    WebUsbAuto,
    /// WebUSB after the user paired a device at least once.
    WebUsbPaired,
    /// Generic HID bridge daemon.
    HidBridge,
    /// Local development server.
    LocalServer,
    /// Plain browser download, the universal fallback.
    BrowserOnly,
}

impl fmt::Display for DeploymentChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeploymentChannel::NativeHost => "native-host",
            DeploymentChannel::WinRtHf2 => "winrt-hf2",
            DeploymentChannel::WinRtCustom => "winrt-custom",
            DeploymentChannel::Electron => "electron",
            DeploymentChannel::WebUsbAuto => "webusb-auto",
            DeploymentChannel::WebUsbPaired => "webusb-paired",
            DeploymentChannel::HidBridge => "hidbridge",
            DeploymentChannel::LocalServer => "localhost",
            DeploymentChannel::BrowserOnly => "browser",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_are_distinct() {
        let all = [
            DeploymentChannel::NativeHost,
            DeploymentChannel::WinRtHf2,
            DeploymentChannel::WinRtCustom,
            DeploymentChannel::Electron,
            DeploymentChannel::WebUsbAuto,
            DeploymentChannel::WebUsbPaired,
            DeploymentChannel::HidBridge,
            DeploymentChannel::LocalServer,
            DeploymentChannel::BrowserOnly,
        ];
        let mut names: Vec<String> = all.iter().map(|c| c.to_string()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), all.len());
    }
}
