//! The active application target: board identity and deploy-relevant flags.

use serde::{Deserialize, Serialize};

/// Configuration of the application target a build is compiled for.
///
/// Carries the board presentation strings used in dialogs plus the flags
/// that feed channel selection. Replacing the profile is a re-selection
/// trigger; the engine holds it behind its own lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetProfile {
    /// Board name shown in user-facing messages.
    pub board_name: String,
    /// Name of the mass-storage drive the board mounts as.
    pub drive_name: String,
    /// Key of the primary compiler output to deliver (e.g. `binary.uf2`).
    pub output_name: String,
    /// MIME type used when downloading the primary output.
    pub mime_type: String,
    /// Whether the target flashes UF2 images rather than hex files.
    pub use_uf2: bool,
    /// Documentation page explaining USB transfer, if the target has one.
    pub usb_docs_url: Option<String>,
    /// Troubleshooting page handed to device-not-found reporters.
    pub flashing_troubleshoot_url: Option<String>,
    /// Target never deploys to a device (simulator-only targets).
    pub no_device_deploy: bool,
    /// Serial config requests the HF2 protocol family.
    pub use_hf2: bool,
    /// Serial config requests raw HID packet I/O.
    pub raw_hid: bool,
    /// Target supports WebUSB flashing.
    pub web_usb: bool,
    /// Start a WebUSB download automatically instead of prompting.
    pub auto_web_usb_download: bool,
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self {
            board_name: "device".into(),
            drive_name: "DEVICE".into(),
            output_name: "binary.uf2".into(),
            mime_type: "application/x-uf2".into(),
            use_uf2: true,
            usb_docs_url: None,
            flashing_troubleshoot_url: None,
            no_device_deploy: false,
            use_hf2: true,
            raw_hid: false,
            web_usb: false,
            auto_web_usb_download: false,
        }
    }
}

impl TargetProfile {
    /// File extension of the primary output.
    pub fn extension(&self) -> &'static str {
        if self.use_uf2 { ".uf2" } else { ".hex" }
    }
}
