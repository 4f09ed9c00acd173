//! Transport error types and failure classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Failure classification reported by a transport.
///
/// The wire strings match what transport implementations emit; anything
/// unrecognized deserializes as [`FailureKind::Other`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// The device is in bootloader mode and must be re-paired before a
    /// flash can proceed.
    RepairBootloader,
    /// No matching device is connected.
    DeviceNotFound,
    /// Any unclassified transport failure.
    #[default]
    #[serde(other)]
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::RepairBootloader => "repairbootloader",
            FailureKind::DeviceNotFound => "devicenotfound",
            FailureKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// Error produced by a transport operation, carrying its classification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn repair_bootloader(message: impl Into<String>) -> Self {
        Self::new(FailureKind::RepairBootloader, message)
    }

    pub fn device_not_found(message: impl Into<String>) -> Self {
        Self::new(FailureKind::DeviceNotFound, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Other, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_wire_strings() {
        assert_eq!(
            serde_json::to_string(&FailureKind::RepairBootloader).unwrap(),
            "\"repairbootloader\""
        );
        assert_eq!(
            serde_json::to_string(&FailureKind::DeviceNotFound).unwrap(),
            "\"devicenotfound\""
        );
        let parsed: FailureKind = serde_json::from_str("\"devicenotfound\"").unwrap();
        assert_eq!(parsed, FailureKind::DeviceNotFound);
    }

    #[test]
    fn unknown_kind_maps_to_other() {
        let parsed: FailureKind = serde_json::from_str("\"usbstall\"").unwrap();
        assert_eq!(parsed, FailureKind::Other);
    }

    #[test]
    fn error_display_includes_kind() {
        let err = TransportError::repair_bootloader("device reset into bootloader");
        assert_eq!(
            err.to_string(),
            "repairbootloader: device reset into bootloader"
        );
    }
}
