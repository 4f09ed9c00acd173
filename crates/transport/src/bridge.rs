//! Native shell bridges: webview host messaging and Electron.

use microflash_artifact::{CompileResult, OutputFile};
use serde::{Deserialize, Serialize};

use crate::TransportFuture;

/// What the native host should do with a posted artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NativeHostKind {
    /// Flash the artifact to the connected device.
    Download,
    /// Save the artifact as a file on the host.
    Save,
}

/// Message posted to a native host bridge (webview message handler).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeHostMessage {
    /// File name the host should use.
    pub name: String,
    pub kind: NativeHostKind,
    /// Primary output content.
    pub content: OutputFile,
}

/// Bridge into a native app shell hosting the editor in a webview.
pub trait NativeHostBridge: Send + Sync {
    /// Posts a message to the host. Delivery is fire-and-forget on the
    /// host side; an error here means the bridge itself is gone.
    fn post(&self, message: NativeHostMessage) -> TransportFuture<'_, ()>;
}

/// Deploy surface of an Electron shell host.
pub trait ElectronShell: Send + Sync {
    /// Copies the artifact onto the board's mass-storage drive.
    fn drive_deploy<'a>(&'a self, artifact: &'a CompileResult) -> TransportFuture<'a, ()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_host_message_serde() {
        let msg = NativeHostMessage {
            name: "blink.uf2".into(),
            kind: NativeHostKind::Download,
            content: OutputFile::Binary(vec![0xAA]),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"kind\":\"download\""));
        let parsed: NativeHostMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }
}
