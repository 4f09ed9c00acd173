//! WinRT app shell host surface.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use microflash_artifact::CompileResult;

use crate::TransportFuture;

/// Async callback invoked on WinRT device arrival/removal.
pub type HidHookFn = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Device watcher callbacks registered when the HF2 flow owns the device.
///
/// The custom-deploy split registers no hooks; the target's own extension
/// drives the device lifecycle there.
pub struct WinRtHidHooks {
    /// Runs when a matching device arrives (re-initialize packet I/O).
    pub on_device_arrived: HidHookFn,
    /// Runs when the device is removed (tear down packet I/O).
    pub on_device_removed: HidHookFn,
}

/// Host surface of the WinRT (Windows store app) shell.
pub trait WinRtHost: Send + Sync {
    /// Starts the HID device watcher. `None` disables the watcher hooks.
    fn init_hid(&self, hooks: Option<WinRtHidHooks>);

    /// Copies the artifact onto the board's mass-storage drive.
    fn drive_deploy<'a>(&'a self, artifact: &'a CompileResult) -> TransportFuture<'a, ()>;

    /// Saves the artifact through the WinRT file picker.
    ///
    /// Returns `false` when the user dismissed the picker without saving.
    fn save<'a>(&'a self, artifact: &'a CompileResult) -> TransportFuture<'a, bool>;

    /// Downloads a text payload through the WinRT downloads folder.
    fn browser_download<'a>(
        &'a self,
        text: &'a str,
        name: &'a str,
        content_type: &'a str,
    ) -> TransportFuture<'a, ()>;
}
