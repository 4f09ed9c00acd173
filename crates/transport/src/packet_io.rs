//! Packet I/O transport traits.

use std::sync::Arc;

use microflash_artifact::CompileResult;

use crate::TransportFuture;

/// Handle to a device connected over a packet transport.
pub trait PacketIo: Send + Sync {
    /// Reflashes the device with the artifact's primary output.
    ///
    /// Failures carry a [`FailureKind`](crate::FailureKind) classification
    /// the recovery workflow branches on.
    fn reflash<'a>(&'a self, artifact: &'a CompileResult) -> TransportFuture<'a, ()>;
}

/// A packet transport (WebUSB, HID bridge, WinRT HID).
///
/// One transport is active at a time; channel selection decides which.
pub trait PacketIoTransport: Send + Sync {
    /// Short transport name for logging (e.g. `webusb`, `hidbridge`).
    fn name(&self) -> &str;

    /// Opens (or reuses) a connection to the device.
    fn init(&self) -> TransportFuture<'_, Arc<dyn PacketIo>>;

    /// Closes the active connection, if any.
    fn disconnect(&self) -> TransportFuture<'_, ()>;

    /// Runs the transport's pairing handshake (browser chooser, OS dialog).
    fn pair(&self) -> TransportFuture<'_, ()>;

    /// Whether a device is currently connected.
    fn is_connected(&self) -> bool;

    /// Switches the transport on or off. Transports without an enable
    /// switch ignore this.
    fn set_enabled(&self, _enabled: bool) {}
}

/// Factory wrapping a raw packet device in a protocol adapter.
///
/// The default is a passthrough; extensions can install their own wrapper
/// to speak a custom flashing protocol over the same transport.
pub type PacketWrapper = Arc<dyn Fn(Arc<dyn PacketIo>) -> Arc<dyn PacketIo> + Send + Sync>;

/// Wrapper that hands the device back unchanged.
pub fn passthrough_wrapper() -> PacketWrapper {
    Arc::new(|device| device)
}
