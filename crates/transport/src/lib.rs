//! Transport interface boundary for the deploy engine.
//!
//! The engine never talks to a device, shell, or server directly; it goes
//! through the traits in this crate. The embedding application implements
//! them over the real WebUSB/HID/WinRT/IPC plumbing. Using traits keeps the
//! selection and recovery logic decoupled from transport and testable with
//! mocks.
//!
//! Failure classification travels with the error: transports report
//! [`FailureKind`] as part of [`TransportError`], and the recovery workflow
//! only branches on that classification, never inferring it.

pub mod bridge;
pub mod browser;
pub mod error;
pub mod local_server;
pub mod packet_io;
pub mod winrt;

use std::future::Future;
use std::pin::Pin;

pub use bridge::{ElectronShell, NativeHostBridge, NativeHostKind, NativeHostMessage};
pub use browser::{BrowserDownloader, DownloadPayload, DownloadTicket};
pub use error::{FailureKind, TransportError};
pub use local_server::{LocalDeployReport, LocalServer};
pub use packet_io::{PacketIo, PacketIoTransport, PacketWrapper, passthrough_wrapper};
pub use winrt::{HidHookFn, WinRtHidHooks, WinRtHost};

/// Boxed future returned by transport trait methods.
pub type TransportFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, TransportError>> + Send + 'a>>;
