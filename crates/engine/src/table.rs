//! The deploy command table: four slots, replaced atomically.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use microflash_transport::PacketIoTransport;

use crate::channel::DeploymentChannel;
use crate::strategy::{CommandView, DeployStrategy};

/// Which implementation a command slot is currently bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotSource {
    Browser,
    NativeHost,
    WinRt,
    Electron,
    WebUsb,
    HidBridge,
    LocalServer,
    Extension,
}

/// Binding descriptor of the four command slots.
///
/// Selection only rebinds a subset of slots per channel; the rest keep
/// their browser defaults. The descriptor makes the result observable for
/// logging and for idempotence checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSources {
    pub deploy: SlotSource,
    pub save: SlotSource,
    pub download: SlotSource,
    pub instructions: SlotSource,
}

impl SlotSources {
    pub(crate) fn browser_defaults() -> Self {
        Self {
            deploy: SlotSource::Browser,
            save: SlotSource::Browser,
            download: SlotSource::Browser,
            instructions: SlotSource::Browser,
        }
    }
}

/// One complete selection result: channel, strategy, slot descriptor and
/// the active packet transport.
///
/// `base_strategy`/`base_slots` are the channel bindings before extension
/// overrides; keeping them lets override registration re-wrap the current
/// selection without a fresh probe pass.
pub(crate) struct Selection {
    pub(crate) channel: DeploymentChannel,
    pub(crate) base_strategy: Arc<dyn DeployStrategy>,
    pub(crate) base_slots: SlotSources,
    pub(crate) strategy: Arc<dyn DeployStrategy>,
    pub(crate) slots: SlotSources,
    pub(crate) packet_io: Arc<dyn PacketIoTransport>,
}

/// Process-wide command table.
///
/// Single writer (the engine); readers clone the inner `Arc` once per
/// deploy, so an in-flight deploy never observes a half-updated table.
pub struct CommandTable {
    active: RwLock<Arc<Selection>>,
}

impl CommandTable {
    pub(crate) fn new(selection: Selection) -> Self {
        Self {
            active: RwLock::new(Arc::new(selection)),
        }
    }

    /// Takes a consistent snapshot of the current bindings.
    pub fn snapshot(&self) -> CommandView {
        CommandView {
            selection: self.active.read().unwrap().clone(),
        }
    }

    /// Atomically replaces the whole selection.
    pub(crate) fn replace(&self, selection: Selection) {
        *self.active.write().unwrap() = Arc::new(selection);
    }

    pub fn channel(&self) -> DeploymentChannel {
        self.active.read().unwrap().channel
    }

    pub fn slots(&self) -> SlotSources {
        self.active.read().unwrap().slots
    }
}
