//! Events emitted by the engine for status displays.

use tokio::sync::mpsc;
use tracing::debug;

use crate::channel::DeploymentChannel;
use crate::strategy::DeployOutcome;
use crate::table::SlotSources;

/// Events emitted while selecting channels and running deploys.
///
/// Delivery is best effort: a full buffer drops the event rather than
/// blocking a deploy in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Channel selection ran and picked a channel.
    ChannelSelected { channel: DeploymentChannel },
    /// Extension overrides were (re-)applied to the command table.
    OverridesApplied { slots: SlotSources },
    /// A deploy entered the command table.
    DeployStarted { channel: DeploymentChannel },
    /// A deploy left the command table.
    DeployFinished {
        outcome: Result<DeployOutcome, String>,
    },
    /// The recovery workflow started a bootloader re-pair cycle.
    BootloaderRepair { attempt: u8 },
    /// The device was not found and a reporter took over.
    DeviceNotFound,
    /// The workflow gave up on the transport and saved instead.
    FellBackToSave,
    /// The WinRT flash timed out.
    FlashTimedOut,
    /// Best-effort disconnect after a failed flash itself failed.
    DisconnectFailed { message: String },
}

/// Cloneable sender half of the engine's event stream.
#[derive(Clone)]
pub(crate) struct EventSender {
    tx: mpsc::Sender<EngineEvent>,
}

impl EventSender {
    pub(crate) fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }

    pub(crate) fn emit(&self, event: EngineEvent) {
        if let Err(e) = self.tx.try_send(event) {
            debug!("dropping engine event: {e}");
        }
    }
}
