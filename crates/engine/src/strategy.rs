//! The deploy strategy seam: four operations, one consistent view.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use microflash_artifact::CompileResult;
use microflash_probe::TargetProfile;
use microflash_transport::PacketIoTransport;

use crate::channel::DeploymentChannel;
use crate::engine::{EngineConfig, EngineDeps};
use crate::error::DeployError;
use crate::events::EventSender;
use crate::extension::AuxHooks;
use crate::table::{Selection, SlotSources};

/// Boxed future returned by strategy operations.
pub type CommandFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, DeployError>> + Send + 'a>>;

/// What a deploy operation ended up doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeployOutcome {
    /// The artifact reached a device.
    Flashed,
    /// The artifact was delivered as a saved file.
    Saved,
    /// The artifact went through a browser download.
    Downloaded { url: Option<String> },
    /// The upload instructions dialog was shown.
    InstructionsShown,
    /// A caller-supplied device-not-found reporter took over.
    NotFoundReported,
}

/// Caller-supplied reporter invoked when no device can be found.
pub trait DeviceNotFoundReporter: Send + Sync {
    fn report<'a>(
        &'a self,
        troubleshoot_url: Option<&'a str>,
        artifact: &'a CompileResult,
    ) -> CommandFuture<'a, DeployOutcome>;
}

/// Per-deploy options threaded through the recovery workflow.
#[derive(Clone, Default)]
pub struct DeployOptions {
    /// Reporter for the device-not-found path. Without one the workflow
    /// falls back to save-only instead.
    pub report_device_not_found: Option<Arc<dyn DeviceNotFoundReporter>>,
    /// Cancellation signal honored at every suspend point. `None` lets the
    /// engine attach a child of its own shutdown token.
    pub cancel: Option<CancellationToken>,
}

impl DeployOptions {
    pub fn with_reporter(reporter: Arc<dyn DeviceNotFoundReporter>) -> Self {
        Self {
            report_device_not_found: Some(reporter),
            cancel: None,
        }
    }
}

/// A deploy strategy bound to one channel.
///
/// The four operations mirror the command table slots. Every operation
/// receives the [`CommandView`] it was invoked through so cross-slot calls
/// (fallbacks, instruction dialogs) stay inside the same table snapshot.
/// Extension overrides decorate the strategy, so routing through the view
/// keeps them in effect on the fallback paths too.
pub trait DeployStrategy: Send + Sync {
    fn deploy_core<'a>(
        &'a self,
        view: &'a CommandView,
        artifact: &'a CompileResult,
        opts: &'a DeployOptions,
    ) -> CommandFuture<'a, DeployOutcome>;

    fn save_only<'a>(
        &'a self,
        view: &'a CommandView,
        artifact: &'a CompileResult,
    ) -> CommandFuture<'a, DeployOutcome>;

    fn browser_download<'a>(
        &'a self,
        view: &'a CommandView,
        text: &'a str,
        name: &'a str,
        content_type: &'a str,
    ) -> CommandFuture<'a, DeployOutcome>;

    fn show_upload_instructions<'a>(
        &'a self,
        view: &'a CommandView,
        file_name: &'a str,
        url: Option<&'a str>,
    ) -> CommandFuture<'a, DeployOutcome>;
}

/// One consistent snapshot of the command table.
///
/// Taken at deploy entry; a deploy in flight keeps using its view even if
/// selection replaces the table underneath it.
#[derive(Clone)]
pub struct CommandView {
    pub(crate) selection: Arc<Selection>,
}

impl CommandView {
    pub fn channel(&self) -> DeploymentChannel {
        self.selection.channel
    }

    pub fn slots(&self) -> SlotSources {
        self.selection.slots
    }

    pub fn deploy_core<'a>(
        &'a self,
        artifact: &'a CompileResult,
        opts: &'a DeployOptions,
    ) -> CommandFuture<'a, DeployOutcome> {
        self.selection.strategy.deploy_core(self, artifact, opts)
    }

    pub fn save_only<'a>(
        &'a self,
        artifact: &'a CompileResult,
    ) -> CommandFuture<'a, DeployOutcome> {
        self.selection.strategy.save_only(self, artifact)
    }

    pub fn browser_download<'a>(
        &'a self,
        text: &'a str,
        name: &'a str,
        content_type: &'a str,
    ) -> CommandFuture<'a, DeployOutcome> {
        self.selection
            .strategy
            .browser_download(self, text, name, content_type)
    }

    pub fn show_upload_instructions<'a>(
        &'a self,
        file_name: &'a str,
        url: Option<&'a str>,
    ) -> CommandFuture<'a, DeployOutcome> {
        self.selection
            .strategy
            .show_upload_instructions(self, file_name, url)
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.selection.packet_io.is_connected()
    }
}

/// Shared state handed to every strategy at bind time.
#[derive(Clone)]
pub(crate) struct StrategyCtx {
    pub(crate) deps: EngineDeps,
    pub(crate) profile: Arc<TargetProfile>,
    pub(crate) config: EngineConfig,
    pub(crate) events: EventSender,
    /// Live auxiliary hooks (packet wrapper, pairing dialog). Shared with
    /// the engine so override registration takes effect without rebinding.
    pub(crate) hooks: Arc<std::sync::RwLock<AuxHooks>>,
    /// Packet transport the selection made active.
    pub(crate) packet_io: Arc<dyn PacketIoTransport>,
}
