//! The engine facade: process-wide selection state and deploy entry points.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, RwLock};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use microflash_artifact::CompileResult;
use microflash_probe::{EnvironmentFacts, HostProbe, TargetProfile};
use microflash_transport::{
    BrowserDownloader, ElectronShell, LocalServer, NativeHostBridge, PacketIoTransport, WinRtHost,
    passthrough_wrapper,
};
use microflash_ui::{Notifier, UserPrompt};

use crate::channel::DeploymentChannel;
use crate::error::DeployError;
use crate::events::{EngineEvent, EventSender};
use crate::extension::{
    self, AuxHooks, EditorPatchFn, ExtensionOverride, OverrideStrategy, TutorialCompletedFn,
};
use crate::selector;
use crate::strategy::{DeployOptions, DeployOutcome};
use crate::table::{CommandTable, Selection, SlotSources};

/// Collaborator implementations the engine routes through.
///
/// Transports and shells that the host cannot offer stay `None`; selection
/// falls back to the browser bindings if a channel's collaborator turns
/// out to be missing.
#[derive(Clone)]
pub struct EngineDeps {
    pub notifier: Arc<dyn Notifier>,
    pub prompt: Arc<dyn UserPrompt>,
    pub downloader: Arc<dyn BrowserDownloader>,
    pub usb: Arc<dyn PacketIoTransport>,
    pub hid_bridge: Arc<dyn PacketIoTransport>,
    pub native_host: Option<Arc<dyn NativeHostBridge>>,
    pub electron: Option<Arc<dyn ElectronShell>>,
    pub winrt: Option<Arc<dyn WinRtHost>>,
    pub winrt_packet_io: Option<Arc<dyn PacketIoTransport>>,
    pub local_server: Option<Arc<dyn LocalServer>>,
}

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Hard bound on a WinRT flash before the disconnect fallback runs.
    pub flash_timeout: Duration,
    /// Bootloader re-pair cycles before a repair failure propagates.
    pub max_bootloader_repairs: u8,
    /// Capacity of the engine event channel.
    pub event_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            flash_timeout: Duration::from_secs(20),
            max_bootloader_repairs: 1,
            event_buffer: 64,
        }
    }
}

/// Read-only packet I/O status for polling status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PacketIoStatus {
    pub connected: bool,
    pub icon: &'static str,
}

/// Deployment channel selection and recovery engine.
///
/// Owns the active [`DeploymentChannel`] and the command table. Selection
/// state is process-wide: one engine instance serves one editor session.
pub struct Engine {
    deps: EngineDeps,
    config: EngineConfig,
    probe: Arc<dyn HostProbe>,
    profile: RwLock<Arc<TargetProfile>>,
    table: CommandTable,
    paired_once: AtomicBool,
    overrides: RwLock<Option<ExtensionOverride>>,
    hooks: Arc<RwLock<AuxHooks>>,
    /// Single-slot in-flight lock; a second deploy fails fast with `Busy`.
    in_flight: Mutex<()>,
    events_tx: EventSender,
    events_rx: StdMutex<Option<mpsc::Receiver<EngineEvent>>>,
    cancel: CancellationToken,
}

impl Engine {
    /// Creates an engine and runs the initial channel selection.
    pub fn new(probe: Arc<dyn HostProbe>, deps: EngineDeps, profile: TargetProfile) -> Self {
        Self::with_config(probe, deps, profile, EngineConfig::default())
    }

    pub fn with_config(
        probe: Arc<dyn HostProbe>,
        deps: EngineDeps,
        profile: TargetProfile,
        config: EngineConfig,
    ) -> Self {
        let (tx, rx) = mpsc::channel(config.event_buffer.max(1));
        let events_tx = EventSender::new(tx);
        let profile = Arc::new(profile);
        let hooks = Arc::new(RwLock::new(AuxHooks::default()));

        let facts = EnvironmentFacts::gather(&probe.snapshot(), &profile, false);
        let channel = selector::choose_channel(&facts);
        let selection = selector::build_selection(
            channel,
            &deps,
            &profile,
            &config,
            &events_tx,
            &hooks,
            &facts,
            None,
        );
        info!(channel = %channel, "deploy channel selected");
        events_tx.emit(EngineEvent::ChannelSelected { channel });

        Self {
            deps,
            config,
            probe,
            profile: RwLock::new(profile),
            table: CommandTable::new(selection),
            paired_once: AtomicBool::new(false),
            overrides: RwLock::new(None),
            hooks,
            in_flight: Mutex::new(()),
            events_tx,
            events_rx: StdMutex::new(Some(rx)),
            cancel: CancellationToken::new(),
        }
    }

    /// Re-runs probe, selection and table binding.
    ///
    /// Idempotent: unchanged facts produce the same channel and the same
    /// slot bindings.
    pub fn reselect(&self) {
        let profile = self.profile.read().unwrap().clone();
        let facts = EnvironmentFacts::gather(
            &self.probe.snapshot(),
            &profile,
            self.paired_once.load(Ordering::SeqCst),
        );
        let channel = selector::choose_channel(&facts);
        let overrides = self.overrides.read().unwrap().clone();
        let selection = selector::build_selection(
            channel,
            &self.deps,
            &profile,
            &self.config,
            &self.events_tx,
            &self.hooks,
            &facts,
            overrides.as_ref(),
        );
        info!(channel = %channel, "deploy channel selected");
        self.events_tx.emit(EngineEvent::ChannelSelected { channel });
        self.table.replace(selection);
    }

    /// Replaces the application target and re-runs selection.
    pub fn set_target(&self, profile: TargetProfile) {
        debug!("app target changed");
        *self.profile.write().unwrap() = Arc::new(profile);
        self.reselect();
    }

    /// Records the WebUSB paired-once state. No-op when unchanged;
    /// otherwise selection re-runs with the new fact.
    pub fn set_web_usb_paired(&self, paired: bool) {
        if self.paired_once.swap(paired, Ordering::SeqCst) == paired {
            return;
        }
        debug!(paired, "webusb pairing state changed");
        self.reselect();
    }

    /// Registers extension overrides and applies them to the current
    /// selection immediately, without a fresh probe pass. Subsequent
    /// re-selections keep re-applying them.
    pub fn set_extension_override(&self, overrides: ExtensionOverride) {
        debug!(overrides = ?overrides, "extension overrides registered");
        {
            let mut hooks = self.hooks.write().unwrap();
            hooks.wrapper = overrides
                .packet_io_wrapper
                .clone()
                .unwrap_or_else(passthrough_wrapper);
            hooks.pair_dialog = overrides.pair_dialog.clone();
        }
        *self.overrides.write().unwrap() = Some(overrides.clone());

        let view = self.table.snapshot();
        let sel = view.selection;
        let mut slots = sel.base_slots;
        let strategy = if overrides.overrides_commands() {
            extension::mark_slots(&overrides, &mut slots);
            OverrideStrategy::wrap(sel.base_strategy.clone(), overrides)
        } else {
            sel.base_strategy.clone()
        };
        self.table.replace(Selection {
            channel: sel.channel,
            base_strategy: sel.base_strategy.clone(),
            base_slots: sel.base_slots,
            strategy,
            slots,
            packet_io: sel.packet_io.clone(),
        });
        self.events_tx.emit(EngineEvent::OverridesApplied { slots });
    }

    /// Runs the bound deploy command for an artifact.
    ///
    /// Exactly one deploy runs at a time; the whole run uses the table
    /// snapshot taken here, even if selection replaces the table meanwhile.
    pub async fn deploy(
        &self,
        artifact: &CompileResult,
        opts: DeployOptions,
    ) -> Result<DeployOutcome, DeployError> {
        let _guard = self.in_flight.try_lock().map_err(|_| DeployError::Busy)?;
        let view = self.table.snapshot();
        self.events_tx.emit(EngineEvent::DeployStarted {
            channel: view.channel(),
        });
        let DeployOptions {
            report_device_not_found,
            cancel,
        } = opts;
        let opts = DeployOptions {
            report_device_not_found,
            cancel: Some(cancel.unwrap_or_else(|| self.cancel.child_token())),
        };
        let result = view.deploy_core(artifact, &opts).await;
        self.events_tx.emit(EngineEvent::DeployFinished {
            outcome: match &result {
                Ok(outcome) => Ok(outcome.clone()),
                Err(e) => Err(e.to_string()),
            },
        });
        result
    }

    /// Runs the bound save-only command.
    pub async fn save_only(&self, artifact: &CompileResult) -> Result<DeployOutcome, DeployError> {
        let view = self.table.snapshot();
        view.save_only(artifact).await
    }

    /// Runs the bound browser-download command.
    pub async fn browser_download(
        &self,
        text: &str,
        name: &str,
        content_type: &str,
    ) -> Result<DeployOutcome, DeployError> {
        let view = self.table.snapshot();
        view.browser_download(text, name, content_type).await
    }

    /// Runs the bound upload-instructions command.
    pub async fn show_upload_instructions(
        &self,
        file_name: &str,
        url: Option<&str>,
    ) -> Result<DeployOutcome, DeployError> {
        let view = self.table.snapshot();
        view.show_upload_instructions(file_name, url).await
    }

    /// Read-only status of the active packet transport.
    pub fn packet_io_status(&self) -> PacketIoStatus {
        PacketIoStatus {
            connected: self.table.snapshot().is_connected(),
            icon: "usb",
        }
    }

    pub fn active_channel(&self) -> DeploymentChannel {
        self.table.channel()
    }

    pub fn slot_sources(&self) -> SlotSources {
        self.table.slots()
    }

    /// Block-editor patch supplied by an extension, if any.
    pub fn editor_patch(&self) -> Option<EditorPatchFn> {
        self.overrides
            .read()
            .unwrap()
            .as_ref()
            .and_then(|o| o.editor_patch.clone())
    }

    /// Tutorial-completion hook supplied by an extension, if any.
    pub fn tutorial_completed(&self) -> Option<TutorialCompletedFn> {
        self.overrides
            .read()
            .unwrap()
            .as_ref()
            .and_then(|o| o.tutorial_completed.clone())
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&self) -> Option<mpsc::Receiver<EngineEvent>> {
        self.events_rx.lock().unwrap().take()
    }

    /// Root cancellation token; deploys run under children of it.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancels every in-flight deploy.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}
