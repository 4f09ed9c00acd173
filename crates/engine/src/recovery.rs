//! Recovery workflow for paired-device deploys.
//!
//! A deploy over packet I/O can fail in ways the user can fix: the device
//! rebooted into bootloader mode and lost its pairing, or it is simply not
//! plugged in. The workflow classifies nothing itself; transports report a
//! [`FailureKind`] and the workflow only walks an explicit state machine:
//!
//! `Attempting → {Succeeded, RepairingBootloader, ReportingNotFound,
//! FallingBackToSave}`
//!
//! Bootloader repair retries the whole deploy at most once per
//! configuration; a second classified repair failure propagates instead of
//! looping.

use std::sync::Arc;

use tracing::{debug, warn};

use microflash_artifact::CompileResult;
use microflash_transport::{FailureKind, TransportError};
use microflash_ui::ConfirmOptions;

use crate::error::DeployError;
use crate::events::EngineEvent;
use crate::strategies::browser::BrowserStrategy;
use crate::strategy::{
    CommandView, DeployOptions, DeployOutcome, DeviceNotFoundReporter, StrategyCtx,
};

/// States of one paired-device deploy.
enum RecoveryStage {
    Attempting,
    RepairingBootloader(TransportError),
    ReportingNotFound(Arc<dyn DeviceNotFoundReporter>),
    FallingBackToSave,
    Succeeded,
}

impl RecoveryStage {
    fn name(&self) -> &'static str {
        match self {
            RecoveryStage::Attempting => "attempting",
            RecoveryStage::RepairingBootloader(_) => "repairing-bootloader",
            RecoveryStage::ReportingNotFound(_) => "reporting-not-found",
            RecoveryStage::FallingBackToSave => "falling-back-to-save",
            RecoveryStage::Succeeded => "succeeded",
        }
    }
}

/// Runs a deploy over the active packet transport with recovery.
pub(crate) async fn packet_deploy(
    ctx: &StrategyCtx,
    browser: &BrowserStrategy,
    view: &CommandView,
    artifact: &CompileResult,
    opts: &DeployOptions,
) -> Result<DeployOutcome, DeployError> {
    // A failed compile is never sent to a device.
    if !artifact.success {
        debug!("compile failed, routing to browser download");
        return browser.download_deploy(view, artifact).await;
    }

    let mut repairs: u8 = 0;
    let mut stage = RecoveryStage::Attempting;
    loop {
        debug!(stage = stage.name(), "deploy recovery stage");
        stage = match stage {
            RecoveryStage::Attempting => {
                check_cancelled(opts)?;
                ctx.deps.notifier.info("Downloading...");
                let attempt = tokio::select! {
                    _ = cancelled(opts) => return Err(DeployError::Cancelled),
                    result = flash_once(ctx, artifact) => result,
                };
                match attempt {
                    Ok(()) => RecoveryStage::Succeeded,
                    Err(e) if e.kind == FailureKind::RepairBootloader => {
                        if repairs >= ctx.config.max_bootloader_repairs {
                            warn!(error = %e, "bootloader repair limit reached, giving up");
                            return Err(DeployError::BootloaderRepair(e));
                        }
                        RecoveryStage::RepairingBootloader(e)
                    }
                    Err(e)
                        if e.kind == FailureKind::DeviceNotFound
                            && opts.report_device_not_found.is_some() =>
                    {
                        match opts.report_device_not_found.clone() {
                            Some(reporter) => RecoveryStage::ReportingNotFound(reporter),
                            None => RecoveryStage::FallingBackToSave,
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "flash attempt failed, saving instead");
                        RecoveryStage::FallingBackToSave
                    }
                }
            }
            RecoveryStage::RepairingBootloader(cause) => {
                debug!(error = %cause, attempt = repairs + 1, "repairing bootloader pairing");
                ctx.events.emit(EngineEvent::BootloaderRepair {
                    attempt: repairs + 1,
                });
                check_cancelled(opts)?;
                pair_bootloader(ctx)
                    .await
                    .map_err(DeployError::BootloaderRepair)?;
                repairs += 1;
                RecoveryStage::Attempting
            }
            RecoveryStage::ReportingNotFound(reporter) => {
                ctx.events.emit(EngineEvent::DeviceNotFound);
                let url = ctx.profile.flashing_troubleshoot_url.as_deref();
                return reporter.report(url, artifact).await;
            }
            RecoveryStage::FallingBackToSave => {
                ctx.events.emit(EngineEvent::FellBackToSave);
                return view.save_only(artifact).await;
            }
            RecoveryStage::Succeeded => return Ok(DeployOutcome::Flashed),
        };
    }
}

/// One init + reflash pass over the active transport.
async fn flash_once(ctx: &StrategyCtx, artifact: &CompileResult) -> Result<(), TransportError> {
    let device = ctx.packet_io.init().await?;
    let wrapper = ctx.hooks.read().unwrap().wrapper.clone();
    let device = wrapper(device);
    device.reflash(artifact).await
}

/// Prompts the user and re-runs the pairing handshake.
///
/// The dialog primes the user for the pairing chooser that follows; its
/// answer is not gated on.
async fn pair_bootloader(ctx: &StrategyCtx) -> Result<(), TransportError> {
    debug!("pair bootloader");
    let dialog = ctx.hooks.read().unwrap().pair_dialog.clone();
    match dialog {
        Some(dialog) => {
            dialog().await;
        }
        None => {
            let options = ConfirmOptions::new(
                "Pair your device again",
                format!(
                    "Your {} restarted into bootloader mode and needs to be paired one more time.",
                    ctx.profile.board_name
                ),
            )
            .agree_label("Ok, pair!");
            ctx.deps.prompt.confirm(options).await;
        }
    }
    ctx.deps.usb.pair().await
}

/// Wraps [`packet_deploy`] with the WinRT flash timeout.
///
/// On timeout or hard failure: best-effort disconnect, then a blocking
/// notice, then save-only. The chain runs to the end even when the
/// disconnect fails.
pub(crate) async fn winrt_deploy(
    ctx: &StrategyCtx,
    browser: &BrowserStrategy,
    view: &CommandView,
    artifact: &CompileResult,
    opts: &DeployOptions,
) -> Result<DeployOutcome, DeployError> {
    let attempt = tokio::time::timeout(
        ctx.config.flash_timeout,
        packet_deploy(ctx, browser, view, artifact, opts),
    )
    .await;

    let failure = match attempt {
        Ok(Ok(outcome)) => return Ok(outcome),
        Ok(Err(DeployError::Cancelled)) => return Err(DeployError::Cancelled),
        Ok(Err(e)) => e,
        Err(_) => {
            ctx.events.emit(EngineEvent::FlashTimedOut);
            DeployError::Transport(TransportError::other("flash timed out"))
        }
    };
    warn!(error = %failure, "winrt flash failed, running disconnect fallback");

    if let Err(e) = ctx.packet_io.disconnect().await {
        // At this point the device state is unknown; report and move on.
        warn!(error = %e, "disconnect after failed flash also failed");
        ctx.events.emit(EngineEvent::DisconnectFailed {
            message: e.to_string(),
        });
    }

    let options = ConfirmOptions::new(
        "Something went wrong...",
        format!(
            "Flashing your {0} took too long. Please disconnect your {0} from your computer and try reconnecting it.",
            ctx.profile.board_name
        ),
    )
    .disagree_label("Ok")
    .hide_agree();
    ctx.deps.prompt.confirm(options).await;

    view.save_only(artifact).await
}

fn check_cancelled(opts: &DeployOptions) -> Result<(), DeployError> {
    if opts.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
        return Err(DeployError::Cancelled);
    }
    Ok(())
}

async fn cancelled(opts: &DeployOptions) {
    match &opts.cancel {
        Some(cancel) => cancel.cancelled().await,
        None => std::future::pending::<()>().await,
    }
}
