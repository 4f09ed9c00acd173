//! Extension overrides: external collaborators replacing command slots.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

use microflash_artifact::CompileResult;
use microflash_transport::{PacketWrapper, passthrough_wrapper};
use microflash_ui::ConfirmChoice;

use crate::error::DeployError;
use crate::strategy::{CommandFuture, CommandView, DeployOptions, DeployOutcome, DeployStrategy};
use crate::table::{SlotSource, SlotSources};

/// Boxed future returned by override functions.
pub type OverrideFuture<T> = Pin<Box<dyn Future<Output = Result<T, DeployError>> + Send>>;

pub type DeployCoreFn =
    Arc<dyn Fn(Arc<CompileResult>, DeployOptions) -> OverrideFuture<DeployOutcome> + Send + Sync>;
pub type SaveOnlyFn =
    Arc<dyn Fn(Arc<CompileResult>) -> OverrideFuture<DeployOutcome> + Send + Sync>;
pub type BrowserDownloadFn =
    Arc<dyn Fn(String, String, String) -> OverrideFuture<DeployOutcome> + Send + Sync>;
pub type UploadInstructionsFn =
    Arc<dyn Fn(String, Option<String>) -> OverrideFuture<DeployOutcome> + Send + Sync>;
/// Replaces the bootloader re-pair dialog.
pub type PairDialogFn =
    Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ConfirmChoice> + Send>> + Send + Sync>;
/// Patches the block editor's definition document. Stored and exposed;
/// the editor applies it.
pub type EditorPatchFn = Arc<dyn Fn(serde_json::Value) -> serde_json::Value + Send + Sync>;
pub type TutorialCompletedFn = Arc<dyn Fn() + Send + Sync>;

/// Override record supplied by an external extension.
///
/// Populated fields replace the matching command slot or auxiliary hook;
/// empty fields leave the channel bindings alone. The record is re-applied
/// after every selection pass, so selection never clobbers an override.
#[derive(Clone, Default)]
pub struct ExtensionOverride {
    pub deploy_core: Option<DeployCoreFn>,
    pub save_only: Option<SaveOnlyFn>,
    pub browser_download: Option<BrowserDownloadFn>,
    pub show_upload_instructions: Option<UploadInstructionsFn>,
    pub packet_io_wrapper: Option<PacketWrapper>,
    pub pair_dialog: Option<PairDialogFn>,
    pub editor_patch: Option<EditorPatchFn>,
    pub tutorial_completed: Option<TutorialCompletedFn>,
}

impl ExtensionOverride {
    /// Whether any of the four command slots is overridden.
    pub fn overrides_commands(&self) -> bool {
        self.deploy_core.is_some()
            || self.save_only.is_some()
            || self.browser_download.is_some()
            || self.show_upload_instructions.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.overrides_commands()
            && self.packet_io_wrapper.is_none()
            && self.pair_dialog.is_none()
            && self.editor_patch.is_none()
            && self.tutorial_completed.is_none()
    }
}

impl fmt::Debug for ExtensionOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = Vec::new();
        if self.deploy_core.is_some() {
            set.push("deploy_core");
        }
        if self.save_only.is_some() {
            set.push("save_only");
        }
        if self.browser_download.is_some() {
            set.push("browser_download");
        }
        if self.show_upload_instructions.is_some() {
            set.push("show_upload_instructions");
        }
        if self.packet_io_wrapper.is_some() {
            set.push("packet_io_wrapper");
        }
        if self.pair_dialog.is_some() {
            set.push("pair_dialog");
        }
        if self.editor_patch.is_some() {
            set.push("editor_patch");
        }
        if self.tutorial_completed.is_some() {
            set.push("tutorial_completed");
        }
        f.debug_tuple("ExtensionOverride").field(&set).finish()
    }
}

/// Live auxiliary hooks shared between the engine and bound strategies.
///
/// Updated in place on override registration so the recovery workflow
/// picks up a new packet wrapper or pairing dialog without rebinding.
pub(crate) struct AuxHooks {
    pub(crate) wrapper: PacketWrapper,
    pub(crate) pair_dialog: Option<PairDialogFn>,
}

impl Default for AuxHooks {
    fn default() -> Self {
        Self {
            wrapper: passthrough_wrapper(),
            pair_dialog: None,
        }
    }
}

/// Flips the slot descriptor for every populated command override.
pub(crate) fn mark_slots(overrides: &ExtensionOverride, slots: &mut SlotSources) {
    if overrides.deploy_core.is_some() {
        debug!("extension deploy core bound");
        slots.deploy = SlotSource::Extension;
    }
    if overrides.save_only.is_some() {
        debug!("extension save only bound");
        slots.save = SlotSource::Extension;
    }
    if overrides.browser_download.is_some() {
        debug!("extension browser download bound");
        slots.download = SlotSource::Extension;
    }
    if overrides.show_upload_instructions.is_some() {
        debug!("extension upload instructions bound");
        slots.instructions = SlotSource::Extension;
    }
}

/// Decorator applying an [`ExtensionOverride`] on top of channel bindings.
///
/// Overridden operations run the extension's function; the rest delegate
/// to the channel strategy, with the view passed through unchanged so the
/// inner strategy's fallbacks still resolve against the decorated table.
pub(crate) struct OverrideStrategy {
    inner: Arc<dyn DeployStrategy>,
    overrides: ExtensionOverride,
}

impl OverrideStrategy {
    pub(crate) fn wrap(
        inner: Arc<dyn DeployStrategy>,
        overrides: ExtensionOverride,
    ) -> Arc<dyn DeployStrategy> {
        Arc::new(Self { inner, overrides })
    }
}

impl DeployStrategy for OverrideStrategy {
    fn deploy_core<'a>(
        &'a self,
        view: &'a CommandView,
        artifact: &'a CompileResult,
        opts: &'a DeployOptions,
    ) -> CommandFuture<'a, DeployOutcome> {
        match &self.overrides.deploy_core {
            Some(f) => f(Arc::new(artifact.clone()), opts.clone()),
            None => self.inner.deploy_core(view, artifact, opts),
        }
    }

    fn save_only<'a>(
        &'a self,
        view: &'a CommandView,
        artifact: &'a CompileResult,
    ) -> CommandFuture<'a, DeployOutcome> {
        match &self.overrides.save_only {
            Some(f) => f(Arc::new(artifact.clone())),
            None => self.inner.save_only(view, artifact),
        }
    }

    fn browser_download<'a>(
        &'a self,
        view: &'a CommandView,
        text: &'a str,
        name: &'a str,
        content_type: &'a str,
    ) -> CommandFuture<'a, DeployOutcome> {
        match &self.overrides.browser_download {
            Some(f) => f(text.to_string(), name.to_string(), content_type.to_string()),
            None => self.inner.browser_download(view, text, name, content_type),
        }
    }

    fn show_upload_instructions<'a>(
        &'a self,
        view: &'a CommandView,
        file_name: &'a str,
        url: Option<&'a str>,
    ) -> CommandFuture<'a, DeployOutcome> {
        match &self.overrides.show_upload_instructions {
            Some(f) => f(file_name.to_string(), url.map(str::to_string)),
            None => self.inner.show_upload_instructions(view, file_name, url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_override_reports_empty() {
        let overrides = ExtensionOverride::default();
        assert!(overrides.is_empty());
        assert!(!overrides.overrides_commands());
    }

    #[test]
    fn mark_slots_flips_only_populated_fields() {
        let overrides = ExtensionOverride {
            save_only: Some(Arc::new(|_artifact| {
                Box::pin(async { Ok(DeployOutcome::Saved) })
            })),
            ..ExtensionOverride::default()
        };
        let mut slots = SlotSources::browser_defaults();
        mark_slots(&overrides, &mut slots);
        assert_eq!(slots.save, SlotSource::Extension);
        assert_eq!(slots.deploy, SlotSource::Browser);
        assert_eq!(slots.download, SlotSource::Browser);
        assert_eq!(slots.instructions, SlotSource::Browser);
    }

    #[test]
    fn debug_lists_populated_fields() {
        let overrides = ExtensionOverride {
            tutorial_completed: Some(Arc::new(|| {})),
            ..ExtensionOverride::default()
        };
        let dbg = format!("{overrides:?}");
        assert!(dbg.contains("tutorial_completed"));
        assert!(!dbg.contains("deploy_core"));
    }
}
