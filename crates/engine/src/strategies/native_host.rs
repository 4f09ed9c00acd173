//! Native webview host strategy: artifacts posted over the host bridge.

use std::sync::Arc;

use tracing::debug;

use microflash_artifact::CompileResult;
use microflash_transport::{NativeHostBridge, NativeHostKind, NativeHostMessage};

use crate::error::DeployError;
use crate::strategies::browser::BrowserStrategy;
use crate::strategy::{
    CommandFuture, CommandView, DeployOptions, DeployOutcome, DeployStrategy, StrategyCtx,
};

pub(crate) struct NativeHostStrategy {
    ctx: StrategyCtx,
    bridge: Arc<dyn NativeHostBridge>,
    browser: BrowserStrategy,
}

impl NativeHostStrategy {
    pub(crate) fn new(
        ctx: StrategyCtx,
        bridge: Arc<dyn NativeHostBridge>,
        browser: BrowserStrategy,
    ) -> Self {
        Self {
            ctx,
            bridge,
            browser,
        }
    }

    async fn post(
        &self,
        artifact: &CompileResult,
        kind: NativeHostKind,
    ) -> Result<DeployOutcome, DeployError> {
        let profile = &self.ctx.profile;
        let out = artifact
            .output(&profile.output_name)
            .ok_or_else(|| DeployError::MissingOutput(profile.output_name.clone()))?;
        self.bridge
            .post(NativeHostMessage {
                name: artifact.download_file_base_name.clone(),
                kind,
                content: out.clone(),
            })
            .await?;
        Ok(match kind {
            NativeHostKind::Download => DeployOutcome::Flashed,
            NativeHostKind::Save => DeployOutcome::Saved,
        })
    }
}

impl DeployStrategy for NativeHostStrategy {
    fn deploy_core<'a>(
        &'a self,
        _view: &'a CommandView,
        artifact: &'a CompileResult,
        _opts: &'a DeployOptions,
    ) -> CommandFuture<'a, DeployOutcome> {
        Box::pin(async move {
            debug!("native host deploy");
            self.ctx.deps.notifier.info("Flashing device...");
            self.post(artifact, NativeHostKind::Download).await
        })
    }

    fn save_only<'a>(
        &'a self,
        _view: &'a CommandView,
        artifact: &'a CompileResult,
    ) -> CommandFuture<'a, DeployOutcome> {
        Box::pin(async move {
            debug!("native host save");
            self.ctx.deps.notifier.info("Saving file...");
            self.post(artifact, NativeHostKind::Save).await
        })
    }

    fn browser_download<'a>(
        &'a self,
        view: &'a CommandView,
        text: &'a str,
        name: &'a str,
        content_type: &'a str,
    ) -> CommandFuture<'a, DeployOutcome> {
        self.browser.browser_download(view, text, name, content_type)
    }

    fn show_upload_instructions<'a>(
        &'a self,
        view: &'a CommandView,
        file_name: &'a str,
        url: Option<&'a str>,
    ) -> CommandFuture<'a, DeployOutcome> {
        self.browser.show_upload_instructions(view, file_name, url)
    }
}
