//! Packet I/O strategy for WebUSB and HID bridge channels.

use crate::recovery;
use crate::strategies::browser::BrowserStrategy;
use crate::strategy::{
    CommandFuture, CommandView, DeployOptions, DeployOutcome, DeployStrategy, StrategyCtx,
};

use microflash_artifact::CompileResult;

/// Deploys over the selection's active packet transport with the full
/// recovery workflow; every other slot keeps the browser default.
pub(crate) struct PacketStrategy {
    ctx: StrategyCtx,
    browser: BrowserStrategy,
}

impl PacketStrategy {
    pub(crate) fn new(ctx: StrategyCtx, browser: BrowserStrategy) -> Self {
        Self { ctx, browser }
    }
}

impl DeployStrategy for PacketStrategy {
    fn deploy_core<'a>(
        &'a self,
        view: &'a CommandView,
        artifact: &'a CompileResult,
        opts: &'a DeployOptions,
    ) -> CommandFuture<'a, DeployOutcome> {
        Box::pin(recovery::packet_deploy(
            &self.ctx,
            &self.browser,
            view,
            artifact,
            opts,
        ))
    }

    fn save_only<'a>(
        &'a self,
        view: &'a CommandView,
        artifact: &'a CompileResult,
    ) -> CommandFuture<'a, DeployOutcome> {
        self.browser.save_only(view, artifact)
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
