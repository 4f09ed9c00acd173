//! WinRT shell strategy.
//!
//! The HF2 split runs the packet recovery workflow under the flash
//! timeout; the custom split hands the deploy to the target's own logic in
//! the WinRT host. Both rebind save and browser download to the WinRT
//! implementations.

use std::sync::Arc;

use tracing::{debug, warn};

use microflash_artifact::CompileResult;
use microflash_transport::WinRtHost;

use crate::recovery;
use crate::strategies::browser::BrowserStrategy;
use crate::strategy::{
    CommandFuture, CommandView, DeployOptions, DeployOutcome, DeployStrategy, StrategyCtx,
};

pub(crate) struct WinRtStrategy {
    ctx: StrategyCtx,
    host: Arc<dyn WinRtHost>,
    hf2: bool,
    browser: BrowserStrategy,
}

impl WinRtStrategy {
    pub(crate) fn new(
        ctx: StrategyCtx,
        host: Arc<dyn WinRtHost>,
        hf2: bool,
        browser: BrowserStrategy,
    ) -> Self {
        Self {
            ctx,
            host,
            hf2,
            browser,
        }
    }
}

impl DeployStrategy for WinRtStrategy {
    fn deploy_core<'a>(
        &'a self,
        view: &'a CommandView,
        artifact: &'a CompileResult,
        opts: &'a DeployOptions,
    ) -> CommandFuture<'a, DeployOutcome> {
        if self.hf2 {
            Box::pin(recovery::winrt_deploy(
                &self.ctx,
                &self.browser,
                view,
                artifact,
                opts,
            ))
        } else {
            Box::pin(async move {
                debug!("winrt custom drive deploy");
                self.host.drive_deploy(artifact).await?;
                Ok(DeployOutcome::Flashed)
            })
        }
    }

    fn save_only<'a>(
        &'a self,
        _view: &'a CommandView,
        artifact: &'a CompileResult,
    ) -> CommandFuture<'a, DeployOutcome> {
        Box::pin(async move {
            match self.host.save(artifact).await {
                Ok(true) => self.ctx.deps.notifier.info("File saved!"),
                Ok(false) => {}
                Err(e) => {
                    warn!(error = %e, "winrt save failed");
                    self.ctx
                        .deps
                        .notifier
                        .error("Saving the file failed, please try again.");
                }
            }
            Ok(DeployOutcome::Saved)
        })
    }

    fn browser_download<'a>(
        &'a self,
        _view: &'a CommandView,
        text: &'a str,
        name: &'a str,
        content_type: &'a str,
    ) -> CommandFuture<'a, DeployOutcome> {
        Box::pin(async move {
            self.host.browser_download(text, name, content_type).await?;
            Ok(DeployOutcome::Downloaded { url: None })
        })
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
