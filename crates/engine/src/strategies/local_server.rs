//! Local development server strategy.

use std::sync::Arc;

use tracing::debug;

use microflash_artifact::CompileResult;
use microflash_transport::{LocalServer, TransportError};

use crate::error::DeployError;
use crate::strategies::browser::BrowserStrategy;
use crate::strategy::{
    CommandFuture, CommandView, DeployOptions, DeployOutcome, DeployStrategy, StrategyCtx,
};

pub(crate) struct LocalServerStrategy {
    ctx: StrategyCtx,
    server: Arc<dyn LocalServer>,
    browser: BrowserStrategy,
}

impl LocalServerStrategy {
    pub(crate) fn new(
        ctx: StrategyCtx,
        server: Arc<dyn LocalServer>,
        browser: BrowserStrategy,
    ) -> Self {
        Self {
            ctx,
            server,
            browser,
        }
    }
}

impl DeployStrategy for LocalServerStrategy {
    fn deploy_core<'a>(
        &'a self,
        _view: &'a CommandView,
        artifact: &'a CompileResult,
        _opts: &'a DeployOptions,
    ) -> CommandFuture<'a, DeployOutcome> {
        Box::pin(async move {
            debug!("local server deploy");
            self.ctx.deps.notifier.info("Uploading...");
            let report = self.server.deploy(artifact).await?;
            if !report.is_ok() {
                self.ctx
                    .deps
                    .notifier
                    .error("There was a problem, please try again.");
                return Err(DeployError::Transport(TransportError::other(format!(
                    "local server returned status {}",
                    report.status
                ))));
            }
            if report.board_count == Some(0) {
                self.ctx.deps.notifier.warning(&format!(
                    "Please connect your {} to your computer and try again.",
                    self.ctx.profile.board_name
                ));
            }
            Ok(DeployOutcome::Flashed)
        })
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
