//! Electron shell strategy: deploy by copying onto the board drive.

use std::sync::Arc;

use tracing::debug;

use microflash_artifact::CompileResult;
use microflash_transport::ElectronShell;

use crate::strategies::browser::BrowserStrategy;
use crate::strategy::{
    CommandFuture, CommandView, DeployOptions, DeployOutcome, DeployStrategy,
};

pub(crate) struct ElectronStrategy {
    shell: Arc<dyn ElectronShell>,
    browser: BrowserStrategy,
}

impl ElectronStrategy {
    pub(crate) fn new(shell: Arc<dyn ElectronShell>, browser: BrowserStrategy) -> Self {
        Self { shell, browser }
    }
}

impl DeployStrategy for ElectronStrategy {
    fn deploy_core<'a>(
        &'a self,
        _view: &'a CommandView,
        artifact: &'a CompileResult,
        _opts: &'a DeployOptions,
    ) -> CommandFuture<'a, DeployOutcome> {
        Box::pin(async move {
            debug!("electron drive deploy");
            self.shell.drive_deploy(artifact).await?;
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
