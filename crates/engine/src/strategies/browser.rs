//! Browser download strategy, the default binding of every slot.

use tracing::debug;

use microflash_artifact::CompileResult;
use microflash_transport::{DownloadPayload, DownloadTicket};
use microflash_ui::{ConfirmOptions, DialogButton};

use crate::error::DeployError;
use crate::strategy::{
    CommandFuture, CommandView, DeployOptions, DeployOutcome, DeployStrategy, StrategyCtx,
};

const SAVE_FAILED_MSG: &str = "Saving the file failed, please try again.";

/// Delivers artifacts through the browser's download machinery.
#[derive(Clone)]
pub(crate) struct BrowserStrategy {
    ctx: StrategyCtx,
}

impl BrowserStrategy {
    pub(crate) fn new(ctx: StrategyCtx) -> Self {
        Self { ctx }
    }

    /// Downloads the primary output, then decides whether the upload
    /// instructions dialog should follow.
    ///
    /// Backs both `deploy_core` and `save_only` on the browser channel;
    /// the artifact's `save_only` hint and the download context drive the
    /// dialog decision.
    pub(crate) async fn download_deploy(
        &self,
        view: &CommandView,
        artifact: &CompileResult,
    ) -> Result<DeployOutcome, DeployError> {
        let profile = &self.ctx.profile;
        let out = artifact
            .output(&profile.output_name)
            .ok_or_else(|| DeployError::MissingOutput(profile.output_name.clone()))?;
        let name = artifact.file_name(profile.extension());

        let ticket = match self
            .ctx
            .deps
            .downloader
            .download(
                out.into(),
                &name,
                &profile.mime_type,
                artifact.ui_context.as_ref(),
            )
            .await
        {
            Ok(ticket) => ticket,
            Err(e) => {
                self.ctx.deps.notifier.error(SAVE_FAILED_MSG);
                return Err(e.into());
            }
        };
        debug!(file = %name, "browser download issued");

        // A failed compile still delivers the file; no dialog follows.
        if !artifact.success {
            return Ok(DeployOutcome::Downloaded { url: ticket.url });
        }

        if self.wants_instructions(artifact, &ticket) {
            view.show_upload_instructions(&name, ticket.url.as_deref())
                .await
        } else {
            Ok(DeployOutcome::Downloaded { url: ticket.url })
        }
    }

    /// Dialog decision: saving inside a user-gesture context behaves like a
    /// download and warrants the dialog; a same-window download outside one
    /// already navigated away and does not.
    fn wants_instructions(&self, artifact: &CompileResult, ticket: &DownloadTicket) -> bool {
        if artifact.save_only {
            ticket.within_user_context
        } else {
            !(ticket.same_window && !ticket.within_user_context)
        }
    }
}

impl DeployStrategy for BrowserStrategy {
    fn deploy_core<'a>(
        &'a self,
        view: &'a CommandView,
        artifact: &'a CompileResult,
        _opts: &'a DeployOptions,
    ) -> CommandFuture<'a, DeployOutcome> {
        Box::pin(self.download_deploy(view, artifact))
    }

    fn save_only<'a>(
        &'a self,
        view: &'a CommandView,
        artifact: &'a CompileResult,
    ) -> CommandFuture<'a, DeployOutcome> {
        Box::pin(self.download_deploy(view, artifact))
    }

    fn browser_download<'a>(
        &'a self,
        _view: &'a CommandView,
        text: &'a str,
        name: &'a str,
        content_type: &'a str,
    ) -> CommandFuture<'a, DeployOutcome> {
        Box::pin(async move {
            match self
                .ctx
                .deps
                .downloader
                .download(DownloadPayload::Text(text), name, content_type, None)
                .await
            {
                Ok(ticket) => Ok(DeployOutcome::Downloaded { url: ticket.url }),
                Err(e) => {
                    self.ctx.deps.notifier.error(SAVE_FAILED_MSG);
                    Err(e.into())
                }
            }
        })
    }

    fn show_upload_instructions<'a>(
        &'a self,
        _view: &'a CommandView,
        file_name: &'a str,
        url: Option<&'a str>,
    ) -> CommandFuture<'a, DeployOutcome> {
        Box::pin(async move {
            let profile = &self.ctx.profile;
            let body = format!(
                "Move the {} file to the {} drive to transfer the code into your {}.",
                profile.extension(),
                profile.drive_name,
                profile.board_name
            );
            let mut options = ConfirmOptions::new("Download completed...", body).hide_agree();
            options.hide_cancel = true;
            options.has_close_icon = true;
            options.timeout_ms = 10_000;
            if let Some(url) = url {
                options = options.button(DialogButton {
                    label: "Click to download again".into(),
                    icon: Some("download".into()),
                    url: Some(url.into()),
                    file_name: Some(file_name.into()),
                });
            }
            if let Some(docs) = &profile.usb_docs_url {
                options = options.button(DialogButton {
                    label: "Help".into(),
                    icon: Some("help".into()),
                    url: Some(docs.clone()),
                    file_name: None,
                });
            }
            self.ctx.deps.prompt.confirm(options).await;
            Ok(DeployOutcome::InstructionsShown)
        })
    }
}
