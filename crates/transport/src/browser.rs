//! Browser download collaborator surface.

use microflash_artifact::{OutputFile, UiContext};
use serde::{Deserialize, Serialize};

use crate::TransportFuture;

/// Content handed to the browser downloader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadPayload<'a> {
    Text(&'a str),
    Binary(&'a [u8]),
}

impl<'a> From<&'a OutputFile> for DownloadPayload<'a> {
    fn from(file: &'a OutputFile) -> Self {
        match file {
            OutputFile::Text(s) => DownloadPayload::Text(s),
            OutputFile::Binary(b) => DownloadPayload::Binary(b),
        }
    }
}

/// What the browser did with a download, and in what context.
///
/// The downloader owns every browser quirk (data URIs, save-as support,
/// same-window navigation); the engine only branches on these fields when
/// deciding whether to show upload instructions afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DownloadTicket {
    /// URL the user can re-download from, when one exists.
    pub url: Option<String>,
    /// The download ran inside a user-gesture context (iOS-style flows
    /// where saving and downloading are the same action).
    pub within_user_context: bool,
    /// The download navigated the current window rather than saving.
    pub same_window: bool,
}

/// Delivers a file through the browser's download machinery.
pub trait BrowserDownloader: Send + Sync {
    fn download<'a>(
        &'a self,
        payload: DownloadPayload<'a>,
        name: &'a str,
        content_type: &'a str,
        ui_context: Option<&'a UiContext>,
    ) -> TransportFuture<'a, DownloadTicket>;
}
