//! Blocking confirm dialogs.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Auxiliary button on a confirm dialog (download-again, help links).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialogButton {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Options for a blocking confirm dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfirmOptions {
    pub header: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agree_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disagree_label: Option<String>,
    pub hide_agree: bool,
    pub hide_cancel: bool,
    pub has_close_icon: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<DialogButton>,
    /// Auto-dismiss after this many milliseconds; `0` keeps the dialog up.
    pub timeout_ms: u64,
}

impl ConfirmOptions {
    pub fn new(header: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn agree_label(mut self, label: impl Into<String>) -> Self {
        self.agree_label = Some(label.into());
        self
    }

    pub fn disagree_label(mut self, label: impl Into<String>) -> Self {
        self.disagree_label = Some(label.into());
        self
    }

    pub fn hide_agree(mut self) -> Self {
        self.hide_agree = true;
        self
    }

    pub fn button(mut self, button: DialogButton) -> Self {
        self.buttons.push(button);
        self
    }
}

/// How the user resolved a confirm dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmChoice {
    Agreed,
    Declined,
    /// Closed without choosing, or auto-dismissed by the timeout.
    Dismissed,
}

/// Presents blocking dialogs to the user.
///
/// `confirm` resolves when the user acts (or the dialog times out); it
/// never fails. A dialog the host cannot show resolves as `Dismissed`.
pub trait UserPrompt: Send + Sync {
    fn confirm(
        &self,
        options: ConfirmOptions,
    ) -> Pin<Box<dyn Future<Output = ConfirmChoice> + Send + '_>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let options = ConfirmOptions::new("Download ready", "Move the file to the drive")
            .agree_label("Ok, got it")
            .button(DialogButton {
                label: "Help".into(),
                icon: Some("help".into()),
                url: Some("https://example.org/usb".into()),
                file_name: None,
            });
        assert_eq!(options.header, "Download ready");
        assert_eq!(options.agree_label.as_deref(), Some("Ok, got it"));
        assert_eq!(options.buttons.len(), 1);
        assert!(!options.hide_agree);
    }

    #[test]
    fn serde_omits_empty_optionals() {
        let json = serde_json::to_string(&ConfirmOptions::new("h", "b")).unwrap();
        assert!(!json.contains("agreeLabel"));
        assert!(!json.contains("buttons"));
        assert!(json.contains("\"header\":\"h\""));
    }
}
