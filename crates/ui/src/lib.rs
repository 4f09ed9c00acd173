//! User-interaction surface of the deploy engine.
//!
//! The engine never renders anything. All user-facing messaging goes
//! through [`Notifier`] (transient notifications) and [`UserPrompt`]
//! (blocking confirm dialogs), implemented by the embedding application.

pub mod dialog;
pub mod notify;

pub use dialog::{ConfirmChoice, ConfirmOptions, DialogButton, UserPrompt};
pub use notify::{Notifier, Severity};
