//! Deploy channel selection and recovery engine.
//!
//! This crate implements the **business logic** for delivering a compiled
//! artifact to a target device. It is a library crate with no UI or
//! transport dependencies; the embedding application provides the
//! collaborator implementations ([`EngineDeps`]) that bridge to real
//! WebUSB/HID/WinRT/shell plumbing.
//!
//! # Flow
//!
//! 1. **Probe** — snapshot which transports the host offers
//! 2. **Select** — pick exactly one [`DeploymentChannel`] by priority
//! 3. **Bind** — rebind the four deploy commands for that channel
//! 4. **Deploy** — run the bound command; paired-device channels recover
//!    from bootloader resets and missing devices internally
//! 5. **Fall back** — every failed path ends in a saved file, a browser
//!    download, or an instructional dialog

pub mod channel;
pub mod engine;
pub mod error;
pub mod events;
pub mod extension;
pub mod selector;
pub mod strategy;
pub mod table;

pub(crate) mod recovery;
pub(crate) mod strategies;

// Re-export primary types for convenience.
pub use channel::DeploymentChannel;
pub use engine::{Engine, EngineConfig, EngineDeps, PacketIoStatus};
pub use error::DeployError;
pub use events::EngineEvent;
pub use extension::{
    BrowserDownloadFn, DeployCoreFn, EditorPatchFn, ExtensionOverride, PairDialogFn, SaveOnlyFn,
    TutorialCompletedFn, UploadInstructionsFn,
};
pub use selector::choose_channel;
pub use strategy::{
    CommandView, DeployOptions, DeployOutcome, DeployStrategy, DeviceNotFoundReporter,
};
pub use table::{CommandTable, SlotSource, SlotSources};
