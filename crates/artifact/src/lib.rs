//! Compiled artifact bundle shared across deploy channels.
//!
//! A [`CompileResult`] is the read-only output of the build pipeline: a set
//! of named output files plus the metadata the deploy engine needs to route
//! it (success flag, suggested file name, save-only hint). The engine never
//! mutates an artifact; it only reads fields and hands the bundle to a
//! transport or download collaborator.

pub mod output;
pub mod result;

pub use output::OutputFile;
pub use result::{CompileResult, UiContext};
