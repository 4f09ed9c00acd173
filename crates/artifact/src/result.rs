//! The artifact bundle handed to the deploy engine after a compile.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::output::OutputFile;

/// Opaque handle to the UI context a compile was started from.
///
/// Browser download collaborators need it to route a download into the
/// window that initiated the build. The engine never looks inside.
#[derive(Clone)]
pub struct UiContext(Arc<dyn Any + Send + Sync>);

impl UiContext {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Downcasts the handle back to its concrete type.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for UiContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UiContext(..)")
    }
}

/// Output bundle of one compile, read-only to the deploy engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResult {
    /// Whether the compile succeeded. A failed compile is never sent to a
    /// device; it is routed to the browser download path instead.
    pub success: bool,
    /// Named output files, keyed by output name (e.g. `binary.uf2`).
    #[serde(default)]
    pub outputs: BTreeMap<String, OutputFile>,
    /// Suggested base name (no extension) for downloaded files.
    #[serde(default)]
    pub download_file_base_name: String,
    /// Hint that the user asked to save the file rather than flash it.
    #[serde(default, skip_serializing_if = "is_false")]
    pub save_only: bool,
    /// UI context the compile was started from, if any.
    #[serde(skip)]
    pub ui_context: Option<UiContext>,
}

fn is_false(v: &bool) -> bool {
    !v
}

impl CompileResult {
    /// Creates a successful, empty result with the given base name.
    pub fn new(download_file_base_name: impl Into<String>) -> Self {
        Self {
            success: true,
            download_file_base_name: download_file_base_name.into(),
            ..Self::default()
        }
    }

    /// Adds an output file, builder style.
    pub fn with_output(mut self, name: impl Into<String>, file: OutputFile) -> Self {
        self.outputs.insert(name.into(), file);
        self
    }

    /// Returns the output with the given name, if present.
    pub fn output(&self, name: &str) -> Option<&OutputFile> {
        self.outputs.get(name)
    }

    /// File name to save or flash under, `base + extension`.
    ///
    /// The base name is sanitized for use as a plain file name; an empty
    /// base falls back to `untitled`.
    pub fn file_name(&self, extension: &str) -> String {
        let base = self.download_file_base_name.trim();
        let base = if base.is_empty() { "untitled" } else { base };
        let mut name: String = base
            .chars()
            .map(|c| {
                if c.is_whitespace() || c == '/' || c == '\\' {
                    '-'
                } else {
                    c
                }
            })
            .collect();
        name.push_str(extension);
        name
    }
}
