//! Deploy engine error types.

use microflash_transport::TransportError;

/// Errors surfaced by deploy operations.
///
/// Most transport failures are absorbed inside the recovery workflow and
/// converted into a fallback action; what escapes here is either caller
/// misuse (`Busy`), an explicit stop (`Cancelled`), or the one transport
/// failure the engine gives up on (`BootloaderRepair`).
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("a deploy is already in flight")]
    Busy,

    #[error("deploy cancelled")]
    Cancelled,

    #[error("bootloader repair failed: {0}")]
    BootloaderRepair(#[source] TransportError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("artifact has no output named {0:?}")]
    MissingOutput(String),

    #[error("extension override failed: {0}")]
    Extension(String),
}

#[cfg(test)]
mod tests {
    use microflash_transport::TransportError;

    use super::*;

    #[test]
    fn display_strings() {
        assert_eq!(DeployError::Busy.to_string(), "a deploy is already in flight");
        let err = DeployError::BootloaderRepair(TransportError::repair_bootloader("again"));
        assert_eq!(
            err.to_string(),
            "bootloader repair failed: repairbootloader: again"
        );
    }

    #[test]
    fn transport_error_converts() {
        let err: DeployError = TransportError::other("usb stall").into();
        assert!(matches!(err, DeployError::Transport(_)));
    }
}
