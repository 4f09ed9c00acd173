//! Local development server deploy surface.

use microflash_artifact::CompileResult;
use serde::{Deserialize, Serialize};

use crate::TransportFuture;

/// Outcome of posting an artifact to the local development server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalDeployReport {
    /// HTTP status of the deploy request.
    pub status: u16,
    /// Number of boards the server flashed, when it reports one.
    #[serde(default)]
    pub board_count: Option<u32>,
}

impl LocalDeployReport {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// The local development server (`pxt serve`-style host).
///
/// Reachability and the auth token are probe facts; this trait only covers
/// the deploy call itself.
pub trait LocalServer: Send + Sync {
    /// Posts the artifact to the server's deploy endpoint.
    ///
    /// HTTP-level rejections are part of the report, not errors; an error
    /// means the request never completed.
    fn deploy<'a>(&'a self, artifact: &'a CompileResult) -> TransportFuture<'a, LocalDeployReport>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_ok_is_status_200() {
        assert!(
            LocalDeployReport {
                status: 200,
                board_count: Some(1)
            }
            .is_ok()
        );
        assert!(
            !LocalDeployReport {
                status: 403,
                board_count: None
            }
            .is_ok()
        );
    }
}
