//! Transport capability probe.
//!
//! Answers one question for the deploy engine: which transports are
//! physically available right now? A [`HostProbe`] reads platform state and
//! returns a [`HostFacts`] snapshot; [`EnvironmentFacts::gather`] combines
//! that snapshot with the active [`TargetProfile`] and the engine's
//! paired-once state into the immutable input of one channel-selection pass.
//!
//! Probing is side-effect free and never cached: pairing or target changes
//! invalidate prior facts, so the engine snapshots again on every selection.

pub mod facts;
pub mod target;

pub use facts::{EnvironmentFacts, HostFacts};
pub use target::TargetProfile;

/// Reads the current host environment.
///
/// Implementations live in the embedding application (browser shell,
/// desktop shell, test harness). `snapshot` must reflect the state at call
/// time and must not mutate anything.
pub trait HostProbe: Send + Sync {
    fn snapshot(&self) -> HostFacts;
}

/// Probe returning a fixed snapshot.
///
/// Useful for embedders whose capabilities are static, and for tests.
#[derive(Debug, Clone, Default)]
pub struct FixedProbe {
    facts: HostFacts,
}

impl FixedProbe {
    pub fn new(facts: HostFacts) -> Self {
        Self { facts }
    }
}

impl HostProbe for FixedProbe {
    fn snapshot(&self) -> HostFacts {
        self.facts.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_probe_returns_given_facts() {
        let probe = FixedProbe::new(HostFacts {
            winrt: true,
            ..HostFacts::default()
        });
        assert!(probe.snapshot().winrt);
        assert!(!probe.snapshot().electron);
    }
}
