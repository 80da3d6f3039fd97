//! Verbosity control for operator diagnostics.
//!
//! Operators emit records through the `log` facade. Which records they emit
//! is decided by the [`DiagnosticConfig`] passed to them, never by global
//! state, so two hierarchies in one process can run at different levels.

/// How much an operator reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
    /// Nothing.
    #[default]
    Quiet,
    /// One `debug` record per operator call.
    Summary,
    /// Summary records plus one `trace` record per face or coarse patch.
    Detailed,
}

/// Diagnostic settings carried in
/// [`TransferConfig`](crate::TransferConfig).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticConfig {
    /// Reporting level.
    pub verbosity: Verbosity,
}

impl DiagnosticConfig {
    /// Settings at the given verbosity.
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// `true` when per-call summaries are wanted.
    pub fn summary(&self) -> bool {
        self.verbosity >= Verbosity::Summary
    }

    /// `true` when per-face detail is wanted.
    pub fn detailed(&self) -> bool {
        self.verbosity >= Verbosity::Detailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_nest() {
        let quiet = DiagnosticConfig::default();
        assert!(!quiet.summary() && !quiet.detailed());
        let summary = DiagnosticConfig::new(Verbosity::Summary);
        assert!(summary.summary() && !summary.detailed());
        let detailed = DiagnosticConfig::new(Verbosity::Detailed);
        assert!(detailed.summary() && detailed.detailed());
    }
}
