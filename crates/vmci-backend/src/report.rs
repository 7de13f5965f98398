//! Assembly report aggregating the target and stage timings.

use std::fmt;
use std::time::Duration;

use vmci_targets::TargetDescription;

use crate::backend::Backend;
use crate::timer::TimingLog;

/// Time spent in one assembly stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTiming {
    pub name: &'static str,
    /// Nesting depth of the stage's timer.
    pub depth: usize,
    pub elapsed: Duration,
}

/// Summary of a successful assembly run.
#[derive(Debug, Clone)]
pub struct AssemblyReport {
    /// Canonical architecture identifier.
    pub architecture: &'static str,
    /// The target the backend was built for.
    pub target: TargetDescription,
    /// `(role, implementation name)` for each provider in the bundle.
    pub providers: Vec<(&'static str, String)>,
    /// Stage timings, in the order the stages started.
    pub stages: Vec<StageTiming>,
    /// Total assembly duration.
    pub total: Duration,
}

impl AssemblyReport {
    pub fn new(
        target: TargetDescription,
        backend: &Backend,
        timings: &TimingLog,
        total: Duration,
    ) -> Self {
        let stages = timings
            .entries()
            .into_iter()
            .map(|e| StageTiming {
                name: e.name,
                depth: e.depth,
                elapsed: e.elapsed.unwrap_or_default(),
            })
            .collect();
        let providers = backend
            .provider_names()
            .into_iter()
            .map(|(role, name)| (role, name.to_string()))
            .collect();
        Self {
            architecture: target.arch().name(),
            target,
            providers,
            stages,
            total,
        }
    }

    /// Look up a stage timing by name.
    pub fn stage(&self, name: &str) -> Option<&StageTiming> {
        self.stages.iter().find(|s| s.name == name)
    }
}

impl fmt::Display for AssemblyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Assembly Report ===")?;
        writeln!(f, "Architecture: {} (Backend:{})", self.architecture, self.architecture)?;
        writeln!(f, "Duration: {} us", self.total.as_micros())?;
        writeln!(f)?;
        writeln!(f, "{}", self.target)?;

        writeln!(f)?;
        writeln!(f, "--- Providers ---")?;
        for (role, name) in &self.providers {
            writeln!(f, "  {role:<20} {name}")?;
        }

        if !self.stages.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- Stages ({}) ---", self.stages.len())?;
            for stage in &self.stages {
                writeln!(
                    f,
                    "  {:indent$}{}: {} us",
                    "",
                    stage.name,
                    stage.elapsed.as_micros(),
                    indent = stage.depth * 2
                )?;
            }
        }

        Ok(())
    }
}
