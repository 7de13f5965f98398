//! Provider assembly.
//!
//! Builds a [`Backend`] in a fixed dependency order:
//! capabilities -> target -> register config -> providers -> bundle.
//! Each step runs inside an [`InitTimer`] scope. The first failing step
//! aborts the whole sequence; nothing partially built escapes.

use std::sync::Arc;
use std::time::Instant;

use vmci_targets::loongarch64::{compute_features, compute_flags};
use vmci_targets::target::USE_COMPRESSED_OOPS;
use vmci_targets::{LoongArch64, TargetDescription};

use crate::backend::Backend;
use crate::error::{BackendError, Component, ProviderError, Result};
use crate::factory::BackendHooks;
use crate::report::AssemblyReport;
use crate::runtime::Runtime;
use crate::timer::{InitTimer, TimingLog};

/// Progress of a single assembly run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyStage {
    /// Nothing built yet.
    Start,
    /// Capability and flag sets translated from the store.
    CapabilitiesTranslated,
    /// Target description fixed.
    TargetBuilt,
    RegisterConfigBuilt,
    /// All four providers constructed.
    ProvidersConstructed,
    /// The [`Backend`] is ready.
    BundleAssembled,
    /// A construction step failed; the run produced nothing.
    Aborted,
}

struct Progress {
    stage: AssemblyStage,
}

impl Progress {
    fn new() -> Self {
        Self {
            stage: AssemblyStage::Start,
        }
    }

    fn advance(&mut self, next: AssemblyStage) {
        log::trace!("assembly: {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    /// Pass a construction result through, turning failure into an abort.
    ///
    /// On failure the run moves to [`AssemblyStage::Aborted`]; the error
    /// carries the last stage that completed.
    fn check<T>(
        &mut self,
        component: Component,
        result: std::result::Result<T, ProviderError>,
    ) -> Result<T> {
        result.map_err(|source| {
            let completed = self.stage;
            log::debug!("assembly: failed to create {component} after {completed:?}: {source}");
            self.advance(AssemblyStage::Aborted);
            BackendError::Construction {
                component,
                stage: completed,
                source,
            }
        })
    }
}

/// Run the full assembly sequence.
pub fn assemble<H>(hooks: &H, runtime: &dyn Runtime) -> Result<Backend>
where
    H: BackendHooks + ?Sized,
{
    run(hooks, runtime, &TimingLog::new()).map(|(backend, _)| backend)
}

/// Run the full assembly sequence and report per-stage timings.
pub fn assemble_with_report<H>(hooks: &H, runtime: &dyn Runtime) -> Result<(Backend, AssemblyReport)>
where
    H: BackendHooks + ?Sized,
{
    let timings = TimingLog::new();
    let (backend, total) = run(hooks, runtime, &timings)?;
    let report = AssemblyReport::new(backend.target().clone(), &backend, &timings, total);
    Ok((backend, report))
}

fn run<H>(hooks: &H, runtime: &dyn Runtime, timings: &TimingLog) -> Result<(Backend, std::time::Duration)>
where
    H: BackendHooks + ?Sized,
{
    let start = Instant::now();
    let mut progress = Progress::new();

    // Steps 1-2: translate the store and fix the target.
    let (target, compressed_oops) = {
        let _t = InitTimer::recording("compute target", timings);
        let store = runtime.config_store();
        let features = compute_features(store, &hooks.capability_aliases());
        let flags = compute_flags(store);
        progress.advance(AssemblyStage::CapabilitiesTranslated);

        let compressed_oops = store.is_set(USE_COMPRESSED_OOPS);
        let target = TargetDescription::new(LoongArch64::new(features, flags), compressed_oops);
        progress.advance(AssemblyStage::TargetBuilt);
        (Arc::new(target), compressed_oops)
    };

    // Steps 3-7: register config, then the four providers.
    let (meta_access, code_cache, constant_reflection, stack_introspection) = {
        let _t = InitTimer::recording("create providers", timings);

        let register_config = {
            let _t = InitTimer::recording("create RegisterConfig", timings);
            progress.check(
                Component::RegisterConfig,
                hooks.create_register_config(&target, compressed_oops),
            )?
        };
        progress.advance(AssemblyStage::RegisterConfigBuilt);

        let meta_access = {
            let _t = InitTimer::recording("create MetaAccess provider", timings);
            progress.check(Component::MetaAccess, hooks.create_meta_access(runtime))?
        };
        let code_cache = {
            let _t = InitTimer::recording("create CodeCache provider", timings);
            progress.check(
                Component::CodeCache,
                hooks.create_code_cache(runtime, &target, &register_config),
            )?
        };
        let constant_reflection = {
            let _t = InitTimer::recording("create ConstantReflection provider", timings);
            progress.check(
                Component::ConstantReflection,
                hooks.create_constant_reflection(runtime),
            )?
        };
        let stack_introspection = {
            let _t = InitTimer::recording("create StackIntrospection provider", timings);
            progress.check(
                Component::StackIntrospection,
                hooks.create_stack_introspection(runtime),
            )?
        };
        progress.advance(AssemblyStage::ProvidersConstructed);
        (meta_access, code_cache, constant_reflection, stack_introspection)
    };

    let backend = {
        let _t = InitTimer::recording("instantiate backend", timings);
        hooks.create_bundle(meta_access, code_cache, constant_reflection, stack_introspection)
    };
    progress.advance(AssemblyStage::BundleAssembled);

    let total = start.elapsed();
    log::info!(
        "assembled {} backend with {} features, {} flags in {} us",
        backend.target().arch().name(),
        backend.target().arch().features().len(),
        backend.target().arch().flags().len(),
        total.as_micros()
    );
    Ok((backend, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_check_moves_to_aborted() {
        let mut progress = Progress::new();
        progress.advance(AssemblyStage::TargetBuilt);

        let err = progress
            .check::<()>(
                Component::RegisterConfig,
                Err(ProviderError::failed("no registers")),
            )
            .unwrap_err();

        assert_eq!(progress.stage, AssemblyStage::Aborted);
        assert!(matches!(
            err,
            BackendError::Construction {
                component: Component::RegisterConfig,
                stage: AssemblyStage::TargetBuilt,
                ..
            }
        ));
    }

    #[test]
    fn successful_check_keeps_stage() {
        let mut progress = Progress::new();
        progress.advance(AssemblyStage::RegisterConfigBuilt);
        assert_eq!(progress.check(Component::MetaAccess, Ok(7)).unwrap(), 7);
        assert_eq!(progress.stage, AssemblyStage::RegisterConfigBuilt);
    }
}
