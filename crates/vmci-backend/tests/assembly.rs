//! Integration tests for backend assembly through the LoongArch64 factory.

use std::collections::BTreeSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use vmci_backend::{
    AssemblyStage, Backend, BackendError, BackendFactory, BackendHooks, CodeCacheProvider,
    Component, ConstantReflectionProvider, HostRuntime, InitTimer, LoongArch64BackendFactory,
    MetaAccessProvider, ProviderError, RegisterConfig, Runtime, StackIntrospection,
    StandardHooks,
};
use vmci_config::{ConfigStore, MemoryConfigStore};
use vmci_targets::{Aliases, CpuFeature, Flag, TargetDescription};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Runtime that records which providers it was asked for and can be told
/// to fail one of them.
struct ScriptedRuntime {
    host: HostRuntime<MemoryConfigStore>,
    fail_at: Option<Component>,
    calls: Mutex<Vec<Component>>,
}

impl ScriptedRuntime {
    fn new(store: MemoryConfigStore) -> Self {
        Self {
            host: HostRuntime::new(store),
            fail_at: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing_at(store: MemoryConfigStore, component: Component) -> Self {
        Self {
            fail_at: Some(component),
            ..Self::new(store)
        }
    }

    fn calls(&self) -> Vec<Component> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, component: Component) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push(component);
        if self.fail_at == Some(component) {
            return Err(ProviderError::failed(format!("scripted failure of {component}")));
        }
        Ok(())
    }
}

impl Runtime for ScriptedRuntime {
    fn config_store(&self) -> &dyn ConfigStore {
        self.host.store()
    }

    fn new_meta_access(&self) -> Result<Arc<dyn MetaAccessProvider>, ProviderError> {
        self.enter(Component::MetaAccess)?;
        self.host.new_meta_access()
    }

    fn new_code_cache(
        &self,
        target: Arc<TargetDescription>,
        register_config: Arc<dyn RegisterConfig>,
    ) -> Result<Arc<dyn CodeCacheProvider>, ProviderError> {
        self.enter(Component::CodeCache)?;
        self.host.new_code_cache(target, register_config)
    }

    fn new_constant_reflection(&self) -> Result<Arc<dyn ConstantReflectionProvider>, ProviderError> {
        self.enter(Component::ConstantReflection)?;
        self.host.new_constant_reflection()
    }

    fn new_stack_introspection(&self) -> Result<Arc<dyn StackIntrospection>, ProviderError> {
        self.enter(Component::StackIntrospection)?;
        self.host.new_stack_introspection()
    }
}

/// Hooks that record register config and meta-access creation.
#[derive(Debug, Default)]
struct RecordingHooks {
    calls: Arc<Mutex<Vec<Component>>>,
}

impl BackendHooks for RecordingHooks {
    fn create_register_config(
        &self,
        target: &Arc<TargetDescription>,
        compressed_oops: bool,
    ) -> Result<Arc<dyn RegisterConfig>, ProviderError> {
        self.calls.lock().unwrap().push(Component::RegisterConfig);
        StandardHooks.create_register_config(target, compressed_oops)
    }

    fn create_meta_access(
        &self,
        runtime: &dyn Runtime,
    ) -> Result<Arc<dyn MetaAccessProvider>, ProviderError> {
        self.calls.lock().unwrap().push(Component::MetaAccess);
        runtime.new_meta_access()
    }
}

fn create(store: MemoryConfigStore) -> Backend {
    let runtime = ScriptedRuntime::new(store);
    LoongArch64BackendFactory::new()
        .create_backend(&runtime, None)
        .expect("assembly succeeds")
}

#[test]
fn empty_config_uses_fixed_constants() {
    init_logging();
    let backend = create(MemoryConfigStore::new());
    let target = backend.target();
    assert!(target.arch().features().is_empty());
    assert!(target.arch().flags().is_empty());
    assert!(target.addressing_64bit());
    assert_eq!(target.stack_alignment(), 16);
    assert_eq!(target.implicit_null_check_limit(), 4096);
    assert!(target.inline_objects());
    assert!(!target.compressed_oops());
}

#[test]
fn single_feature_constant() {
    let backend = create(MemoryConfigStore::new().with("LA64", 1));
    assert_eq!(
        backend.target().arch().features(),
        &BTreeSet::from([CpuFeature::La64])
    );
}

#[test]
fn flags_from_allow_list() {
    let backend = create(
        MemoryConfigStore::new()
            .with("useLSX", true)
            .with("useLASX", false),
    );
    assert_eq!(
        backend.target().arch().flags(),
        &BTreeSet::from([Flag::UseLsx])
    );
}

#[test]
fn compressed_oops_reaches_register_config() {
    let backend = create(MemoryConfigStore::new().with("useCompressedOops", true));
    assert!(backend.target().compressed_oops());
    let heap_base = backend.target().arch().register("s5").unwrap();
    assert!(backend.register_config().is_reserved(heap_base));
}

#[test]
fn host_backend_is_a_precondition_violation() {
    init_logging();
    let host = create(MemoryConfigStore::new());
    let runtime = ScriptedRuntime::new(MemoryConfigStore::new().with("LA64", 1));
    let factory = LoongArch64BackendFactory::new();

    let result = catch_unwind(AssertUnwindSafe(|| {
        factory.create_backend(&runtime, Some(&host))
    }));

    assert!(result.is_err(), "a host backend must not be accepted");
    assert!(runtime.calls().is_empty(), "no provider may be constructed");
    assert_eq!(InitTimer::depth(), 0);
}

#[test]
fn identifier_ignores_config() {
    let factory = LoongArch64BackendFactory::new();
    assert_eq!(factory.architecture(), "loongarch64");
    let _ = create(MemoryConfigStore::new().with("LA32", 1).with("useLASX", true));
    assert_eq!(factory.architecture(), "loongarch64");
    assert_eq!(factory.label(), format!("Backend:{}", factory.architecture()));
}

#[test]
fn providers_are_built_in_dependency_order() {
    let hooks = RecordingHooks::default();
    let calls = Arc::clone(&hooks.calls);
    let factory = LoongArch64BackendFactory::with_hooks(hooks);
    let runtime = ScriptedRuntime::new(MemoryConfigStore::new());

    factory.create_backend(&runtime, None).unwrap();

    let mut order = calls.lock().unwrap().clone();
    // runtime-side calls, minus the meta-access one the hook already logged
    order.extend(
        runtime
            .calls()
            .into_iter()
            .filter(|c| *c != Component::MetaAccess),
    );
    assert_eq!(
        order,
        [
            Component::RegisterConfig,
            Component::MetaAccess,
            Component::CodeCache,
            Component::ConstantReflection,
            Component::StackIntrospection,
        ]
    );
}

#[test]
fn failure_aborts_remaining_stages() {
    init_logging();
    let runtime = ScriptedRuntime::failing_at(MemoryConfigStore::new(), Component::CodeCache);
    let err = LoongArch64BackendFactory::new()
        .create_backend(&runtime, None)
        .unwrap_err();

    match err {
        BackendError::Construction {
            component, stage, ..
        } => {
            assert_eq!(component, Component::CodeCache);
            assert_eq!(stage, AssemblyStage::RegisterConfigBuilt);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(runtime.calls(), [Component::MetaAccess, Component::CodeCache]);
    assert_eq!(InitTimer::depth(), 0, "every timer scope must be closed");
}

#[test]
fn failure_at_every_provider_is_reported() {
    for component in [
        Component::MetaAccess,
        Component::CodeCache,
        Component::ConstantReflection,
        Component::StackIntrospection,
    ] {
        let runtime = ScriptedRuntime::failing_at(MemoryConfigStore::new(), component);
        let err = LoongArch64BackendFactory::new()
            .create_backend(&runtime, None)
            .unwrap_err();
        assert!(
            matches!(err, BackendError::Construction { component: c, .. } if c == component),
            "expected failure at {component}, got {err}"
        );
        assert_eq!(runtime.calls().last(), Some(&component));
        assert_eq!(InitTimer::depth(), 0);
    }
}

#[test]
fn register_config_failure_builds_no_provider() {
    #[derive(Debug)]
    struct NoRegisters;

    impl BackendHooks for NoRegisters {
        fn create_register_config(
            &self,
            _target: &Arc<TargetDescription>,
            _compressed_oops: bool,
        ) -> Result<Arc<dyn RegisterConfig>, ProviderError> {
            Err(ProviderError::Unsupported {
                what: "register configuration",
            })
        }
    }

    let runtime = ScriptedRuntime::new(MemoryConfigStore::new());
    let err = LoongArch64BackendFactory::with_hooks(NoRegisters)
        .create_backend(&runtime, None)
        .unwrap_err();
    assert!(matches!(
        err,
        BackendError::Construction {
            component: Component::RegisterConfig,
            stage: AssemblyStage::TargetBuilt,
            ..
        }
    ));
    assert!(runtime.calls().is_empty());
}

#[test]
fn reassembly_yields_independent_equal_bundles() {
    let store = MemoryConfigStore::new()
        .with("LA64", 1)
        .with("LSX", 1)
        .with("useLSX", true)
        .with("useCompressedOops", true);
    let runtime = ScriptedRuntime::new(store);
    let factory = LoongArch64BackendFactory::new();

    let first = factory.create_backend(&runtime, None).unwrap();
    let second = factory.create_backend(&runtime, None).unwrap();

    assert!(!Arc::ptr_eq(first.code_cache(), second.code_cache()));
    assert!(!Arc::ptr_eq(first.meta_access(), second.meta_access()));
    assert_eq!(first.target(), second.target());
    // the runtime was asked for a full set of providers each time
    assert_eq!(runtime.calls().len(), 8);
}

#[test]
fn variant_hooks_translate_legacy_aliases() {
    #[derive(Debug)]
    struct LegacyNames;

    impl BackendHooks for LegacyNames {
        fn capability_aliases(&self) -> Aliases {
            Aliases::none().with("LBT_X86", "LBTX86")
        }
    }

    let factory = LoongArch64BackendFactory::with_hooks(LegacyNames);
    for name in ["LBTX86", "LBT_X86"] {
        let runtime = ScriptedRuntime::new(MemoryConfigStore::new().with(name, 1));
        let backend = factory.create_backend(&runtime, None).unwrap();
        assert!(
            backend.target().arch().has_feature(CpuFeature::LbtX86),
            "{name} should enable LBT_X86"
        );
    }
}

#[test]
fn report_lists_stages_in_order() {
    let runtime = HostRuntime::new(MemoryConfigStore::new().with("FP", 1));
    let (backend, report) = LoongArch64BackendFactory::new()
        .assemble_with_report(&runtime)
        .unwrap();

    let stages: Vec<_> = report.stages.iter().map(|s| (s.name, s.depth)).collect();
    assert_eq!(
        stages,
        [
            ("compute target", 0),
            ("create providers", 0),
            ("create RegisterConfig", 1),
            ("create MetaAccess provider", 1),
            ("create CodeCache provider", 1),
            ("create ConstantReflection provider", 1),
            ("create StackIntrospection provider", 1),
            ("instantiate backend", 0),
        ]
    );
    assert_eq!(&report.target, backend.target());
    assert!(report.stage("create providers").is_some());

    let text = report.to_string();
    assert!(text.contains("=== Assembly Report ==="));
    assert!(text.contains("Backend:loongarch64"));
    assert!(text.contains("host-code-cache"));
}

#[test]
fn bundle_is_readable_from_many_threads() {
    let backend = Arc::new(create(MemoryConfigStore::new().with("LASX", 1)));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let backend = Arc::clone(&backend);
            std::thread::spawn(move || backend.target().arch().has_feature(CpuFeature::Lasx))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
