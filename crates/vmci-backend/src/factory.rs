//! Backend factories and host-side factory selection.

use std::fmt;
use std::sync::Arc;

use vmci_targets::{loongarch64, Aliases, TargetDescription};

use crate::assembler;
use crate::backend::Backend;
use crate::error::{BackendError, ProviderError, Result};
use crate::register_config::{LoongArch64RegisterConfig, RegisterConfig};
use crate::report::AssemblyReport;
use crate::runtime::{
    CodeCacheProvider, ConstantReflectionProvider, MetaAccessProvider, Runtime, StackIntrospection,
};

/// Overridable construction steps of the assembly sequence.
///
/// Every method has a default; an architecture variant overrides only
/// the steps it builds differently and keeps the fixed ordering.
pub trait BackendHooks: fmt::Debug + Send + Sync {
    /// Legacy names under which the runtime publishes capabilities.
    fn capability_aliases(&self) -> Aliases {
        Aliases::none()
    }

    fn create_register_config(
        &self,
        target: &Arc<TargetDescription>,
        compressed_oops: bool,
    ) -> std::result::Result<Arc<dyn RegisterConfig>, ProviderError> {
        Ok(Arc::new(LoongArch64RegisterConfig::new(
            Arc::clone(target),
            compressed_oops,
        )))
    }

    fn create_meta_access(
        &self,
        runtime: &dyn Runtime,
    ) -> std::result::Result<Arc<dyn MetaAccessProvider>, ProviderError> {
        runtime.new_meta_access()
    }

    fn create_code_cache(
        &self,
        runtime: &dyn Runtime,
        target: &Arc<TargetDescription>,
        register_config: &Arc<dyn RegisterConfig>,
    ) -> std::result::Result<Arc<dyn CodeCacheProvider>, ProviderError> {
        runtime.new_code_cache(Arc::clone(target), Arc::clone(register_config))
    }

    fn create_constant_reflection(
        &self,
        runtime: &dyn Runtime,
    ) -> std::result::Result<Arc<dyn ConstantReflectionProvider>, ProviderError> {
        runtime.new_constant_reflection()
    }

    fn create_stack_introspection(
        &self,
        runtime: &dyn Runtime,
    ) -> std::result::Result<Arc<dyn StackIntrospection>, ProviderError> {
        runtime.new_stack_introspection()
    }

    fn create_bundle(
        &self,
        meta_access: Arc<dyn MetaAccessProvider>,
        code_cache: Arc<dyn CodeCacheProvider>,
        constant_reflection: Arc<dyn ConstantReflectionProvider>,
        stack_introspection: Arc<dyn StackIntrospection>,
    ) -> Backend {
        Backend::new(meta_access, code_cache, constant_reflection, stack_introspection)
    }
}

/// The default construction steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardHooks;

impl BackendHooks for StandardHooks {}

/// Entry point the host uses to build the backend for one architecture.
///
/// Object-safe so factories can be stored in `Box<dyn BackendFactory>`.
pub trait BackendFactory: fmt::Debug + Send + Sync {
    /// Canonical lowercase architecture identifier.
    fn architecture(&self) -> &'static str;

    /// Assemble the backend.
    ///
    /// # Panics
    ///
    /// If `host` is `Some`: a backend never wraps another one, and
    /// passing one is a caller bug.
    fn create_backend(&self, runtime: &dyn Runtime, host: Option<&Backend>) -> Result<Backend>;

    /// Assemble a standalone backend and report stage timings.
    fn assemble_with_report(&self, runtime: &dyn Runtime) -> Result<(Backend, AssemblyReport)>;

    /// Human-readable label, `"Backend:" + architecture`.
    fn label(&self) -> String {
        format!("Backend:{}", self.architecture())
    }
}

/// Factory for the LoongArch64 backend.
#[derive(Debug, Clone, Default)]
pub struct LoongArch64BackendFactory<H = StandardHooks> {
    hooks: H,
}

impl LoongArch64BackendFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: BackendHooks> LoongArch64BackendFactory<H> {
    /// A factory whose construction steps come from `hooks`.
    pub fn with_hooks(hooks: H) -> Self {
        Self { hooks }
    }
}

impl<H: BackendHooks> BackendFactory for LoongArch64BackendFactory<H> {
    fn architecture(&self) -> &'static str {
        loongarch64::NAME
    }

    fn create_backend(&self, runtime: &dyn Runtime, host: Option<&Backend>) -> Result<Backend> {
        assert!(
            host.is_none(),
            "{} cannot be created on top of an existing host backend",
            self.label()
        );
        log::debug!("creating {}", self.label());
        assembler::assemble(&self.hooks, runtime)
    }

    fn assemble_with_report(&self, runtime: &dyn Runtime) -> Result<(Backend, AssemblyReport)> {
        assembler::assemble_with_report(&self.hooks, runtime)
    }
}

impl<H: BackendHooks> fmt::Display for LoongArch64BackendFactory<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Factories the host can choose from, keyed by architecture identifier.
#[derive(Debug, Default)]
pub struct FactoryRegistry {
    factories: Vec<Box<dyn BackendFactory>>,
}

impl FactoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every factory this crate provides.
    pub fn builtin() -> Self {
        Self {
            factories: vec![Box::new(LoongArch64BackendFactory::new())],
        }
    }

    /// Register a factory. Identifiers must be unique.
    pub fn register(&mut self, factory: Box<dyn BackendFactory>) -> Result<()> {
        let name = factory.architecture();
        if self.factories.iter().any(|f| f.architecture() == name) {
            return Err(BackendError::DuplicateArchitecture { name });
        }
        self.factories.push(factory);
        Ok(())
    }

    /// Pick the factory for `name`.
    pub fn select(&self, name: &str) -> Result<&dyn BackendFactory> {
        self.factories
            .iter()
            .find(|f| f.architecture() == name)
            .map(|f| f.as_ref())
            .ok_or_else(|| BackendError::UnknownArchitecture {
                name: name.to_string(),
                available: self.architectures(),
            })
    }

    /// Identifiers of all registered factories, in registration order.
    pub fn architectures(&self) -> Vec<&'static str> {
        self.factories.iter().map(|f| f.architecture()).collect()
    }

    /// Get all registered factories.
    pub fn factories(&self) -> &[Box<dyn BackendFactory>] {
        &self.factories
    }
}
