//! Runtime facade and the opaque providers it constructs.
//!
//! The providers' behavior belongs to the host runtime; assembly only
//! decides when each one is built and which upstream values it receives.

use std::fmt;
use std::sync::Arc;

use vmci_config::ConfigStore;
use vmci_targets::TargetDescription;

use crate::error::ProviderError;
use crate::register_config::RegisterConfig;

/// Resolves runtime metadata (types, methods, fields) for the compiler.
pub trait MetaAccessProvider: fmt::Debug + Send + Sync {
    /// Implementation name, for diagnostics.
    fn name(&self) -> &str;
}

/// Installs compiled code and owns the target it was compiled for.
pub trait CodeCacheProvider: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn target(&self) -> &TargetDescription;

    fn register_config(&self) -> &dyn RegisterConfig;
}

/// Reads constant values out of the running heap.
pub trait ConstantReflectionProvider: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;
}

/// Walks and inspects live stack frames.
pub trait StackIntrospection: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;
}

/// What the backend needs from the host runtime.
///
/// Object-safe so factories can take `&dyn Runtime`.
pub trait Runtime {
    /// The runtime's named constants.
    fn config_store(&self) -> &dyn ConfigStore;

    fn new_meta_access(&self) -> Result<Arc<dyn MetaAccessProvider>, ProviderError>;

    fn new_code_cache(
        &self,
        target: Arc<TargetDescription>,
        register_config: Arc<dyn RegisterConfig>,
    ) -> Result<Arc<dyn CodeCacheProvider>, ProviderError>;

    fn new_constant_reflection(&self) -> Result<Arc<dyn ConstantReflectionProvider>, ProviderError>;

    fn new_stack_introspection(&self) -> Result<Arc<dyn StackIntrospection>, ProviderError>;
}

/// A standalone runtime over a config store, with minimal host providers.
///
/// Used to assemble and inspect a backend outside a running VM.
#[derive(Debug, Clone)]
pub struct HostRuntime<S> {
    store: S,
}

impl<S: ConfigStore> HostRuntime<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: ConfigStore> Runtime for HostRuntime<S> {
    fn config_store(&self) -> &dyn ConfigStore {
        &self.store
    }

    fn new_meta_access(&self) -> Result<Arc<dyn MetaAccessProvider>, ProviderError> {
        Ok(Arc::new(HostMetaAccess))
    }

    fn new_code_cache(
        &self,
        target: Arc<TargetDescription>,
        register_config: Arc<dyn RegisterConfig>,
    ) -> Result<Arc<dyn CodeCacheProvider>, ProviderError> {
        Ok(Arc::new(HostCodeCache {
            target,
            register_config,
        }))
    }

    fn new_constant_reflection(&self) -> Result<Arc<dyn ConstantReflectionProvider>, ProviderError> {
        Ok(Arc::new(HostConstantReflection))
    }

    fn new_stack_introspection(&self) -> Result<Arc<dyn StackIntrospection>, ProviderError> {
        Ok(Arc::new(HostStackIntrospection))
    }
}

#[derive(Debug)]
pub struct HostMetaAccess;

impl MetaAccessProvider for HostMetaAccess {
    fn name(&self) -> &str {
        "host-meta-access"
    }
}

#[derive(Debug)]
pub struct HostCodeCache {
    target: Arc<TargetDescription>,
    register_config: Arc<dyn RegisterConfig>,
}

impl CodeCacheProvider for HostCodeCache {
    fn name(&self) -> &str {
        "host-code-cache"
    }

    fn target(&self) -> &TargetDescription {
        &self.target
    }

    fn register_config(&self) -> &dyn RegisterConfig {
        self.register_config.as_ref()
    }
}

#[derive(Debug)]
pub struct HostConstantReflection;

impl ConstantReflectionProvider for HostConstantReflection {
    fn name(&self) -> &str {
        "host-constant-reflection"
    }
}

#[derive(Debug)]
pub struct HostStackIntrospection;

impl StackIntrospection for HostStackIntrospection {
    fn name(&self) -> &str {
        "host-stack-introspection"
    }
}
