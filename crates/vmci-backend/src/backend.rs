//! The assembled provider bundle.

use std::sync::Arc;

use vmci_targets::TargetDescription;

use crate::register_config::RegisterConfig;
use crate::runtime::{
    CodeCacheProvider, ConstantReflectionProvider, MetaAccessProvider, StackIntrospection,
};

/// Providers handed to the compiler runtime for the rest of the process.
///
/// Immutable and `Send + Sync`; cloning shares the same providers.
#[derive(Debug, Clone)]
pub struct Backend {
    meta_access: Arc<dyn MetaAccessProvider>,
    code_cache: Arc<dyn CodeCacheProvider>,
    constant_reflection: Arc<dyn ConstantReflectionProvider>,
    stack_introspection: Arc<dyn StackIntrospection>,
}

impl Backend {
    pub fn new(
        meta_access: Arc<dyn MetaAccessProvider>,
        code_cache: Arc<dyn CodeCacheProvider>,
        constant_reflection: Arc<dyn ConstantReflectionProvider>,
        stack_introspection: Arc<dyn StackIntrospection>,
    ) -> Self {
        Self {
            meta_access,
            code_cache,
            constant_reflection,
            stack_introspection,
        }
    }

    /// Provider resolving types, methods and fields.
    pub fn meta_access(&self) -> &Arc<dyn MetaAccessProvider> {
        &self.meta_access
    }

    /// Provider installing compiled code.
    pub fn code_cache(&self) -> &Arc<dyn CodeCacheProvider> {
        &self.code_cache
    }

    /// Provider reading heap constants.
    pub fn constant_reflection(&self) -> &Arc<dyn ConstantReflectionProvider> {
        &self.constant_reflection
    }

    /// Provider walking live frames.
    pub fn stack_introspection(&self) -> &Arc<dyn StackIntrospection> {
        &self.stack_introspection
    }

    /// Target the code cache was built for.
    pub fn target(&self) -> &TargetDescription {
        self.code_cache.target()
    }

    /// Register conventions the code cache was built with.
    pub fn register_config(&self) -> &dyn RegisterConfig {
        self.code_cache.register_config()
    }

    /// `(role, implementation name)` for each provider.
    pub fn provider_names(&self) -> [(&'static str, &str); 4] {
        [
            ("meta-access", self.meta_access.name()),
            ("code-cache", self.code_cache.name()),
            ("constant-reflection", self.constant_reflection.name()),
            ("stack-introspection", self.stack_introspection.name()),
        ]
    }
}
