//! Backend factory and provider assembly for the vmci compiler backend.
//!
//! Turns the host runtime's configuration into the immutable provider
//! bundle the compiler uses for the rest of the process:
//!
//! 1. translate capabilities and flags, build the target description
//! 2. build the register configuration
//! 3. build the meta-access, code cache, constant reflection and stack
//!    introspection providers
//! 4. bundle them into a [`Backend`]
//!
//! Hosts pick a [`BackendFactory`] by architecture identifier from a
//! [`FactoryRegistry`] and call [`BackendFactory::create_backend`].

pub mod assembler;
pub mod backend;
pub mod error;
pub mod factory;
pub mod register_config;
pub mod report;
pub mod runtime;
pub mod timer;

pub use assembler::{assemble, assemble_with_report, AssemblyStage};
pub use backend::Backend;
pub use error::{BackendError, Component, ProviderError, Result};
pub use factory::{
    BackendFactory, BackendHooks, FactoryRegistry, LoongArch64BackendFactory, StandardHooks,
};
pub use register_config::{LoongArch64RegisterConfig, RegisterConfig};
pub use report::{AssemblyReport, StageTiming};
pub use runtime::{
    CodeCacheProvider, ConstantReflectionProvider, HostRuntime, MetaAccessProvider, Runtime,
    StackIntrospection,
};
pub use timer::{InitTimer, TimingEntry, TimingLog};
