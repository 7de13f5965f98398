//! Backend assembly errors.

use std::fmt;

use thiserror::Error;

use crate::assembler::AssemblyStage;

/// Failure reported by the runtime or a hook while constructing a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("runtime does not support {what}")]
    Unsupported { what: &'static str },

    #[error("{message}")]
    Failed { message: String },
}

impl ProviderError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// A component built during assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// Register allocation configuration.
    RegisterConfig,
    /// Runtime metadata lookup.
    MetaAccess,
    /// Installation of compiled code.
    CodeCache,
    /// Heap constant reads.
    ConstantReflection,
    /// Live frame inspection.
    StackIntrospection,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Component::RegisterConfig => "register configuration",
            Component::MetaAccess => "meta-access provider",
            Component::CodeCache => "code cache provider",
            Component::ConstantReflection => "constant reflection provider",
            Component::StackIntrospection => "stack introspection provider",
        })
    }
}

/// Errors that can occur while selecting or assembling a backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// A construction stage failed; assembly was abandoned.
    #[error("failed to create {component} (after {stage:?}): {source}")]
    Construction {
        component: Component,
        /// Last stage that completed before the failure.
        stage: AssemblyStage,
        #[source]
        source: ProviderError,
    },

    #[error("no backend factory for architecture '{name}' (available: {})", available.join(", "))]
    UnknownArchitecture {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("a backend factory for '{name}' is already registered")]
    DuplicateArchitecture { name: &'static str },
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
