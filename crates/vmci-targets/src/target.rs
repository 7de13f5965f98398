//! Target description.
//!
//! Combines the configured architecture with the layout policy of the
//! LoongArch64 platform family. The policy values are constants of the
//! family; only the architecture and the compressed-pointer mode come
//! from configuration.

use std::fmt;

use serde::Serialize;
use vmci_config::ConfigStore;

use crate::loongarch64::LoongArch64;
use crate::translate::Aliases;

/// Constant selecting compressed object pointers.
pub const USE_COMPRESSED_OOPS: &str = "useCompressedOops";

/// Required stack frame alignment in bytes.
pub const STACK_ALIGNMENT: u32 = 16;
/// Size of the guard region that lets null checks fold into memory accesses.
pub const IMPLICIT_NULL_CHECK_LIMIT: u32 = 4096;
/// Whether object headers may be inlined into generated code.
pub const INLINE_OBJECTS: bool = true;
/// Addressing is always 64-bit on this family.
pub const ADDRESSING_64BIT: bool = true;

/// Immutable description of the code generation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetDescription {
    arch: LoongArch64,
    addressing_64bit: bool,
    stack_alignment: u32,
    implicit_null_check_limit: u32,
    inline_objects: bool,
    compressed_oops: bool,
}

impl TargetDescription {
    /// Fix the layout policy around `arch`.
    pub fn new(arch: LoongArch64, compressed_oops: bool) -> Self {
        Self {
            arch,
            addressing_64bit: ADDRESSING_64BIT,
            stack_alignment: STACK_ALIGNMENT,
            implicit_null_check_limit: IMPLICIT_NULL_CHECK_LIMIT,
            inline_objects: INLINE_OBJECTS,
            compressed_oops,
        }
    }

    /// Translate the store's constants and build the description in one step.
    pub fn from_store(store: &dyn ConfigStore, aliases: &Aliases) -> Self {
        Self::new(
            LoongArch64::from_store(store, aliases),
            store.is_set(USE_COMPRESSED_OOPS),
        )
    }

    /// The configured architecture.
    pub fn arch(&self) -> &LoongArch64 {
        &self.arch
    }

    /// Whether pointers are 64 bits wide. Always `true`.
    pub fn addressing_64bit(&self) -> bool {
        self.addressing_64bit
    }

    /// Stack frame alignment in bytes.
    pub fn stack_alignment(&self) -> u32 {
        self.stack_alignment
    }

    /// Largest offset, in bytes, a memory access may use as an implicit null check.
    pub fn implicit_null_check_limit(&self) -> u32 {
        self.implicit_null_check_limit
    }

    /// Whether object headers may be inlined into generated code.
    pub fn inline_objects(&self) -> bool {
        self.inline_objects
    }

    /// Whether object pointers are compressed, from `useCompressedOops`.
    pub fn compressed_oops(&self) -> bool {
        self.compressed_oops
    }

    /// Word size in bytes.
    pub fn word_size_bytes(&self) -> u32 {
        self.arch.word_size() / 8
    }
}

impl fmt::Display for TargetDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Target: {} ===", self.arch.name())?;
        writeln!(f, "Architecture: {}", self.arch)?;
        let features: Vec<String> = self.arch.features().iter().map(|c| c.to_string()).collect();
        let flags: Vec<String> = self.arch.flags().iter().map(|c| c.to_string()).collect();
        writeln!(f, "Features ({}): {}", features.len(), features.join(", "))?;
        writeln!(f, "Flags ({}): {}", flags.len(), flags.join(", "))?;
        writeln!(f)?;
        writeln!(f, "--- Layout policy ---")?;
        writeln!(f, "  64-bit addressing:         {}", self.addressing_64bit)?;
        writeln!(f, "  Stack alignment:           {} bytes", self.stack_alignment)?;
        writeln!(f, "  Implicit null check limit: {} bytes", self.implicit_null_check_limit)?;
        writeln!(f, "  Inline objects:            {}", self.inline_objects)?;
        writeln!(
            f,
            "  Return address size:       {} bytes",
            LoongArch64::RETURN_ADDRESS_SIZE
        )?;
        write!(f, "  Compressed oops:           {}", self.compressed_oops)
    }
}
