//! Architecture-independent pieces of the ISA model.

use std::fmt;

use serde::Serialize;

/// Byte ordering of the target architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endianness {
    Little,
    Big,
}

/// Register file a register belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegisterCategory {
    /// General-purpose integer registers.
    Gpr,
    /// Floating-point (and, with LSX/LASX, vector) registers.
    Fpr,
}

/// A machine register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Register {
    /// Hardware encoding within its category.
    pub number: u8,
    /// ABI name (e.g. "sp", "a0", "fa0").
    pub name: &'static str,
    pub category: RegisterCategory,
}

impl Register {
    pub const fn gpr(number: u8, name: &'static str) -> Self {
        Self {
            number,
            name,
            category: RegisterCategory::Gpr,
        }
    }

    pub const fn fpr(number: u8, name: &'static str) -> Self {
        Self {
            number,
            name,
            category: RegisterCategory::Fpr,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
