//! Register allocation configuration.

use std::fmt;
use std::sync::Arc;

use vmci_targets::loongarch64::{self, A0, FP, FPRS, GPRS, R21, RA, S5, S6, SP, TP, ZERO};
use vmci_targets::{Register, RegisterCategory, TargetDescription};

/// Register usage conventions seen by the register allocator.
pub trait RegisterConfig: fmt::Debug + Send + Sync {
    /// Registers the allocator may hand out, general-purpose first.
    fn allocatable_registers(&self) -> &[Register];

    /// Registers carrying the first arguments of a call.
    fn argument_registers(&self, category: RegisterCategory) -> &[Register];

    fn return_register(&self, category: RegisterCategory) -> Register;

    /// Register addressing the current frame.
    fn frame_register(&self) -> Register;

    fn is_reserved(&self, register: Register) -> bool {
        !self.allocatable_registers().contains(&register)
    }
}

/// Holds the current thread pointer in compiled code.
pub const THREAD_REGISTER: Register = S6;
/// Holds the heap base when object pointers are compressed.
pub const HEAP_BASE_REGISTER: Register = S5;

const RESERVED: [Register; 7] = [ZERO, RA, TP, SP, R21, FP, THREAD_REGISTER];

/// LoongArch64 register conventions.
#[derive(Debug)]
pub struct LoongArch64RegisterConfig {
    target: Arc<TargetDescription>,
    use_compressed_oops: bool,
    allocatable: Vec<Register>,
}

impl LoongArch64RegisterConfig {
    pub fn new(target: Arc<TargetDescription>, use_compressed_oops: bool) -> Self {
        let allocatable = GPRS
            .into_iter()
            .filter(|r| !RESERVED.contains(r))
            .filter(|r| !(use_compressed_oops && *r == HEAP_BASE_REGISTER))
            .chain(FPRS)
            .collect();
        Self {
            target,
            use_compressed_oops,
            allocatable,
        }
    }

    pub fn target(&self) -> &TargetDescription {
        &self.target
    }

    pub fn use_compressed_oops(&self) -> bool {
        self.use_compressed_oops
    }
}

impl RegisterConfig for LoongArch64RegisterConfig {
    fn allocatable_registers(&self) -> &[Register] {
        &self.allocatable
    }

    fn argument_registers(&self, category: RegisterCategory) -> &[Register] {
        match category {
            RegisterCategory::Gpr => &loongarch64::GPRS[4..12],
            RegisterCategory::Fpr => &loongarch64::FPRS[0..8],
        }
    }

    fn return_register(&self, category: RegisterCategory) -> Register {
        match category {
            RegisterCategory::Gpr => A0,
            RegisterCategory::Fpr => FPRS[0],
        }
    }

    fn frame_register(&self) -> Register {
        SP
    }
}
