//! LoongArch64 architecture model.
//!
//! Holds the closed CPU feature and tuning flag enumerations, the
//! register file, and the [`LoongArch64`] architecture descriptor that
//! combines them.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};
use vmci_config::ConfigStore;

use crate::isa::{Endianness, Register};
use crate::translate::{translate_capabilities, Aliases, ConfigKey};

/// Canonical architecture identifier.
pub const NAME: &str = "loongarch64";

/// Constant enabling 128-bit LSX vector code generation.
pub const USE_LSX: &str = "useLSX";
/// Constant enabling 256-bit LASX vector code generation.
pub const USE_LASX: &str = "useLASX";

/// CPU features the runtime may detect on a LoongArch64 host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CpuFeature {
    /// 32-bit base instruction set.
    La32,
    /// 64-bit base instruction set.
    La64,
    /// LL/SC exception handling.
    Llexc,
    /// SC delay slot.
    Scdly,
    /// LL with implicit DBAR.
    Lldbar,
    /// Binary translation support for x86.
    LbtX86,
    /// Binary translation support for ARM.
    LbtArm,
    /// Binary translation support for MIPS.
    LbtMips,
    /// Cache-coherent DMA.
    Ccdma,
    /// Complex number instructions.
    Complex,
    /// Floating-point unit.
    Fp,
    /// Cryptographic instructions.
    Crypto,
    /// 128-bit vector extension.
    Lsx,
    /// 256-bit vector extension.
    Lasx,
    /// Atomic memory access instructions.
    Lam,
    /// LL needs a preceding sync barrier.
    Llsync,
    /// Branch targets need a sync barrier.
    Tgtsync,
    /// Unaligned accesses need a sync barrier.
    Ulsync,
    /// Unaligned memory access.
    Ual,
}

impl ConfigKey for CpuFeature {
    const ALL: &'static [Self] = &[
        CpuFeature::La32,
        CpuFeature::La64,
        CpuFeature::Llexc,
        CpuFeature::Scdly,
        CpuFeature::Lldbar,
        CpuFeature::LbtX86,
        CpuFeature::LbtArm,
        CpuFeature::LbtMips,
        CpuFeature::Ccdma,
        CpuFeature::Complex,
        CpuFeature::Fp,
        CpuFeature::Crypto,
        CpuFeature::Lsx,
        CpuFeature::Lasx,
        CpuFeature::Lam,
        CpuFeature::Llsync,
        CpuFeature::Tgtsync,
        CpuFeature::Ulsync,
        CpuFeature::Ual,
    ];

    fn config_name(self) -> &'static str {
        match self {
            CpuFeature::La32 => "LA32",
            CpuFeature::La64 => "LA64",
            CpuFeature::Llexc => "LLEXC",
            CpuFeature::Scdly => "SCDLY",
            CpuFeature::Lldbar => "LLDBAR",
            CpuFeature::LbtX86 => "LBT_X86",
            CpuFeature::LbtArm => "LBT_ARM",
            CpuFeature::LbtMips => "LBT_MIPS",
            CpuFeature::Ccdma => "CCDMA",
            CpuFeature::Complex => "COMPLEX",
            CpuFeature::Fp => "FP",
            CpuFeature::Crypto => "CRYPTO",
            CpuFeature::Lsx => "LSX",
            CpuFeature::Lasx => "LASX",
            CpuFeature::Lam => "LAM",
            CpuFeature::Llsync => "LLSYNC",
            CpuFeature::Tgtsync => "TGTSYNC",
            CpuFeature::Ulsync => "ULSYNC",
            CpuFeature::Ual => "UAL",
        }
    }
}

/// Code generation tuning switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flag {
    /// Emit 128-bit LSX vector code.
    UseLsx,
    /// Emit 256-bit LASX vector code.
    UseLasx,
}

impl ConfigKey for Flag {
    const ALL: &'static [Self] = &[Flag::UseLsx, Flag::UseLasx];

    fn config_name(self) -> &'static str {
        match self {
            Flag::UseLsx => USE_LSX,
            Flag::UseLasx => USE_LASX,
        }
    }
}

macro_rules! config_key_serde_display {
    ($($ty:ty),*) => {$(
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.config_name())
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.config_name())
            }
        }
    )*};
}

config_key_serde_display!(CpuFeature, Flag);

/// Enabled CPU features, from the runtime's detected-capability constants.
pub fn compute_features(store: &dyn ConfigStore, aliases: &Aliases) -> BTreeSet<CpuFeature> {
    translate_capabilities(store, aliases)
}

/// Enabled tuning flags.
///
/// Each allow-listed switch is checked on its own; nothing else in the
/// store can contribute a flag.
pub fn compute_flags(store: &dyn ConfigStore) -> BTreeSet<Flag> {
    let mut flags = BTreeSet::new();
    if store.is_set(USE_LSX) {
        flags.insert(Flag::UseLsx);
    }
    if store.is_set(USE_LASX) {
        flags.insert(Flag::UseLasx);
    }
    flags
}

pub const ZERO: Register = Register::gpr(0, "zero");
pub const RA: Register = Register::gpr(1, "ra");
pub const TP: Register = Register::gpr(2, "tp");
pub const SP: Register = Register::gpr(3, "sp");
pub const A0: Register = Register::gpr(4, "a0");
pub const R21: Register = Register::gpr(21, "r21");
pub const FP: Register = Register::gpr(22, "fp");
pub const S5: Register = Register::gpr(28, "s5");
pub const S6: Register = Register::gpr(29, "s6");

/// General-purpose registers in encoding order.
pub static GPRS: [Register; 32] = [
    ZERO,
    RA,
    TP,
    SP,
    A0,
    Register::gpr(5, "a1"),
    Register::gpr(6, "a2"),
    Register::gpr(7, "a3"),
    Register::gpr(8, "a4"),
    Register::gpr(9, "a5"),
    Register::gpr(10, "a6"),
    Register::gpr(11, "a7"),
    Register::gpr(12, "t0"),
    Register::gpr(13, "t1"),
    Register::gpr(14, "t2"),
    Register::gpr(15, "t3"),
    Register::gpr(16, "t4"),
    Register::gpr(17, "t5"),
    Register::gpr(18, "t6"),
    Register::gpr(19, "t7"),
    Register::gpr(20, "t8"),
    R21,
    FP,
    Register::gpr(23, "s0"),
    Register::gpr(24, "s1"),
    Register::gpr(25, "s2"),
    Register::gpr(26, "s3"),
    Register::gpr(27, "s4"),
    S5,
    S6,
    Register::gpr(30, "s7"),
    Register::gpr(31, "s8"),
];

/// Floating-point registers in encoding order.
pub static FPRS: [Register; 32] = [
    Register::fpr(0, "fa0"),
    Register::fpr(1, "fa1"),
    Register::fpr(2, "fa2"),
    Register::fpr(3, "fa3"),
    Register::fpr(4, "fa4"),
    Register::fpr(5, "fa5"),
    Register::fpr(6, "fa6"),
    Register::fpr(7, "fa7"),
    Register::fpr(8, "ft0"),
    Register::fpr(9, "ft1"),
    Register::fpr(10, "ft2"),
    Register::fpr(11, "ft3"),
    Register::fpr(12, "ft4"),
    Register::fpr(13, "ft5"),
    Register::fpr(14, "ft6"),
    Register::fpr(15, "ft7"),
    Register::fpr(16, "ft8"),
    Register::fpr(17, "ft9"),
    Register::fpr(18, "ft10"),
    Register::fpr(19, "ft11"),
    Register::fpr(20, "ft12"),
    Register::fpr(21, "ft13"),
    Register::fpr(22, "ft14"),
    Register::fpr(23, "ft15"),
    Register::fpr(24, "fs0"),
    Register::fpr(25, "fs1"),
    Register::fpr(26, "fs2"),
    Register::fpr(27, "fs3"),
    Register::fpr(28, "fs4"),
    Register::fpr(29, "fs5"),
    Register::fpr(30, "fs6"),
    Register::fpr(31, "fs7"),
];

/// The LoongArch64 architecture as configured by the host runtime.
///
/// Immutable once built: the feature and flag sets are fixed at
/// construction and only exposed by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoongArch64 {
    name: &'static str,
    word_size: u32,
    endianness: Endianness,
    features: BTreeSet<CpuFeature>,
    flags: BTreeSet<Flag>,
}

impl LoongArch64 {
    /// Width of the return address pushed by a call, in bytes.
    pub const RETURN_ADDRESS_SIZE: u32 = 8;

    pub fn new(features: BTreeSet<CpuFeature>, flags: BTreeSet<Flag>) -> Self {
        Self {
            name: NAME,
            word_size: 64,
            endianness: Endianness::Little,
            features,
            flags,
        }
    }

    /// Build the architecture from the runtime's constants.
    pub fn from_store(store: &dyn ConfigStore, aliases: &Aliases) -> Self {
        Self::new(compute_features(store, aliases), compute_flags(store))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Native word size in bits.
    pub fn word_size(&self) -> u32 {
        self.word_size
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn features(&self) -> &BTreeSet<CpuFeature> {
        &self.features
    }

    pub fn flags(&self) -> &BTreeSet<Flag> {
        &self.flags
    }

    pub fn has_feature(&self, feature: CpuFeature) -> bool {
        self.features.contains(&feature)
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    /// All registers, general-purpose first.
    pub fn registers(&self) -> impl Iterator<Item = Register> {
        GPRS.into_iter().chain(FPRS)
    }

    pub fn gp_register_count(&self) -> usize {
        GPRS.len()
    }

    /// Look up a register by ABI name.
    pub fn register(&self, name: &str) -> Option<Register> {
        self.registers().find(|r| r.name == name)
    }
}

impl fmt::Display for LoongArch64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}-bit, {:?}-endian)", self.name, self.word_size, self.endianness)
    }
}
