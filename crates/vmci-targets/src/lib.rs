//! Capability translation and target descriptions for the vmci compiler backend.
//!
//! Converts the host runtime's stringly-keyed constants into a closed,
//! strongly typed model of the target CPU:
//! - **Capabilities:** CPU features detected by the runtime, translated
//!   generically over a closed enumeration
//! - **Flags:** tuning switches, checked one by one from an allow-list
//! - **Target description:** the architecture plus fixed layout policy

pub mod isa;
pub mod loongarch64;
pub mod target;
pub mod translate;

pub use isa::{Endianness, Register, RegisterCategory};
pub use loongarch64::{CpuFeature, Flag, LoongArch64};
pub use target::TargetDescription;
pub use translate::{translate_capabilities, Aliases, ConfigKey};
