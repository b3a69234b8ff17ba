//! Core emulation engine for an educational MIPS32 single-cycle
//! processor: sparse byte-addressable memory and a `Cpu` that decodes and
//! executes one instruction per `step`.
//!
//! Assembling MIPS32 source text into the `(text, data)` image this crate
//! consumes lives in the separate `vasm` crate; this crate has no notion
//! of source text, labels or directives.

pub mod constants;
pub mod memory;
pub mod processor;
pub mod register;

pub use util::Endian;

pub use memory::Memory;
pub use processor::{Cpu, ExceptionMask, StepEvent};
pub use register::RegisterFile;
