//! Exception bits raised by a single `Cpu::step`.
//!
//! More than one condition can be true of the same instruction (an
//! overflowing `add` whose destination is also misencoded, say), so the
//! result of a step is an OR-able bitset rather than a single variant.

/// Bitset of exception conditions raised during one `step`.
pub type ExceptionMask = u32;

/// No exception; the instruction completed cleanly.
pub const NONE: ExceptionMask = 0;
/// The instruction word did not match any known opcode/funct combination.
pub const INVALID_INST: ExceptionMask = 1 << 0;
/// A signed arithmetic result overflowed 32 bits.
pub const INT_OVERFLOW: ExceptionMask = 1 << 1;
/// The computed next program counter is not word-aligned.
pub const PC_ALIGN: ExceptionMask = 1 << 2;
/// A halfword or word memory access address was not naturally aligned.
pub const DATA_ALIGN: ExceptionMask = 1 << 3;
/// A branch was decoded while a previous branch's delay slot was still
/// pending. Defined for completeness; this implementation has no delay
/// slots, so it is never raised.
pub const BRANCH_IN_DELAY_SLOT: ExceptionMask = 1 << 4;
/// A `break` instruction executed.
pub const BREAK: ExceptionMask = 1 << 5;
/// Reserved for an embedder-enforced step budget; never set by `step`
/// itself. A driver bounding the number of steps it will run should OR
/// this into its own reporting rather than expect the CPU to raise it.
pub const PC_LIMIT: ExceptionMask = 1 << 6;
/// A `syscall` instruction executed and halted the processor.
pub const SYSCALL: ExceptionMask = 1 << 7;
