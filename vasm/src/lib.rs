//! Two-pass assembler for educational MIPS32 source text.
//!
//! [`assemble`] turns a source string into an [`AssemblyImage`]: a text
//! segment of encoded instruction words, a data segment of raw bytes, the
//! resolved symbol table, and a source map for diagnostics. Assembly
//! never panics on malformed input; every failure is reported through
//! [`AssembleError`], tagged with the 1-based source line it came from.
//!
//! # Language
//!
//! A source file is a sequence of lines, each optionally preceded by a
//! `label:` definition and optionally followed by a `# comment`. A line
//! is either a `.directive`, an instruction mnemonic with its operands,
//! or empty. `.text` and `.data` switch which segment subsequent
//! directives and instructions are assembled into; the source starts in
//! the text segment.
//!
//! Registers are written as `$t0`-style symbolic names, `$8`-style
//! numeric ids, or the bare word `zero`, all case-insensitive. Branch
//! (`beq`/`bne`), jump (`j`/`jal`) and `lui` operands accept a label;
//! every other immediate must be a literal. `li` and `la` are not
//! supported as pseudo-instructions; write their `lui`/`ori`/`addiu`
//! expansion explicitly.
//!
//! This crate has no notion of the processor that will run its output;
//! loading an [`AssemblyImage`] into memory and executing it is the job
//! of the `mips32` crate.

mod assemble;
mod directives;
mod encode;
mod error;
mod image;
mod lexer;
mod mnemonic;
mod registers;

#[cfg(test)]
mod test;

pub use assemble::assemble;
pub use error::{AssembleError, AssembleErrorKind, Warning};
pub use image::{AssemblyImage, Config};
