//! Types shared between the two assembly passes and the crate's public
//! API: the configuration an assembly run takes, the image it produces,
//! and the intermediate per-line representation pass 1 builds for pass 2
//! to resolve.

use std::collections::HashMap;

use mips32::constants::{DEFAULT_DATA_START, DEFAULT_TEXT_START};

use crate::error::Warning;

/// Base addresses the two segments are laid out at. `Default` matches
/// `mips32`'s own architectural defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub text_start_addr: u32,
    pub data_start_addr: u32,
}

impl Default for Config {
    fn default() -> Config {
        Config { text_start_addr: DEFAULT_TEXT_START, data_start_addr: DEFAULT_DATA_START }
    }
}

/// The two segment images produced by a successful assembly, ready to be
/// handed to `Memory::load_image`, plus the symbol table and a source
/// map for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AssemblyImage {
    pub text_start: u32,
    pub text_words: Vec<u32>,
    pub data_start: u32,
    pub data_bytes: Vec<u8>,
    /// Label name to resolved absolute address.
    pub symbols: HashMap<String, u32>,
    /// Absolute address (in either segment) to the 1-based source line
    /// it was assembled from.
    pub source_map: HashMap<u32, usize>,
    pub warnings: Vec<Warning>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    Text,
    Data,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataElement {
    Value(i64),
    Symbol(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnresolvedKind {
    /// `beq`/`bne`: word-distance-to-label immediate.
    Branch,
    /// `j`/`jal`: pseudo-direct target built from a label's address.
    Jump,
    /// `lui`: immediate is the upper 16 bits of a label's address.
    LuiLabel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedInstruction {
    pub kind: UnresolvedKind,
    pub opcode: u32,
    pub rs: u8,
    pub rt: u8,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedBody {
    /// Raw bytes ready to copy as-is: `.ascii`, `.asciiz`, `.space`, and
    /// `.align` padding.
    Bytes(Vec<u8>),
    /// `.byte`/`.half`/`.word`: element width in bytes, plus each
    /// element, which may still reference an as-yet-unseen label.
    Elements { width: u32, elements: Vec<DataElement> },
    /// A fully encoded instruction word.
    Instruction(u32),
    /// An instruction whose encoding depends on a label not yet resolved
    /// at the point it was parsed.
    Unresolved(UnresolvedInstruction),
    /// A line that was only a label definition, or only a `.globl`/blank
    /// directive with no payload.
    Empty,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedLine {
    pub address: u32,
    pub segment: Segment,
    pub line_number: usize,
    pub body: ParsedBody,
}
