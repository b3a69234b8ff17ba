use std::fmt;
use std::num::ParseIntError;

use util::ParseEnumError;

/// Everything that can go wrong while assembling one line, tagged with
/// the 1-based source line it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembleError {
    pub line: usize,
    pub kind: AssembleErrorKind,
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for AssembleError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssembleErrorKind {
    /// No regex pattern matched at the current position.
    UnrecognizedToken(String),
    /// A string or character literal contained a malformed escape.
    MalformedLiteral(String),
    /// A line did not match any recognised directive/instruction/label
    /// shape at all.
    MalformedLine,
    /// Referenced a directive name not in `.text .data .word .half .byte
    /// .ascii .asciiz .space .align .globl`.
    UnknownDirective(String),
    /// Referenced a mnemonic that is not in the instruction set.
    UnknownMnemonic(String),
    /// An instruction mnemonic appeared while the active segment was
    /// `.data`, not `.text`.
    InstructionOutsideText(String),
    /// A mnemonic was given the wrong number of operands.
    WrongOperandCount { mnemonic: String, expected: usize, found: usize },
    /// Tokens remained on the line after a directive or instruction that
    /// takes a fixed operand count had already consumed what it needed.
    TrailingTokens,
    /// An operand was a token kind the instruction's format can't accept
    /// in that position (e.g. a string where a register was expected).
    InvalidOperand { mnemonic: String, detail: String },
    /// `li`/`la` are intentionally not supported; write the equivalent
    /// `lui`/`ori`/`addiu` sequence explicitly.
    PseudoOpNotSupported(String),
    /// A register name or number did not resolve to 0-31.
    UnknownRegister(String),
    /// A label was referenced but never defined anywhere in the source.
    UndefinedLabel(String),
    /// The same label was defined more than once.
    DuplicateLabel(String),
    /// An immediate literal did not fit the field width it was placed in.
    ImmediateOutOfRange { value: i64, bits: u32 },
    /// A `beq`/`bne` target is not reachable: its byte distance from the
    /// branch is not a multiple of 4, or the resulting word offset does
    /// not fit in 16 bits.
    BranchTargetUnreachable { label: String },
    /// A label operand was used in an immediate position that has no
    /// defined label semantics (only `lui` accepts one, taking the upper
    /// 16 bits of the label's address).
    LabelImmediateNotSupported { mnemonic: String },
    /// `.align` was given an exponent this assembler does not implement.
    UnsupportedAlignment(u32),
    /// An integer literal's text could not be parsed.
    ParseInt(ParseIntError),
    /// An enum-valued token (currently unreachable, reserved for future
    /// symbolic operand kinds) failed to parse.
    ParseEnum(ParseEnumError),
}

impl fmt::Display for AssembleErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssembleErrorKind::UnrecognizedToken(s) => write!(f, "unrecognized token starting at '{}'", s),
            AssembleErrorKind::MalformedLiteral(s) => write!(f, "malformed literal: {}", s),
            AssembleErrorKind::MalformedLine => write!(f, "line does not match any known statement shape"),
            AssembleErrorKind::UnknownDirective(s) => write!(f, "unknown directive '.{}'", s),
            AssembleErrorKind::UnknownMnemonic(s) => write!(f, "unknown mnemonic '{}'", s),
            AssembleErrorKind::InstructionOutsideText(s) => {
                write!(f, "instruction '{}' appears outside the .text segment", s)
            }
            AssembleErrorKind::WrongOperandCount { mnemonic, expected, found } => write!(
                f,
                "'{}' expects {} operand(s), found {}",
                mnemonic, expected, found
            ),
            AssembleErrorKind::TrailingTokens => write!(f, "unexpected tokens after a complete statement"),
            AssembleErrorKind::InvalidOperand { mnemonic, detail } => {
                write!(f, "invalid operand for '{}': {}", mnemonic, detail)
            }
            AssembleErrorKind::PseudoOpNotSupported(s) => {
                write!(f, "'{}' is not supported; write its expansion explicitly", s)
            }
            AssembleErrorKind::UnknownRegister(s) => write!(f, "unknown register '{}'", s),
            AssembleErrorKind::UndefinedLabel(s) => write!(f, "undefined label '{}'", s),
            AssembleErrorKind::DuplicateLabel(s) => write!(f, "label '{}' defined more than once", s),
            AssembleErrorKind::ImmediateOutOfRange { value, bits } => {
                write!(f, "value {} does not fit in {} bits", value, bits)
            }
            AssembleErrorKind::BranchTargetUnreachable { label } => {
                write!(f, "branch target '{}' is not reachable with a 16-bit word offset", label)
            }
            AssembleErrorKind::LabelImmediateNotSupported { mnemonic } => {
                write!(f, "'{}' does not accept a label as an immediate operand", mnemonic)
            }
            AssembleErrorKind::UnsupportedAlignment(n) => write!(f, ".align {} is not supported", n),
            AssembleErrorKind::ParseInt(e) => write!(f, "{}", e),
            AssembleErrorKind::ParseEnum(e) => write!(f, "{}", e),
        }
    }
}

impl From<ParseIntError> for AssembleErrorKind {
    fn from(err: ParseIntError) -> AssembleErrorKind {
        AssembleErrorKind::ParseInt(err)
    }
}

impl From<ParseEnumError> for AssembleErrorKind {
    fn from(err: ParseEnumError) -> AssembleErrorKind {
        AssembleErrorKind::ParseEnum(err)
    }
}

/// A non-fatal condition collected alongside a successful assembly:
/// an unknown directive that was skipped, or a jump whose target lies
/// outside the current 256 MiB region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warning {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}
