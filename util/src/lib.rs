use std::{error::Error, fmt};

/// Byte order for every multi-byte read/write in the workspace. MIPS32 is
/// a big-endian architecture, so this is `BigEndian` rather than the host's
/// native order.
pub type Endian = byteorder::BigEndian;

/// Raised by a generated `EnumFromStr::from_str` when the input text does
/// not match any variant.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParseEnumError {
    pub value: String,
    pub enum_name: &'static str,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Failed to parse \"{}\" as {}.",
            &self.value, &self.enum_name
        )
    }
}

impl Error for ParseEnumError {
    fn description(&self) -> &str {
        "Failed to parse enum."
    }
}

/// Implemented by `#[derive(EnumFromStr)]` for fieldless enums: matches
/// the input against each variant's identifier, case-sensitively.
pub trait EnumFromStr: Sized {
    fn from_str(s: &str) -> Result<Self, ParseEnumError>;
}
