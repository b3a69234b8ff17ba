//! Symbolic register names. Discriminants follow MIPS32's conventional
//! numbering so `as u8` gives the encoded register id directly.

use util::EnumFromStr;
use util_derive::EnumFromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumFromStr)]
pub enum RegisterName {
    ZERO,
    AT,
    V0,
    V1,
    A0,
    A1,
    A2,
    A3,
    T0,
    T1,
    T2,
    T3,
    T4,
    T5,
    T6,
    T7,
    S0,
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    T8,
    T9,
    K0,
    K1,
    GP,
    SP,
    FP,
    RA,
}

/// Resolves a register operand's text (with or without the leading `$`)
/// to its numeric id 0-31. Accepts either `$12`-style numeric registers
/// or one of the symbolic names above, case-insensitively.
pub fn resolve_register(text: &str) -> Option<u8> {
    let text = text.strip_prefix('$').unwrap_or(text);
    if let Ok(n) = text.parse::<u8>() {
        if n < 32 {
            return Some(n);
        }
        return None;
    }
    RegisterName::from_str(&text.to_uppercase()).ok().map(|r| r as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_numeric_register() {
        assert_eq!(resolve_register("$8"), Some(8));
        assert_eq!(resolve_register("8"), Some(8));
    }

    #[test]
    fn resolves_symbolic_register_case_insensitively() {
        assert_eq!(resolve_register("$t0"), Some(8));
        assert_eq!(resolve_register("$RA"), Some(31));
        assert_eq!(resolve_register("$zero"), Some(0));
    }

    #[test]
    fn rejects_out_of_range_or_unknown() {
        assert_eq!(resolve_register("$32"), None);
        assert_eq!(resolve_register("$bogus"), None);
    }
}
