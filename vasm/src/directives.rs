//! Data-directive support: parsing integer literal text into a value and
//! packing a resolved value into its element width, big-endian.

use byteorder::ByteOrder;
use util::Endian;

use crate::error::AssembleErrorKind;
use crate::lexer::Token;

/// Parses the raw text of an `Int` token: `0x...` hex (unsigned), a
/// decimal integer (optionally signed), or a `'c'` character literal.
pub fn parse_int_literal(text: &str) -> Result<i64, AssembleErrorKind> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return Ok(i64::from_str_radix(hex, 16)?);
    }
    if text.starts_with('\'') && text.ends_with('\'') && text.len() >= 3 {
        let body = &text[1..text.len() - 1];
        let resolved = crate::lexer::unescape(body)
            .map_err(AssembleErrorKind::MalformedLiteral)?;
        let mut chars = resolved.chars();
        let c = chars.next().ok_or_else(|| AssembleErrorKind::MalformedLiteral("empty character literal".to_owned()))?;
        return Ok(c as i64);
    }
    Ok(text.parse::<i64>()?)
}

/// Packs `value` into `width` bytes, big-endian. Accepts any value that
/// fits as either the width's signed or unsigned range, matching how
/// assemblers usually treat `.byte -1` and `.byte 0xFF` as the same bit
/// pattern.
pub fn pack_value(value: i64, width: u32) -> Result<Vec<u8>, AssembleErrorKind> {
    let bits = width * 8;
    let signed_min = -(1i64 << (bits - 1));
    let unsigned_max = (1i64 << bits) - 1;
    if value < signed_min || value > unsigned_max {
        return Err(AssembleErrorKind::ImmediateOutOfRange { value, bits });
    }
    let mut bytes = vec![0u8; width as usize];
    Endian::write_int(&mut bytes, value, width as usize);
    Ok(bytes)
}

/// Converts a `.ascii` string body into its raw bytes.
pub fn ascii_bytes(s: &str) -> Vec<u8> {
    s.bytes().collect()
}

/// Converts a `.asciiz` string body into its raw bytes plus a trailing
/// NUL terminator.
pub fn asciiz_bytes(s: &str) -> Vec<u8> {
    let mut bytes = ascii_bytes(s);
    bytes.push(0);
    bytes
}

/// Splits a `.byte`/`.half`/`.word` operand list into data elements: a
/// bare integer literal becomes `Value`, a bare identifier becomes a
/// `Symbol` reference resolved against the symbol table in pass 2.
pub fn parse_data_elements(tokens: &[Token]) -> Result<Vec<crate::image::DataElement>, AssembleErrorKind> {
    use crate::image::DataElement;
    tokens
        .iter()
        .map(|t| match t {
            Token::Int(text) => parse_int_literal(text).map(DataElement::Value),
            Token::Word(name) => Ok(DataElement::Symbol(name.clone())),
            other => Err(AssembleErrorKind::InvalidOperand {
                mnemonic: "data directive".to_owned(),
                detail: format!("unexpected token {:?}", other),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_hexadecimal_data_word() {
        assert_eq!(pack_value(0xFFFF_FFFFu32 as i64, 4).unwrap(), vec![0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn large_hexadecimal_data_half() {
        assert_eq!(pack_value(0xFFFF, 2).unwrap(), vec![0xFF, 0xFF]);
    }

    #[test]
    fn large_hexadecimal_data_byte() {
        assert_eq!(pack_value(0xFF, 1).unwrap(), vec![0xFF]);
    }

    #[test]
    fn negative_signed_data_word() {
        assert_eq!(pack_value(-1, 4).unwrap(), vec![0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn negative_signed_data_half() {
        assert_eq!(pack_value(-1, 2).unwrap(), vec![0xFF, 0xFF]);
    }

    #[test]
    fn negative_signed_data_byte() {
        assert_eq!(pack_value(-1, 1).unwrap(), vec![0xFF]);
    }

    #[test]
    fn value_too_large_for_width_is_rejected() {
        assert!(pack_value(256, 1).is_err());
        assert!(pack_value(-129, 1).is_err());
    }

    #[test]
    fn parses_char_literal_to_ascii_value() {
        assert_eq!(parse_int_literal("'A'").unwrap(), 65);
        assert_eq!(parse_int_literal(r"'\n'").unwrap(), 10);
    }
}
