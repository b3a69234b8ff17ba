//! Tokenizer: a longest-prefix regex matcher tries patterns in a fixed
//! order and emits the first match, consuming the matched characters.
//! Comments and leading/trailing whitespace are expected to already be
//! stripped from the line by the time it reaches `tokenize_line`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AssembleError, AssembleErrorKind};

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// A `.directive` name, dot stripped, lowercased.
    Directive(String),
    /// A `label:` definition, colon stripped, lowercased.
    Label(String),
    /// A double-quoted string literal with escapes resolved.
    Str(String),
    /// A `$reg`-style register operand, numeric id resolved later.
    Reg(String),
    /// An `offset($reg)` memory operand.
    Mem { offset_text: String, reg: String },
    /// An integer literal in its original source text (decimal, `0x..`,
    /// or a `'c'` character literal), resolved later by the caller.
    Int(String),
    /// A bare identifier: a mnemonic, a pseudo-op, or a label reference.
    Word(String),
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]+").unwrap());
static COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^,").unwrap());
static DIRECTIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.[A-Za-z_][A-Za-z0-9_]*").unwrap());
static LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_.][A-Za-z0-9_]*:").unwrap());
static STRING: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^"(?:[^"\\]|\\.)*""#).unwrap());
static REGISTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\$[A-Za-z0-9]+").unwrap());
static MEM_OPERAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?(?:0[xX][0-9A-Fa-f]+|[0-9]+))?\(\$[A-Za-z0-9]+\)").unwrap());
static INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:0[xX][0-9A-Fa-f]+|-?[0-9]+|'(?:[^'\\]|\\.)')").unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap());

/// Resolves the six recognised backslash escapes in a string or char
/// literal body: `\n \t \\ \" \' \0`.
pub fn unescape(body: &str) -> Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('0') => out.push('\0'),
            Some(other) => return Err(format!("unknown escape '\\{}'", other)),
            None => return Err("dangling escape at end of literal".to_owned()),
        }
    }
    Ok(out)
}

/// Splits one source line into tokens. `line` is ready for tokenizing
/// (comment-stripped, but may still contain interior whitespace).
pub fn tokenize_line(line: &str, line_number: usize) -> Result<Vec<Token>, AssembleError> {
    let mut tokens = Vec::new();
    let mut rest = line;

    while !rest.is_empty() {
        if let Some(m) = WHITESPACE.find(rest) {
            rest = &rest[m.end()..];
            continue;
        }
        if let Some(m) = COMMA.find(rest) {
            rest = &rest[m.end()..];
            continue;
        }
        if let Some(m) = DIRECTIVE.find(rest) {
            tokens.push(Token::Directive(m.as_str()[1..].to_lowercase()));
            rest = &rest[m.end()..];
            continue;
        }
        if let Some(m) = LABEL.find(rest) {
            let text = m.as_str();
            tokens.push(Token::Label(text[..text.len() - 1].to_lowercase()));
            rest = &rest[m.end()..];
            continue;
        }
        if let Some(m) = STRING.find(rest) {
            let text = m.as_str();
            let body = &text[1..text.len() - 1];
            let resolved = unescape(body).map_err(|message| AssembleError {
                line: line_number,
                kind: AssembleErrorKind::MalformedLiteral(message),
            })?;
            tokens.push(Token::Str(resolved));
            rest = &rest[m.end()..];
            continue;
        }
        if let Some(m) = REGISTER.find(rest) {
            tokens.push(Token::Reg(m.as_str().to_owned()));
            rest = &rest[m.end()..];
            continue;
        }
        if let Some(m) = MEM_OPERAND.find(rest) {
            let text = m.as_str();
            let open = text.find('(').unwrap();
            let offset_text = &text[..open];
            let reg = &text[open + 1..text.len() - 1];
            tokens.push(Token::Mem {
                offset_text: if offset_text.is_empty() { "0".to_owned() } else { offset_text.to_owned() },
                reg: reg.to_owned(),
            });
            rest = &rest[m.end()..];
            continue;
        }
        if let Some(m) = INTEGER.find(rest) {
            tokens.push(Token::Int(m.as_str().to_owned()));
            rest = &rest[m.end()..];
            continue;
        }
        if let Some(m) = WORD.find(rest) {
            let word = m.as_str().to_lowercase();
            if word == "zero" {
                tokens.push(Token::Reg(word));
            } else {
                tokens.push(Token::Word(word));
            }
            rest = &rest[m.end()..];
            continue;
        }

        return Err(AssembleError {
            line: line_number,
            kind: AssembleErrorKind::UnrecognizedToken(rest.chars().next().unwrap().to_string()),
        });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_r_format_instruction() {
        let tokens = tokenize_line("add $t0, $t1, $t2", 1).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Word("add".into()),
                Token::Reg("$t0".into()),
                Token::Reg("$t1".into()),
                Token::Reg("$t2".into()),
            ]
        );
    }

    #[test]
    fn tokenizes_memory_operand_with_negative_offset() {
        let tokens = tokenize_line("lw $t0, -4($sp)", 1).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Word("lw".into()),
                Token::Reg("$t0".into()),
                Token::Mem { offset_text: "-4".into(), reg: "$sp".into() },
            ]
        );
    }

    #[test]
    fn tokenizes_label_definition_and_directive() {
        let tokens = tokenize_line("loop: .word 5", 1).unwrap();
        assert_eq!(
            tokens,
            vec![Token::Label("loop".into()), Token::Directive("word".into()), Token::Int("5".into())]
        );
    }

    #[test]
    fn tokenizes_string_literal_with_escapes() {
        let tokens = tokenize_line(r#".asciiz "hi\n""#, 1).unwrap();
        assert_eq!(tokens, vec![Token::Directive("asciiz".into()), Token::Str("hi\n".into())]);
    }

    #[test]
    fn rejects_unrecognized_character() {
        let err = tokenize_line("add $t0, @, $t2", 1).unwrap_err();
        assert!(matches!(err.kind, AssembleErrorKind::UnrecognizedToken(_)));
    }
}
