//! Pass 1 (addressing and symbols) and pass 2 (emission and fix-ups).

use std::collections::HashMap;

use log::{debug, warn};

use crate::directives::{ascii_bytes, asciiz_bytes, pack_value, parse_data_elements, parse_int_literal};
use crate::encode::{encode_i, encode_j, encode_r};
use crate::error::{AssembleError, AssembleErrorKind, Warning};
use crate::image::{
    AssemblyImage, Config, DataElement, ParsedBody, ParsedLine, Segment, UnresolvedInstruction, UnresolvedKind,
};
use crate::lexer::{tokenize_line, Token};
use crate::mnemonic::{spec_for, Format, Mnemonic};
use crate::registers::resolve_register;
use util::EnumFromStr;

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

/// Splits source text into `(line_number, trimmed_text)` pairs, comments
/// stripped and blank lines dropped. Line numbers stay 1-based against
/// the original source for diagnostics.
fn pre_pass(source: &str) -> Vec<(usize, &str)> {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, strip_comment(line).trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect()
}

struct Pass1State {
    segment: Segment,
    text_addr: u32,
    data_addr: u32,
}

fn resolve_reg(token: &Token) -> Result<u8, AssembleErrorKind> {
    match token {
        Token::Reg(text) => {
            resolve_register(text).ok_or_else(|| AssembleErrorKind::UnknownRegister(text.clone()))
        }
        other => Err(AssembleErrorKind::InvalidOperand {
            mnemonic: String::new(),
            detail: format!("expected a register, found {:?}", other),
        }),
    }
}

fn resolve_signed_imm(token: &Token, bits: u32) -> Result<i64, AssembleErrorKind> {
    match token {
        Token::Int(text) => {
            let value = parse_int_literal(text)?;
            let min = -(1i64 << (bits - 1));
            let max = (1i64 << (bits - 1)) - 1;
            if value < min || value > max {
                return Err(AssembleErrorKind::ImmediateOutOfRange { value, bits });
            }
            Ok(value)
        }
        other => Err(AssembleErrorKind::InvalidOperand {
            mnemonic: String::new(),
            detail: format!("expected an integer literal, found {:?}", other),
        }),
    }
}

fn resolve_label_operand(token: &Token) -> Result<String, AssembleErrorKind> {
    match token {
        Token::Word(name) => Ok(name.clone()),
        other => Err(AssembleErrorKind::InvalidOperand {
            mnemonic: String::new(),
            detail: format!("expected a label, found {:?}", other),
        }),
    }
}

fn encode_instruction(
    mnemonic: Mnemonic,
    mnemonic_text: &str,
    operands: &[Token],
) -> Result<ParsedBody, AssembleErrorKind> {
    let spec = spec_for(mnemonic);
    let expect = |n: usize| -> Result<(), AssembleErrorKind> {
        if operands.len() != n {
            Err(AssembleErrorKind::WrongOperandCount {
                mnemonic: mnemonic_text.to_owned(),
                expected: n,
                found: operands.len(),
            })
        } else {
            Ok(())
        }
    };

    Ok(match spec.format {
        Format::RRdRsRt => {
            expect(3)?;
            let rd = resolve_reg(&operands[0])?;
            let rs = resolve_reg(&operands[1])?;
            let rt = resolve_reg(&operands[2])?;
            ParsedBody::Instruction(encode_r(spec.opcode, rs, rt, rd, 0, spec.funct))
        }
        Format::RRdRtShamt => {
            expect(3)?;
            let rd = resolve_reg(&operands[0])?;
            let rt = resolve_reg(&operands[1])?;
            let shamt = resolve_unsigned_imm(&operands[2], 5)?;
            ParsedBody::Instruction(encode_r(spec.opcode, 0, rt, rd, shamt as u8, spec.funct))
        }
        Format::RRdRtRs => {
            expect(3)?;
            let rd = resolve_reg(&operands[0])?;
            let rt = resolve_reg(&operands[1])?;
            let rs = resolve_reg(&operands[2])?;
            ParsedBody::Instruction(encode_r(spec.opcode, rs, rt, rd, 0, spec.funct))
        }
        Format::RRs => {
            expect(1)?;
            let rs = resolve_reg(&operands[0])?;
            ParsedBody::Instruction(encode_r(spec.opcode, rs, 0, 0, 0, spec.funct))
        }
        Format::RNone => {
            expect(0)?;
            ParsedBody::Instruction(encode_r(spec.opcode, 0, 0, 0, 0, spec.funct))
        }
        Format::IRtRsImm => {
            expect(3)?;
            let rt = resolve_reg(&operands[0])?;
            let rs = resolve_reg(&operands[1])?;
            if matches!(operands[2], Token::Word(_)) {
                return Err(AssembleErrorKind::LabelImmediateNotSupported { mnemonic: mnemonic_text.to_owned() });
            }
            let zero_extended = matches!(mnemonic, Mnemonic::ANDI | Mnemonic::ORI | Mnemonic::XORI);
            let imm = if zero_extended {
                let value = resolve_unsigned_imm(&operands[2], 16)?;
                value as u16
            } else {
                resolve_signed_imm(&operands[2], 16)? as u16
            };
            ParsedBody::Instruction(encode_i(spec.opcode, rs, rt, imm))
        }
        Format::IRtImm => {
            expect(2)?;
            let rt = resolve_reg(&operands[0])?;
            match &operands[1] {
                Token::Int(text) => {
                    let value = parse_int_literal(text)?;
                    let imm = resolve_unsigned_imm_value(value, 16)?;
                    ParsedBody::Instruction(encode_i(spec.opcode, 0, rt, imm as u16))
                }
                Token::Word(label) => ParsedBody::Unresolved(UnresolvedInstruction {
                    kind: UnresolvedKind::LuiLabel,
                    opcode: spec.opcode,
                    rs: 0,
                    rt,
                    label: label.clone(),
                }),
                other => {
                    return Err(AssembleErrorKind::InvalidOperand {
                        mnemonic: mnemonic_text.to_owned(),
                        detail: format!("unexpected operand {:?}", other),
                    })
                }
            }
        }
        Format::IRtMem => {
            expect(2)?;
            let rt = resolve_reg(&operands[0])?;
            match &operands[1] {
                Token::Mem { offset_text, reg } => {
                    let offset = parse_int_literal(offset_text)?;
                    let min = -(1i64 << 15);
                    let max = (1i64 << 15) - 1;
                    if offset < min || offset > max {
                        return Err(AssembleErrorKind::ImmediateOutOfRange { value: offset, bits: 16 });
                    }
                    let rs = resolve_register(reg).ok_or_else(|| AssembleErrorKind::UnknownRegister(reg.clone()))?;
                    ParsedBody::Instruction(encode_i(spec.opcode, rs, rt, offset as u16))
                }
                other => {
                    return Err(AssembleErrorKind::InvalidOperand {
                        mnemonic: mnemonic_text.to_owned(),
                        detail: format!("expected offset(reg), found {:?}", other),
                    })
                }
            }
        }
        Format::IRtRsLabel => {
            expect(3)?;
            let rt = resolve_reg(&operands[0])?;
            let rs = resolve_reg(&operands[1])?;
            let label = resolve_label_operand(&operands[2])?;
            ParsedBody::Unresolved(UnresolvedInstruction { kind: UnresolvedKind::Branch, opcode: spec.opcode, rs, rt, label })
        }
        Format::JLabel => {
            expect(1)?;
            let label = resolve_label_operand(&operands[0])?;
            ParsedBody::Unresolved(UnresolvedInstruction { kind: UnresolvedKind::Jump, opcode: spec.opcode, rs: 0, rt: 0, label })
        }
    })
}

fn resolve_unsigned_imm(token: &Token, bits: u32) -> Result<i64, AssembleErrorKind> {
    match token {
        Token::Int(text) => resolve_unsigned_imm_value(parse_int_literal(text)?, bits),
        other => Err(AssembleErrorKind::InvalidOperand {
            mnemonic: String::new(),
            detail: format!("expected an integer literal, found {:?}", other),
        }),
    }
}

fn resolve_unsigned_imm_value(value: i64, bits: u32) -> Result<i64, AssembleErrorKind> {
    let max = (1i64 << bits) - 1;
    if value < 0 || value > max {
        return Err(AssembleErrorKind::ImmediateOutOfRange { value, bits });
    }
    Ok(value)
}

fn align_up(addr: u32, align: u32) -> u32 {
    let mask = align - 1;
    (addr + mask) & !mask
}

/// Builds the `ParsedLine` list and symbol table. Allocates addresses and
/// validates every statement shape, but leaves label references inside
/// branches/jumps/`lui` unresolved for pass 2.
fn pass1(lines: &[(usize, &str)], config: Config) -> Result<(Vec<ParsedLine>, HashMap<String, u32>, Vec<Warning>), AssembleError> {
    let mut state = Pass1State { segment: Segment::Text, text_addr: config.text_start_addr, data_addr: config.data_start_addr };
    let mut symbols = HashMap::new();
    let mut warnings = Vec::new();
    let mut parsed = Vec::new();

    for &(line_number, text) in lines {
        let with_line = |kind: AssembleErrorKind| AssembleError { line: line_number, kind };

        let tokens = tokenize_line(text, line_number)?;
        let mut idx = 0;

        let current_addr = |state: &Pass1State| match state.segment {
            Segment::Text => state.text_addr,
            Segment::Data => state.data_addr,
        };

        if let Some(Token::Label(name)) = tokens.get(idx) {
            if symbols.contains_key(name) {
                return Err(with_line(AssembleErrorKind::DuplicateLabel(name.clone())));
            }
            symbols.insert(name.clone(), current_addr(&state));
            idx += 1;
        }

        if idx >= tokens.len() {
            parsed.push(ParsedLine { address: current_addr(&state), segment: state.segment, line_number, body: ParsedBody::Empty });
            continue;
        }

        match &tokens[idx] {
            Token::Directive(name) => {
                let operands = &tokens[idx + 1..];
                match name.as_str() {
                    "text" => {
                        if !operands.is_empty() {
                            return Err(with_line(AssembleErrorKind::TrailingTokens));
                        }
                        state.segment = Segment::Text;
                        parsed.push(ParsedLine { address: state.text_addr, segment: Segment::Text, line_number, body: ParsedBody::Empty });
                    }
                    "data" => {
                        if !operands.is_empty() {
                            return Err(with_line(AssembleErrorKind::TrailingTokens));
                        }
                        state.segment = Segment::Data;
                        parsed.push(ParsedLine { address: state.data_addr, segment: Segment::Data, line_number, body: ParsedBody::Empty });
                    }
                    "word" | "half" | "byte" => {
                        let width = match name.as_str() { "word" => 4, "half" => 2, _ => 1 };
                        if width > 1 {
                            state.data_addr = align_up(state.data_addr, width);
                        }
                        let address = state.data_addr;
                        let elements = parse_data_elements(operands).map_err(|k| with_line(k))?;
                        state.data_addr += width * elements.len() as u32;
                        parsed.push(ParsedLine { address, segment: Segment::Data, line_number, body: ParsedBody::Elements { width, elements } });
                    }
                    "ascii" | "asciiz" => {
                        if operands.len() != 1 {
                            return Err(with_line(AssembleErrorKind::WrongOperandCount {
                                mnemonic: format!(".{}", name),
                                expected: 1,
                                found: operands.len(),
                            }));
                        }
                        let s = match &operands[0] {
                            Token::Str(s) => s.clone(),
                            other => {
                                return Err(with_line(AssembleErrorKind::InvalidOperand {
                                    mnemonic: format!(".{}", name),
                                    detail: format!("expected a string literal, found {:?}", other),
                                }))
                            }
                        };
                        let bytes = if name == "ascii" { ascii_bytes(&s) } else { asciiz_bytes(&s) };
                        let address = state.data_addr;
                        state.data_addr += bytes.len() as u32;
                        parsed.push(ParsedLine { address, segment: Segment::Data, line_number, body: ParsedBody::Bytes(bytes) });
                    }
                    "space" => {
                        if operands.len() != 1 {
                            return Err(with_line(AssembleErrorKind::WrongOperandCount { mnemonic: ".space".to_owned(), expected: 1, found: operands.len() }));
                        }
                        let k = match &operands[0] {
                            Token::Int(text) => parse_int_literal(text).map_err(|k| with_line(k))?,
                            other => return Err(with_line(AssembleErrorKind::InvalidOperand { mnemonic: ".space".to_owned(), detail: format!("{:?}", other) })),
                        };
                        if k < 0 {
                            return Err(with_line(AssembleErrorKind::ImmediateOutOfRange { value: k, bits: 32 }));
                        }
                        let address = state.data_addr;
                        state.data_addr += k as u32;
                        parsed.push(ParsedLine { address, segment: Segment::Data, line_number, body: ParsedBody::Bytes(vec![0u8; k as usize]) });
                    }
                    "align" => {
                        if operands.len() != 1 {
                            return Err(with_line(AssembleErrorKind::WrongOperandCount { mnemonic: ".align".to_owned(), expected: 1, found: operands.len() }));
                        }
                        let k = match &operands[0] {
                            Token::Int(text) => parse_int_literal(text).map_err(|k| with_line(k))?,
                            other => return Err(with_line(AssembleErrorKind::InvalidOperand { mnemonic: ".align".to_owned(), detail: format!("{:?}", other) })),
                        };
                        if k < 0 || k > 31 {
                            return Err(with_line(AssembleErrorKind::UnsupportedAlignment(k as u32)));
                        }
                        let align = 1u32 << k;
                        match state.segment {
                            Segment::Text => {
                                let old = state.text_addr;
                                state.text_addr = align_up(old, align);
                                parsed.push(ParsedLine { address: old, segment: Segment::Text, line_number, body: ParsedBody::Empty });
                            }
                            Segment::Data => {
                                let old = state.data_addr;
                                let new_addr = align_up(old, align);
                                let padding = (new_addr - old) as usize;
                                state.data_addr = new_addr;
                                parsed.push(ParsedLine { address: old, segment: Segment::Data, line_number, body: ParsedBody::Bytes(vec![0u8; padding]) });
                            }
                        }
                    }
                    other_name => {
                        warnings.push(Warning { line: line_number, message: format!("unknown directive '.{}', ignored", other_name) });
                        parsed.push(ParsedLine { address: current_addr(&state), segment: state.segment, line_number, body: ParsedBody::Empty });
                    }
                }
            }
            Token::Word(word) => {
                if state.segment != Segment::Text {
                    return Err(with_line(AssembleErrorKind::InstructionOutsideText(word.clone())));
                }
                let operands = &tokens[idx + 1..];
                let body = match word.as_str() {
                    "nop" => {
                        if !operands.is_empty() {
                            return Err(with_line(AssembleErrorKind::WrongOperandCount { mnemonic: "nop".to_owned(), expected: 0, found: operands.len() }));
                        }
                        ParsedBody::Instruction(encode_r(0, 0, 0, 0, 0, mips32::constants::funct::SLL))
                    }
                    "move" => {
                        if operands.len() != 2 {
                            return Err(with_line(AssembleErrorKind::WrongOperandCount { mnemonic: "move".to_owned(), expected: 2, found: operands.len() }));
                        }
                        let rd = resolve_reg(&operands[0]).map_err(|k| with_line(k))?;
                        let rs = resolve_reg(&operands[1]).map_err(|k| with_line(k))?;
                        ParsedBody::Instruction(encode_r(0, rs, 0, rd, 0, mips32::constants::funct::ADDU))
                    }
                    "li" | "la" => return Err(with_line(AssembleErrorKind::PseudoOpNotSupported(word.clone()))),
                    _ => {
                        let mnemonic = Mnemonic::from_str(&word.to_uppercase())
                            .map_err(|_| with_line(AssembleErrorKind::UnknownMnemonic(word.clone())))?;
                        encode_instruction(mnemonic, word, operands).map_err(|k| with_line(k))?
                    }
                };
                let address = state.text_addr;
                state.text_addr += 4;
                parsed.push(ParsedLine { address, segment: Segment::Text, line_number, body });
            }
            other => return Err(with_line(AssembleErrorKind::InvalidOperand { mnemonic: String::new(), detail: format!("line does not start with a directive or mnemonic: {:?}", other) })),
        }
    }

    debug!("pass 1 complete: {} statements, {} symbols", parsed.len(), symbols.len());
    Ok((parsed, symbols, warnings))
}

/// Resolves labels and emits the final segment images.
fn pass2(lines: Vec<ParsedLine>, symbols: &HashMap<String, u32>, config: Config, warnings: &mut Vec<Warning>) -> Result<(Vec<u32>, Vec<u8>, HashMap<u32, usize>), AssembleError> {
    let mut max_text_len = 0u32;
    let mut max_data_len = 0u32;
    for line in &lines {
        match (&line.segment, &line.body) {
            (Segment::Text, ParsedBody::Instruction(_)) | (Segment::Text, ParsedBody::Unresolved(_)) => {
                max_text_len = max_text_len.max(line.address - config.text_start_addr + 4);
            }
            (Segment::Data, ParsedBody::Elements { width, elements }) => {
                max_data_len = max_data_len.max(line.address - config.data_start_addr + width * elements.len() as u32);
            }
            (Segment::Data, ParsedBody::Bytes(bytes)) => {
                max_data_len = max_data_len.max(line.address - config.data_start_addr + bytes.len() as u32);
            }
            _ => {}
        }
    }

    let mut text_words = vec![0u32; (max_text_len / 4) as usize];
    let mut data_bytes = vec![0u8; max_data_len as usize];
    let mut source_map = HashMap::new();

    for line in lines {
        let line_number = line.line_number;
        let address = line.address;
        let with_line = |kind: AssembleErrorKind| AssembleError { line: line_number, kind };

        match line.body {
            ParsedBody::Empty => {}
            ParsedBody::Bytes(bytes) => {
                if bytes.is_empty() {
                    continue;
                }
                let offset = (address - config.data_start_addr) as usize;
                data_bytes[offset..offset + bytes.len()].copy_from_slice(&bytes);
                source_map.insert(address, line_number);
            }
            ParsedBody::Elements { width, elements } => {
                if elements.is_empty() {
                    continue;
                }
                let mut offset = (address - config.data_start_addr) as usize;
                for element in elements {
                    let value = match element {
                        DataElement::Value(v) => v,
                        DataElement::Symbol(name) => *symbols
                            .get(&name)
                            .ok_or_else(|| with_line(AssembleErrorKind::UndefinedLabel(name.clone())))? as i64,
                    };
                    let bytes = pack_value(value, width).map_err(&with_line)?;
                    data_bytes[offset..offset + width as usize].copy_from_slice(&bytes);
                    offset += width as usize;
                }
                source_map.insert(address, line_number);
            }
            ParsedBody::Instruction(word) => {
                let word_index = ((address - config.text_start_addr) / 4) as usize;
                text_words[word_index] = word;
                source_map.insert(address, line_number);
            }
            ParsedBody::Unresolved(unresolved) => {
                let this_pc = address;
                let target = *symbols
                    .get(&unresolved.label)
                    .ok_or_else(|| with_line(AssembleErrorKind::UndefinedLabel(unresolved.label.clone())))?;

                let word = match unresolved.kind {
                    UnresolvedKind::Jump => {
                        if target % 4 != 0 {
                            return Err(with_line(AssembleErrorKind::BranchTargetUnreachable { label: unresolved.label.clone() }));
                        }
                        if (target ^ this_pc) & 0xF000_0000 != 0 {
                            warnings.push(Warning { line: line_number, message: format!("jump to '{}' crosses a 256 MiB region", unresolved.label) });
                        }
                        let jump_index = (target >> 2) & 0x03FF_FFFF;
                        encode_j(unresolved.opcode, jump_index)
                    }
                    UnresolvedKind::Branch => {
                        let offset = (target as i64 - (this_pc as i64 + 4)) >> 2;
                        if offset < i16::MIN as i64 || offset > i16::MAX as i64 {
                            return Err(with_line(AssembleErrorKind::BranchTargetUnreachable { label: unresolved.label.clone() }));
                        }
                        encode_i(unresolved.opcode, unresolved.rs, unresolved.rt, offset as u16)
                    }
                    UnresolvedKind::LuiLabel => {
                        let mut upper = target >> 16;
                        if target & 0x8000 != 0 {
                            upper = upper.wrapping_add(1);
                        }
                        encode_i(unresolved.opcode, 0, unresolved.rt, upper as u16)
                    }
                };

                let word_index = ((address - config.text_start_addr) / 4) as usize;
                text_words[word_index] = word;
                source_map.insert(address, line_number);
            }
        }
    }

    warn!("pass 2 emitted {} text words, {} data bytes", text_words.len(), data_bytes.len());
    Ok((text_words, data_bytes, source_map))
}

/// Assembles a complete MIPS32 source file into a ready-to-load image.
pub fn assemble(source: &str, config: Config) -> Result<AssemblyImage, AssembleError> {
    let lines = pre_pass(source);
    let (parsed_lines, symbols, mut warnings) = pass1(&lines, config)?;
    let (text_words, data_bytes, source_map) = pass2(parsed_lines, &symbols, config, &mut warnings)?;

    Ok(AssemblyImage {
        text_start: config.text_start_addr,
        text_words,
        data_start: config.data_start_addr,
        data_bytes,
        symbols,
        source_map,
        warnings,
    })
}
