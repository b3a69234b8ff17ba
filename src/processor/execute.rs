//! Instruction semantics: one free function per decoded instruction,
//! dispatched from a single match over opcode/funct. Operates directly on
//! a borrowed register file and memory rather than owning a `Cpu`, so it
//! can be unit-tested without constructing one.

use crate::constants::{funct, opcode};
use crate::memory::Memory;
use crate::register::RegisterFile;

use super::decode::Decoded;
use super::exception::{self, ExceptionMask};

/// Result of executing a single instruction: where the PC goes next, which
/// exceptions it raised, and whether it halted the processor.
pub struct Outcome {
    pub next_pc: u32,
    pub mask: ExceptionMask,
    pub halted: bool,
}

pub fn execute(registers: &mut RegisterFile, memory: &mut Memory, pc: u32, inst: u32) -> Outcome {
    let d = Decoded::new(inst);
    let mut mask = exception::NONE;
    let mut next_pc = pc.wrapping_add(4);
    let mut halted = false;

    let rs = registers.get(d.rs);
    let rt = registers.get(d.rt);

    match d.opcode {
        opcode::SPECIAL => match d.funct {
            funct::SLL => registers.set(d.rd, rt.wrapping_shl(d.shamt as u32)),
            funct::SRL => registers.set(d.rd, rt.wrapping_shr(d.shamt as u32)),
            funct::SRA => registers.set(d.rd, ((rt as i32) >> d.shamt) as u32),
            funct::SLLV => registers.set(d.rd, rt.wrapping_shl(rs & 0x1F)),
            funct::SRLV => registers.set(d.rd, rt.wrapping_shr(rs & 0x1F)),
            funct::SRAV => registers.set(d.rd, ((rt as i32) >> (rs & 0x1F)) as u32),
            funct::JR => next_pc = rs,
            funct::SYSCALL => {
                halted = true;
                mask |= exception::SYSCALL;
                next_pc = pc;
            }
            funct::BREAK => mask |= exception::BREAK,
            funct::ADD => {
                let (res, overflow) = (rs as i32).overflowing_add(rt as i32);
                registers.set(d.rd, res as u32);
                if overflow {
                    mask |= exception::INT_OVERFLOW;
                }
            }
            funct::ADDU => registers.set(d.rd, rs.wrapping_add(rt)),
            funct::SUB => {
                let (res, overflow) = (rs as i32).overflowing_sub(rt as i32);
                registers.set(d.rd, res as u32);
                if overflow {
                    mask |= exception::INT_OVERFLOW;
                }
            }
            funct::SUBU => registers.set(d.rd, rs.wrapping_sub(rt)),
            funct::AND => registers.set(d.rd, rs & rt),
            funct::OR => registers.set(d.rd, rs | rt),
            funct::XOR => registers.set(d.rd, rs ^ rt),
            funct::NOR => registers.set(d.rd, !(rs | rt)),
            funct::SLT => registers.set(d.rd, ((rs as i32) < (rt as i32)) as u32),
            funct::SLTU => registers.set(d.rd, (rs < rt) as u32),
            _ => mask |= exception::INVALID_INST,
        },
        opcode::J => next_pc = (pc & 0xF000_0000) | (d.target << 2),
        opcode::JAL => {
            registers.set(31, pc.wrapping_add(4));
            next_pc = (pc & 0xF000_0000) | (d.target << 2);
        }
        opcode::BEQ => {
            if rs == rt {
                next_pc = pc.wrapping_add((d.imm_sign_ext() << 2) as u32);
            }
        }
        opcode::BNE => {
            if rs != rt {
                next_pc = pc.wrapping_add((d.imm_sign_ext() << 2) as u32);
            }
        }
        opcode::ADDI => {
            let (res, overflow) = (rs as i32).overflowing_add(d.imm_sign_ext());
            registers.set(d.rt, res as u32);
            if overflow {
                mask |= exception::INT_OVERFLOW;
            }
        }
        opcode::ADDIU => registers.set(d.rt, rs.wrapping_add(d.imm_sign_ext() as u32)),
        opcode::SLTI => registers.set(d.rt, ((rs as i32) < d.imm_sign_ext()) as u32),
        opcode::SLTIU => registers.set(d.rt, (rs < d.imm_sign_ext() as u32) as u32),
        opcode::ANDI => registers.set(d.rt, rs & d.imm_zero_ext()),
        opcode::ORI => registers.set(d.rt, rs | d.imm_zero_ext()),
        opcode::XORI => registers.set(d.rt, rs ^ d.imm_zero_ext()),
        opcode::LUI => registers.set(d.rt, d.imm_zero_ext() << 16),
        opcode::LB => {
            let ea = rs.wrapping_add(d.imm_sign_ext() as u32);
            registers.set(d.rt, memory.get_byte(ea) as i8 as i32 as u32);
        }
        opcode::LBU => {
            let ea = rs.wrapping_add(d.imm_sign_ext() as u32);
            registers.set(d.rt, memory.get_byte(ea) as u32);
        }
        opcode::LH => {
            let ea = rs.wrapping_add(d.imm_sign_ext() as u32);
            registers.set(d.rt, memory.get_half(ea) as i16 as i32 as u32);
        }
        opcode::LHU => {
            let ea = rs.wrapping_add(d.imm_sign_ext() as u32);
            registers.set(d.rt, memory.get_half(ea) as u32);
        }
        opcode::LW => {
            let ea = rs.wrapping_add(d.imm_sign_ext() as u32);
            if ea & 0x3 != 0 {
                mask |= exception::DATA_ALIGN;
            } else {
                registers.set(d.rt, memory.get_word(ea));
            }
        }
        opcode::SB => {
            let ea = rs.wrapping_add(d.imm_sign_ext() as u32);
            memory.set_byte(ea, rt as u8);
        }
        opcode::SH => {
            let ea = rs.wrapping_add(d.imm_sign_ext() as u32);
            memory.set_half(ea, rt as u16);
        }
        opcode::SW => {
            let ea = rs.wrapping_add(d.imm_sign_ext() as u32);
            if ea & 0x3 != 0 {
                mask |= exception::DATA_ALIGN;
            } else {
                memory.set_word(ea, rt);
            }
        }
        _ => mask |= exception::INVALID_INST,
    }

    if next_pc & 0x3 != 0 {
        mask |= exception::PC_ALIGN;
        next_pc = (next_pc + 0x3) & !0x3;
    }

    Outcome { next_pc, mask, halted }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_r(rs: u32, rt: u32, rd: u32, shamt: u32, funct: u32) -> u32 {
        (rs << 21) | (rt << 16) | (rd << 11) | (shamt << 6) | funct
    }

    fn encode_i(opcode: u32, rs: u32, rt: u32, imm: u16) -> u32 {
        (opcode << 26) | (rs << 21) | (rt << 16) | imm as u32
    }

    #[test]
    fn addu_wraps_without_raising_overflow() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set(9, u32::MAX);
        regs.set(10, 1);
        let out = execute(&mut regs, &mut mem, 0x400, encode_r(9, 10, 8, 0, crate::constants::funct::ADDU));
        assert_eq!(regs.get(8), 0);
        assert_eq!(out.mask, exception::NONE);
        assert_eq!(out.next_pc, 0x404);
    }

    #[test]
    fn add_raises_overflow_on_signed_wraparound() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set(9, 0x7FFF_FFFF);
        regs.set(10, 1);
        let out = execute(&mut regs, &mut mem, 0x400, encode_r(9, 10, 8, 0, crate::constants::funct::ADD));
        assert_eq!(out.mask, exception::INT_OVERFLOW);
        assert_eq!(regs.get(8), 0x8000_0000);
    }

    #[test]
    fn beq_branches_without_pc_plus_four_bias() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set(1, 5);
        regs.set(2, 5);
        let out = execute(&mut regs, &mut mem, 0x400, encode_i(opcode::BEQ, 1, 2, 2));
        assert_eq!(out.next_pc, 0x400 + (2 << 2));
    }

    #[test]
    fn lw_raises_data_align_without_touching_memory() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set(4, 1);
        let out = execute(&mut regs, &mut mem, 0x400, encode_i(opcode::LW, 4, 5, 0));
        assert_eq!(out.mask, exception::DATA_ALIGN);
        assert_eq!(mem.page_count(), 0);
    }

    #[test]
    fn syscall_halts_without_advancing_pc() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        let out = execute(&mut regs, &mut mem, 0x400, encode_r(0, 0, 0, 0, crate::constants::funct::SYSCALL));
        assert!(out.halted);
        assert_eq!(out.mask, exception::SYSCALL);
        assert_eq!(out.next_pc, 0x400);
    }

    #[test]
    fn unknown_funct_raises_invalid_inst() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        let out = execute(&mut regs, &mut mem, 0x400, encode_r(0, 0, 0, 0, 0x3F));
        assert_eq!(out.mask, exception::INVALID_INST);
    }

    #[test]
    fn subu_wraps_without_raising_overflow() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set(9, 0);
        regs.set(10, 1);
        let out = execute(&mut regs, &mut mem, 0x400, encode_r(9, 10, 8, 0, crate::constants::funct::SUBU));
        assert_eq!(regs.get(8), u32::MAX);
        assert_eq!(out.mask, exception::NONE);
    }

    #[test]
    fn break_sets_break_bit_and_still_advances_pc() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        let out = execute(&mut regs, &mut mem, 0x400, encode_r(0, 0, 0, 0, crate::constants::funct::BREAK));
        assert_eq!(out.mask, exception::BREAK);
        assert_eq!(out.next_pc, 0x404);
        assert!(!out.halted);
    }

    #[test]
    fn jr_to_unaligned_target_raises_pc_align_and_rounds_up() {
        let mut regs = RegisterFile::new();
        let mut mem = Memory::new();
        regs.set(5, 0x401);
        let out = execute(&mut regs, &mut mem, 0x400, encode_r(5, 0, 0, 0, crate::constants::funct::JR));
        assert_eq!(out.mask, exception::PC_ALIGN);
        assert_eq!(out.next_pc, 0x404);
    }
}
