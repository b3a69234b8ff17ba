//! The mnemonic table: every real instruction this assembler emits,
//! together with the instruction format and opcode/funct bits that
//! `encode` needs to pack it.

use util::EnumFromStr;
use util_derive::EnumFromStr;

use mips32::constants::{funct, opcode};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumFromStr)]
pub enum Mnemonic {
    ADD, ADDU, SUB, SUBU, AND, OR, XOR, NOR, SLT, SLTU,
    SLL, SRL, SRA, SLLV, SRLV, SRAV,
    JR, SYSCALL, BREAK,
    ADDI, ADDIU, SLTI, SLTIU, ANDI, ORI, XORI, LUI,
    LB, LBU, LH, LHU, LW, SB, SH, SW,
    BEQ, BNE, J, JAL,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// `op rd, rs, rt`
    RRdRsRt,
    /// `op rd, rt, shamt` (shift by constant amount)
    RRdRtShamt,
    /// `op rd, rt, rs` (shift by register amount)
    RRdRtRs,
    /// `op rs` (jr)
    RRs,
    /// `op` (syscall, break)
    RNone,
    /// `op rt, rs, imm` (arithmetic/logical immediate)
    IRtRsImm,
    /// `op rt, imm` (lui)
    IRtImm,
    /// `op rt, offset(rs)` (load/store)
    IRtMem,
    /// `op rt, rs, label` (beq/bne)
    IRtRsLabel,
    /// `op label` (j/jal)
    JLabel,
}

pub struct InstrSpec {
    pub format: Format,
    pub opcode: u32,
    pub funct: u32,
}

pub fn spec_for(mnemonic: Mnemonic) -> InstrSpec {
    use Format::*;
    use Mnemonic::*;
    match mnemonic {
        ADD => InstrSpec { format: RRdRsRt, opcode: opcode::SPECIAL, funct: funct::ADD },
        ADDU => InstrSpec { format: RRdRsRt, opcode: opcode::SPECIAL, funct: funct::ADDU },
        SUB => InstrSpec { format: RRdRsRt, opcode: opcode::SPECIAL, funct: funct::SUB },
        SUBU => InstrSpec { format: RRdRsRt, opcode: opcode::SPECIAL, funct: funct::SUBU },
        AND => InstrSpec { format: RRdRsRt, opcode: opcode::SPECIAL, funct: funct::AND },
        OR => InstrSpec { format: RRdRsRt, opcode: opcode::SPECIAL, funct: funct::OR },
        XOR => InstrSpec { format: RRdRsRt, opcode: opcode::SPECIAL, funct: funct::XOR },
        NOR => InstrSpec { format: RRdRsRt, opcode: opcode::SPECIAL, funct: funct::NOR },
        SLT => InstrSpec { format: RRdRsRt, opcode: opcode::SPECIAL, funct: funct::SLT },
        SLTU => InstrSpec { format: RRdRsRt, opcode: opcode::SPECIAL, funct: funct::SLTU },
        SLL => InstrSpec { format: RRdRtShamt, opcode: opcode::SPECIAL, funct: funct::SLL },
        SRL => InstrSpec { format: RRdRtShamt, opcode: opcode::SPECIAL, funct: funct::SRL },
        SRA => InstrSpec { format: RRdRtShamt, opcode: opcode::SPECIAL, funct: funct::SRA },
        SLLV => InstrSpec { format: RRdRtRs, opcode: opcode::SPECIAL, funct: funct::SLLV },
        SRLV => InstrSpec { format: RRdRtRs, opcode: opcode::SPECIAL, funct: funct::SRLV },
        SRAV => InstrSpec { format: RRdRtRs, opcode: opcode::SPECIAL, funct: funct::SRAV },
        JR => InstrSpec { format: RRs, opcode: opcode::SPECIAL, funct: funct::JR },
        SYSCALL => InstrSpec { format: RNone, opcode: opcode::SPECIAL, funct: funct::SYSCALL },
        BREAK => InstrSpec { format: RNone, opcode: opcode::SPECIAL, funct: funct::BREAK },
        ADDI => InstrSpec { format: IRtRsImm, opcode: opcode::ADDI, funct: 0 },
        ADDIU => InstrSpec { format: IRtRsImm, opcode: opcode::ADDIU, funct: 0 },
        SLTI => InstrSpec { format: IRtRsImm, opcode: opcode::SLTI, funct: 0 },
        SLTIU => InstrSpec { format: IRtRsImm, opcode: opcode::SLTIU, funct: 0 },
        ANDI => InstrSpec { format: IRtRsImm, opcode: opcode::ANDI, funct: 0 },
        ORI => InstrSpec { format: IRtRsImm, opcode: opcode::ORI, funct: 0 },
        XORI => InstrSpec { format: IRtRsImm, opcode: opcode::XORI, funct: 0 },
        LUI => InstrSpec { format: IRtImm, opcode: opcode::LUI, funct: 0 },
        LB => InstrSpec { format: IRtMem, opcode: opcode::LB, funct: 0 },
        LBU => InstrSpec { format: IRtMem, opcode: opcode::LBU, funct: 0 },
        LH => InstrSpec { format: IRtMem, opcode: opcode::LH, funct: 0 },
        LHU => InstrSpec { format: IRtMem, opcode: opcode::LHU, funct: 0 },
        LW => InstrSpec { format: IRtMem, opcode: opcode::LW, funct: 0 },
        SB => InstrSpec { format: IRtMem, opcode: opcode::SB, funct: 0 },
        SH => InstrSpec { format: IRtMem, opcode: opcode::SH, funct: 0 },
        SW => InstrSpec { format: IRtMem, opcode: opcode::SW, funct: 0 },
        BEQ => InstrSpec { format: IRtRsLabel, opcode: opcode::BEQ, funct: 0 },
        BNE => InstrSpec { format: IRtRsLabel, opcode: opcode::BNE, funct: 0 },
        J => InstrSpec { format: JLabel, opcode: opcode::J, funct: 0 },
        JAL => InstrSpec { format: JLabel, opcode: opcode::JAL, funct: 0 },
    }
}
