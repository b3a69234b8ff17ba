//! Raw bit packing for the three instruction formats, shared by every
//! mnemonic in `mnemonic::spec_for`. Kept separate from operand parsing
//! so the encoding itself is trivial to eyeball against the field layout
//! in `mips32::constants`.

use mips32::constants::{FUNCT_OFFSET, OPCODE_OFFSET, RD_OFFSET, RS_OFFSET, RT_OFFSET, SHAMT_OFFSET};

pub fn encode_r(opcode: u32, rs: u8, rt: u8, rd: u8, shamt: u8, funct: u32) -> u32 {
    (opcode << OPCODE_OFFSET)
        | ((rs as u32) << RS_OFFSET)
        | ((rt as u32) << RT_OFFSET)
        | ((rd as u32) << RD_OFFSET)
        | ((shamt as u32) << SHAMT_OFFSET)
        | (funct << FUNCT_OFFSET)
}

pub fn encode_i(opcode: u32, rs: u8, rt: u8, imm: u16) -> u32 {
    (opcode << OPCODE_OFFSET) | ((rs as u32) << RS_OFFSET) | ((rt as u32) << RT_OFFSET) | imm as u32
}

pub fn encode_j(opcode: u32, target: u32) -> u32 {
    (opcode << OPCODE_OFFSET) | (target & 0x03FF_FFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_r_places_every_field() {
        let word = encode_r(0, 9, 10, 8, 0, 0x20);
        assert_eq!(word, (9 << 21) | (10 << 16) | (8 << 11) | 0x20);
    }

    #[test]
    fn encode_j_masks_to_26_bits() {
        let word = encode_j(0x02, 0xFFFF_FFFF);
        assert_eq!(word, (0x02 << 26) | 0x03FF_FFFF);
    }
}
