//! Instruction decoder for the SM83 disassembler

use crate::disassembler::Instruction;
use crate::opcodes::{self, OpcodeSpace, BASE_TABLE};

/// Decode a single instruction from a byte slice
///
/// # Arguments
///
/// * `bytes` - The byte slice starting at the instruction to decode
/// * `address` - The memory address of this instruction
///
/// # Returns
///
/// Some(Instruction) if the opcode is valid and fully present, None otherwise
pub fn decode_instruction(bytes: &[u8], address: u16) -> Option<Instruction> {
    let (&first, rest) = bytes.split_first()?;

    let (space, opcode, prefix_len, table) = match opcodes::extension(first) {
        Some(table) => (OpcodeSpace::Extended, *rest.first()?, 2usize, table),
        None => (OpcodeSpace::Base, first, 1usize, &BASE_TABLE),
    };
    let descriptor = table[opcode as usize].as_ref()?;

    let size = prefix_len + descriptor.operand_bytes as usize;
    let operand_bytes = bytes.get(prefix_len..size)?.to_vec();

    Some(Instruction {
        address,
        space,
        opcode,
        mnemonic: descriptor.mnemonic,
        operand_bytes,
        size_bytes: size as u8,
        cycles: descriptor.cycles,
        taken_cycles: descriptor.taken_cycles,
    })
}
