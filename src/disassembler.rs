//! SM83 Disassembler Module
//!
//! Converts binary machine code into human-readable assembly mnemonics,
//! reading both the base and the `0xCB`-prefixed tables.

pub mod decoder;
pub mod formatter;

use crate::opcodes::OpcodeSpace;

/// A single disassembled instruction with full metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Memory address where this instruction starts
    pub address: u16,

    /// Table the opcode was decoded from
    pub space: OpcodeSpace,

    /// The opcode byte (the byte after `0xCB` for extended instructions)
    pub opcode: u8,

    /// Mnemonic template with operand tokens (e.g. "LD A,d8")
    pub mnemonic: &'static str,

    /// Immediate operand bytes (0-2)
    pub operand_bytes: Vec<u8>,

    /// Total size in bytes, prefix included (1-3)
    pub size_bytes: u8,

    /// Clock cycles when no branch is taken
    pub cycles: u8,

    /// Clock cycles when a conditional branch is taken
    pub taken_cycles: u8,
}

impl Instruction {
    /// A `.byte` directive for a byte that does not start a valid instruction.
    pub fn data_byte(address: u16, byte: u8) -> Self {
        Self {
            address,
            space: OpcodeSpace::Base,
            opcode: byte,
            mnemonic: ".byte",
            operand_bytes: Vec::new(),
            size_bytes: 1,
            cycles: 0,
            taken_cycles: 0,
        }
    }

    pub fn is_data(&self) -> bool {
        self.mnemonic == ".byte"
    }

    /// Formatted assembly text, e.g. `JR NZ,$0150`.
    pub fn text(&self) -> String {
        formatter::format_instruction(self)
    }
}

/// Disassemble a byte slice into a vector of instructions
///
/// # Arguments
///
/// * `bytes` - The machine code to disassemble
/// * `start_address` - Address of `bytes[0]`; used for addresses and jump targets
///
/// Invalid opcodes and instructions cut off by the end of the slice become
/// one-byte `.byte` directives.
///
/// # Examples
///
/// ```
/// use libsm83::disassemble;
///
/// let listing = disassemble(&[0x3E, 0x42, 0xCB, 0x37, 0xD3], 0x0100);
/// let text: Vec<String> = listing.iter().map(|i| i.text()).collect();
/// assert_eq!(text, vec!["LD A,$42", "SWAP A", ".byte $D3"]);
/// assert_eq!(listing[1].address, 0x0102);
/// ```
pub fn disassemble(bytes: &[u8], start_address: u16) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut pc = 0;
    let mut address = start_address;

    while pc < bytes.len() {
        let instr = decoder::decode_instruction(&bytes[pc..], address)
            .unwrap_or_else(|| Instruction::data_byte(address, bytes[pc]));
        pc += instr.size_bytes as usize;
        address = address.wrapping_add(instr.size_bytes as u16);
        instructions.push(instr);
    }

    instructions
}
