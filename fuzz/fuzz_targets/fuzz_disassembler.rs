//! Fuzz target for the disassembler.
//!
//! Decodes arbitrary bytes and checks the listing covers every input byte
//! once, that undecodable bytes fall back to `.byte`, and that every
//! decoded record agrees with the opcode tables.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use libsm83::opcodes::{OpcodeSpace, BASE_TABLE, EXTENDED_TABLE};
use libsm83::disassemble;

#[derive(Debug, Arbitrary)]
struct Listing {
    bytes: Vec<u8>,
    origin: u16,
}

fuzz_target!(|listing: Listing| {
    // One address space worth of bytes at most
    if listing.bytes.len() > 0x10000 {
        return;
    }

    let decoded = disassemble(&listing.bytes, listing.origin);
    let mut offset = 0usize;

    for instr in &decoded {
        assert_eq!(instr.address, listing.origin.wrapping_add(offset as u16));
        assert!((1..=3).contains(&instr.size_bytes));

        if instr.is_data() {
            assert_eq!(instr.size_bytes, 1);
            assert_eq!(instr.opcode, listing.bytes[offset]);
        } else {
            let table = match instr.space {
                OpcodeSpace::Base => &BASE_TABLE,
                OpcodeSpace::Extended => &EXTENDED_TABLE,
            };
            let desc = table[instr.opcode as usize].as_ref().expect("decoded from an empty slot");
            assert_eq!(desc.mnemonic, instr.mnemonic);
            assert_eq!(desc.operand_bytes as usize, instr.operand_bytes.len());
        }

        assert!(!instr.text().is_empty());
        offset += instr.size_bytes as usize;
    }

    assert_eq!(offset, listing.bytes.len());
});
