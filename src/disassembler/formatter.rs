//! Formatting functions for disassembled instructions
//!
//! Mnemonic templates carry operand tokens that are replaced with the
//! decoded bytes:
//!
//! | Token | Meaning | Output |
//! |-------|---------|--------|
//! | `d8`  | immediate byte | `$42` |
//! | `a8`  | high-page offset | `$80` |
//! | `d16` | immediate word | `$C000` |
//! | `a16` | absolute address | `$C000` |
//! | `e8`  | signed offset | jump target for JR, `+n`/`-n` for SP forms |

use crate::disassembler::Instruction;

/// Format a single instruction as assembly text
///
/// # Arguments
///
/// * `instr` - The instruction to format
///
/// # Returns
///
/// A string containing the formatted assembly instruction
pub fn format_instruction(instr: &Instruction) -> String {
    if instr.is_data() {
        return format!(".byte ${:02X}", instr.opcode);
    }

    let bytes = &instr.operand_bytes;
    let mnemonic = instr.mnemonic;

    if mnemonic.contains("d16") || mnemonic.contains("a16") {
        let word = match bytes.as_slice() {
            [low, high] => format!("${:04X}", u16::from_le_bytes([*low, *high])),
            _ => "$????".to_string(),
        };
        return mnemonic.replace("d16", &word).replace("a16", &word);
    }

    let Some(&byte) = bytes.first() else {
        return mnemonic.to_string();
    };

    if mnemonic.contains("SP+e8") {
        return mnemonic.replace("SP+e8", &format!("SP{}", signed(byte)));
    }
    if mnemonic.starts_with("JR") {
        let target = instr
            .address
            .wrapping_add(instr.size_bytes as u16)
            .wrapping_add(byte as i8 as u16);
        return mnemonic.replace("e8", &format!("${:04X}", target));
    }
    if mnemonic.contains("e8") {
        return mnemonic.replace("e8", &signed(byte));
    }

    let value = format!("${:02X}", byte);
    mnemonic.replace("d8", &value).replace("a8", &value)
}

/// Signed decimal with explicit sign, e.g. `+5`, `-128`.
fn signed(byte: u8) -> String {
    format!("{:+}", byte as i8)
}

/// Format a listing: address, raw bytes, text.
pub fn format_listing(instructions: &[Instruction]) -> String {
    let mut out = String::new();
    for instr in instructions {
        let raw = raw_bytes(instr);
        out.push_str(&format!(
            "{:04X}  {:<9} {}\n",
            instr.address,
            raw,
            format_instruction(instr)
        ));
    }
    out
}

fn raw_bytes(instr: &Instruction) -> String {
    let mut bytes = Vec::with_capacity(instr.size_bytes as usize);
    if !instr.is_data() && instr.space == crate::OpcodeSpace::Extended {
        bytes.push(crate::opcodes::ESCAPE_OPCODE);
    }
    bytes.push(instr.opcode);
    bytes.extend_from_slice(&instr.operand_bytes);
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
