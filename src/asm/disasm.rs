//! Disassembler for LS-8 programs.
//!
//! Converts raw program bytes back to readable assembly. Bytes that
//! decode to no opcode are shown as `DAT` lines, matching how the
//! engine skips them at run time.

use crate::cpu::decode::Opcode;

/// Disassemble a byte program into a listing.
pub fn disassemble(bytes: &[u8]) -> String {
    let mut output = String::new();
    output.push_str("# LS-8 disassembly\n\n");

    let mut addr = 0;
    while addr < bytes.len() {
        let byte = bytes[addr];

        match Opcode::decode(byte) {
            Ok(op) if addr + op.size() <= bytes.len() => {
                let operands = &bytes[addr + 1..addr + op.size()];
                output.push_str(&format!(
                    "{:02X}: {}\n",
                    addr,
                    format_instruction(op, operands)
                ));
                addr += op.size();
            }
            // Unknown byte, or an opcode whose operands run off the end
            _ => {
                output.push_str(&format!("{:02X}: DAT 0b{:08b}\n", addr, byte));
                addr += 1;
            }
        }
    }

    output
}

/// Format a single instruction with its operand bytes.
fn format_instruction(op: Opcode, operands: &[u8]) -> String {
    match (op, operands) {
        (Opcode::Ldi, [reg, value]) => format!("LDI R{} {}", reg, value),
        (Opcode::Add | Opcode::Mul | Opcode::Cmp, [a, b]) => {
            format!("{} R{} R{}", op.mnemonic(), a, b)
        }
        (_, [reg]) => format!("{} R{}", op.mnemonic(), reg),
        _ => op.mnemonic().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::assembler::assemble;

    #[test]
    fn test_disassemble_mult_program() {
        let bytes = [
            0b10000010, 0, 8, //
            0b10100010, 0, 1, //
            0b01000111, 0, //
            0b00000001,
        ];
        let listing = disassemble(&bytes);

        assert!(listing.contains("00: LDI R0 8"));
        assert!(listing.contains("03: MUL R0 R1"));
        assert!(listing.contains("06: PRN R0"));
        assert!(listing.contains("08: HLT"));
    }

    #[test]
    fn test_unknown_byte_becomes_dat() {
        let listing = disassemble(&[0xFF, 0b00000001]);

        assert!(listing.contains("00: DAT 0b11111111"));
        assert!(listing.contains("01: HLT"));
    }

    #[test]
    fn test_truncated_instruction_becomes_dat() {
        // LDI with only one of its two operands present
        let listing = disassemble(&[0b10000010, 5]);

        assert!(listing.contains("00: DAT 0b10000010"));
    }

    #[test]
    fn test_assemble_disassemble_agrees() {
        let source = "LDI R2 100\nPUSH R2\nPOP R4\nHLT\n";
        let bytes = assemble(source).unwrap();
        let listing = disassemble(&bytes);

        assert!(listing.contains("LDI R2 100"));
        assert!(listing.contains("PUSH R2"));
        assert!(listing.contains("POP R4"));
        assert!(listing.contains("HLT"));
    }
}
