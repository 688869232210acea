//! Instruction decoder for the LS-8.
//!
//! Each instruction is a single opcode byte followed by 0-2 operand
//! bytes. The high two bits of the opcode byte encode the operand
//! count, so instruction length falls out of the encoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The LS-8 instruction set.
///
/// Discriminants are the exact opcode byte values; any other byte is an
/// unknown instruction, which the execution engine skips rather than
/// treating as fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    /// No operation
    Nop = 0b0000_0000,

    /// Halt execution
    Hlt = 0b0000_0001,

    /// Load immediate: `reg[a] = value`
    Ldi = 0b1000_0010,

    /// Print the named register as a decimal integer
    Prn = 0b0100_0111,

    /// Add: `reg[a] = (reg[a] + reg[b]) mod 256`
    Add = 0b1010_0000,

    /// Multiply: `reg[a] = (reg[a] * reg[b]) mod 256`
    Mul = 0b1010_0010,

    /// Compare `reg[a]` with `reg[b]`, setting the flag register
    Cmp = 0b1010_0111,

    /// Push the named register onto the stack
    Push = 0b0100_0101,

    /// Pop the top of the stack into the named register
    Pop = 0b0100_0110,

    /// Unconditional jump to the address held in the named register
    Jmp = 0b0101_0100,

    /// Jump if the Equal flag is set
    Jeq = 0b0101_0101,

    /// Jump if the Equal flag is not set
    Jne = 0b0101_0110,
}

impl Opcode {
    /// Decode a raw opcode byte.
    pub fn decode(byte: u8) -> Result<Self, DecodeError> {
        match byte {
            0b0000_0000 => Ok(Opcode::Nop),
            0b0000_0001 => Ok(Opcode::Hlt),
            0b1000_0010 => Ok(Opcode::Ldi),
            0b0100_0111 => Ok(Opcode::Prn),
            0b1010_0000 => Ok(Opcode::Add),
            0b1010_0010 => Ok(Opcode::Mul),
            0b1010_0111 => Ok(Opcode::Cmp),
            0b0100_0101 => Ok(Opcode::Push),
            0b0100_0110 => Ok(Opcode::Pop),
            0b0101_0100 => Ok(Opcode::Jmp),
            0b0101_0101 => Ok(Opcode::Jeq),
            0b0101_0110 => Ok(Opcode::Jne),
            other => Err(DecodeError::UnknownOpcode(other)),
        }
    }

    /// The raw opcode byte.
    pub fn encode(self) -> u8 {
        self as u8
    }

    /// Number of operand bytes following the opcode (high two bits of
    /// the encoding).
    pub fn operand_count(self) -> usize {
        (self as u8 >> 6) as usize
    }

    /// Total instruction length in bytes, opcode included.
    pub fn size(self) -> usize {
        self.operand_count() + 1
    }

    /// Assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::Hlt => "HLT",
            Opcode::Ldi => "LDI",
            Opcode::Prn => "PRN",
            Opcode::Add => "ADD",
            Opcode::Mul => "MUL",
            Opcode::Cmp => "CMP",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Jmp => "JMP",
            Opcode::Jeq => "JEQ",
            Opcode::Jne => "JNE",
        }
    }

    /// Look up an opcode by its assembly mnemonic (case-insensitive).
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        match mnemonic.to_uppercase().as_str() {
            "NOP" => Some(Opcode::Nop),
            "HLT" => Some(Opcode::Hlt),
            "LDI" => Some(Opcode::Ldi),
            "PRN" => Some(Opcode::Prn),
            "ADD" => Some(Opcode::Add),
            "MUL" => Some(Opcode::Mul),
            "CMP" => Some(Opcode::Cmp),
            "PUSH" => Some(Opcode::Push),
            "POP" => Some(Opcode::Pop),
            "JMP" => Some(Opcode::Jmp),
            "JEQ" => Some(Opcode::Jeq),
            "JNE" => Some(Opcode::Jne),
            _ => None,
        }
    }

    /// All opcodes, for table-driven tests and tooling.
    pub const ALL: [Opcode; 12] = [
        Opcode::Nop,
        Opcode::Hlt,
        Opcode::Ldi,
        Opcode::Prn,
        Opcode::Add,
        Opcode::Mul,
        Opcode::Cmp,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Jmp,
        Opcode::Jeq,
        Opcode::Jne,
    ];
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The byte matches no instruction in the dispatch table.
    #[error("unknown opcode byte {0:#010b}")]
    UnknownOpcode(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_encode_roundtrip() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::decode(op.encode()).unwrap(), op);
        }
    }

    #[test]
    fn test_unknown_opcode() {
        assert_eq!(
            Opcode::decode(0b1111_1111),
            Err(DecodeError::UnknownOpcode(0b1111_1111))
        );
    }

    #[test]
    fn test_operand_counts() {
        assert_eq!(Opcode::Nop.operand_count(), 0);
        assert_eq!(Opcode::Hlt.operand_count(), 0);
        assert_eq!(Opcode::Prn.operand_count(), 1);
        assert_eq!(Opcode::Push.operand_count(), 1);
        assert_eq!(Opcode::Pop.operand_count(), 1);
        assert_eq!(Opcode::Jmp.operand_count(), 1);
        assert_eq!(Opcode::Jeq.operand_count(), 1);
        assert_eq!(Opcode::Jne.operand_count(), 1);
        assert_eq!(Opcode::Ldi.operand_count(), 2);
        assert_eq!(Opcode::Add.operand_count(), 2);
        assert_eq!(Opcode::Mul.operand_count(), 2);
        assert_eq!(Opcode::Cmp.operand_count(), 2);
    }

    #[test]
    fn test_size_includes_opcode() {
        assert_eq!(Opcode::Hlt.size(), 1);
        assert_eq!(Opcode::Prn.size(), 2);
        assert_eq!(Opcode::Ldi.size(), 3);
    }

    #[test]
    fn test_mnemonic_roundtrip() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_mnemonic(op.mnemonic()), Some(op));
        }
        assert_eq!(Opcode::from_mnemonic("ldi"), Some(Opcode::Ldi));
        assert_eq!(Opcode::from_mnemonic("XYZ"), None);
    }
}
