//! Arithmetic/comparison unit.
//!
//! Pure register-to-register operations invoked by the execution engine
//! with the decoded opcode. Arithmetic results wrap modulo 256;
//! comparisons set exactly one flag.

use crate::cpu::decode::Opcode;
use crate::cpu::registers::{Flag, RegisterError, Registers};
use std::cmp::Ordering;
use thiserror::Error;

/// Execute an ALU operation against the register file.
///
/// Only ADD, MUL, and CMP are ALU operations; passing any other opcode
/// is an `UnsupportedOperation` error, which the engine treats as fatal.
pub fn execute(
    regs: &mut Registers,
    op: Opcode,
    reg_a: usize,
    reg_b: usize,
) -> Result<(), AluError> {
    match op {
        Opcode::Add => {
            let sum = regs.get(reg_a)?.wrapping_add(regs.get(reg_b)?);
            regs.set(reg_a, sum)?;
        }

        Opcode::Mul => {
            let product = regs.get(reg_a)?.wrapping_mul(regs.get(reg_b)?);
            regs.set(reg_a, product)?;
        }

        Opcode::Cmp => {
            let flag = match regs.get(reg_a)?.cmp(&regs.get(reg_b)?) {
                Ordering::Equal => Flag::Equal,
                Ordering::Less => Flag::Less,
                Ordering::Greater => Flag::Greater,
            };
            regs.set_flag(flag);
        }

        other => return Err(AluError::UnsupportedOperation(other)),
    }

    Ok(())
}

/// Errors that can occur during ALU operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AluError {
    /// The opcode is not an ALU operation.
    #[error("unsupported ALU operation: {}", .0.mnemonic())]
    UnsupportedOperation(Opcode),

    /// An operand named a register outside R0-R7.
    #[error("register error: {0}")]
    Register(#[from] RegisterError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add() {
        let mut regs = Registers::new();
        regs.set(0, 10).unwrap();
        regs.set(1, 32).unwrap();

        execute(&mut regs, Opcode::Add, 0, 1).unwrap();

        assert_eq!(regs.get(0).unwrap(), 42);
        assert_eq!(regs.get(1).unwrap(), 32);
    }

    #[test]
    fn test_add_wraps_at_boundary() {
        let mut regs = Registers::new();
        regs.set(0, 200).unwrap();
        regs.set(1, 100).unwrap();

        execute(&mut regs, Opcode::Add, 0, 1).unwrap();

        assert_eq!(regs.get(0).unwrap(), 44);
    }

    #[test]
    fn test_mul() {
        let mut regs = Registers::new();
        regs.set(2, 8).unwrap();
        regs.set(3, 9).unwrap();

        execute(&mut regs, Opcode::Mul, 2, 3).unwrap();

        assert_eq!(regs.get(2).unwrap(), 72);
    }

    #[test]
    fn test_cmp_sets_exactly_one_flag() {
        let mut regs = Registers::new();
        regs.set(0, 5).unwrap();
        regs.set(1, 9).unwrap();

        execute(&mut regs, Opcode::Cmp, 0, 1).unwrap();
        assert_eq!(regs.flag(), Flag::Less);

        execute(&mut regs, Opcode::Cmp, 1, 0).unwrap();
        assert_eq!(regs.flag(), Flag::Greater);

        execute(&mut regs, Opcode::Cmp, 0, 0).unwrap();
        assert_eq!(regs.flag(), Flag::Equal);
    }

    #[test]
    fn test_unsupported_operation() {
        let mut regs = Registers::new();

        let err = execute(&mut regs, Opcode::Ldi, 0, 1).unwrap_err();
        assert_eq!(err, AluError::UnsupportedOperation(Opcode::Ldi));
    }

    #[test]
    fn test_bad_register_index() {
        let mut regs = Registers::new();

        let err = execute(&mut regs, Opcode::Add, 0, 9).unwrap_err();
        assert_eq!(err, AluError::Register(RegisterError::IndexOutOfRange(9)));
    }

    proptest! {
        #[test]
        fn prop_add_matches_native_sum_mod_256(a: u8, b: u8) {
            let mut regs = Registers::new();
            regs.set(0, a).unwrap();
            regs.set(1, b).unwrap();

            execute(&mut regs, Opcode::Add, 0, 1).unwrap();

            let expected = ((a as u16 + b as u16) % 256) as u8;
            prop_assert_eq!(regs.get(0).unwrap(), expected);
        }

        #[test]
        fn prop_mul_matches_native_product_mod_256(a: u8, b: u8) {
            let mut regs = Registers::new();
            regs.set(0, a).unwrap();
            regs.set(1, b).unwrap();

            execute(&mut regs, Opcode::Mul, 0, 1).unwrap();

            let expected = ((a as u16 * b as u16) % 256) as u8;
            prop_assert_eq!(regs.get(0).unwrap(), expected);
        }

        #[test]
        fn prop_cmp_consistent_with_ordering(a: u8, b: u8) {
            let mut regs = Registers::new();
            regs.set(0, a).unwrap();
            regs.set(1, b).unwrap();

            execute(&mut regs, Opcode::Cmp, 0, 1).unwrap();
            let forward = regs.flag();

            execute(&mut regs, Opcode::Cmp, 1, 0).unwrap();
            let swapped = regs.flag();

            // Swapping operands flips Less/Greater and preserves Equal
            match (forward, swapped) {
                (Flag::Equal, Flag::Equal) => prop_assert_eq!(a, b),
                (Flag::Less, Flag::Greater) => prop_assert!(a < b),
                (Flag::Greater, Flag::Less) => prop_assert!(a > b),
                other => prop_assert!(false, "inconsistent flags: {:?}", other),
            }
        }
    }
}
