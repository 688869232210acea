//! LS-8 CPU registers.
//!
//! The register file holds:
//! - R0-R7: eight general-purpose 8-bit registers
//! - SP: a dedicated stack pointer addressing main memory
//! - FL: a flag register recording the most recent comparison outcome

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The number of general-purpose registers.
pub const NUM_REGISTERS: usize = 8;

/// Initial stack pointer value. The stack grows downward from here.
pub const STACK_START: u8 = 0xF4;

/// Outcome of the most recent comparison.
///
/// Exactly one of Equal/Less/Greater holds after every CMP; the previous
/// outcome is overwritten, never combined. `None` only occurs before the
/// first comparison of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flag {
    /// No comparison has executed yet.
    None,
    /// The compared registers were equal.
    Equal,
    /// The first register was less than the second.
    Less,
    /// The first register was greater than the second.
    Greater,
}

/// The LS-8 register file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Registers {
    /// R0-R7 general-purpose registers.
    regs: [u8; NUM_REGISTERS],

    /// Stack pointer. Addresses the next occupied stack slot in memory.
    sp: u8,

    /// Flag register, written only by CMP.
    flag: Flag,
}

impl Registers {
    /// Create a new register file: all registers zero, SP at 0xF4.
    pub fn new() -> Self {
        Self {
            regs: [0; NUM_REGISTERS],
            sp: STACK_START,
            flag: Flag::None,
        }
    }

    /// Reset all registers to their power-on state.
    pub fn reset(&mut self) {
        self.regs = [0; NUM_REGISTERS];
        self.sp = STACK_START;
        self.flag = Flag::None;
    }

    /// Read a general-purpose register by index (0-7).
    #[inline]
    pub fn get(&self, index: usize) -> Result<u8, RegisterError> {
        self.regs
            .get(index)
            .copied()
            .ok_or(RegisterError::IndexOutOfRange(index))
    }

    /// Write a general-purpose register by index (0-7).
    ///
    /// Values are `u8`, so arithmetic results are stored modulo 256 by
    /// construction; overflow wraps silently rather than erroring.
    #[inline]
    pub fn set(&mut self, index: usize, value: u8) -> Result<(), RegisterError> {
        match self.regs.get_mut(index) {
            Some(reg) => {
                *reg = value;
                Ok(())
            }
            None => Err(RegisterError::IndexOutOfRange(index)),
        }
    }

    /// Current stack pointer value.
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Decrement the stack pointer and return the new value.
    ///
    /// PUSH relies on this ordering: the slot is claimed before the
    /// value is written to it.
    pub fn push_address(&mut self) -> u8 {
        self.sp = self.sp.wrapping_sub(1);
        self.sp
    }

    /// Return the current stack pointer, then increment it.
    ///
    /// POP relies on this ordering: the value is read from the slot
    /// before it is released.
    pub fn pop_address(&mut self) -> u8 {
        let addr = self.sp;
        self.sp = self.sp.wrapping_add(1);
        addr
    }

    /// The most recent comparison outcome.
    pub fn flag(&self) -> Flag {
        self.flag
    }

    /// Record a comparison outcome, replacing the previous one.
    pub fn set_flag(&mut self, flag: Flag) {
        self.flag = flag;
    }

    /// Copy of all general-purpose registers (for trace output).
    pub fn snapshot(&self) -> [u8; NUM_REGISTERS] {
        self.regs
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during register file operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// Register index is outside R0-R7.
    #[error("register index {0} out of range (0-7)")]
    IndexOutOfRange(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_get_set() {
        let mut regs = Registers::new();

        regs.set(0, 42).unwrap();
        regs.set(7, 255).unwrap();

        assert_eq!(regs.get(0).unwrap(), 42);
        assert_eq!(regs.get(7).unwrap(), 255);
        assert_eq!(regs.get(3).unwrap(), 0);
    }

    #[test]
    fn test_index_bounds() {
        let mut regs = Registers::new();

        assert_eq!(regs.get(8), Err(RegisterError::IndexOutOfRange(8)));
        assert_eq!(regs.set(200, 1), Err(RegisterError::IndexOutOfRange(200)));
    }

    #[test]
    fn test_stack_pointer_ordering() {
        let mut regs = Registers::new();
        assert_eq!(regs.sp(), STACK_START);

        // Push claims the slot first
        let push_addr = regs.push_address();
        assert_eq!(push_addr, STACK_START - 1);
        assert_eq!(regs.sp(), STACK_START - 1);

        // Pop releases the slot after reading it
        let pop_addr = regs.pop_address();
        assert_eq!(pop_addr, STACK_START - 1);
        assert_eq!(regs.sp(), STACK_START);
    }

    #[test]
    fn test_stack_pointer_wraps() {
        let mut regs = Registers::new();

        // Drain the stack pointer down through zero
        for _ in 0..STACK_START {
            let _ = regs.push_address();
        }
        assert_eq!(regs.sp(), 0);

        let wrapped = regs.push_address();
        assert_eq!(wrapped, 0xFF);
    }

    #[test]
    fn test_flag_replaced_not_combined() {
        let mut regs = Registers::new();
        assert_eq!(regs.flag(), Flag::None);

        regs.set_flag(Flag::Less);
        regs.set_flag(Flag::Equal);
        assert_eq!(regs.flag(), Flag::Equal);
    }

    proptest! {
        #[test]
        fn prop_push_pop_roundtrip(pushes in 1usize..512) {
            let mut regs = Registers::new();
            let before = regs.sp();

            for _ in 0..pushes {
                let _ = regs.push_address();
            }
            for _ in 0..pushes {
                let _ = regs.pop_address();
            }

            prop_assert_eq!(regs.sp(), before);
        }
    }
}
