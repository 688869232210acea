//! LS-8 memory subsystem.
//!
//! A single flat 256-byte RAM holds both program code and the runtime
//! stack. Programs are loaded upward from address 0; the stack occupies
//! the high end and grows downward from 0xF4.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The number of memory cells in the LS-8.
pub const MEMORY_SIZE: usize = 256;

/// LS-8 memory: 256 byte-wide cells.
#[derive(Clone, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<u8>,
}

impl Memory {
    /// Create a new memory with all cells zeroed.
    pub fn new() -> Self {
        Self {
            cells: vec![0; MEMORY_SIZE],
        }
    }

    /// Read a cell by address (0-255).
    #[inline]
    pub fn read(&self, addr: usize) -> Result<u8, MemoryError> {
        self.cells
            .get(addr)
            .copied()
            .ok_or(MemoryError::AddressOutOfRange(addr))
    }

    /// Write a cell by address (0-255), overwriting prior contents.
    #[inline]
    pub fn write(&mut self, addr: usize, value: u8) -> Result<(), MemoryError> {
        match self.cells.get_mut(addr) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(MemoryError::AddressOutOfRange(addr)),
        }
    }

    /// Clear all memory to zeros.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = 0;
        }
    }

    /// Load a program into memory starting at the given address.
    pub fn load_program(&mut self, start_addr: usize, program: &[u8]) -> Result<(), MemoryError> {
        if start_addr + program.len() > MEMORY_SIZE {
            return Err(MemoryError::ProgramTooLarge {
                size: program.len(),
                available: MEMORY_SIZE.saturating_sub(start_addr),
            });
        }

        self.cells[start_addr..start_addr + program.len()].copy_from_slice(program);

        Ok(())
    }

    /// Dump memory contents (for debugging).
    pub fn dump(&self, start: usize, count: usize) -> Vec<(usize, u8)> {
        let end = (start + count).min(MEMORY_SIZE);
        (start..end).map(|i| (i, self.cells[i])).collect()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only show non-zero cells
        let non_zero = self.cells.iter().filter(|cell| **cell != 0).count();

        f.debug_struct("Memory")
            .field("non_zero_cells", &non_zero)
            .field("total_cells", &MEMORY_SIZE)
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Address is outside valid memory range.
    #[error("memory address {0} out of range (0-255)")]
    AddressOutOfRange(usize),

    /// Program is too large to fit in memory.
    #[error("program size {size} exceeds available space {available}")]
    ProgramTooLarge { size: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_read_write() {
        let mut mem = Memory::new();

        mem.write(10, 42).unwrap();
        assert_eq!(mem.read(10).unwrap(), 42);
    }

    #[test]
    fn test_memory_zero_initialized() {
        let mem = Memory::new();

        for addr in 0..MEMORY_SIZE {
            assert_eq!(mem.read(addr).unwrap(), 0);
        }
    }

    #[test]
    fn test_memory_bounds() {
        let mut mem = Memory::new();

        assert!(mem.read(0).is_ok());
        assert!(mem.read(255).is_ok());
        assert_eq!(mem.read(256), Err(MemoryError::AddressOutOfRange(256)));
        assert_eq!(mem.write(300, 1), Err(MemoryError::AddressOutOfRange(300)));
    }

    #[test]
    fn test_load_program() {
        let mut mem = Memory::new();
        let program = [0b1000_0010, 0b0000_0000, 0b0000_1000];

        mem.load_program(0, &program).unwrap();

        assert_eq!(mem.read(0).unwrap(), 0b1000_0010);
        assert_eq!(mem.read(1).unwrap(), 0b0000_0000);
        assert_eq!(mem.read(2).unwrap(), 0b0000_1000);
    }

    #[test]
    fn test_dump_window_clamps_at_end() {
        let mut mem = Memory::new();
        mem.write(254, 0xAA).unwrap();
        mem.write(255, 0xBB).unwrap();

        let window = mem.dump(254, 8);
        assert_eq!(window, vec![(254, 0xAA), (255, 0xBB)]);
    }

    #[test]
    fn test_load_program_too_large() {
        let mut mem = Memory::new();
        let program = vec![0u8; 10];

        let err = mem.load_program(250, &program).unwrap_err();
        assert_eq!(
            err,
            MemoryError::ProgramTooLarge {
                size: 10,
                available: 6
            }
        );
    }
}
