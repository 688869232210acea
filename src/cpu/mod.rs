//! CPU emulation for the LS-8.
//!
//! This module implements the complete LS-8 architecture:
//! - 256 byte-wide memory cells shared by code and stack
//! - 8 general-purpose registers, a stack pointer, and a flag register
//! - 12-instruction set with a fetch-decode-execute dispatch loop

pub mod alu;
pub mod decode;
pub mod execute;
pub mod memory;
pub mod registers;

pub use alu::AluError;
pub use decode::{DecodeError, Opcode};
pub use execute::{Cpu, CpuError, CpuState, Sink, StdoutSink};
pub use memory::{Memory, MemoryError, MEMORY_SIZE};
pub use registers::{Flag, RegisterError, Registers, NUM_REGISTERS, STACK_START};
