//! # LS-8 Emulator
//!
//! An emulator of the LS-8, an 8-bit educational computer with 256
//! bytes of RAM, eight general-purpose registers, and a twelve
//! instruction set covering arithmetic, the stack, and conditional
//! branching.
//!
//! The crate demonstrates computer-architecture fundamentals: program
//! loading, instruction decoding, ALU operations, and the
//! fetch-decode-execute loop.

pub mod asm;
pub mod cpu;

// Re-export commonly used types
pub use asm::{
    assemble, disassemble, load_program_file, parse_source, save_program_file, AsmError, LoadError,
};
pub use cpu::{
    Cpu, CpuError, CpuState, Flag, Memory, Opcode, Registers, Sink, StdoutSink, MEMORY_SIZE,
};
