//! Program I/O for the LS-8: text-format loader, assembler, and
//! disassembler. These are collaborators of the CPU core; the engine
//! itself only ever sees raw bytes.

pub mod assembler;
pub mod disasm;
pub mod loader;

pub use assembler::{assemble, AsmError};
pub use disasm::disassemble;
pub use loader::{load_program_file, parse_source, save_program_file, LoadError};
