//! Loader for LS-8 program files.
//!
//! The on-disk format is plain text, one byte per line:
//! - Eight binary digits, e.g. `10000010`
//! - `#` starts a comment, inline or whole-line
//! - Blank lines are ignored
//!
//! There is no header, length prefix, or checksum; the bytes land in
//! memory starting at address 0 exactly as written.

use std::path::Path;
use thiserror::Error;

/// Parse program source in the binary-literal text format.
pub fn parse_source(source: &str) -> Result<Vec<u8>, LoadError> {
    let mut bytes = Vec::new();

    for (line_num, line) in source.lines().enumerate() {
        let code = line.split('#').next().unwrap_or_default().trim();
        if code.is_empty() {
            continue;
        }

        let byte = u8::from_str_radix(code, 2).map_err(|_| LoadError::ParseError {
            line: line_num + 1,
            message: format!("expected an 8-bit binary literal, found `{}`", code),
        })?;

        bytes.push(byte);
    }

    Ok(bytes)
}

/// Load a program file from disk.
pub fn load_program_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, LoadError> {
    let source =
        std::fs::read_to_string(path.as_ref()).map_err(|e| LoadError::IoError(e.to_string()))?;
    parse_source(&source)
}

/// Save program bytes to disk in the binary-literal text format.
pub fn save_program_file<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), LoadError> {
    use std::io::Write;

    let mut file =
        std::fs::File::create(path.as_ref()).map_err(|e| LoadError::IoError(e.to_string()))?;

    writeln!(file, "# LS-8 program file").map_err(|e| LoadError::IoError(e.to_string()))?;
    writeln!(file, "# {} bytes", bytes.len()).map_err(|e| LoadError::IoError(e.to_string()))?;
    writeln!(file).map_err(|e| LoadError::IoError(e.to_string()))?;

    for (addr, byte) in bytes.iter().enumerate() {
        writeln!(file, "{:08b} # {:02X}", byte, addr)
            .map_err(|e| LoadError::IoError(e.to_string()))?;
    }

    Ok(())
}

/// Errors that can occur while loading a program file.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },
}
