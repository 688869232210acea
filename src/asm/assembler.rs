//! Simple assembler for LS-8 programs.
//!
//! Syntax:
//! ```text
//! # Comment
//! LOOP:           # Define a label
//!     LDI R0 8    # Load immediate into R0
//!     LDI R3 LOOP # Labels resolve to byte addresses
//!     ADD R0 R1   # Register-to-register ALU op
//!     JNE R3      # Jump target comes from a register
//!     HLT
//!     DAT 42      # Define a raw data byte
//! ```
//!
//! Operands may be separated by spaces or commas. Immediate values
//! accept decimal, `0x` hex, and `0b` binary forms.

use crate::cpu::decode::Opcode;
use std::collections::HashMap;
use thiserror::Error;

/// Assemble source code to raw program bytes.
pub fn assemble(source: &str) -> Result<Vec<u8>, AsmError> {
    let mut asm = Assembler::new();
    asm.assemble(source)
}

/// What an operand position accepts.
enum OperandKind {
    Register,
    Value,
}

/// The assembler state.
struct Assembler {
    /// Symbol table (label -> byte address).
    symbols: HashMap<String, u8>,
    /// Unresolved label references (output index, label, source line).
    pending: Vec<(usize, String, usize)>,
    /// Output bytes.
    output: Vec<u8>,
}

impl Assembler {
    fn new() -> Self {
        Self {
            symbols: HashMap::new(),
            pending: Vec::new(),
            output: Vec::new(),
        }
    }

    fn assemble(&mut self, source: &str) -> Result<Vec<u8>, AsmError> {
        // Pass 1: collect labels and generate code
        for (line_num, line) in source.lines().enumerate() {
            self.process_line(line, line_num + 1)?;
        }

        // Pass 2: resolve forward references
        self.resolve_references()?;

        Ok(self.output.clone())
    }

    fn process_line(&mut self, line: &str, line_num: usize) -> Result<(), AsmError> {
        // Strip comments and surrounding whitespace
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            return Ok(());
        }

        // Check for label definition
        if let Some(colon_idx) = line.find(':') {
            let label = line[..colon_idx].trim().to_uppercase();
            if !label.is_empty() {
                let addr = self.output.len();
                if addr > u8::MAX as usize {
                    return Err(AsmError::SyntaxError {
                        line: line_num,
                        message: format!("label `{}` is past address 255", label),
                    });
                }
                self.symbols.insert(label, addr as u8);
            }

            // Process rest of line if any
            let rest = line[colon_idx + 1..].trim();
            if !rest.is_empty() {
                return self.process_instruction(rest, line_num);
            }
            return Ok(());
        }

        self.process_instruction(line, line_num)
    }

    fn process_instruction(&mut self, line: &str, line_num: usize) -> Result<(), AsmError> {
        let tokens: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect();

        let Some((&mnemonic, operands)) = tokens.split_first() else {
            return Ok(());
        };

        // DAT emits a raw byte with no opcode
        if mnemonic.eq_ignore_ascii_case("DAT") || mnemonic.eq_ignore_ascii_case("DATA") {
            let token = operands.first().ok_or_else(|| AsmError::SyntaxError {
                line: line_num,
                message: "DAT requires a value".into(),
            })?;
            self.emit_value(token, line_num)?;
            return Ok(());
        }

        let op = Opcode::from_mnemonic(mnemonic).ok_or_else(|| AsmError::UnknownMnemonic {
            line: line_num,
            mnemonic: mnemonic.to_string(),
        })?;

        if operands.len() != op.operand_count() {
            return Err(AsmError::SyntaxError {
                line: line_num,
                message: format!(
                    "{} takes {} operand(s), found {}",
                    op.mnemonic(),
                    op.operand_count(),
                    operands.len()
                ),
            });
        }

        self.output.push(op.encode());

        for (pos, token) in operands.iter().enumerate() {
            match operand_kind(op, pos) {
                OperandKind::Register => {
                    let index = parse_register(token).ok_or_else(|| AsmError::SyntaxError {
                        line: line_num,
                        message: format!("expected a register R0-R7, found `{}`", token),
                    })?;
                    self.output.push(index);
                }
                OperandKind::Value => self.emit_value(token, line_num)?,
            }
        }

        Ok(())
    }

    /// Emit an immediate byte, deferring label references to pass 2.
    fn emit_value(&mut self, token: &str, line_num: usize) -> Result<(), AsmError> {
        if let Some(value) = parse_value(token) {
            self.output.push(value);
            return Ok(());
        }

        if is_identifier(token) {
            self.pending
                .push((self.output.len(), token.to_uppercase(), line_num));
            self.output.push(0); // placeholder
            return Ok(());
        }

        Err(AsmError::SyntaxError {
            line: line_num,
            message: format!("expected a value 0-255 or a label, found `{}`", token),
        })
    }

    fn resolve_references(&mut self) -> Result<(), AsmError> {
        for (index, label, line) in &self.pending {
            let addr = self
                .symbols
                .get(label)
                .ok_or_else(|| AsmError::UndefinedLabel {
                    line: *line,
                    label: label.clone(),
                })?;
            self.output[*index] = *addr;
        }
        Ok(())
    }
}

/// Which operand positions name registers and which take values.
///
/// Every operand is a register except the LDI immediate.
fn operand_kind(op: Opcode, position: usize) -> OperandKind {
    match (op, position) {
        (Opcode::Ldi, 1) => OperandKind::Value,
        _ => OperandKind::Register,
    }
}

/// Parse a register name `R0`-`R7`.
fn parse_register(token: &str) -> Option<u8> {
    let digits = token.strip_prefix(['R', 'r'])?;
    match digits.parse::<u8>() {
        Ok(index) if index < 8 => Some(index),
        _ => None,
    }
}

/// Parse an immediate value in decimal, hex, or binary form.
fn parse_value(token: &str) -> Option<u8> {
    if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        return u8::from_str_radix(hex, 16).ok();
    }
    if let Some(bin) = token.strip_prefix("0b").or_else(|| token.strip_prefix("0B")) {
        return u8::from_str_radix(bin, 2).ok();
    }
    token.parse::<u8>().ok()
}

/// A plausible label: letters, digits, underscores, not starting with a digit.
fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Errors that can occur during assembly.
#[derive(Debug, Clone, Error)]
pub enum AsmError {
    #[error("syntax error on line {line}: {message}")]
    SyntaxError { line: usize, message: String },

    #[error("unknown mnemonic `{mnemonic}` on line {line}")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("undefined label `{label}` on line {line}")]
    UndefinedLabel { line: usize, label: String },
}
