//! CPU execution engine for the LS-8.
//!
//! Implements the fetch-decode-execute cycle and all instruction
//! behaviors. The engine owns one memory and one register file for the
//! lifetime of a run; output and diagnostics go to a caller-supplied
//! [`Sink`].

use crate::cpu::alu::{self, AluError};
use crate::cpu::decode::Opcode;
use crate::cpu::memory::{Memory, MemoryError};
use crate::cpu::registers::{Flag, RegisterError, Registers};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use thiserror::Error;

/// CPU execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    /// CPU is running normally.
    Running,
    /// CPU has halted (executed HLT).
    Halted,
}

/// Where PRN output and engine diagnostics go.
pub trait Sink {
    /// Called once per PRN with the decimal value of the named register.
    fn emit(&mut self, value: u8);

    /// Called when a fetched byte matches no instruction. Non-fatal;
    /// the engine skips the byte and keeps running.
    fn unknown_instruction(&mut self, _pc: u8, _byte: u8) {}
}

/// Sink printing values to stdout and diagnostics to stderr.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn emit(&mut self, value: u8) {
        println!("{}", value);
    }

    fn unknown_instruction(&mut self, pc: u8, byte: u8) {
        eprintln!("unknown instruction {:#010b} at address {:#04X}", byte, pc);
    }
}

/// The LS-8 CPU.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cpu {
    /// CPU registers.
    pub regs: Registers,
    /// Main memory.
    pub mem: Memory,
    /// Program counter: address of the next instruction byte.
    pub pc: u8,
    /// Current execution state.
    pub state: CpuState,
    /// Instruction count (for profiling and run limits).
    pub cycles: u64,
}

impl Cpu {
    /// Create a new CPU with zeroed state.
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            pc: 0,
            state: CpuState::Running,
            cycles: 0,
        }
    }

    /// Reset the CPU to its power-on state.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.mem.clear();
        self.pc = 0;
        self.state = CpuState::Running;
        self.cycles = 0;
    }

    /// Load a program into memory at address 0.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), MemoryError> {
        self.mem.load_program(0, program)
    }

    /// Execute a single instruction.
    ///
    /// Returns the executed opcode, or `None` if the fetched byte was
    /// an unknown instruction (reported to the sink and skipped).
    pub fn step(&mut self, sink: &mut impl Sink) -> Result<Option<Opcode>, CpuError> {
        if self.state != CpuState::Running {
            return Err(CpuError::NotRunning(self.state));
        }

        // Fetch the opcode byte plus both candidate operands up front.
        // Wrapping addresses keep the two-ahead reads in bounds; the
        // values are ignored when the opcode is shorter.
        let pc = self.pc;
        let raw = self.mem.read(pc as usize)?;
        let operand_a = self.mem.read(pc.wrapping_add(1) as usize)?;
        let operand_b = self.mem.read(pc.wrapping_add(2) as usize)?;

        let op = match Opcode::decode(raw) {
            Ok(op) => op,
            Err(_) => {
                sink.unknown_instruction(pc, raw);
                self.pc = pc.wrapping_add(1);
                self.cycles += 1;
                return Ok(None);
            }
        };

        self.execute(op, operand_a, operand_b, sink)?;
        self.cycles += 1;

        Ok(Some(op))
    }

    /// Run until halt.
    ///
    /// Returns the number of instructions executed (unknown-byte skips
    /// included). Fatal errors unwind to the caller with the machine
    /// state preserved for inspection.
    pub fn run(&mut self, sink: &mut impl Sink) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;

        while self.state == CpuState::Running {
            let _ = self.step(sink)?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Run for at most `max_cycles` instructions.
    ///
    /// The engine has no built-in preemption; this is the external
    /// iteration budget for programs that never reach HLT.
    pub fn run_limited(&mut self, max_cycles: u64, sink: &mut impl Sink) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;
        let limit = self.cycles + max_cycles;

        while self.state == CpuState::Running && self.cycles < limit {
            let _ = self.step(sink)?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Execute a decoded instruction.
    fn execute(
        &mut self,
        op: Opcode,
        operand_a: u8,
        operand_b: u8,
        sink: &mut impl Sink,
    ) -> Result<(), CpuError> {
        match op {
            Opcode::Ldi => {
                self.regs.set(operand_a as usize, operand_b)?;
                self.advance(op);
            }

            Opcode::Prn => {
                sink.emit(self.regs.get(operand_a as usize)?);
                self.advance(op);
            }

            Opcode::Hlt => {
                self.state = CpuState::Halted;
            }

            Opcode::Add | Opcode::Mul | Opcode::Cmp => {
                alu::execute(&mut self.regs, op, operand_a as usize, operand_b as usize)?;
                self.advance(op);
            }

            Opcode::Push => {
                let value = self.regs.get(operand_a as usize)?;
                let sp = self.regs.push_address();
                self.mem.write(sp as usize, value)?;
                self.advance(op);
            }

            Opcode::Pop => {
                let sp = self.regs.pop_address();
                let value = self.mem.read(sp as usize)?;
                self.regs.set(operand_a as usize, value)?;
                self.advance(op);
            }

            Opcode::Jmp => {
                self.pc = self.regs.get(operand_a as usize)?;
            }

            Opcode::Jeq => {
                if self.regs.flag() == Flag::Equal {
                    self.pc = self.regs.get(operand_a as usize)?;
                } else {
                    self.advance(op);
                }
            }

            Opcode::Jne => {
                if self.regs.flag() != Flag::Equal {
                    self.pc = self.regs.get(operand_a as usize)?;
                } else {
                    self.advance(op);
                }
            }

            Opcode::Nop => {
                self.advance(op);
            }
        }

        Ok(())
    }

    /// Advance the program counter past the instruction just executed.
    fn advance(&mut self, op: Opcode) {
        self.pc = self.pc.wrapping_add(op.size() as u8);
    }

    /// Format the machine state in the classic trace layout:
    /// program counter, the next three raw bytes, then all eight
    /// registers, each as two-digit uppercase hex.
    pub fn trace_line(&self) -> String {
        let pc = self.pc;
        let b0 = self.mem.read(pc as usize).unwrap_or(0);
        let b1 = self.mem.read(pc.wrapping_add(1) as usize).unwrap_or(0);
        let b2 = self.mem.read(pc.wrapping_add(2) as usize).unwrap_or(0);

        let mut line = format!("TRACE: {:02X} | {:02X} {:02X} {:02X} |", pc, b0, b1, b2);
        for value in self.regs.snapshot().iter() {
            let _ = write!(line, " {:02X}", value);
        }

        line
    }

    /// Check if the CPU is halted.
    pub fn is_halted(&self) -> bool {
        self.state == CpuState::Halted
    }

    /// Check if the CPU is running.
    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that abort a run.
///
/// Unknown instruction bytes are deliberately absent: they are reported
/// through the [`Sink`] and skipped, not raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    /// `step` was called after the CPU halted.
    #[error("CPU not running: {0:?}")]
    NotRunning(CpuState),

    /// A memory access was out of range.
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),

    /// An operand named a register outside R0-R7.
    #[error("register error: {0}")]
    Register(#[from] RegisterError),

    /// The ALU rejected the operation.
    #[error("ALU error: {0}")]
    Alu(#[from] AluError),
}
