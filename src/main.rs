//! LS-8 Emulator - CLI Entry Point
//!
//! Commands:
//! - `ls8-emu run <program>` - Run an LS8 or ASM file
//! - `ls8-emu asm <source>` - Assemble mnemonic source to an LS8 file
//! - `ls8-emu disasm <program>` - Disassemble an LS8 file

use clap::{Parser, Subcommand};
use ls8::{assemble, disassemble, load_program_file, save_program_file, Cpu, StdoutSink};

#[derive(Parser)]
#[command(name = "ls8-emu")]
#[command(version = "0.1.0")]
#[command(about = "An emulator of the LS-8 8-bit educational computer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program until it halts
    Run {
        /// Path to the LS8 or ASM file to execute
        program: String,
        /// Maximum number of instructions to run
        #[arg(short, long, default_value = "100000")]
        max_cycles: u64,
        /// Print a trace line before every instruction
        #[arg(short, long)]
        trace: bool,
    },
    /// Assemble mnemonic source to the binary-literal text format
    Asm {
        /// Path to the source file
        source: String,
        /// Output file (defaults to the source name with .ls8)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Disassemble a program to readable assembly
    Disasm {
        /// Path to the LS8 file
        program: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            program,
            max_cycles,
            trace,
        } => run_program(&program, max_cycles, trace),
        Commands::Asm { source, output } => assemble_file(&source, output),
        Commands::Disasm { program } => disassemble_file(&program),
    }
}

/// Load a program as raw bytes, assembling first if it is mnemonic source.
fn load_bytes(path: &str) -> Vec<u8> {
    if path.ends_with(".asm") {
        let source = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("failed to read {}: {}", path, e);
                std::process::exit(1);
            }
        };

        match assemble(&source) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("assembly error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        match load_program_file(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        }
    }
}

fn run_program(path: &str, max_cycles: u64, trace: bool) {
    let bytes = load_bytes(path);
    if bytes.is_empty() {
        eprintln!("no program bytes to execute");
        std::process::exit(1);
    }

    let mut cpu = Cpu::new();
    if let Err(e) = cpu.load_program(&bytes) {
        eprintln!("failed to load program: {}", e);
        std::process::exit(1);
    }

    let mut sink = StdoutSink;
    let mut executed = 0u64;

    while cpu.is_running() && executed < max_cycles {
        if trace {
            eprintln!("{}", cpu.trace_line());
        }

        match cpu.step(&mut sink) {
            Ok(_) => executed += 1,
            Err(e) => {
                eprintln!("CPU error at PC={:#04X}: {}", cpu.pc, e);
                eprintln!("{}", cpu.trace_line());
                eprintln!("memory at PC:");
                for (addr, byte) in cpu.mem.dump(cpu.pc as usize, 8) {
                    eprintln!("  {:02X}: {:08b}", addr, byte);
                }
                std::process::exit(1);
            }
        }
    }

    if !cpu.is_halted() {
        eprintln!(
            "reached max cycles limit ({}) without halting; use --max-cycles to increase",
            max_cycles
        );
        std::process::exit(1);
    }
}

fn assemble_file(source_path: &str, output: Option<String>) {
    let out_path = output.unwrap_or_else(|| source_path.replace(".asm", ".ls8"));

    let source = match std::fs::read_to_string(source_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to read {}: {}", source_path, e);
            std::process::exit(1);
        }
    };

    let bytes = match assemble(&source) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("assembly error: {}", e);
            std::process::exit(1);
        }
    };

    println!("assembled {} bytes", bytes.len());

    if let Err(e) = save_program_file(&out_path, &bytes) {
        eprintln!("failed to save {}: {}", out_path, e);
        std::process::exit(1);
    }

    println!("saved to {}", out_path);
}

fn disassemble_file(path: &str) {
    let bytes = load_bytes(path);
    print!("{}", disassemble(&bytes));
}
