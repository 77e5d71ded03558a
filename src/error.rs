// Error types for the LS-8 machine

use std::fmt;

/// Faults raised while the machine is executing. Every one of them ends the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    /// Memory access at or beyond the 256-byte address space
    OutOfBounds(usize),
    /// Register operand outside R0-R7
    InvalidRegister(u8),
    /// Byte at `pc` does not match any known opcode
    UnknownOpcode { opcode: u8, pc: usize },
    /// ALU asked to perform an operation it does not implement
    UnsupportedAluOp(u8),
    StackOverflow,
    StackUnderflow,
    /// Configured instruction budget ran out before HLT
    InstructionLimit(u64),
    /// Writing PRN or trace output failed
    Output(String),
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VmError::OutOfBounds(addr) => {
                write!(f, "Memory address out of bounds: {:#x}", addr)
            }
            VmError::InvalidRegister(reg) => write!(f, "Invalid register R{}", reg),
            VmError::UnknownOpcode { opcode, pc } => {
                write!(f, "Bad input: {} ({:#010b}) at pc {:02X}", opcode, opcode, pc)
            }
            VmError::UnsupportedAluOp(op) => {
                write!(f, "Unsupported ALU operation: {:#010b}", op)
            }
            VmError::StackOverflow => write!(f, "Stack overflow"),
            VmError::StackUnderflow => write!(f, "Stack underflow"),
            VmError::InstructionLimit(limit) => {
                write!(f, "Instruction limit of {} reached before HLT", limit)
            }
            VmError::Output(msg) => write!(f, "Output error: {}", msg),
        }
    }
}

impl std::error::Error for VmError {}

impl From<std::io::Error> for VmError {
    fn from(error: std::io::Error) -> Self {
        VmError::Output(error.to_string())
    }
}

/// Failures while turning a program file into memory contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    FileNotFound(String),
    Io(String),
    /// Line (1-based) whose instruction text is not an 8-bit binary number
    Malformed { line: usize, text: String },
    /// Program byte count that would run into the stack area
    ProgramTooLarge(usize),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::FileNotFound(path) => write!(f, "{}: File not found", path),
            LoadError::Io(msg) => write!(f, "IO error: {}", msg),
            LoadError::Malformed { line, text } => {
                write!(f, "Malformed instruction on line {}: '{}'", line, text)
            }
            LoadError::ProgramTooLarge(len) => {
                write!(
                    f,
                    "Program of {} bytes does not fit below the stack at {:#04x}",
                    len,
                    crate::vm::STACK_TOP
                )
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Configuration file could not be read or parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Config error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
