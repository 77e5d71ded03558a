#[macro_use]
extern crate lazy_static;

pub mod alu;
pub mod config;
pub mod disassembler;
pub mod error;
pub mod instruction;
pub mod interpreter;
pub mod loader;
pub mod vm;

pub use error::{ConfigError, LoadError, VmError};
pub use interpreter::{ExecutionResult, Interpreter};
pub use vm::Vm;
