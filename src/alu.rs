//! Arithmetic operations for the LS-8 machine
//!
//! The ALU works purely on the register file: it never touches memory or
//! the program counter. Results wrap modulo 256.

use crate::error::VmError;
use crate::instruction::opcodes;
use crate::vm::NUM_REGISTERS;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Mul,
}

impl AluOp {
    pub fn name(&self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::Mul => "MUL",
        }
    }
}

impl TryFrom<u8> for AluOp {
    type Error = VmError;

    fn try_from(opcode: u8) -> Result<Self, Self::Error> {
        match opcode {
            opcodes::ADD => Ok(AluOp::Add),
            opcodes::MUL => Ok(AluOp::Mul),
            other => Err(VmError::UnsupportedAluOp(other)),
        }
    }
}

/// Apply `op` to `registers[dest]` and `registers[src]`, storing into `dest`
pub fn apply(
    op: AluOp,
    registers: &mut [u8; NUM_REGISTERS],
    dest: u8,
    src: u8,
) -> Result<(), VmError> {
    let b = *registers
        .get(src as usize)
        .ok_or(VmError::InvalidRegister(src))?;
    let a = registers
        .get_mut(dest as usize)
        .ok_or(VmError::InvalidRegister(dest))?;

    let result = match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::Mul => a.wrapping_mul(b),
    };
    debug!("{} R{}={} R{}={} -> {}", op.name(), dest, *a, src, b, result);
    *a = result;
    Ok(())
}
