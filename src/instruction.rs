use crate::alu::AluOp;
use crate::error::VmError;
use crate::vm::Vm;
use std::collections::HashMap;
use std::fmt::{Display, Error, Formatter};

/// Opcode byte values. These are the program wire format and must stay bit-exact.
pub mod opcodes {
    pub const LDI: u8 = 0b1000_0010;
    pub const PRN: u8 = 0b0100_0111;
    pub const HLT: u8 = 0b0000_0001;
    pub const PUSH: u8 = 0b0100_0101;
    pub const POP: u8 = 0b0100_0110;
    pub const MUL: u8 = 0b1010_0010;
    pub const ADD: u8 = 0b1010_0000;
    pub const CALL: u8 = 0b0101_0000;
    pub const RET: u8 = 0b0001_0001;
}

lazy_static! {
    static ref OPCODE_NAMES: HashMap<u8, &'static str> = {
        let mut m = HashMap::new();
        m.insert(opcodes::LDI, "LDI");
        m.insert(opcodes::PRN, "PRN");
        m.insert(opcodes::HLT, "HLT");
        m.insert(opcodes::PUSH, "PUSH");
        m.insert(opcodes::POP, "POP");
        m.insert(opcodes::MUL, "MUL");
        m.insert(opcodes::ADD, "ADD");
        m.insert(opcodes::CALL, "CALL");
        m.insert(opcodes::RET, "RET");
        m
    };
}

/// Get the mnemonic for an opcode byte, if it is one
pub fn opcode_name(opcode: u8) -> Option<&'static str> {
    OPCODE_NAMES.get(&opcode).copied()
}

/// A decoded LS-8 instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Load an immediate into a register
    Ldi { reg: u8, value: u8 },
    /// Print a register in decimal
    Prn { reg: u8 },
    Hlt,
    Push { reg: u8 },
    Pop { reg: u8 },
    /// Register-to-register arithmetic, result in `reg_a`
    Alu { op: AluOp, reg_a: u8, reg_b: u8 },
    /// Jump to the address held in `reg`, saving the resume address
    Call { reg: u8 },
    Ret,
}

impl Instruction {
    /// Decode the instruction whose opcode sits at `pc`.
    ///
    /// Operands are read positionally from `pc+1` and `pc+2`.
    pub fn decode(vm: &Vm, pc: usize) -> Result<Instruction, VmError> {
        let opcode = vm.read(pc)?;
        let operand = |n: usize| vm.read(pc + n);

        let inst = match opcode {
            opcodes::LDI => Instruction::Ldi {
                reg: operand(1)?,
                value: operand(2)?,
            },
            opcodes::PRN => Instruction::Prn { reg: operand(1)? },
            opcodes::HLT => Instruction::Hlt,
            opcodes::PUSH => Instruction::Push { reg: operand(1)? },
            opcodes::POP => Instruction::Pop { reg: operand(1)? },
            opcodes::ADD | opcodes::MUL => Instruction::Alu {
                op: AluOp::try_from(opcode)?,
                reg_a: operand(1)?,
                reg_b: operand(2)?,
            },
            opcodes::CALL => Instruction::Call { reg: operand(1)? },
            opcodes::RET => Instruction::Ret,
            _ => return Err(VmError::UnknownOpcode { opcode, pc }),
        };
        Ok(inst)
    }

    pub fn opcode(&self) -> u8 {
        match self {
            Instruction::Ldi { .. } => opcodes::LDI,
            Instruction::Prn { .. } => opcodes::PRN,
            Instruction::Hlt => opcodes::HLT,
            Instruction::Push { .. } => opcodes::PUSH,
            Instruction::Pop { .. } => opcodes::POP,
            Instruction::Alu { op: AluOp::Add, .. } => opcodes::ADD,
            Instruction::Alu { op: AluOp::Mul, .. } => opcodes::MUL,
            Instruction::Call { .. } => opcodes::CALL,
            Instruction::Ret => opcodes::RET,
        }
    }

    /// Width in bytes: opcode plus operands
    pub fn size(&self) -> usize {
        match self {
            Instruction::Hlt | Instruction::Ret => 1,
            Instruction::Prn { .. }
            | Instruction::Push { .. }
            | Instruction::Pop { .. }
            | Instruction::Call { .. } => 2,
            Instruction::Ldi { .. } | Instruction::Alu { .. } => 3,
        }
    }

    /// Encode back into program bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![self.opcode()];
        match *self {
            Instruction::Ldi { reg, value } => bytes.extend([reg, value]),
            Instruction::Prn { reg }
            | Instruction::Push { reg }
            | Instruction::Pop { reg }
            | Instruction::Call { reg } => bytes.push(reg),
            Instruction::Alu { reg_a, reg_b, .. } => bytes.extend([reg_a, reg_b]),
            Instruction::Hlt | Instruction::Ret => {}
        }
        bytes
    }

    /// Mnemonic without operands
    pub fn name(&self) -> &'static str {
        opcode_name(self.opcode()).unwrap_or("???")
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.name())?;
        match *self {
            Instruction::Ldi { reg, value } => write!(f, " R{},{}", reg, value),
            Instruction::Prn { reg }
            | Instruction::Push { reg }
            | Instruction::Pop { reg }
            | Instruction::Call { reg } => write!(f, " R{}", reg),
            Instruction::Alu { reg_a, reg_b, .. } => write!(f, " R{},R{}", reg_a, reg_b),
            Instruction::Hlt | Instruction::Ret => Ok(()),
        }
    }
}
