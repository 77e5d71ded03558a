use crate::error::{LoadError, VmError};
use log::debug;

/// Size of the flat address space
pub const MEMORY_SIZE: usize = 256;

/// Number of general-purpose registers (R0-R7)
pub const NUM_REGISTERS: usize = 8;

/// Initial data stack pointer. PUSH pre-decrements, so the first value lands at 0xF3.
/// Programs must end below this address.
pub const STACK_TOP: u8 = 0xF4;

/// Initial return-address stack pointer. CALL pre-decrements into 0xF4..=0xFE.
pub const RETURN_STACK_TOP: u8 = 0xFF;

/// The LS-8 machine state
#[derive(Debug, Clone)]
pub struct Vm {
    memory: [u8; MEMORY_SIZE],
    registers: [u8; NUM_REGISTERS],
    /// Program counter - address of the next opcode to fetch
    pub pc: usize,
    /// Data stack pointer used by PUSH/POP
    pub sp: u8,
    /// Return-address stack pointer used by CALL/RET
    pub return_sp: u8,
    /// Cleared by HLT
    pub running: bool,
    /// Number of bytes written by the last `load`
    program_len: usize,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    /// Create a machine with zeroed memory and registers
    pub fn new() -> Self {
        Vm {
            memory: [0; MEMORY_SIZE],
            registers: [0; NUM_REGISTERS],
            pc: 0,
            sp: STACK_TOP,
            return_sp: RETURN_STACK_TOP,
            running: true,
            program_len: 0,
        }
    }

    /// Create a machine and load `program` at address 0
    pub fn with_program(program: &[u8]) -> Result<Self, LoadError> {
        let mut vm = Vm::new();
        vm.load(program)?;
        Ok(vm)
    }

    /// Copy program bytes into memory starting at address 0
    pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.len() > STACK_TOP as usize {
            return Err(LoadError::ProgramTooLarge(program.len()));
        }
        self.memory[..program.len()].copy_from_slice(program);
        self.program_len = program.len();
        debug!("Loaded {} program bytes", program.len());
        Ok(())
    }

    /// Reset registers, pointers and the running flag. Memory is kept.
    pub fn reset(&mut self) {
        self.registers = [0; NUM_REGISTERS];
        self.pc = 0;
        self.sp = STACK_TOP;
        self.return_sp = RETURN_STACK_TOP;
        self.running = true;
    }

    pub fn program_len(&self) -> usize {
        self.program_len
    }

    /// Read a byte from memory
    pub fn read(&self, address: usize) -> Result<u8, VmError> {
        self.memory
            .get(address)
            .copied()
            .ok_or(VmError::OutOfBounds(address))
    }

    /// Write a byte to memory
    pub fn write(&mut self, address: usize, value: u8) -> Result<(), VmError> {
        match self.memory.get_mut(address) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(VmError::OutOfBounds(address)),
        }
    }

    /// Read general-purpose register `index`
    pub fn register(&self, index: u8) -> Result<u8, VmError> {
        self.registers
            .get(index as usize)
            .copied()
            .ok_or(VmError::InvalidRegister(index))
    }

    /// Set general-purpose register `index`
    pub fn set_register(&mut self, index: u8, value: u8) -> Result<(), VmError> {
        match self.registers.get_mut(index as usize) {
            Some(reg) => {
                *reg = value;
                Ok(())
            }
            None => Err(VmError::InvalidRegister(index)),
        }
    }

    pub fn registers(&self) -> &[u8; NUM_REGISTERS] {
        &self.registers
    }

    pub(crate) fn registers_mut(&mut self) -> &mut [u8; NUM_REGISTERS] {
        &mut self.registers
    }

    /// Push a value onto the data stack
    pub fn push(&mut self, value: u8) -> Result<(), VmError> {
        // The stack must not grow into the loaded program
        if (self.sp as usize) <= self.program_len {
            return Err(VmError::StackOverflow);
        }
        self.sp -= 1;
        self.write(self.sp as usize, value)?;
        debug!("PUSH: value={} sp={:02X}", value, self.sp);
        Ok(())
    }

    /// Pop a value from the data stack
    pub fn pop(&mut self) -> Result<u8, VmError> {
        if self.sp >= STACK_TOP {
            debug!("STACK UNDERFLOW at pc {:02X}", self.pc);
            return Err(VmError::StackUnderflow);
        }
        let value = self.read(self.sp as usize)?;
        self.sp += 1;
        debug!("POP: value={} sp={:02X}", value, self.sp);
        Ok(value)
    }

    /// Save a resume address on the return-address stack
    pub fn push_return(&mut self, address: usize) -> Result<(), VmError> {
        if self.return_sp <= STACK_TOP {
            return Err(VmError::StackOverflow);
        }
        let address = u8::try_from(address).map_err(|_| VmError::OutOfBounds(address))?;
        self.return_sp -= 1;
        self.write(self.return_sp as usize, address)?;
        debug!(
            "CALL frame: return_pc={:02X} return_sp={:02X}",
            address, self.return_sp
        );
        Ok(())
    }

    /// Take the most recent resume address off the return-address stack
    pub fn pop_return(&mut self) -> Result<usize, VmError> {
        if self.return_sp >= RETURN_STACK_TOP {
            return Err(VmError::StackUnderflow);
        }
        let address = self.read(self.return_sp as usize)?;
        self.return_sp += 1;
        Ok(address as usize)
    }
}
