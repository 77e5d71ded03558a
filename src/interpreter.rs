use crate::alu;
use crate::error::VmError;
use crate::instruction::Instruction;
use crate::vm::Vm;
use log::{debug, info};
use std::io::{self, Write};

/// Result of executing an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionResult {
    /// Continue execution normally, PC already advanced
    Continue,
    /// Subroutine called, PC set to the target
    Called,
    /// Subroutine returned, PC set to the resume address
    Returned,
    /// HLT executed
    Halted,
}

/// The fetch-decode-execute loop over a `Vm`
pub struct Interpreter<W: Write = io::Stdout> {
    /// The machine state
    pub vm: Vm,
    /// Write a trace line before each instruction
    pub trace: bool,
    /// Instructions executed so far
    instruction_count: u64,
    /// Sink for PRN and trace output
    output: W,
}

impl Interpreter<io::Stdout> {
    /// Create an interpreter that prints to standard output
    pub fn new(vm: Vm) -> Self {
        Interpreter::with_output(vm, io::stdout())
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(vm: Vm, output: W) -> Self {
        Interpreter {
            vm,
            trace: false,
            instruction_count: 0,
            output,
        }
    }

    /// Enable or disable trace output
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    pub fn instruction_count(&self) -> u64 {
        self.instruction_count
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until HLT or the first fault
    pub fn run(&mut self) -> Result<(), VmError> {
        self.run_with_limit(None)
    }

    /// Run until HLT, the first fault, or `max_instructions` executed instructions
    pub fn run_with_limit(&mut self, max_instructions: Option<u64>) -> Result<(), VmError> {
        info!("Starting LS-8 interpreter at pc {:02X}", self.vm.pc);

        while self.vm.running {
            if let Some(limit) = max_instructions {
                if self.instruction_count >= limit {
                    info!("Reached instruction limit of {}", limit);
                    self.output.flush()?;
                    return Err(VmError::InstructionLimit(limit));
                }
            }
            self.step()?;
        }

        self.output.flush()?;
        info!("Halted after {} instructions", self.instruction_count);
        Ok(())
    }

    /// Fetch, decode and execute one instruction
    pub fn step(&mut self) -> Result<ExecutionResult, VmError> {
        if !self.vm.running {
            return Ok(ExecutionResult::Halted);
        }

        if self.trace {
            let line = self.trace_line();
            writeln!(self.output, "{}", line)?;
        }

        let pc = self.vm.pc;
        let instruction = Instruction::decode(&self.vm, pc)?;
        debug!("[{:02X}] {}", pc, instruction);

        // Advance PC past the instruction; CALL and RET overwrite it
        self.vm.pc += instruction.size();

        let result = self.execute_instruction(&instruction)?;
        self.instruction_count += 1;
        Ok(result)
    }

    /// Execute an already-decoded instruction. PC must already point past it.
    pub fn execute_instruction(&mut self, inst: &Instruction) -> Result<ExecutionResult, VmError> {
        match *inst {
            Instruction::Ldi { reg, value } => {
                self.vm.set_register(reg, value)?;
                Ok(ExecutionResult::Continue)
            }
            Instruction::Prn { reg } => {
                let value = self.vm.register(reg)?;
                writeln!(self.output, "{}", value)?;
                Ok(ExecutionResult::Continue)
            }
            Instruction::Hlt => {
                self.vm.running = false;
                Ok(ExecutionResult::Halted)
            }
            Instruction::Push { reg } => {
                let value = self.vm.register(reg)?;
                self.vm.push(value)?;
                Ok(ExecutionResult::Continue)
            }
            Instruction::Pop { reg } => {
                // Reject a bad destination before touching the stack
                self.vm.register(reg)?;
                let value = self.vm.pop()?;
                self.vm.set_register(reg, value)?;
                Ok(ExecutionResult::Continue)
            }
            Instruction::Alu { op, reg_a, reg_b } => {
                alu::apply(op, self.vm.registers_mut(), reg_a, reg_b)?;
                Ok(ExecutionResult::Continue)
            }
            Instruction::Call { reg } => {
                let target = self.vm.register(reg)?;
                let return_pc = self.vm.pc;
                self.vm.push_return(return_pc)?;
                debug!("CALL {:02X} -> {:02X}", return_pc, target);
                self.vm.pc = target as usize;
                Ok(ExecutionResult::Called)
            }
            Instruction::Ret => {
                self.vm.pc = self.vm.pop_return()?;
                debug!("RET -> {:02X}", self.vm.pc);
                Ok(ExecutionResult::Returned)
            }
        }
    }

    /// Render PC, the next three memory cells and all registers in hex
    pub fn trace_line(&self) -> String {
        let pc = self.vm.pc;
        let cell = |addr: usize| match self.vm.read(addr) {
            Ok(byte) => format!("{:02X}", byte),
            Err(_) => "--".to_string(),
        };

        let mut line = format!(
            "TRACE: {:02X} | {} {} {} |",
            pc,
            cell(pc),
            cell(pc + 1),
            cell(pc + 2)
        );
        for reg in self.vm.registers() {
            line.push_str(&format!(" {:02X}", reg));
        }
        line
    }
}
