use crate::error::VmError;
use crate::instruction::Instruction;
use crate::vm::{Vm, MEMORY_SIZE};
use std::fmt::Write;

pub struct Disassembler<'a> {
    vm: &'a Vm,
}

impl<'a> Disassembler<'a> {
    pub fn new(vm: &'a Vm) -> Self {
        Disassembler { vm }
    }

    /// Disassemble the loaded program
    pub fn disassemble_program(&self) -> Result<String, VmError> {
        self.disassemble(0, self.vm.program_len())
    }

    /// Disassemble memory in `start..end`, one instruction per line.
    ///
    /// Bytes that do not decode are shown as `.byte` and skipped one at a time.
    pub fn disassemble(&self, start: usize, end: usize) -> Result<String, VmError> {
        let end = end.min(MEMORY_SIZE);
        let mut output = String::new();
        let mut pc = start;

        while pc < end {
            let (raw, text, size) = match Instruction::decode(self.vm, pc) {
                Ok(inst) => {
                    let size = inst.size();
                    let raw = (pc..pc + size)
                        .map(|addr| self.vm.read(addr).map(|b| format!("{:02x}", b)))
                        .collect::<Result<Vec<_>, _>>()?
                        .join(" ");
                    (raw, inst.to_string(), size)
                }
                Err(VmError::UnknownOpcode { opcode, .. }) | Err(VmError::UnsupportedAluOp(opcode)) => {
                    (format!("{:02x}", opcode), format!(".byte {:#010b}", opcode), 1)
                }
                Err(VmError::OutOfBounds(_)) => {
                    // Truncated instruction at the top of memory
                    let byte = self.vm.read(pc)?;
                    (format!("{:02x}", byte), format!(".byte {:#010b}", byte), 1)
                }
                Err(e) => return Err(e),
            };

            writeln!(&mut output, "{:02x}: {:<10} {}", pc, raw, text)
                .map_err(|e| VmError::Output(e.to_string()))?;
            pc += size;
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disassembles_print8() {
        let vm = Vm::with_program(&[0b1000_0010, 0, 8, 0b0100_0111, 0, 1]).unwrap();
        let listing = Disassembler::new(&vm).disassemble_program().unwrap();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(
            lines,
            vec![
                "00: 82 00 08   LDI R0,8",
                "03: 47 00      PRN R0",
                "05: 01         HLT",
            ]
        );
    }

    #[test]
    fn unknown_bytes_become_data() {
        let vm = Vm::with_program(&[0b1111_1111, 0b0001_0001]).unwrap();
        let listing = Disassembler::new(&vm).disassemble_program().unwrap();
        assert!(listing.contains("00: ff         .byte 0b11111111"));
        assert!(listing.contains("01: 11         RET"));
    }

    #[test]
    fn truncated_instruction_at_top_of_memory() {
        let mut vm = Vm::new();
        vm.write(0xFF, 0b1000_0010).unwrap();
        let listing = Disassembler::new(&vm).disassemble(0xFF, 0x100).unwrap();
        assert_eq!(listing, "ff: 82         .byte 0b10000010\n");
    }

    #[test]
    fn range_is_clamped() {
        let vm = Vm::new();
        let listing = Disassembler::new(&vm).disassemble(0xFE, 0x1000).unwrap();
        assert_eq!(listing.lines().count(), 2);
    }
}
